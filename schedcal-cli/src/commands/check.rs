use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;

use crate::plan::Plan;
use crate::render::Render;

/// Fails if any item of the plan could not be placed.
pub fn run(plan_path: &Path) -> Result<()> {
    let build = Plan::load(plan_path)?.build();

    if build.rejected.is_empty() {
        println!(
            "{}",
            format!("✓ {} placements, no conflicts", build.schedule.len()).green()
        );
        return Ok(());
    }

    for rejected in &build.rejected {
        eprintln!("   {}", rejected.render());
    }
    anyhow::bail!(
        "{} of {} items could not be placed",
        build.rejected.len(),
        build.rejected.len() + build.schedule.len()
    );
}
