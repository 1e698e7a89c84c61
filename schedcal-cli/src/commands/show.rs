use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;
use schedcal_core::SchedcalConfig;

use crate::plan::Plan;
use crate::render::{Render, render_legend, render_week};

pub fn run(plan_path: &Path, config: &SchedcalConfig) -> Result<()> {
    let build = Plan::load(plan_path)?.build();

    println!("{}", render_week(&build.schedule, &config.layout()));
    println!();
    println!("{}", "Placements".bold());
    println!("{}", render_legend(&build.schedule));

    if !build.rejected.is_empty() {
        println!();
        println!("{}", "Rejected".bold());
        for rejected in &build.rejected {
            println!("   {}", rejected.render());
        }
    }

    Ok(())
}
