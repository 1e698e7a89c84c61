use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;
use schedcal_core::recurrence::expand_all;
use schedcal_core::{ExportOptions, IcsExporter, SchedcalConfig};

use super::{parse_date, semester_end};
use crate::plan::Plan;
use crate::render::Render;

/// List every dated meeting the export for this plan would produce.
pub fn run(
    plan_path: &Path,
    semester: &str,
    until: Option<&str>,
    from: Option<&str>,
    config: &SchedcalConfig,
) -> Result<()> {
    let build = Plan::load(plan_path)?.build();
    let end = semester_end(semester, until)?;

    let mut options = ExportOptions::from_config(config);
    if let Some(from) = from {
        options = options.anchored_at(parse_date(from, "--from")?);
    }

    let events = IcsExporter::new(options).events(&build.schedule.placements(), semester, end);
    let occurrences = expand_all(&events)?;

    if occurrences.is_empty() {
        println!("{}", "   No meetings before the semester ends".dimmed());
        return Ok(());
    }

    for occurrence in &occurrences {
        println!("   {}", occurrence.render());
    }
    println!();
    println!(
        "{}",
        format!("   {} meetings through {}", occurrences.len(), end.format("%Y-%m-%d")).dimmed()
    );

    Ok(())
}
