use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use schedcal_core::{ExportOptions, IcsExporter, SchedcalConfig, export_filename};

use super::{parse_date, semester_end};
use crate::plan::Plan;
use crate::render::Render;

pub struct ExportArgs<'a> {
    pub plan: &'a Path,
    pub semester: &'a str,
    pub until: Option<&'a str>,
    pub from: Option<&'a str>,
    pub out: Option<PathBuf>,
    pub allow_empty: bool,
}

pub fn run(args: ExportArgs<'_>, config: &SchedcalConfig) -> Result<()> {
    let build = Plan::load(args.plan)?.build();

    for rejected in &build.rejected {
        eprintln!("   {} (skipped)", rejected.render());
    }

    if build.schedule.is_empty() && !args.allow_empty {
        anyhow::bail!("Nothing to export. Add sections or events to the plan, or pass --allow-empty");
    }

    let end = semester_end(args.semester, args.until)?;
    let mut options = ExportOptions::from_config(config);
    if let Some(from) = args.from {
        options = options.anchored_at(parse_date(from, "--from")?);
    }

    let exporter = IcsExporter::new(options);
    let content = exporter.export(&build.schedule.placements(), args.semester, end);

    let path = match args.out {
        Some(path) => path,
        None => config
            .output_path()
            .join(export_filename(&config.organization, args.semester)),
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Could not create {}", parent.display()))?;
    }
    std::fs::write(&path, &content).with_context(|| format!("Could not write {}", path.display()))?;

    let events = content.matches("BEGIN:VEVENT").count();
    println!(
        "{}",
        format!("  Exported {} events to {}", events, path.display()).green()
    );
    println!("{}", format!("  Repeats weekly until {}", end.format("%Y-%m-%d")).dimmed());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAN: &str = r#"
[[event]]
name = "Choir"
days = "TR"
start = "4:00 PM"
end = "5:15 PM"
"#;

    #[test]
    fn writes_ics_to_the_given_path() {
        let dir = tempfile::tempdir().unwrap();
        let plan = dir.path().join("plan.toml");
        std::fs::write(&plan, PLAN).unwrap();
        let out = dir.path().join("out/choir.ics");

        run(
            ExportArgs {
                plan: &plan,
                semester: "Spring 2025",
                until: None,
                from: Some("2025-01-15"),
                out: Some(out.clone()),
                allow_empty: false,
            },
            &SchedcalConfig::default(),
        )
        .unwrap();

        let content = std::fs::read_to_string(&out).unwrap();
        assert_eq!(content.matches("BEGIN:VEVENT").count(), 2);
        assert!(content.contains("UNTIL=20250515T235959Z"));
        assert!(content.contains("DTSTART:20250116T160000"));
    }

    #[test]
    fn default_path_uses_organization_and_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let plan = dir.path().join("plan.toml");
        std::fs::write(&plan, PLAN).unwrap();
        let config = SchedcalConfig {
            organization: "GU".into(),
            output_dir: dir.path().to_path_buf(),
            ..SchedcalConfig::default()
        };

        run(
            ExportArgs {
                plan: &plan,
                semester: "Fall 2025",
                until: None,
                from: None,
                out: None,
                allow_empty: false,
            },
            &config,
        )
        .unwrap();

        assert!(dir.path().join("GU_Schedule_Fall_2025.ics").exists());
    }

    #[test]
    fn empty_plan_needs_allow_empty() {
        let dir = tempfile::tempdir().unwrap();
        let plan = dir.path().join("plan.toml");
        std::fs::write(&plan, "").unwrap();
        let out = dir.path().join("empty.ics");
        let args = |allow_empty| ExportArgs {
            plan: &plan,
            semester: "Spring 2025",
            until: None,
            from: None,
            out: Some(out.clone()),
            allow_empty,
        };

        assert!(run(args(false), &SchedcalConfig::default()).is_err());
        assert!(!out.exists());

        run(args(true), &SchedcalConfig::default()).unwrap();
        let content = std::fs::read_to_string(&out).unwrap();
        assert!(content.starts_with("BEGIN:VCALENDAR"));
        assert!(!content.contains("BEGIN:VEVENT"));
    }
}
