//! Plan files: the sections and personal events a schedule is built from.
//!
//! ```toml
//! [[section]]
//! subject = "CPSC"
//! course_code = "325"
//! section_number = "01"
//! schedule = "MWF 10:00 AM-10:50 AM"
//! location = "Herak 121"
//! instructor = "Dr. Bowers"
//!
//! [[event]]
//! name = "Gym"
//! days = "TR"
//! start = "6:00 PM"
//! end = "7:30 PM"
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use schedcal_core::{CatalogSection, EventPatch, EventSpec, Schedule, ScheduleError, WeekdaySet};
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Default, Deserialize)]
pub struct Plan {
    #[serde(default, rename = "section")]
    pub sections: Vec<CatalogSection>,

    #[serde(default, rename = "event")]
    pub events: Vec<PlanEvent>,
}

/// A personal event as written in a plan file.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanEvent {
    pub name: String,
    /// Day letters, e.g. `"MWF"` or `"TR"`.
    pub days: String,
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// `#rrggbb` override for the event's color group.
    #[serde(default)]
    pub color: Option<String>,
}

impl PlanEvent {
    fn to_spec(&self) -> EventSpec {
        let (days, unknown) = WeekdaySet::from_letters(&self.days);
        if !unknown.is_empty() {
            warn!(event = %self.name, ?unknown, "Skipping unknown weekday codes");
        }

        let mut spec = EventSpec::personal_event(&self.name, days, &self.start, &self.end);
        spec.location = self.location.clone();
        spec.secondary_label = self.description.clone();
        spec
    }
}

/// An item of the plan that could not be placed.
#[derive(Debug)]
pub struct Rejected {
    pub item: String,
    pub error: ScheduleError,
}

/// Result of building a schedule from a plan.
#[derive(Debug, Default)]
pub struct Build {
    pub schedule: Schedule,
    pub rejected: Vec<Rejected>,
}

impl Plan {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read plan file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid plan file {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Place sections first, then personal events, in file order.
    ///
    /// Items that fail validation or conflict are collected instead of
    /// aborting the build.
    pub fn build(&self) -> Build {
        let mut build = Build::default();

        for section in &self.sections {
            if let Err(error) = build.schedule.add_section(section) {
                build.rejected.push(Rejected {
                    item: format!("{} {}-{}", section.subject, section.course_code, section.section_number),
                    error,
                });
            }
        }

        for event in &self.events {
            let result = build.schedule.create(event.to_spec()).and_then(|placement| {
                let Some(color) = &event.color else {
                    return Ok(placement);
                };
                let patch = EventPatch::default().color(color.clone());
                build.schedule.edit(placement.id, patch).inspect_err(|_| {
                    build.schedule.remove(placement.id);
                })
            });
            if let Err(error) = result {
                build.rejected.push(Rejected {
                    item: event.name.clone(),
                    error,
                });
            }
        }

        build
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schedcal_core::{Weekday, error::Field};

    const PLAN: &str = r##"
[[section]]
subject = "CPSC"
course_code = "325"
section_number = "01"
schedule = "MWF 10:00 AM-10:50 AM"
location = "Herak 121"
instructor = "Dr. Bowers"

[[section]]
subject = "MATH"
course_code = "157"
section_number = "02"
schedule = "M 10:30 AM-11:20 AM"

[[event]]
name = "Gym"
days = "TR"
start = "6:00 PM"
end = "7:30 PM"
color = "#123456"

[[event]]
name = "Nothing"
days = ""
start = "9:00"
end = "10:00"
"##;

    #[test]
    fn builds_and_collects_rejections() {
        let plan = Plan::parse(PLAN).unwrap();
        assert_eq!(plan.sections.len(), 2);
        assert_eq!(plan.events.len(), 2);

        let build = plan.build();
        assert_eq!(build.schedule.len(), 2);
        assert_eq!(build.rejected.len(), 2);

        let math = &build.rejected[0];
        assert_eq!(math.item, "MATH 157-02");
        match &math.error {
            ScheduleError::Conflict { day, with_label, .. } => {
                assert_eq!(*day, Weekday::Mon);
                assert_eq!(with_label, "CPSC 325");
            }
            other => panic!("expected conflict, got {other:?}"),
        }

        let nothing = &build.rejected[1];
        assert!(matches!(nothing.error, ScheduleError::Validation { field: Field::Days, .. }));
    }

    #[test]
    fn event_color_override_is_applied() {
        let build = Plan::parse(PLAN).unwrap().build();
        let gym = build
            .schedule
            .placements()
            .into_iter()
            .find(|p| p.label == "Gym")
            .unwrap();
        assert_eq!(gym.color.as_str(), "#123456");
        assert_eq!(gym.days.letters(), "TR");
    }

    #[test]
    fn empty_plan_is_valid() {
        let plan = Plan::parse("").unwrap();
        assert!(plan.build().schedule.is_empty());
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Plan::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(err.to_string().contains("Could not read plan file"));
    }
}
