//! Catalog course sections and their conversion into placements.

use serde::{Deserialize, Serialize};

use crate::error::ScheduleResult;
use crate::placement::{Placement, SectionRef};
use crate::schedule::{EventSpec, Schedule};
use crate::time::parse_schedule_string;

/// A course section as listed by the course catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSection {
    pub subject: String,
    pub course_code: String,
    pub section_number: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Meeting pattern such as `"MWF 10:00 AM-10:50 AM"`.
    pub schedule: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub instructor: Option<String>,
    #[serde(default)]
    pub crn: Option<String>,
}

impl CatalogSection {
    pub fn section_ref(&self) -> SectionRef {
        SectionRef::new(&self.subject, &self.course_code, &self.section_number)
    }

    /// Turn the section into a creation request.
    ///
    /// Fails with `UnparsableSchedule` when the meeting pattern is not of the
    /// `<days> <start>-<end>` shape.
    pub fn to_spec(&self) -> ScheduleResult<EventSpec> {
        let slot = parse_schedule_string(&self.schedule)?;

        let mut spec = EventSpec::course_section(
            self.section_ref(),
            slot.days,
            slot.start.format_12h(),
            slot.end.format_12h(),
        );
        spec.location = self.location.clone();
        spec.secondary_label = self.instructor.clone();
        Ok(spec)
    }
}

impl Schedule {
    /// Place a catalog section on the schedule.
    pub fn add_section(&mut self, section: &CatalogSection) -> ScheduleResult<Placement> {
        self.create(section.to_spec()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ParseErrorKind, ScheduleError};
    use crate::time::ClockTime;
    use crate::weekday::Weekday;

    fn section(schedule: &str) -> CatalogSection {
        CatalogSection {
            subject: "CPSC".into(),
            course_code: "325".into(),
            section_number: "01".into(),
            title: Some("Database Management Systems".into()),
            schedule: schedule.into(),
            location: Some("Herak 121".into()),
            instructor: Some("Dr. Bowers".into()),
            crn: Some("31472".into()),
        }
    }

    #[test]
    fn section_becomes_course_spec() {
        let spec = section("TR 2:00 PM-3:15 PM").to_spec().unwrap();

        assert_eq!(spec.label, "CPSC 325");
        assert_eq!(spec.source_key.as_deref(), Some("CPSC32501"));
        assert_eq!(spec.days.letters(), "TR");
        assert_eq!(spec.start_text, "2:00 PM");
        assert_eq!(spec.end_text, "3:15 PM");
        assert_eq!(spec.location.as_deref(), Some("Herak 121"));
        assert_eq!(spec.secondary_label.as_deref(), Some("Dr. Bowers"));
        assert!(spec.kind.is_course());
    }

    #[test]
    fn add_section_places_every_meeting_day() {
        let mut schedule = Schedule::new();
        let placement = schedule.add_section(&section("MWF 10:00AM-10:50AM")).unwrap();

        assert_eq!(placement.start, ClockTime::from_hm(10, 0).unwrap());
        assert_eq!(placement.end, ClockTime::from_hm(10, 50).unwrap());
        assert_eq!(schedule.grid().all_in(Weekday::Fri).len(), 1);
        assert_eq!(placement.kind.section().unwrap().section_number, "01");
    }

    #[test]
    fn bad_meeting_pattern_is_a_parse_error() {
        let mut schedule = Schedule::new();
        let err = schedule.add_section(&section("TBA")).unwrap_err();
        match err {
            ScheduleError::Parse(parse) => {
                assert_eq!(parse.kind, ParseErrorKind::UnparsableSchedule);
                assert_eq!(parse.raw_input, "TBA");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
        assert!(schedule.is_empty());
    }

    #[test]
    fn deserializes_with_optional_fields_missing() {
        let toml = r#"
            subject = "MATH"
            course_code = "157"
            section_number = "02"
            schedule = "M 10:30 AM-11:20 AM"
        "#;
        let section: CatalogSection = toml::from_str(toml).unwrap();
        assert!(section.instructor.is_none());
        assert_eq!(section.section_ref().source_key(), "MATH15702");
    }
}
