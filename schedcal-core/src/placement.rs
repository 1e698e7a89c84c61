//! Placements: the blocks that occupy the weekly grid.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::color::Color;
use crate::time::ClockTime;
use crate::weekday::{Weekday, WeekdaySet};

/// Opaque identifier shared by every day-entry of one logical placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlacementId(Uuid);

impl PlacementId {
    pub fn new() -> Self {
        PlacementId(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PlacementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlacementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Catalog identity of a course section.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SectionRef {
    pub subject: String,
    pub course_code: String,
    pub section_number: String,
}

impl SectionRef {
    pub fn new(
        subject: impl Into<String>,
        course_code: impl Into<String>,
        section_number: impl Into<String>,
    ) -> Self {
        SectionRef {
            subject: subject.into(),
            course_code: course_code.into(),
            section_number: section_number.into(),
        }
    }

    /// Grouping key: subject, course code and section number run together.
    pub fn source_key(&self) -> String {
        format!("{}{}{}", self.subject, self.course_code, self.section_number)
    }

    /// `"CPSC 325"`
    pub fn course_label(&self) -> String {
        format!("{} {}", self.subject, self.course_code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlacementKind {
    CourseSection(SectionRef),
    PersonalEvent,
}

impl PlacementKind {
    pub fn is_course(&self) -> bool {
        matches!(self, PlacementKind::CourseSection(_))
    }

    pub fn section(&self) -> Option<&SectionRef> {
        match self {
            PlacementKind::CourseSection(section) => Some(section),
            PlacementKind::PersonalEvent => None,
        }
    }
}

/// One scheduled block: a course section or a personal event.
///
/// A logical placement may cover several days. The grid stores it as one
/// entry per day, each carrying the same `id`, label, times and color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub id: PlacementId,
    pub kind: PlacementKind,
    pub label: String,
    pub days: WeekdaySet,
    pub start: ClockTime,
    pub end: ClockTime,
    pub color: Color,
    pub location: Option<String>,
    /// Instructor for sections, free-text description for events.
    pub secondary_label: Option<String>,
    /// `None` for ad-hoc placements that take part in no color grouping.
    pub source_key: Option<String>,
}

impl Placement {
    pub fn start_hour(&self) -> f64 {
        self.start.as_hours()
    }

    pub fn end_hour(&self) -> f64 {
        self.end.as_hours()
    }

    /// Half-open interval overlap: touching blocks do not overlap.
    pub fn overlaps(&self, other: &Placement) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn occupies(&self, day: Weekday) -> bool {
        self.days.contains(day)
    }

    /// Whether the block is on screen at `time` (start inclusive, end exclusive).
    pub fn covers(&self, time: ClockTime) -> bool {
        self.start <= time && time < self.end
    }

    /// Hour rows touched by `[start, end)`.
    pub fn hour_slots(&self) -> impl Iterator<Item = u8> {
        let first = self.start.hour() as u8;
        let last = if self.end.minute() == 0 {
            self.end.hour() as u8
        } else {
            self.end.hour() as u8 + 1
        };
        first..last.max(first + 1)
    }

    /// Duration in decimal hours.
    pub fn duration_hours(&self) -> f64 {
        self.end_hour() - self.start_hour()
    }

    /// A copy restricted to a single day (one grid entry).
    pub fn for_day(&self, day: Weekday) -> Placement {
        Placement {
            days: WeekdaySet::single(day),
            ..self.clone()
        }
    }

    /// `"10:00 AM - 10:50 AM"`
    pub fn time_range(&self) -> String {
        format!("{} - {}", self.start, self.end)
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {})", self.label, self.days, self.time_range())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(start: (u32, u32), end: (u32, u32)) -> Placement {
        Placement {
            id: PlacementId::new(),
            kind: PlacementKind::PersonalEvent,
            label: "Block".into(),
            days: WeekdaySet::single(Weekday::Mon),
            start: ClockTime::from_hm(start.0, start.1).unwrap(),
            end: ClockTime::from_hm(end.0, end.1).unwrap(),
            color: Color::parse("#4285f4").unwrap(),
            location: None,
            secondary_label: None,
            source_key: None,
        }
    }

    #[test]
    fn touching_blocks_do_not_overlap() {
        let a = block((10, 0), (10, 50));
        let b = block((10, 50), (11, 40));
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));

        let c = block((10, 30), (11, 20));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&a));
    }

    #[test]
    fn hour_slots_cover_partial_hours() {
        assert_eq!(block((10, 0), (10, 50)).hour_slots().collect::<Vec<_>>(), vec![10]);
        assert_eq!(block((10, 30), (11, 20)).hour_slots().collect::<Vec<_>>(), vec![10, 11]);
        assert_eq!(block((9, 0), (11, 0)).hour_slots().collect::<Vec<_>>(), vec![9, 10]);
    }

    #[test]
    fn section_source_key_concatenates_identity() {
        let section = SectionRef::new("CPSC", "325", "01");
        assert_eq!(section.source_key(), "CPSC32501");
        assert_eq!(section.course_label(), "CPSC 325");
    }
}
