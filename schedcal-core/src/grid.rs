//! In-memory weekly grid of placements.
//!
//! The grid holds one entry per (placement, day) and keeps a derived cell
//! index from `(day, hour slot)` to the placements touching that hour. Both
//! are updated on every insert and remove.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ScheduleError, ScheduleResult};
use crate::placement::{Placement, PlacementId};
use crate::time::ClockTime;
use crate::weekday::{Weekday, WeekdaySet};

/// Cell address: a weekday and an hour row (0..24).
pub type Slot = (Weekday, u8);

#[derive(Debug, Clone, Default)]
pub struct PlacementGrid {
    /// Day entries, each list kept sorted by start time.
    days: BTreeMap<Weekday, Vec<Placement>>,
    cells: BTreeMap<Slot, BTreeSet<PlacementId>>,
}

impl PlacementGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// The first existing entry that overlaps `candidate` on any of its days.
    ///
    /// Entries with the candidate's own id are ignored, so a placement can be
    /// re-checked against a grid that still holds its previous version.
    pub fn would_conflict(&self, candidate: &Placement) -> Option<&Placement> {
        candidate.days.iter().find_map(|day| {
            self.all_in(day)
                .iter()
                .find(|other| other.id != candidate.id && candidate.overlaps(other))
        })
    }

    /// [`would_conflict`](Self::would_conflict) as an error naming the day and
    /// the colliding label.
    pub fn check(&self, candidate: &Placement) -> ScheduleResult<()> {
        let Some(other) = self.would_conflict(candidate) else {
            return Ok(());
        };
        let day = other
            .days
            .iter()
            .find(|d| candidate.days.contains(*d))
            .or_else(|| other.days.first())
            .unwrap_or(Weekday::Mon);
        Err(ScheduleError::Conflict {
            day,
            with_label: other.label.clone(),
            with_id: other.id,
        })
    }

    /// Add `placement` on each of its days.
    ///
    /// Fails without touching the grid if any day conflicts. Existing entries
    /// with the same id on those days are replaced.
    pub fn insert(&mut self, placement: Placement) -> ScheduleResult<()> {
        self.check(&placement)?;

        for day in placement.days.iter() {
            self.remove_entry(placement.id, day);

            let entry = placement.for_day(day);
            for hour in entry.hour_slots() {
                self.cells.entry((day, hour)).or_default().insert(entry.id);
            }

            let list = self.days.entry(day).or_default();
            let at = list.partition_point(|e| (e.start, e.end) <= (entry.start, entry.end));
            list.insert(at, entry);
        }

        debug!(id = %placement.id, label = %placement.label, days = %placement.days, "Inserted placement");
        Ok(())
    }

    /// Remove every day entry with `id`. Absent ids are a no-op.
    pub fn remove(&mut self, id: PlacementId) -> Vec<Placement> {
        let days: Vec<Weekday> = self.days.keys().copied().collect();
        let removed: Vec<Placement> = days
            .into_iter()
            .filter_map(|day| self.remove_entry(id, day))
            .collect();

        if !removed.is_empty() {
            debug!(%id, entries = removed.len(), "Removed placement");
        }
        removed
    }

    /// Remove the single entry for `id` on `day`, if present.
    pub fn remove_entry(&mut self, id: PlacementId, day: Weekday) -> Option<Placement> {
        let list = self.days.get_mut(&day)?;
        let pos = list.iter().position(|e| e.id == id)?;
        let entry = list.remove(pos);
        if list.is_empty() {
            self.days.remove(&day);
        }

        for hour in entry.hour_slots() {
            if let Some(ids) = self.cells.get_mut(&(day, hour)) {
                ids.remove(&id);
                if ids.is_empty() {
                    self.cells.remove(&(day, hour));
                }
            }
        }

        Some(entry)
    }

    /// Entries on `day`, ordered by start time.
    pub fn all_in(&self, day: Weekday) -> &[Placement] {
        self.days.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Entries on screen at `time` on `day`.
    pub fn at(&self, day: Weekday, time: ClockTime) -> Vec<&Placement> {
        let hour = time.hour() as u8;
        let Some(ids) = self.cells.get(&(day, hour)) else {
            return Vec::new();
        };
        self.all_in(day)
            .iter()
            .filter(|e| ids.contains(&e.id) && e.covers(time))
            .collect()
    }

    /// Entries touching the hour row `hour` on `day`.
    pub fn cell(&self, day: Weekday, hour: u8) -> Vec<&Placement> {
        let Some(ids) = self.cells.get(&(day, hour)) else {
            return Vec::new();
        };
        self.all_in(day)
            .iter()
            .filter(|e| ids.contains(&e.id))
            .collect()
    }

    /// Occupied cells, for inspection and tests.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (&Slot, &BTreeSet<PlacementId>)> {
        self.cells.iter()
    }

    pub fn entries(&self, id: PlacementId) -> Vec<&Placement> {
        self.iter().filter(|e| e.id == id).collect()
    }

    pub fn contains(&self, id: PlacementId) -> bool {
        self.iter().any(|e| e.id == id)
    }

    /// The logical placement for `id`, with all of its days merged.
    pub fn group(&self, id: PlacementId) -> Option<Placement> {
        let entries = self.entries(id);
        let first = *entries.first()?;
        let days: WeekdaySet = entries.iter().flat_map(|e| e.days.iter()).collect();
        Some(Placement {
            days,
            ..first.clone()
        })
    }

    /// All day entries, Monday first, each day by start time.
    pub fn iter(&self) -> impl Iterator<Item = &Placement> {
        self.days.values().flatten()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Placement> {
        self.days.values_mut().flatten()
    }

    /// Number of day entries.
    pub fn len(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn clear(&mut self) {
        self.days.clear();
        self.cells.clear();
    }
}

/// Visible window of the grid: hourly rows from `start_hour` through `end_hour`.
///
/// Placements outside the window are still stored; the layout only decides
/// where (and whether) they are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridLayout {
    pub start_hour: u8,
    pub end_hour: u8,
}

impl Default for GridLayout {
    fn default() -> Self {
        GridLayout {
            start_hour: 8,
            end_hour: 21,
        }
    }
}

impl GridLayout {
    pub fn rows(&self) -> impl Iterator<Item = u8> {
        self.start_hour..=self.end_hour
    }

    pub fn row_count(&self) -> usize {
        self.rows().count()
    }

    /// Row holding `time`, if the window shows it.
    pub fn row_for(&self, time: ClockTime) -> Option<usize> {
        let hour = time.hour() as u8;
        (self.start_hour..=self.end_hour)
            .contains(&hour)
            .then(|| usize::from(hour - self.start_hour))
    }

    /// Continuous distance from the top of the window, in rows.
    pub fn top_offset(&self, time: ClockTime) -> f64 {
        f64::from(time.hour()) - f64::from(self.start_hour) + time.offset_fraction()
    }

    /// Block height in rows.
    pub fn height(&self, placement: &Placement) -> f64 {
        placement.duration_hours()
    }

    pub fn is_visible(&self, placement: &Placement) -> bool {
        let window_start = f64::from(self.start_hour);
        let window_end = f64::from(self.end_hour) + 1.0;
        placement.start_hour() < window_end && placement.end_hour() > window_start
    }

    /// `"8:00 AM"` style row label.
    pub fn row_label(hour: u8) -> String {
        ClockTime::from_hm(u32::from(hour), 0)
            .map(ClockTime::format_12h)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::placement::PlacementKind;

    fn placement(label: &str, days: &[Weekday], start: (u32, u32), end: (u32, u32)) -> Placement {
        Placement {
            id: PlacementId::new(),
            kind: PlacementKind::PersonalEvent,
            label: label.into(),
            days: days.iter().copied().collect(),
            start: ClockTime::from_hm(start.0, start.1).unwrap(),
            end: ClockTime::from_hm(end.0, end.1).unwrap(),
            color: Color::parse("#34a853").unwrap(),
            location: None,
            secondary_label: None,
            source_key: Some(label.into()),
        }
    }

    #[test]
    fn insert_indexes_each_day_and_slot() {
        let mut grid = PlacementGrid::new();
        let p = placement("CPSC 325", &[Weekday::Mon, Weekday::Wed], (10, 30), (11, 20));
        grid.insert(p.clone()).unwrap();

        assert_eq!(grid.len(), 2);
        assert_eq!(grid.cell(Weekday::Mon, 10).len(), 1);
        assert_eq!(grid.cell(Weekday::Mon, 11).len(), 1);
        assert_eq!(grid.cell(Weekday::Wed, 11)[0].id, p.id);
        assert!(grid.cell(Weekday::Tue, 10).is_empty());
        assert_eq!(grid.occupied_cells().count(), 4);
    }

    #[test]
    fn conflict_is_reported_and_grid_untouched() {
        let mut grid = PlacementGrid::new();
        let a = placement("CPSC 325", &[Weekday::Mon, Weekday::Wed, Weekday::Fri], (10, 0), (10, 50));
        grid.insert(a.clone()).unwrap();

        let b = placement("MATH 157", &[Weekday::Tue, Weekday::Wed], (10, 30), (11, 20));
        let err = grid.insert(b.clone()).unwrap_err();
        match err {
            ScheduleError::Conflict { day, with_label, with_id } => {
                assert_eq!(day, Weekday::Wed);
                assert_eq!(with_label, "CPSC 325");
                assert_eq!(with_id, a.id);
            }
            other => panic!("expected conflict, got {other:?}"),
        }
        assert!(!grid.contains(b.id));
        assert!(grid.all_in(Weekday::Tue).is_empty());
    }

    #[test]
    fn kinds_block_each_other() {
        let mut grid = PlacementGrid::new();
        let mut course = placement("CPSC 325", &[Weekday::Mon], (9, 0), (10, 0));
        course.kind = PlacementKind::CourseSection(crate::placement::SectionRef::new("CPSC", "325", "01"));
        grid.insert(course).unwrap();

        let event = placement("Gym", &[Weekday::Mon], (9, 30), (10, 30));
        assert!(grid.would_conflict(&event).is_some());
    }

    #[test]
    fn back_to_back_blocks_fit() {
        let mut grid = PlacementGrid::new();
        grid.insert(placement("A", &[Weekday::Thu], (9, 0), (10, 0))).unwrap();
        grid.insert(placement("B", &[Weekday::Thu], (10, 0), (11, 0))).unwrap();
        grid.insert(placement("C", &[Weekday::Thu], (8, 0), (9, 0))).unwrap();

        let labels: Vec<&str> = grid.all_in(Weekday::Thu).iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["C", "A", "B"]);
    }

    #[test]
    fn same_id_replaces_instead_of_conflicting() {
        let mut grid = PlacementGrid::new();
        let mut p = placement("Lab", &[Weekday::Fri], (13, 0), (15, 0));
        grid.insert(p.clone()).unwrap();

        p.start = ClockTime::from_hm(14, 0).unwrap();
        p.end = ClockTime::from_hm(16, 0).unwrap();
        assert!(grid.would_conflict(&p).is_none());
        grid.insert(p.clone()).unwrap();

        assert_eq!(grid.len(), 1);
        assert!(grid.cell(Weekday::Fri, 13).is_empty());
        assert_eq!(grid.cell(Weekday::Fri, 15).len(), 1);
    }

    #[test]
    fn remove_clears_cells_and_is_idempotent() {
        let mut grid = PlacementGrid::new();
        let p = placement("Club", &[Weekday::Tue, Weekday::Thu], (18, 0), (19, 30));
        grid.insert(p.clone()).unwrap();

        assert_eq!(grid.remove(p.id).len(), 2);
        assert!(grid.is_empty());
        assert_eq!(grid.occupied_cells().count(), 0);

        assert!(grid.remove(p.id).is_empty());
    }

    #[test]
    fn at_uses_half_open_intervals() {
        let mut grid = PlacementGrid::new();
        let p = placement("Seminar", &[Weekday::Wed], (10, 0), (10, 50));
        grid.insert(p).unwrap();

        let t = |h, m| ClockTime::from_hm(h, m).unwrap();
        assert_eq!(grid.at(Weekday::Wed, t(10, 0)).len(), 1);
        assert_eq!(grid.at(Weekday::Wed, t(10, 49)).len(), 1);
        assert!(grid.at(Weekday::Wed, t(10, 50)).is_empty());
        assert!(grid.at(Weekday::Mon, t(10, 10)).is_empty());
    }

    #[test]
    fn group_merges_days() {
        let mut grid = PlacementGrid::new();
        let p = placement("Band", &[Weekday::Mon, Weekday::Fri], (16, 0), (17, 0));
        grid.insert(p.clone()).unwrap();

        let group = grid.group(p.id).unwrap();
        assert_eq!(group.days, p.days);
        assert_eq!(group.label, "Band");
    }

    #[test]
    fn layout_rows_and_offsets() {
        let layout = GridLayout::default();
        assert_eq!(layout.row_count(), 14);
        assert_eq!(layout.row_for(ClockTime::from_hm(8, 0).unwrap()), Some(0));
        assert_eq!(layout.row_for(ClockTime::from_hm(10, 30).unwrap()), Some(2));
        assert_eq!(layout.row_for(ClockTime::from_hm(7, 59).unwrap()), None);
        assert_eq!(layout.top_offset(ClockTime::from_hm(10, 30).unwrap()), 2.5);
        assert_eq!(GridLayout::row_label(13), "1:00 PM");

        let early = placement("Swim", &[Weekday::Mon], (6, 0), (7, 0));
        assert!(!layout.is_visible(&early));
    }

    #[test]
    fn block_height_covers_partial_hours() {
        let layout = GridLayout::default();

        let lecture = placement("CPSC 325", &[Weekday::Mon], (10, 0), (10, 50));
        assert!((layout.height(&lecture) - 50.0 / 60.0).abs() < 1e-9);
        assert_eq!(layout.top_offset(lecture.start), 2.0);

        let lab = placement("Lab", &[Weekday::Tue], (13, 15), (15, 45));
        assert_eq!(layout.height(&lab), 2.5);
        assert_eq!(layout.top_offset(lab.start), 5.25);
    }
}
