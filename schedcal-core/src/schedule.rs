//! Schedule editing session: create, edit, duplicate and remove placements.
//!
//! A [`Schedule`] owns its grid and color registry. Each operation either
//! applies completely or returns an error with the schedule unchanged.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::color::{Color, ColorRegistry};
use crate::error::{Field, ScheduleError, ScheduleResult};
use crate::grid::PlacementGrid;
use crate::placement::{Placement, PlacementId, PlacementKind, SectionRef};
use crate::time::{ClockTime, parse_clock};
use crate::weekday::{Weekday, WeekdaySet};

/// Everything needed to create a placement, as entered by the user or
/// derived from a catalog section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSpec {
    pub kind: PlacementKind,
    pub label: String,
    pub days: WeekdaySet,
    pub start_text: String,
    pub end_text: String,
    /// Color grouping key; `None` gets a one-off random color.
    pub source_key: Option<String>,
    pub location: Option<String>,
    pub secondary_label: Option<String>,
}

impl EventSpec {
    /// A personal event grouped by its own name.
    pub fn personal_event(
        label: impl Into<String>,
        days: WeekdaySet,
        start_text: impl Into<String>,
        end_text: impl Into<String>,
    ) -> Self {
        let label = label.into();
        EventSpec {
            kind: PlacementKind::PersonalEvent,
            source_key: Some(label.trim().to_string()),
            label,
            days,
            start_text: start_text.into(),
            end_text: end_text.into(),
            location: None,
            secondary_label: None,
        }
    }

    /// A course section labelled `"<subject> <code>"` and grouped by its
    /// section identity.
    pub fn course_section(
        section: SectionRef,
        days: WeekdaySet,
        start_text: impl Into<String>,
        end_text: impl Into<String>,
    ) -> Self {
        EventSpec {
            label: section.course_label(),
            source_key: Some(section.source_key()),
            kind: PlacementKind::CourseSection(section),
            days,
            start_text: start_text.into(),
            end_text: end_text.into(),
            location: None,
            secondary_label: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_secondary_label(mut self, secondary_label: impl Into<String>) -> Self {
        self.secondary_label = Some(secondary_label.into());
        self
    }

    pub fn without_source_key(mut self) -> Self {
        self.source_key = None;
        self
    }
}

/// Changes to an existing placement. `None` fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventPatch {
    pub label: Option<String>,
    pub days: Option<WeekdaySet>,
    pub start_text: Option<String>,
    pub end_text: Option<String>,
    pub location: Option<Option<String>>,
    pub secondary_label: Option<Option<String>>,
    pub color: Option<String>,
}

impl EventPatch {
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn days(mut self, days: WeekdaySet) -> Self {
        self.days = Some(days);
        self
    }

    pub fn times(mut self, start_text: impl Into<String>, end_text: impl Into<String>) -> Self {
        self.start_text = Some(start_text.into());
        self.end_text = Some(end_text.into());
        self
    }

    pub fn location(mut self, location: Option<String>) -> Self {
        self.location = Some(location);
        self
    }

    pub fn secondary_label(mut self, secondary_label: Option<String>) -> Self {
        self.secondary_label = Some(secondary_label);
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// One student's weekly schedule.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    grid: PlacementGrid,
    colors: ColorRegistry,
    /// Placement ids in creation order.
    order: Vec<PlacementId>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `spec` and place it on every one of its days.
    ///
    /// If any day collides with an existing placement, days already placed
    /// for this spec are taken back out and the conflict is returned.
    pub fn create(&mut self, spec: EventSpec) -> ScheduleResult<Placement> {
        let label = validate_label(&spec.label)?;
        validate_days(&spec.days)?;
        let start = parse_field(Field::Start, &spec.start_text)?;
        let end = parse_field(Field::End, &spec.end_text)?;
        validate_order(start, end)?;

        let source_key = spec.source_key.filter(|k| !k.trim().is_empty());
        let fresh_key = source_key
            .as_deref()
            .is_some_and(|key| !self.colors.contains(key));
        let color = match source_key.as_deref() {
            Some(key) => self.colors.color_for(key),
            None => self.colors.random_color(),
        };

        let placement = Placement {
            id: PlacementId::new(),
            kind: spec.kind,
            label,
            days: spec.days,
            start,
            end,
            color,
            location: non_empty(spec.location),
            secondary_label: non_empty(spec.secondary_label),
            source_key,
        };

        if let Err(err) = self.place_each_day(&placement) {
            if fresh_key {
                if let Some(key) = placement.source_key.as_deref() {
                    self.colors.release(key);
                }
            }
            return Err(err);
        }

        self.order.push(placement.id);
        info!(id = %placement.id, label = %placement.label, days = %placement.days, "Created placement");
        Ok(placement)
    }

    /// Apply `patch` to the placement `id`.
    ///
    /// Day or time changes re-check conflicts against everything except the
    /// placement's own entries; label, location and color changes do not.
    pub fn edit(&mut self, id: PlacementId, patch: EventPatch) -> ScheduleResult<Placement> {
        let current = self.grid.group(id).ok_or(ScheduleError::NotFound(id))?;
        let updated = merge(&current, &patch)?;

        let moved = updated.days != current.days
            || updated.start != current.start
            || updated.end != current.end;

        if moved {
            self.grid.check(&updated)?;
            let previous = self.grid.remove(id);
            if let Err(err) = self.place_each_day(&updated) {
                for entry in previous {
                    if let Err(restore) = self.grid.insert(entry) {
                        warn!(%id, error = %restore, "Could not restore entry after failed edit");
                    }
                }
                return Err(err);
            }
        } else {
            for entry in self.grid.iter_mut().filter(|e| e.id == id) {
                entry.label = updated.label.clone();
                entry.color = updated.color.clone();
                entry.location = updated.location.clone();
                entry.secondary_label = updated.secondary_label.clone();
            }
        }

        if patch.color.is_some() {
            self.propagate_color(&updated);
        }

        info!(%id, label = %updated.label, moved, "Edited placement");
        Ok(updated)
    }

    /// Copy a placement under a new id with `" (copy)"` appended to its label.
    ///
    /// The copy keeps the original's days and times, so it collides with the
    /// original unless the caller moves it with [`duplicate_with`](Self::duplicate_with).
    pub fn duplicate(&mut self, id: PlacementId) -> ScheduleResult<Placement> {
        self.duplicate_with(id, EventPatch::default())
    }

    /// Duplicate `id`, then apply `patch` to the copy before placing it.
    pub fn duplicate_with(&mut self, id: PlacementId, patch: EventPatch) -> ScheduleResult<Placement> {
        let original = self.grid.group(id).ok_or(ScheduleError::NotFound(id))?;
        let base = Placement {
            id: PlacementId::new(),
            label: format!("{} (copy)", original.label),
            ..original
        };
        let copy = merge(&base, &patch)?;

        self.place_each_day(&copy)?;
        if patch.color.is_some() {
            self.propagate_color(&copy);
        }

        self.order.push(copy.id);
        info!(from = %id, id = %copy.id, label = %copy.label, "Duplicated placement");
        Ok(copy)
    }

    /// Remove every day of `id`. Unknown ids are a no-op.
    ///
    /// Releases the color of the placement's key once nothing else uses it.
    pub fn remove(&mut self, id: PlacementId) -> Option<Placement> {
        let group = self.grid.group(id)?;
        self.grid.remove(id);
        self.order.retain(|o| *o != id);
        self.release_unused_key(group.source_key.as_deref());

        info!(%id, label = %group.label, "Removed placement");
        Some(group)
    }

    /// Remove a single day of `id`, keeping its other days.
    pub fn remove_day(&mut self, id: PlacementId, day: Weekday) -> Option<Placement> {
        let entry = self.grid.remove_entry(id, day)?;
        if !self.grid.contains(id) {
            self.order.retain(|o| *o != id);
        }
        self.release_unused_key(entry.source_key.as_deref());

        info!(%id, %day, label = %entry.label, "Removed placement day");
        Some(entry)
    }

    pub fn get(&self, id: PlacementId) -> Option<Placement> {
        self.grid.group(id)
    }

    /// Logical placements in creation order.
    pub fn placements(&self) -> Vec<Placement> {
        self.order.iter().filter_map(|id| self.grid.group(*id)).collect()
    }

    pub fn grid(&self) -> &PlacementGrid {
        &self.grid
    }

    pub fn colors(&self) -> &ColorRegistry {
        &self.colors
    }

    /// Number of logical placements.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.grid.clear();
        self.colors.clear();
        self.order.clear();
    }

    /// Insert one entry per day, taking earlier days back out on conflict.
    fn place_each_day(&mut self, placement: &Placement) -> ScheduleResult<()> {
        let mut placed = Vec::with_capacity(placement.days.len());

        for day in placement.days.iter() {
            if let Err(err) = self.grid.insert(placement.for_day(day)) {
                for done in placed {
                    self.grid.remove_entry(placement.id, done);
                }
                warn!(label = %placement.label, %day, error = %err, "Rejected placement");
                return Err(err);
            }
            placed.push(day);
        }

        Ok(())
    }

    /// Pin the key's color to the placement's and recolor everything sharing it.
    fn propagate_color(&mut self, placement: &Placement) {
        let Some(key) = placement.source_key.as_deref() else {
            return;
        };
        self.colors.assign(key, placement.color.clone());
        for entry in self
            .grid
            .iter_mut()
            .filter(|e| e.source_key.as_deref() == Some(key))
        {
            entry.color = placement.color.clone();
        }
    }

    fn release_unused_key(&mut self, key: Option<&str>) {
        let Some(key) = key else {
            return;
        };
        let in_use = self.grid.iter().any(|e| e.source_key.as_deref() == Some(key));
        if !in_use {
            self.colors.release(key);
        }
    }
}

/// Merge a patch over a placement and validate the result.
fn merge(base: &Placement, patch: &EventPatch) -> ScheduleResult<Placement> {
    let label = match &patch.label {
        Some(label) => validate_label(label)?,
        None => base.label.clone(),
    };
    let days = patch.days.clone().unwrap_or_else(|| base.days.clone());
    validate_days(&days)?;

    let start = match &patch.start_text {
        Some(text) => parse_field(Field::Start, text)?,
        None => base.start,
    };
    let end = match &patch.end_text {
        Some(text) => parse_field(Field::End, text)?,
        None => base.end,
    };
    validate_order(start, end)?;

    let color = match &patch.color {
        Some(text) => Color::parse(text)?,
        None => base.color.clone(),
    };

    Ok(Placement {
        label,
        days,
        start,
        end,
        color,
        location: match &patch.location {
            Some(location) => non_empty(location.clone()),
            None => base.location.clone(),
        },
        secondary_label: match &patch.secondary_label {
            Some(secondary) => non_empty(secondary.clone()),
            None => base.secondary_label.clone(),
        },
        ..base.clone()
    })
}

fn validate_label(label: &str) -> ScheduleResult<String> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return Err(ScheduleError::validation(Field::Label, "label cannot be empty"));
    }
    Ok(trimmed.to_string())
}

fn validate_days(days: &WeekdaySet) -> ScheduleResult<()> {
    if days.is_empty() {
        return Err(ScheduleError::validation(Field::Days, "select at least one day"));
    }
    Ok(())
}

fn validate_order(start: ClockTime, end: ClockTime) -> ScheduleResult<()> {
    if start >= end {
        return Err(ScheduleError::validation(
            Field::End,
            format!("end time {end} must be after start time {start}"),
        ));
    }
    Ok(())
}

fn parse_field(field: Field, text: &str) -> ScheduleResult<ClockTime> {
    parse_clock(text).map_err(|err| ScheduleError::validation(field, err.to_string()))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
