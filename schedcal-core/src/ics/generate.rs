//! ICS generation for weekly recurring placements.

use std::collections::HashSet;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};
use icalendar::{Calendar, Component, EventLike};
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::SchedcalConfig;
use crate::placement::Placement;
use crate::time::next_calendar_date;
use crate::weekday::Weekday;

pub const DEFAULT_PRODID: &str = "-//schedcal//Course Schedule//EN";

const UID_SUFFIX_LEN: usize = 13;

/// Knobs for one export run.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub prod_id: String,
    pub uid_domain: String,
    /// LOCATION for placements that have none; omitted when `None`.
    pub default_location: Option<String>,
    /// First events start on or after this date. `None` means today.
    pub anchor: Option<NaiveDate>,
    /// DTSTAMP for every event. `None` means the time of export.
    pub dtstamp: Option<DateTime<Utc>>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            prod_id: DEFAULT_PRODID.to_string(),
            uid_domain: SchedcalConfig::default().uid_domain,
            default_location: None,
            anchor: None,
            dtstamp: None,
        }
    }
}

impl ExportOptions {
    pub fn from_config(config: &SchedcalConfig) -> Self {
        ExportOptions {
            uid_domain: config.uid_domain.clone(),
            default_location: config.default_location.clone(),
            ..Self::default()
        }
    }

    pub fn anchored_at(mut self, anchor: NaiveDate) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn stamped_at(mut self, dtstamp: DateTime<Utc>) -> Self {
        self.dtstamp = Some(dtstamp);
        self
    }
}

/// One VEVENT: a single weekday of a placement, repeating weekly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedEvent {
    pub uid: String,
    pub summary: String,
    pub location: Option<String>,
    pub description: String,
    pub day: Weekday,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Last day of the recurrence, inclusive.
    pub until: NaiveDate,
}

impl ExportedEvent {
    /// `FREQ=WEEKLY;BYDAY=MO;UNTIL=20250515T235959Z`
    pub fn rrule(&self) -> String {
        format!(
            "FREQ=WEEKLY;BYDAY={};UNTIL={}T235959Z",
            self.day.ics_code(),
            self.until.format("%Y%m%d")
        )
    }
}

/// Serializes placements into an iCalendar document.
#[derive(Debug, Clone, Default)]
pub struct IcsExporter {
    options: ExportOptions,
}

impl IcsExporter {
    pub fn new(options: ExportOptions) -> Self {
        IcsExporter { options }
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// One event per placement per day it occupies, each with a UID that is
    /// unique within the returned list.
    pub fn events(
        &self,
        placements: &[Placement],
        semester_label: &str,
        semester_end: NaiveDate,
    ) -> Vec<ExportedEvent> {
        let anchor = self.options.anchor.unwrap_or_else(|| Local::now().date_naive());
        let mut seen_uids = HashSet::new();
        let mut events = Vec::new();

        for placement in placements {
            for day in placement.days.iter() {
                let date = next_calendar_date(day, anchor);
                if date > semester_end {
                    warn!(
                        label = %placement.label,
                        %day,
                        first = %date,
                        until = %semester_end,
                        "First occurrence falls after the semester ends"
                    );
                }

                let uid = loop {
                    let candidate = self.generate_uid();
                    if seen_uids.insert(candidate.clone()) {
                        break candidate;
                    }
                    debug!(uid = %candidate, "Regenerating duplicate UID");
                };

                events.push(ExportedEvent {
                    uid,
                    summary: placement.label.clone(),
                    location: placement
                        .location
                        .clone()
                        .or_else(|| self.options.default_location.clone()),
                    description: format!("{} - {}", placement.label, semester_label),
                    day,
                    start: date.and_time(placement.start.to_naive_time()),
                    end: date.and_time(placement.end.to_naive_time()),
                    until: semester_end,
                });
            }
        }

        events
    }

    /// Render `placements` as a `\r\n`-joined iCalendar document.
    ///
    /// An empty list yields a calendar with no events.
    pub fn export(
        &self,
        placements: &[Placement],
        semester_label: &str,
        semester_end: NaiveDate,
    ) -> String {
        if placements.is_empty() {
            warn!(semester = semester_label, "Exporting an empty schedule");
        }

        let events = self.events(placements, semester_label, semester_end);
        let output = self.render(&events);

        info!(
            semester = semester_label,
            placements = placements.len(),
            events = events.len(),
            "Exported schedule"
        );
        output
    }

    /// Render already-built events.
    pub fn render(&self, events: &[ExportedEvent]) -> String {
        let dtstamp = self
            .options
            .dtstamp
            .unwrap_or_else(Utc::now)
            .format("%Y%m%dT%H%M%SZ")
            .to_string();

        let mut cal = Calendar::new();

        for event in events {
            let mut ics_event = icalendar::Event::new();
            ics_event.uid(&event.uid);
            ics_event.add_property("DTSTAMP", &dtstamp);
            ics_event.summary(&event.summary);
            if let Some(ref location) = event.location {
                ics_event.location(location);
            }
            ics_event.description(&event.description);

            // Floating local time, no Z and no TZID
            ics_event.add_property("DTSTART", event.start.format("%Y%m%dT%H%M%S").to_string());
            ics_event.add_property("DTEND", event.end.format("%Y%m%dT%H%M%S").to_string());
            ics_event.add_property("RRULE", event.rrule());

            cal.push(ics_event.done());
        }

        let cal = cal.done();
        normalize_header(&cal.to_string(), &self.options.prod_id)
    }

    /// `<nanos since epoch>-<13 lowercase alphanumerics>@<domain>`
    fn generate_uid(&self) -> String {
        let nanos = Utc::now()
            .timestamp_nanos_opt()
            .unwrap_or_else(|| Utc::now().timestamp_micros() * 1000);
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(UID_SUFFIX_LEN)
            .map(|b| char::from(b).to_ascii_lowercase())
            .collect();
        format!("{nanos}-{suffix}@{}", self.options.uid_domain)
    }
}

const HEADER_PREFIXES: [&str; 4] = ["VERSION:", "PRODID:", "CALSCALE:", "METHOD:"];

/// Replace whatever calendar-level header the icalendar crate wrote with the
/// fixed one, directly after BEGIN:VCALENDAR.
fn normalize_header(ics: &str, prod_id: &str) -> String {
    let mut result = String::with_capacity(ics.len() + 64);
    let mut in_component = false;

    for line in ics.lines() {
        if line.starts_with("BEGIN:") && line != "BEGIN:VCALENDAR" {
            in_component = true;
        } else if line.starts_with("END:") && line != "END:VCALENDAR" {
            in_component = false;
        } else if !in_component && HEADER_PREFIXES.iter().any(|p| line.starts_with(p)) {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");

        if line == "BEGIN:VCALENDAR" {
            for header in [
                "VERSION:2.0".to_string(),
                format!("PRODID:{prod_id}"),
                "CALSCALE:GREGORIAN".to_string(),
                "METHOD:PUBLISH".to_string(),
            ] {
                result.push_str(&header);
                result.push_str("\r\n");
            }
        }
    }

    result
}
