//! RRULE expansion for exported events.
//!
//! Turns the weekly rule written for each VEVENT back into the dated
//! meetings it describes, so a schedule can be previewed before import.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use rrule::RRuleSet;
use serde::Serialize;
use tracing::debug;

use crate::error::{ScheduleError, ScheduleResult};
use crate::ics::ExportedEvent;

/// Weekly rules stop at the semester end, so this is never reached in practice.
const MAX_OCCURRENCES: u16 = 366;

/// One dated meeting of an exported event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occurrence {
    pub summary: String,
    pub location: Option<String>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Occurrence {
    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }
}

/// Build an iCalendar-format RRULE string for the rrule crate parser.
///
/// Floating times are passed as UTC so DTSTART and UNTIL agree on a zone.
fn build_rrule_string(event: &ExportedEvent) -> String {
    [
        format!("DTSTART:{}Z", event.start.format("%Y%m%dT%H%M%S")),
        format!("RRULE:{}", event.rrule()),
    ]
    .join("\n")
}

/// Every meeting of `event` from its first date through its `until` date.
pub fn expand_event(event: &ExportedEvent) -> ScheduleResult<Vec<Occurrence>> {
    if event.start.date() > event.until {
        return Ok(Vec::new());
    }

    let rrule_str = build_rrule_string(event);
    let rrule_set: RRuleSet = rrule_str.parse().map_err(|e| {
        ScheduleError::Recurrence(format!(
            "Failed to parse RRULE for '{}': {}",
            event.summary, e
        ))
    })?;

    let result = rrule_set.all(MAX_OCCURRENCES);
    let duration = event.end - event.start;

    let occurrences: Vec<Occurrence> = result
        .dates
        .iter()
        .map(|dt| {
            let start = dt.with_timezone(&Utc).naive_utc();
            Occurrence {
                summary: event.summary.clone(),
                location: event.location.clone(),
                start,
                end: start + duration,
            }
        })
        .collect();

    debug!(summary = %event.summary, day = %event.day, count = occurrences.len(), "Expanded event");
    Ok(occurrences)
}

/// Meetings of all `events`, in chronological order.
pub fn expand_all(events: &[ExportedEvent]) -> ScheduleResult<Vec<Occurrence>> {
    let mut all = Vec::new();
    for event in events {
        all.extend(expand_event(event)?);
    }
    all.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.summary.cmp(&b.summary)));
    Ok(all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weekday::Weekday;
    use chrono::Datelike;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event(day: Weekday, first: NaiveDate, until: NaiveDate) -> ExportedEvent {
        ExportedEvent {
            uid: "1-abc@schedcal.local".into(),
            summary: "CPSC 325".into(),
            location: Some("Herak 121".into()),
            description: "CPSC 325 - Spring 2025".into(),
            day,
            start: first.and_hms_opt(10, 0, 0).unwrap(),
            end: first.and_hms_opt(10, 50, 0).unwrap(),
            until,
        }
    }

    #[test]
    fn weekly_meetings_run_through_the_last_day() {
        // Mondays from Jan 20 to May 12, 2025
        let occurrences = expand_event(&event(Weekday::Mon, date(2025, 1, 20), date(2025, 5, 15))).unwrap();

        assert_eq!(occurrences.len(), 17);
        assert_eq!(occurrences[0].date(), date(2025, 1, 20));
        assert_eq!(occurrences.last().unwrap().date(), date(2025, 5, 12));
        assert!(occurrences.iter().all(|o| o.start.weekday() == chrono::Weekday::Mon));
        assert!(occurrences.iter().all(|o| (o.end - o.start).num_minutes() == 50));
    }

    #[test]
    fn meeting_on_the_until_date_is_included() {
        // May 15, 2025 is a Thursday
        let occurrences = expand_event(&event(Weekday::Thu, date(2025, 5, 1), date(2025, 5, 15))).unwrap();
        let dates: Vec<NaiveDate> = occurrences.iter().map(Occurrence::date).collect();
        assert_eq!(dates, vec![date(2025, 5, 1), date(2025, 5, 8), date(2025, 5, 15)]);
    }

    #[test]
    fn start_after_until_expands_to_nothing() {
        let occurrences = expand_event(&event(Weekday::Mon, date(2025, 6, 2), date(2025, 5, 15))).unwrap();
        assert!(occurrences.is_empty());
    }

    #[test]
    fn expand_all_is_chronological() {
        let events = [
            event(Weekday::Wed, date(2025, 1, 15), date(2025, 1, 31)),
            event(Weekday::Mon, date(2025, 1, 20), date(2025, 1, 31)),
        ];
        let all = expand_all(&events).unwrap();
        let dates: Vec<NaiveDate> = all.iter().map(Occurrence::date).collect();
        assert_eq!(
            dates,
            vec![
                date(2025, 1, 15),
                date(2025, 1, 20),
                date(2025, 1, 22),
                date(2025, 1, 27),
                date(2025, 1, 29),
            ]
        );
    }
}
