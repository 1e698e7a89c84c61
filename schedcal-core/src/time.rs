//! Text-to-time conversion.
//!
//! All user-facing time text (form input, catalog schedule strings) goes
//! through this module. Times are naive local wall-clock values; nothing
//! here knows about time zones.

use std::fmt;
use std::sync::LazyLock;

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ParseError, ParseErrorKind};
use crate::weekday::{Weekday, WeekdaySet};

const MINUTES_PER_DAY: u16 = 24 * 60;

// First `H:MM` anywhere in the text, with an optional meridiem after it
static CLOCK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+):(\d+)\s*([ap]m)?").expect("Invalid regex"));

// One side of a catalog schedule string, e.g. "10:00 AM"
static SCHEDULE_TIME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(\d+):(\d+)\s*([ap]m)\s*$").expect("Invalid regex"));

/// A wall-clock time of day with minute resolution, in `[00:00, 24:00)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct ClockTime(u16);

impl ClockTime {
    pub fn from_hm(hour: u32, minute: u32) -> Option<ClockTime> {
        if hour >= 24 || minute >= 60 {
            return None;
        }
        Some(ClockTime((hour * 60 + minute) as u16))
    }

    pub fn from_minutes(minutes: u16) -> Option<ClockTime> {
        (minutes < MINUTES_PER_DAY).then_some(ClockTime(minutes))
    }

    /// Nearest minute to a decimal hour (`10.5` is 10:30).
    pub fn from_hours(hours: f64) -> Option<ClockTime> {
        if !(0.0..24.0).contains(&hours) {
            return None;
        }
        let minutes = (hours * 60.0).round() as u16;
        ClockTime::from_minutes(minutes)
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u32 {
        u32::from(self.0 / 60)
    }

    pub fn minute(self) -> u32 {
        u32::from(self.0 % 60)
    }

    /// Decimal hours, e.g. 10:30 is `10.5`.
    pub fn as_hours(self) -> f64 {
        f64::from(self.0) / 60.0
    }

    /// Position inside the hour row, `hour - floor(hour)`.
    pub fn offset_fraction(self) -> f64 {
        f64::from(self.minute()) / 60.0
    }

    pub fn to_naive_time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour(), self.minute(), 0).unwrap_or(NaiveTime::MIN)
    }

    /// `"10:30 AM"` style display text.
    pub fn format_12h(self) -> String {
        let (hour, meridiem) = match self.hour() {
            0 => (12, "AM"),
            h @ 1..=11 => (h, "AM"),
            12 => (12, "PM"),
            h => (h - 12, "PM"),
        };
        format!("{}:{:02} {}", hour, self.minute(), meridiem)
    }

    /// `"HH:MM"` 24-hour text, as produced by HTML time inputs.
    pub fn format_24h(self) -> String {
        format!("{:02}:{:02}", self.hour(), self.minute())
    }

    /// `HHMMSS` for iCalendar date-times.
    pub fn format_ics(self) -> String {
        format!("{:02}{:02}00", self.hour(), self.minute())
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_12h())
    }
}

impl TryFrom<u16> for ClockTime {
    type Error = String;

    fn try_from(minutes: u16) -> Result<Self, Self::Error> {
        ClockTime::from_minutes(minutes).ok_or_else(|| format!("{minutes} minutes is past midnight"))
    }
}

impl From<ClockTime> for u16 {
    fn from(time: ClockTime) -> u16 {
        time.0
    }
}

/// Parse clock text into a decimal hour.
///
/// Accepts `"H:MM"` (24-hour) and `"H:MM AM"`/`"H:MMpm"`, tolerating extra
/// whitespace and a missing space before the meridiem marker.
pub fn parse_clock_time(text: &str) -> Result<f64, ParseError> {
    parse_clock(text).map(ClockTime::as_hours)
}

/// Same as [`parse_clock_time`] but returns the minute-resolution value.
pub fn parse_clock(text: &str) -> Result<ClockTime, ParseError> {
    let caps = CLOCK_PATTERN
        .captures(text)
        .ok_or_else(|| ParseError::new(ParseErrorKind::InvalidTimeFormat, text))?;
    resolve(&caps, text)
}

/// Meeting days and times of a catalog schedule string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleSlot {
    pub days: WeekdaySet,
    pub start: ClockTime,
    pub end: ClockTime,
}

impl ScheduleSlot {
    pub fn start_hour(&self) -> f64 {
        self.start.as_hours()
    }

    pub fn end_hour(&self) -> f64 {
        self.end.as_hours()
    }
}

/// Parse a catalog schedule string like `"MWF 10:00AM-10:50AM"` or
/// `"TR 2:00 PM-3:15 PM"`.
///
/// Both times must carry a meridiem marker. Unknown day letters are skipped;
/// a string with no recognizable day at all is unparsable.
pub fn parse_schedule_string(text: &str) -> Result<ScheduleSlot, ParseError> {
    let unparsable = || ParseError::new(ParseErrorKind::UnparsableSchedule, text);

    let trimmed = text.trim();
    let (day_part, time_part) = trimmed.split_once(char::is_whitespace).ok_or_else(unparsable)?;

    let (days, unknown) = WeekdaySet::from_letters(day_part);
    if !unknown.is_empty() {
        warn!(schedule = %text, ?unknown, "Skipping unknown weekday codes");
    }
    if days.is_empty() {
        return Err(unparsable());
    }

    let (start_text, end_text) = time_part.split_once('-').ok_or_else(unparsable)?;
    let start = parse_meridiem_clock(start_text).ok_or_else(unparsable)?;
    let end = parse_meridiem_clock(end_text).ok_or_else(unparsable)?;

    debug!(schedule = %text, days = %days, %start, %end, "Parsed schedule string");

    Ok(ScheduleSlot { days, start, end })
}

/// Grid column for a catalog day letter, or `None` for an unknown code
/// (callers skip the day rather than place it).
pub fn weekday_letter_to_index(letter: char) -> Option<usize> {
    Weekday::from_letter(letter).map(Weekday::index)
}

/// The first date on or after `from` that falls on `day`.
pub fn next_calendar_date(day: Weekday, from: NaiveDate) -> NaiveDate {
    let target = i64::from(day.to_chrono().num_days_from_monday());
    let current = i64::from(from.weekday().num_days_from_monday());
    let ahead = (target - current).rem_euclid(7);
    from + Duration::days(ahead)
}

/// A time that must be written as `H:MM AM|PM`, with nothing else around it.
fn parse_meridiem_clock(text: &str) -> Option<ClockTime> {
    let caps = SCHEDULE_TIME_PATTERN.captures(text)?;
    resolve(&caps, text).ok()
}

/// Turn `(hour, minute, meridiem)` captures into a clock time.
///
/// The meridiem only shifts hours below 12 (PM) or exactly 12 (AM); any other
/// hour is taken as written.
fn resolve(caps: &Captures<'_>, raw: &str) -> Result<ClockTime, ParseError> {
    let out_of_range = || ParseError::new(ParseErrorKind::TimeOutOfRange, raw);

    let hour: u32 = caps[1].parse().map_err(|_| out_of_range())?;
    let minute: u32 = caps[2].parse().map_err(|_| out_of_range())?;
    let meridiem = caps.get(3).map(|m| m.as_str().to_ascii_lowercase());

    let hour = match meridiem.as_deref() {
        Some("pm") if hour < 12 => hour + 12,
        Some("am") if hour == 12 => 0,
        _ => hour,
    };

    ClockTime::from_hm(hour, minute).ok_or_else(out_of_range)
}
