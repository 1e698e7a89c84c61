//! Error types for schedule building and export.

use std::fmt;

use thiserror::Error;

use crate::placement::PlacementId;
use crate::weekday::Weekday;

/// What went wrong while turning text into times, days or semesters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// No `H:MM` pattern was found.
    InvalidTimeFormat,
    /// An `H:MM` pattern was found but the hour or minute is out of range.
    TimeOutOfRange,
    /// A catalog schedule string did not have the `<days> <start>-<end>` shape.
    UnparsableSchedule,
    /// A semester label did not name a known season and year.
    UnknownSemester,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParseErrorKind::InvalidTimeFormat => "invalid time format",
            ParseErrorKind::TimeOutOfRange => "time out of range",
            ParseErrorKind::UnparsableSchedule => "unparsable schedule",
            ParseErrorKind::UnknownSemester => "unknown semester",
        };
        write!(f, "{s}")
    }
}

/// A text input that could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: '{raw_input}'")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub raw_input: String,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, raw_input: impl Into<String>) -> Self {
        ParseError {
            kind,
            raw_input: raw_input.into(),
        }
    }
}

/// Input field named by a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Label,
    Days,
    Start,
    End,
    Color,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Field::Label => "label",
            Field::Days => "days",
            Field::Start => "start",
            Field::End => "end",
            Field::Color => "color",
        };
        write!(f, "{s}")
    }
}

/// Errors that can occur while editing or exporting a schedule.
///
/// Every variant leaves the schedule exactly as it was before the failing call.
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Invalid {field}: {message}")]
    Validation { field: Field, message: String },

    #[error("Time conflict on {day} with {with_label}")]
    Conflict {
        day: Weekday,
        with_label: String,
        with_id: PlacementId,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Placement not found: {0}")]
    NotFound(PlacementId),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Recurrence error: {0}")]
    Recurrence(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScheduleError {
    pub(crate) fn validation(field: Field, message: impl Into<String>) -> Self {
        ScheduleError::Validation {
            field,
            message: message.into(),
        }
    }
}

/// Result type alias for schedule operations.
pub type ScheduleResult<T> = Result<T, ScheduleError>;
