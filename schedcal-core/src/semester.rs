//! Semester labels and their date windows.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ParseError, ParseErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Fall,
}

impl Season {
    pub fn from_name(name: &str) -> Option<Season> {
        match name.trim().to_ascii_lowercase().as_str() {
            "spring" => Some(Season::Spring),
            "summer" => Some(Season::Summer),
            "fall" | "autumn" => Some(Season::Fall),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
        }
    }

    /// First and last day as (month, day) pairs.
    fn window(self) -> ((u32, u32), (u32, u32)) {
        match self {
            Season::Spring => ((1, 15), (5, 15)),
            Season::Summer => ((5, 20), (8, 10)),
            Season::Fall => ((8, 20), (12, 15)),
        }
    }
}

/// A term such as `"Spring 2025"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Semester {
    pub season: Season,
    pub year: i32,
}

impl Semester {
    pub fn new(season: Season, year: i32) -> Self {
        Semester { season, year }
    }

    /// Parse `"<Season> <Year>"`, case-insensitive.
    pub fn parse(label: &str) -> Result<Semester, ParseError> {
        let unknown = || ParseError::new(ParseErrorKind::UnknownSemester, label);

        let mut parts = label.split_whitespace();
        let season = parts.next().and_then(Season::from_name).ok_or_else(unknown)?;
        let year: i32 = parts
            .next()
            .and_then(|y| y.parse().ok())
            .ok_or_else(unknown)?;
        if parts.next().is_some() || !(1900..=9999).contains(&year) {
            return Err(unknown());
        }

        Ok(Semester { season, year })
    }

    pub fn start_date(&self) -> NaiveDate {
        let ((month, day), _) = self.season.window();
        self.date(month, day)
    }

    /// Last day of classes; recurrences run through the end of this day.
    pub fn end_date(&self) -> NaiveDate {
        let (_, (month, day)) = self.season.window();
        self.date(month, day)
    }

    pub fn label(&self) -> String {
        self.to_string()
    }

    fn date(&self, month: u32, day: u32) -> NaiveDate {
        // Every window date exists in every year, so the fallback never fires
        NaiveDate::from_ymd_opt(self.year, month, day).unwrap_or(NaiveDate::MIN)
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.season.name(), self.year)
    }
}

impl FromStr for Semester {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Semester::parse(s)
    }
}

/// `"<Org>_Schedule_<label>.ics"` with whitespace runs in the label turned
/// into single underscores.
pub fn export_filename(organization: &str, semester_label: &str) -> String {
    let label = semester_label.split_whitespace().collect::<Vec<_>>().join("_");
    format!("{}_Schedule_{}.ics", organization.trim(), label)
}
