//! School-week weekdays and weekday sets.
//!
//! Catalog data writes days as single letters (`M T W R F`, with `R` for
//! Thursday) while iCalendar uses two-letter codes (`MO`..`FR`). `Weekday`
//! converts between both and the grid column index.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    #[serde(rename = "M")]
    Mon,
    #[serde(rename = "T")]
    Tue,
    #[serde(rename = "W")]
    Wed,
    #[serde(rename = "R")]
    Thu,
    #[serde(rename = "F")]
    Fri,
}

impl Weekday {
    pub const ALL: [Weekday; 5] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
    ];

    /// Look up a catalog day letter. Case-insensitive.
    pub fn from_letter(letter: char) -> Option<Weekday> {
        match letter.to_ascii_uppercase() {
            'M' => Some(Weekday::Mon),
            'T' => Some(Weekday::Tue),
            'W' => Some(Weekday::Wed),
            'R' => Some(Weekday::Thu),
            'F' => Some(Weekday::Fri),
            _ => None,
        }
    }

    /// Look up a two-letter iCalendar code (`MO`..`FR`) or a full/short day name.
    pub fn from_code(code: &str) -> Option<Weekday> {
        match code.trim().to_ascii_uppercase().as_str() {
            "MO" | "MON" | "MONDAY" => Some(Weekday::Mon),
            "TU" | "TUE" | "TUES" | "TUESDAY" => Some(Weekday::Tue),
            "WE" | "WED" | "WEDNESDAY" => Some(Weekday::Wed),
            "TH" | "THU" | "THUR" | "THURS" | "THURSDAY" => Some(Weekday::Thu),
            "FR" | "FRI" | "FRIDAY" => Some(Weekday::Fri),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Weekday::from_letter(c),
                    _ => None,
                }
            }
        }
    }

    pub fn letter(self) -> char {
        match self {
            Weekday::Mon => 'M',
            Weekday::Tue => 'T',
            Weekday::Wed => 'W',
            Weekday::Thu => 'R',
            Weekday::Fri => 'F',
        }
    }

    /// Two-letter code used in `RRULE:BYDAY`.
    pub fn ics_code(self) -> &'static str {
        match self {
            Weekday::Mon => "MO",
            Weekday::Tue => "TU",
            Weekday::Wed => "WE",
            Weekday::Thu => "TH",
            Weekday::Fri => "FR",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
        }
    }

    pub fn short_name(self) -> &'static str {
        &self.name()[..3]
    }

    /// Grid column, 0 for Monday through 4 for Friday.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Weekday> {
        Weekday::ALL.get(index).copied()
    }

    pub fn to_chrono(self) -> chrono::Weekday {
        match self {
            Weekday::Mon => chrono::Weekday::Mon,
            Weekday::Tue => chrono::Weekday::Tue,
            Weekday::Wed => chrono::Weekday::Wed,
            Weekday::Thu => chrono::Weekday::Thu,
            Weekday::Fri => chrono::Weekday::Fri,
        }
    }

    /// Weekend days have no school-week counterpart.
    pub fn from_chrono(day: chrono::Weekday) -> Option<Weekday> {
        match day {
            chrono::Weekday::Mon => Some(Weekday::Mon),
            chrono::Weekday::Tue => Some(Weekday::Tue),
            chrono::Weekday::Wed => Some(Weekday::Wed),
            chrono::Weekday::Thu => Some(Weekday::Thu),
            chrono::Weekday::Fri => Some(Weekday::Fri),
            chrono::Weekday::Sat | chrono::Weekday::Sun => None,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

/// An ordered set of weekdays (always iterated Monday first).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeekdaySet(BTreeSet<Weekday>);

impl WeekdaySet {
    pub fn new() -> Self {
        WeekdaySet(BTreeSet::new())
    }

    pub fn single(day: Weekday) -> Self {
        WeekdaySet(BTreeSet::from([day]))
    }

    /// Parse a run of catalog day letters such as `"MWF"` or `"TR"`.
    ///
    /// The `TR` pair is read as one Tuesday/Thursday token. Letters that are
    /// not day codes are returned separately so callers can decide whether
    /// skipping them is acceptable.
    pub fn from_letters(letters: &str) -> (WeekdaySet, Vec<char>) {
        let mut days = WeekdaySet::new();
        let mut unknown = Vec::new();
        let chars: Vec<char> = letters.chars().filter(|c| !c.is_whitespace()).collect();

        let mut i = 0;
        while i < chars.len() {
            let c = chars[i].to_ascii_uppercase();
            let next = chars.get(i + 1).map(|n| n.to_ascii_uppercase());

            if c == 'T' && next == Some('R') {
                days.insert(Weekday::Tue);
                days.insert(Weekday::Thu);
                i += 2;
                continue;
            }

            match Weekday::from_letter(c) {
                Some(day) => {
                    days.insert(day);
                }
                None => unknown.push(chars[i]),
            }
            i += 1;
        }

        (days, unknown)
    }

    pub fn insert(&mut self, day: Weekday) -> bool {
        self.0.insert(day)
    }

    pub fn remove(&mut self, day: Weekday) -> bool {
        self.0.remove(&day)
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0.contains(&day)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        self.0.iter().copied()
    }

    pub fn first(&self) -> Option<Weekday> {
        self.0.first().copied()
    }

    /// Catalog letters, e.g. `"MWF"`.
    pub fn letters(&self) -> String {
        self.iter().map(Weekday::letter).collect()
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        WeekdaySet(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[Weekday; N]> for WeekdaySet {
    fn from(days: [Weekday; N]) -> Self {
        days.into_iter().collect()
    }
}

impl fmt::Display for WeekdaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letters())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tr_pair_reads_as_tuesday_and_thursday() {
        let (days, unknown) = WeekdaySet::from_letters("TR");
        assert_eq!(days, WeekdaySet::from([Weekday::Tue, Weekday::Thu]));
        assert!(unknown.is_empty());
    }

    #[test]
    fn mixed_letters_keep_monday_first_order() {
        let (days, _) = WeekdaySet::from_letters("fwm");
        assert_eq!(days.letters(), "MWF");
    }

    #[test]
    fn unknown_letters_are_reported_not_placed() {
        let (days, unknown) = WeekdaySet::from_letters("MXS");
        assert_eq!(days, WeekdaySet::single(Weekday::Mon));
        assert_eq!(unknown, vec!['X', 'S']);
    }

    #[test]
    fn ics_codes_round_trip_through_from_code() {
        for day in Weekday::ALL {
            assert_eq!(Weekday::from_code(day.ics_code()), Some(day));
            assert_eq!(Weekday::from_code(day.name()), Some(day));
            assert_eq!(Weekday::from_letter(day.letter()), Some(day));
        }
    }

    #[test]
    fn weekend_has_no_school_day() {
        assert_eq!(Weekday::from_chrono(chrono::Weekday::Sat), None);
        assert_eq!(Weekday::from_chrono(chrono::Weekday::Wed), Some(Weekday::Wed));
    }
}
