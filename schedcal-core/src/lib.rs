//! Core types for schedcal.
//!
//! This crate holds everything the `schedcal` CLI builds on:
//! - `time` and `weekday` for turning form and catalog text into times and days
//! - `grid` and `schedule` for placing blocks on the weekly grid without conflicts
//! - `ics` and `recurrence` for exporting the week as repeating calendar events

pub mod catalog;
pub mod color;
pub mod config;
pub mod error;
pub mod grid;
pub mod ics;
pub mod placement;
pub mod recurrence;
pub mod schedule;
pub mod semester;
pub mod time;
pub mod weekday;

pub use catalog::CatalogSection;
pub use color::{Color, ColorRegistry};
pub use config::SchedcalConfig;
pub use error::{Field, ParseError, ParseErrorKind, ScheduleError, ScheduleResult};
pub use grid::{GridLayout, PlacementGrid};
pub use ics::{ExportOptions, IcsExporter};
pub use placement::{Placement, PlacementId, PlacementKind, SectionRef};
pub use schedule::{EventPatch, EventSpec, Schedule};
pub use semester::{Semester, export_filename};
pub use time::{ClockTime, parse_clock_time, parse_schedule_string};
pub use weekday::{Weekday, WeekdaySet};
