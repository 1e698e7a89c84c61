//! iCalendar export.
//!
//! Every placement day becomes one VEVENT repeating weekly until the end of
//! the semester. Times are written as floating local times.

mod generate;

pub use generate::{DEFAULT_PRODID, ExportOptions, ExportedEvent, IcsExporter};
