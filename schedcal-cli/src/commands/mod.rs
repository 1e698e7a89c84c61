pub mod check;
pub mod config;
pub mod export;
pub mod occurrences;
pub mod parse;
pub mod show;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use schedcal_core::Semester;

/// Parse a `YYYY-MM-DD` argument.
pub fn parse_date(arg: &str, flag: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(arg.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid {flag} date '{arg}', expected YYYY-MM-DD"))
}

/// Last day of the recurrence: `--until` if given, otherwise the end of the
/// named semester.
pub fn semester_end(semester: &str, until: Option<&str>) -> Result<NaiveDate> {
    if let Some(until) = until {
        return parse_date(until, "--until");
    }

    let parsed = Semester::parse(semester).with_context(|| {
        format!("Unknown semester '{semester}'. Use e.g. \"Spring 2025\" or pass --until YYYY-MM-DD")
    })?;
    Ok(parsed.end_date())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn until_overrides_semester_window() {
        let end = semester_end("Intersession 2025", Some("2025-06-30")).unwrap();
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 6, 30).unwrap());
    }

    #[test]
    fn semester_window_is_used_without_until() {
        let end = semester_end("Fall 2024", None).unwrap();
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 12, 15).unwrap());
    }

    #[test]
    fn unknown_semester_without_until_fails() {
        let err = semester_end("Intersession 2025", None).unwrap_err();
        assert!(err.to_string().contains("--until"));
    }

    #[test]
    fn bad_date_names_the_flag() {
        let err = parse_date("05/15/2025", "--from").unwrap_err();
        assert!(err.to_string().contains("--from"));
    }
}
