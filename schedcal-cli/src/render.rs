//! Terminal rendering for schedules.
//!
//! Extension traits that add colored output to schedcal-core types using
//! owo_colors.

use owo_colors::OwoColorize;
use schedcal_core::recurrence::Occurrence;
use schedcal_core::{Color, GridLayout, Placement, Schedule, ScheduleError, Weekday};

use crate::plan::Rejected;

/// Width of one day column, without the separating space.
const COLUMN_WIDTH: usize = 14;
const LABEL_WIDTH: usize = 9;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

fn paint(color: &Color, text: &str) -> String {
    let (r, g, b) = color.rgb();
    text.truecolor(r, g, b).to_string()
}

impl Render for Placement {
    fn render(&self) -> String {
        let mut line = format!(
            "{} {}  {}  {}",
            paint(&self.color, "■"),
            self.label.bold(),
            self.days.letters(),
            self.time_range().dimmed()
        );
        if let Some(ref location) = self.location {
            line.push_str(&format!("  {}", location.dimmed()));
        }
        if let Some(ref secondary) = self.secondary_label {
            line.push_str(&format!("  {}", format!("({secondary})").dimmed()));
        }
        line
    }
}

impl Render for Rejected {
    fn render(&self) -> String {
        let reason = match &self.error {
            ScheduleError::Conflict { day, with_label, .. } => {
                format!("conflicts with {with_label} on {}", day.name())
            }
            other => other.to_string(),
        };
        format!("{} {}  {}", "✗".red(), self.item.bold(), reason.red())
    }
}

impl Render for Occurrence {
    fn render(&self) -> String {
        let mut line = format!(
            "{}  {}-{}  {}",
            self.start.format("%a %Y-%m-%d"),
            self.start.format("%H:%M"),
            self.end.format("%H:%M"),
            self.summary
        );
        if let Some(ref location) = self.location {
            line.push_str(&format!("  {}", location.dimmed()));
        }
        line
    }
}

/// Plain text for one grid cell: the label where a block starts, a bar in
/// the rows it continues through.
fn cell_text(schedule: &Schedule, day: Weekday, hour: u8) -> Option<(Color, String)> {
    let entries = schedule.grid().cell(day, hour);
    let first = entries.first()?;

    let mut text = if first.start.hour() == u32::from(hour) {
        format!("{} {}", first.start.format_24h(), first.label)
    } else {
        "│".to_string()
    };
    if entries.len() > 1 {
        text = format!("{text} +{}", entries.len() - 1);
    }

    Some((first.color.clone(), truncate(&text, COLUMN_WIDTH)))
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{text}{}", " ".repeat(width.saturating_sub(len)))
}

/// The weekly grid, one row per visible hour.
pub fn render_week(schedule: &Schedule, layout: &GridLayout) -> String {
    let mut lines = Vec::new();

    let mut header = " ".repeat(LABEL_WIDTH);
    for day in Weekday::ALL {
        header.push(' ');
        header.push_str(&pad(day.name(), COLUMN_WIDTH));
    }
    lines.push(header.trim_end().bold().to_string());

    for hour in layout.rows() {
        let mut row = pad(&GridLayout::row_label(hour), LABEL_WIDTH).dimmed().to_string();
        for day in Weekday::ALL {
            row.push(' ');
            match cell_text(schedule, day, hour) {
                Some((color, text)) => row.push_str(&paint(&color, &pad(&text, COLUMN_WIDTH))),
                None => row.push_str(&pad("·", COLUMN_WIDTH).dimmed().to_string()),
            }
        }
        lines.push(row.trim_end().to_string());
    }

    let hidden: Vec<Placement> = schedule
        .placements()
        .into_iter()
        .filter(|p| !layout.is_visible(p))
        .collect();
    if !hidden.is_empty() {
        lines.push(String::new());
        lines.push("Outside visible hours:".dimmed().to_string());
        for placement in &hidden {
            lines.push(format!("   {}", placement.render()));
        }
    }

    lines.join("\n")
}

/// Legend of every placement, in creation order.
pub fn render_legend(schedule: &Schedule) -> String {
    if schedule.is_empty() {
        return "   Nothing scheduled".dimmed().to_string();
    }
    schedule
        .placements()
        .iter()
        .map(|p| format!("   {}", p.render()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use schedcal_core::{EventSpec, WeekdaySet};

    fn schedule() -> Schedule {
        let mut schedule = Schedule::new();
        schedule
            .create(EventSpec::personal_event(
                "Databases",
                WeekdaySet::from([Weekday::Mon, Weekday::Wed]),
                "10:30 AM",
                "11:45 AM",
            ))
            .unwrap();
        schedule
            .create(EventSpec::personal_event(
                "Swim",
                WeekdaySet::single(Weekday::Mon),
                "11:45 AM",
                "12:30 PM",
            ))
            .unwrap();
        schedule
    }

    #[test]
    fn cell_shows_label_at_start_and_bar_after() {
        let schedule = schedule();

        let (_, start) = cell_text(&schedule, Weekday::Wed, 10).unwrap();
        assert_eq!(start, "10:30 Databas…");

        let (_, cont) = cell_text(&schedule, Weekday::Wed, 11).unwrap();
        assert_eq!(cont, "│");

        assert!(cell_text(&schedule, Weekday::Tue, 10).is_none());
    }

    #[test]
    fn shared_hour_counts_extra_blocks() {
        let schedule = schedule();
        let (_, text) = cell_text(&schedule, Weekday::Mon, 11).unwrap();
        assert_eq!(text, "│ +1");
    }

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate("Gym", 5), "Gym");
        assert_eq!(truncate("Swimming", 5), "Swim…");
    }

    #[test]
    fn week_lists_placements_outside_the_window() {
        let mut schedule = schedule();
        schedule
            .create(EventSpec::personal_event(
                "Early run",
                WeekdaySet::single(Weekday::Fri),
                "6:00 AM",
                "7:00 AM",
            ))
            .unwrap();

        let text = render_week(&schedule, &GridLayout::default());
        assert!(text.contains("Outside visible hours"));
        assert!(text.contains("Early run"));
        // Header, 14 hour rows, then the hidden list
        assert_eq!(text.lines().count(), 1 + 14 + 3);
    }
}
