use anyhow::Result;
use owo_colors::OwoColorize;
use schedcal_core::parse_schedule_string;
use serde::Serialize;

#[derive(Serialize)]
struct ParsedSchedule {
    days: String,
    start: String,
    end: String,
    start_hour: f64,
    end_hour: f64,
}

/// Run a catalog meeting pattern through the schedule-string parser.
pub fn run(schedule: &str, json: bool) -> Result<()> {
    let slot = parse_schedule_string(schedule)?;

    if json {
        let parsed = ParsedSchedule {
            days: slot.days.letters(),
            start: slot.start.format_24h(),
            end: slot.end.format_24h(),
            start_hour: slot.start_hour(),
            end_hour: slot.end_hour(),
        };
        println!("{}", serde_json::to_string_pretty(&parsed)?);
        return Ok(());
    }

    let days: Vec<&str> = slot.days.iter().map(|d| d.name()).collect();
    println!("{}  {}", "Days ".dimmed(), days.join(", "));
    println!("{}  {}", "Start".dimmed(), slot.start);
    println!("{}  {}", "End  ".dimmed(), slot.end);

    Ok(())
}
