use anyhow::Result;
use owo_colors::OwoColorize;
use schedcal_core::SchedcalConfig;

pub fn run(config: &SchedcalConfig) -> Result<()> {
    let config_path = SchedcalConfig::config_path()?;

    println!("{}", "Paths".bold());
    println!("  Config:     {}", config_path.display());
    println!("  Output:     {}", config.output_path().display());

    println!();
    println!("{}", "Export".bold());
    println!("  Organization:      {}", config.organization);
    println!("  UID domain:        {}", config.uid_domain);
    println!(
        "  Default location:  {}",
        config
            .default_location
            .as_deref()
            .unwrap_or("(none)")
    );

    println!();
    println!("{}", "Grid".bold());
    println!(
        "  Hours:             {} to {}",
        schedcal_core::GridLayout::row_label(config.grid.start_hour),
        schedcal_core::GridLayout::row_label(config.grid.end_hour)
    );

    Ok(())
}
