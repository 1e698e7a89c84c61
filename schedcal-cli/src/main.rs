mod commands;
mod plan;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use schedcal_core::SchedcalConfig;
use tracing_subscriber::EnvFilter;

use crate::commands::export::ExportArgs;

#[derive(Parser)]
#[command(name = "schedcal")]
#[command(about = "Build a weekly course schedule and export it as a recurring calendar")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the weekly grid for a plan file
    Show {
        /// TOML plan with [[section]] and [[event]] entries
        plan: PathBuf,
    },
    /// Exit with an error if anything in the plan conflicts
    Check { plan: PathBuf },
    /// Write the plan as an .ics file with weekly recurring events
    Export {
        plan: PathBuf,

        /// Semester label, e.g. "Spring 2025"
        #[arg(short, long)]
        semester: String,

        /// Last day of classes (YYYY-MM-DD), instead of the semester's default
        #[arg(long)]
        until: Option<String>,

        /// First events start on or after this date (YYYY-MM-DD, default today)
        #[arg(long)]
        from: Option<String>,

        /// Output file (default: <output_dir>/<organization>_Schedule_<semester>.ics)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Write a calendar even if the plan places nothing
        #[arg(long)]
        allow_empty: bool,
    },
    /// Parse a catalog meeting pattern such as "TR 2:00 PM-3:15 PM"
    Parse {
        schedule: String,

        #[arg(long)]
        json: bool,
    },
    /// List the dated meetings an export would contain
    Occurrences {
        plan: PathBuf,

        #[arg(short, long)]
        semester: String,

        #[arg(long)]
        until: Option<String>,

        #[arg(long)]
        from: Option<String>,
    },
    /// Show config paths and values
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Show { plan } => commands::show::run(&plan, &SchedcalConfig::load()?),
        Commands::Check { plan } => commands::check::run(&plan),
        Commands::Export {
            plan,
            semester,
            until,
            from,
            out,
            allow_empty,
        } => {
            let config = SchedcalConfig::load()?;
            let args = ExportArgs {
                plan: &plan,
                semester: &semester,
                until: until.as_deref(),
                from: from.as_deref(),
                out,
                allow_empty,
            };
            commands::export::run(args, &config)
        }
        Commands::Parse { schedule, json } => commands::parse::run(&schedule, json),
        Commands::Occurrences {
            plan,
            semester,
            until,
            from,
        } => commands::occurrences::run(
            &plan,
            &semester,
            until.as_deref(),
            from.as_deref(),
            &SchedcalConfig::load()?,
        ),
        Commands::Config => commands::config::run(&SchedcalConfig::load()?),
    }
}
