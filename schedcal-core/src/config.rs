//! User configuration at ~/.config/schedcal/config.toml

use std::path::{Path, PathBuf};

use config::{Config, File};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ScheduleError, ScheduleResult};
use crate::grid::GridLayout;

static DEFAULT_ORGANIZATION: &str = "Campus";
static DEFAULT_UID_DOMAIN: &str = "schedcal.local";
static DEFAULT_OUTPUT_DIR: &str = ".";

fn default_organization() -> String {
    DEFAULT_ORGANIZATION.to_string()
}

fn default_uid_domain() -> String {
    DEFAULT_UID_DOMAIN.to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn is_default_output_dir(p: &PathBuf) -> bool {
    *p == default_output_dir()
}

/// Visible hours of the printed grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub start_hour: u8,
    pub end_hour: u8,
}

impl Default for GridConfig {
    fn default() -> Self {
        let layout = GridLayout::default();
        GridConfig {
            start_hour: layout.start_hour,
            end_hour: layout.end_hour,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedcalConfig {
    /// Prefix of exported file names.
    #[serde(default = "default_organization")]
    pub organization: String,

    /// LOCATION for placements that have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_location: Option<String>,

    #[serde(default = "default_uid_domain")]
    pub uid_domain: String,

    #[serde(default = "default_output_dir", skip_serializing_if = "is_default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default)]
    pub grid: GridConfig,
}

impl Default for SchedcalConfig {
    fn default() -> Self {
        SchedcalConfig {
            organization: default_organization(),
            default_location: None,
            uid_domain: default_uid_domain(),
            output_dir: default_output_dir(),
            grid: GridConfig::default(),
        }
    }
}

impl SchedcalConfig {
    pub fn config_path() -> ScheduleResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ScheduleError::Config("Could not determine config directory".into()))?
            .join("schedcal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the user's config, writing a commented-out default file first if
    /// there is none yet.
    pub fn load() -> ScheduleResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from a specific file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> ScheduleResult<Self> {
        let config: SchedcalConfig = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .build()
            .map_err(|e| ScheduleError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| ScheduleError::Config(e.to_string()))?;

        config.validate()?;
        debug!(path = %path.display(), organization = %config.organization, "Loaded config");
        Ok(config)
    }

    fn validate(&self) -> ScheduleResult<()> {
        let GridConfig { start_hour, end_hour } = self.grid;
        if start_hour >= end_hour || end_hour > 23 {
            return Err(ScheduleError::Config(format!(
                "grid hours must satisfy start_hour < end_hour <= 23 (got {start_hour}..{end_hour})"
            )));
        }
        if self.uid_domain.trim().is_empty() {
            return Err(ScheduleError::Config("uid_domain cannot be empty".into()));
        }
        Ok(())
    }

    /// `output_dir` with `~` expanded.
    pub fn output_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.output_dir.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    pub fn layout(&self) -> GridLayout {
        GridLayout {
            start_hour: self.grid.start_hour,
            end_hour: self.grid.end_hour,
        }
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> ScheduleResult<()> {
        let defaults = GridLayout::default();
        let contents = format!(
            "\
# schedcal configuration

# Prefix for exported calendar files (<organization>_Schedule_<semester>.ics):
# organization = \"{DEFAULT_ORGANIZATION}\"

# Location written for events that have none:
# default_location = \"Main Campus\"

# Domain suffix of exported event UIDs:
# uid_domain = \"{DEFAULT_UID_DOMAIN}\"

# Where exported files are written:
# output_dir = \"{DEFAULT_OUTPUT_DIR}\"

# Hours shown by `schedcal show`:
# [grid]
# start_hour = {}
# end_hour = {}
",
            defaults.start_hour, defaults.end_hour
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents)?;

        Ok(())
    }
}
