//! Global unical configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CELL_LIMIT, DEFAULT_PROVIDER_TIMEOUT};
use crate::error::{UnicalError, UnicalResult};
use crate::grid::{DayOrder, GridOptions};
use crate::local_date::ViewerZone;
use crate::month::WeekStart;
use crate::source::SourceConfig;

fn default_cell_limit() -> usize {
    DEFAULT_CELL_LIMIT
}

fn default_timeout() -> String {
    humantime::format_duration(DEFAULT_PROVIDER_TIMEOUT).to_string()
}

/// Configuration at ~/.config/unical/config.toml
///
/// Every key may be overridden from the environment with a `UNICAL_` prefix,
/// e.g. `UNICAL_TIMEZONE=Europe/Berlin`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UnicalConfig {
    /// "local", "UTC", an IANA zone or a fixed offset such as "-05:00".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    #[serde(default)]
    pub week_start: WeekStart,

    #[serde(default = "default_cell_limit")]
    pub cell_limit: usize,

    #[serde(default)]
    pub day_order: DayOrder,

    /// Per source call, e.g. "10s" or "1m 30s".
    #[serde(default = "default_timeout")]
    pub timeout: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceConfig>,
}

impl Default for UnicalConfig {
    fn default() -> Self {
        UnicalConfig {
            timezone: None,
            week_start: WeekStart::default(),
            cell_limit: DEFAULT_CELL_LIMIT,
            day_order: DayOrder::default(),
            timeout: default_timeout(),
            source: None,
        }
    }
}

impl UnicalConfig {
    pub fn config_path() -> UnicalResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| UnicalError::Config("Could not determine config directory".into()))?
            .join("unical");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the global config, creating a commented default file on first use.
    pub fn load() -> UnicalResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> UnicalResult<Self> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("UNICAL"))
            .build()
            .map_err(|e| UnicalError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| UnicalError::Config(e.to_string()))
    }

    pub fn zone(&self) -> UnicalResult<ViewerZone> {
        match &self.timezone {
            Some(tz) => tz.parse(),
            None => Ok(ViewerZone::System),
        }
    }

    pub fn timeout(&self) -> UnicalResult<Duration> {
        humantime::parse_duration(&self.timeout)
            .map_err(|e| UnicalError::Config(format!("Invalid timeout '{}': {e}", self.timeout)))
    }

    pub fn grid_options(&self) -> GridOptions {
        GridOptions {
            week_start: self.week_start,
            cell_limit: self.cell_limit,
            day_order: self.day_order,
        }
    }

    /// The configured source, or an error pointing at the config file.
    pub fn require_source(&self) -> UnicalResult<&SourceConfig> {
        self.source.as_ref().ok_or_else(|| {
            let path = Self::config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "config.toml".to_string());
            UnicalError::NoSourceConfigured(path)
        })
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> UnicalResult<()> {
        let contents = format!(
            "\
# unical configuration

# Timezone the calendar is shown in (\"local\", \"UTC\", \"Europe/Berlin\", \"-05:00\"):
# timezone = \"local\"

# First column of the month grid (\"sunday\" or \"monday\"):
# week_start = \"sunday\"

# Items shown per day before \"+N more\":
# cell_limit = {DEFAULT_CELL_LIMIT}

# Order within a day (\"source\" or \"chronological\"):
# day_order = \"source\"

# Limit for each source request:
# timeout = \"{}\"

# Where tasks, meetings and the org directory come from:
# [source]
# provider = \"crm\"
# base_url = \"https://crm.example.com\"
# token = \"...\"
",
            default_timeout()
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                UnicalError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| UnicalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
