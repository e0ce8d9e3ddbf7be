//! Configuration management for Gridtariff
//!
//! This module handles loading, validation, and management of the application
//! configuration from YAML files.

use crate::error::{GridTariffError, Result};
use crate::sector::Sector;
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_interval_secs() -> u64 {
    86_400
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_timezone() -> String {
    "America/Toronto".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Configured company selection
    pub company: CompanyConfig,

    /// Polling cadence and network bounds
    #[serde(default)]
    pub polling: PollingConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Timezone the classifier's local clock runs in
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

/// Selected company and tariff plan
///
/// The display name is the persisted unique identifier; it must exactly equal
/// a name the feed mapper would synthesize for some row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyConfig {
    /// Sector-suffixed display name, e.g. `"Alectra Utilities (RESIDENTIAL) [Electricity]"`
    pub display_name: String,

    /// Whether the company is billed on the ultra-low-overnight plan
    #[serde(default)]
    pub ulo_enabled: bool,
}

/// Polling cadence and network bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Minimum interval between feed fetches in seconds
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Hard bound on one feed request in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Base log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub level: String,

    /// Log directory (or file path whose parent directory is used)
    pub file: String,

    /// Number of rotated daily files to keep
    pub backup_count: u32,

    /// Whether to also log to stdout
    pub console_output: bool,

    /// Emit JSON-formatted log lines
    pub json_format: bool,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            file: "/var/log/gridtariff".to_string(),
            backup_count: 5,
            console_output: true,
            json_format: false,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_str(&contents)
    }

    /// Parse configuration from a YAML string
    pub fn from_str(contents: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(contents)?;
        Ok(config)
    }

    /// Load configuration from the default locations
    ///
    /// `GRIDTARIFF_CONFIG` wins when set; otherwise the first existing path
    /// in the usual spots is used.
    pub fn load() -> Result<Self> {
        if let Some(path) = std::env::var_os("GRIDTARIFF_CONFIG") {
            return Self::from_file(path);
        }

        let default_paths = ["gridtariff.yaml", "/etc/gridtariff/config.yaml"];
        for path in &default_paths {
            if Path::new(path).exists() {
                return Self::from_file(path);
            }
        }

        Err(GridTariffError::config(
            "no configuration file found; set GRIDTARIFF_CONFIG or create gridtariff.yaml",
        ))
    }

    /// Save configuration to a YAML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Sector encoded in the configured display name
    pub fn sector(&self) -> Result<Sector> {
        Sector::from_display_name(&self.company.display_name)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.company.display_name.trim().is_empty() {
            return Err(GridTariffError::validation(
                "company.display_name",
                "display name cannot be empty",
            ));
        }

        // Also rejects names missing the [Electricity]/[Natural Gas] suffix.
        self.sector()?;

        if self.polling.interval_secs == 0 {
            return Err(GridTariffError::validation(
                "polling.interval_secs",
                "must be greater than 0",
            ));
        }

        if self.polling.timeout_secs == 0 {
            return Err(GridTariffError::validation(
                "polling.timeout_secs",
                "must be greater than 0",
            ));
        }

        if self.timezone.parse::<chrono_tz::Tz>().is_err() {
            return Err(GridTariffError::validation(
                "timezone",
                "not a recognized IANA timezone",
            ));
        }

        Ok(())
    }
}
