//! Configuration management for Strompris
//!
//! This module handles loading, validation, and management of the run
//! configuration from YAML files. Plain JSON config files are accepted too,
//! since JSON is a subset of YAML.
//!
//! A [`Config`] is built once at startup and then passed by reference into
//! every stage of the pipeline; nothing reads configuration from globals.

use crate::error::{Result, StromprisError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

mod defaults;

/// Default Norwegian price area
pub const DEFAULT_AREA: &str = "NO1";

/// Default local time zone for the price series
pub const DEFAULT_TIMEZONE: &str = "Europe/Oslo";

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bidding-zone code (NO1..NO5)
    pub area: String,

    /// Multiply raw prices by the VAT factor
    pub include_vat: bool,

    /// Absolute price threshold in kr/kWh for "cheap" hours
    pub threshold: f64,

    /// Retry budget for the feed fetch
    pub retries: u32,

    /// Minutes to wait between fetch attempts
    pub retry_interval_min: u32,

    /// Whether to send desktop notifications
    pub show_notifications: bool,

    /// Target time zone for the local price series
    pub timezone: String,

    /// Price feed endpoint configuration
    pub feed: FeedConfig,

    /// Trust store configuration for the feed connection
    pub tls: TlsConfig,

    /// Result file configuration
    pub output: OutputConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Price feed endpoint configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Scheme and host of the price feed
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

/// Trust store configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TlsConfig {
    /// Corporate CA bundle (PEM). `CORPORATE_CA_BUNDLE` overrides it.
    pub corporate_ca_bundle: Option<String>,

    /// Disable certificate verification entirely. `SKIP_SSL_VERIFY` also enables it.
    pub skip_verify: bool,
}

/// Result file configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving the per-day CSV and JSON summary
    pub dir: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub level: String,

    /// Optional console-specific log level (overrides `level` for console)
    pub console_level: Option<String>,

    /// Optional file-specific log level (overrides `level` for file)
    pub file_level: Option<String>,

    /// Path to log file; its parent directory receives the daily files
    pub file: String,

    /// Number of daily files to keep
    pub backup_count: u32,

    /// Whether to log to console when running interactively
    pub console_output: bool,

    /// Whether to use JSON format
    pub json_format: bool,
}

impl Config {
    /// Load configuration from a YAML (or JSON) file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from an explicit path or the default locations
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(StromprisError::config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Self::from_file(path);
        }

        let default_paths = ["strompris.yaml", "config.yaml", "config.json"];

        for path in &default_paths {
            if Path::new(path).exists() {
                return Self::from_file(path);
            }
        }

        // Fall back to default configuration
        Ok(Config::default())
    }

    /// Time to wait between fetch attempts; never shorter than one minute
    pub fn retry_wait(&self) -> Duration {
        Duration::from_secs(u64::from(self.retry_interval_min.max(1)) * 60)
    }

    /// Per-request feed timeout
    pub fn feed_timeout(&self) -> Duration {
        Duration::from_secs(self.feed.timeout_secs)
    }

    /// Output directory as a path
    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(&self.output.dir)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.area.trim().is_empty() {
            return Err(StromprisError::validation(
                "area",
                "Area code cannot be empty",
            ));
        }

        if !self.threshold.is_finite() {
            return Err(StromprisError::validation(
                "threshold",
                "Must be a finite number",
            ));
        }

        if self.retry_interval_min == 0 {
            return Err(StromprisError::validation(
                "retry_interval_min",
                "Must be at least 1 minute",
            ));
        }

        if self.timezone.parse::<chrono_tz::Tz>().is_err() {
            return Err(StromprisError::validation(
                "timezone",
                format!("Unknown time zone '{}'", self.timezone),
            ));
        }

        if self.feed.base_url.trim().is_empty() {
            return Err(StromprisError::validation(
                "feed.base_url",
                "Base URL cannot be empty",
            ));
        }

        if self.feed.timeout_secs == 0 {
            return Err(StromprisError::validation(
                "feed.timeout_secs",
                "Must be greater than 0",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.area, "NO1");
        assert!(config.include_vat);
        assert!((config.threshold - 0.50).abs() < f64::EPSILON);
        assert_eq!(config.retries, 0);
        assert_eq!(config.retry_interval_min, 30);
        assert!(config.show_notifications);
        assert_eq!(config.timezone, "Europe/Oslo");
        assert_eq!(config.feed.timeout_secs, 20);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.area = String::new();
        assert!(config.validate().is_err());

        config = Config::default();
        config.retry_interval_min = 0;
        assert!(config.validate().is_err());

        config = Config::default();
        config.timezone = "Mars/Olympus_Mons".to_string();
        assert!(config.validate().is_err());

        config = Config::default();
        config.threshold = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_config() {
        let json = r#"{"area": "NO3", "threshold": 0.8, "retries": 4}"#;
        let config: Config = serde_yaml::from_str(json).unwrap();
        assert_eq!(config.area, "NO3");
        assert!((config.threshold - 0.8).abs() < f64::EPSILON);
        assert_eq!(config.retries, 4);
        // Untouched keys keep their defaults
        assert!(config.include_vat);
        assert_eq!(config.retry_interval_min, 30);
    }

    #[test]
    fn test_retry_wait_is_minutes() {
        let mut config = Config::default();
        config.retry_interval_min = 2;
        assert_eq!(config.retry_wait(), Duration::from_secs(120));
    }
}
