//! YAML configuration loading
//!
//! The file carries the API token, the output path, the date range and the
//! time zone. It is parsed into [`ConfigFile`] (raw strings, as written by the
//! operator) and then validated into the typed [`AppConfig`].

use crate::downloader::config::{DEFAULT_MAX_CONCURRENCY, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::partition::{resolve_timezone, PartitionError};
use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Default telemetry endpoint
pub const DEFAULT_BASE_URL: &str = "http://api.car-online.ru/v2";

/// Date format used in the configuration file and the export sheet
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Path that was attempted
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// File is not valid YAML or misses required keys
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A date field does not match YYYY-MM-DD
    #[error("invalid {field} '{value}': expected YYYY-MM-DD")]
    InvalidDate {
        /// Field name in the file
        field: &'static str,
        /// Offending value
        value: String,
    },

    /// Time zone or range problem
    #[error(transparent)]
    Range(#[from] PartitionError),

    /// Field is present but unusable
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        /// Field name in the file
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },
}

/// Configuration file as written on disk
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    /// Static API token sent as `skey`
    pub api_token: String,
    /// Path of the exported sheet
    pub file_to_save: PathBuf,
    /// First day of the range (YYYY-MM-DD)
    pub date_from: String,
    /// End of the range, exclusive (YYYY-MM-DD)
    pub date_to: String,
    /// IANA time zone name
    pub timezone: String,
    /// Telemetry endpoint override
    #[serde(default)]
    pub base_url: Option<String>,
    /// Maximum number of requests in flight
    #[serde(default)]
    pub max_concurrency: Option<usize>,
    /// Per-request timeout in seconds
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

/// Validated application configuration, immutable once loaded
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Static API token
    pub api_token: String,
    /// Path of the exported sheet
    pub output_path: PathBuf,
    /// First day of the range
    pub date_from: NaiveDate,
    /// End of the range (exclusive)
    pub date_to: NaiveDate,
    /// Zone the day windows are aligned to
    pub timezone: Tz,
    /// Telemetry endpoint
    pub base_url: String,
    /// Maximum number of requests in flight
    pub max_concurrency: usize,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl AppConfig {
    /// Read and validate a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading configuration");
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&contents)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let raw: ConfigFile = serde_yaml::from_str(contents)?;
        Self::try_from(raw)
    }
}

impl TryFrom<ConfigFile> for AppConfig {
    type Error = ConfigError;

    fn try_from(raw: ConfigFile) -> Result<Self, Self::Error> {
        if raw.api_token.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "api_token",
                reason: "must not be empty".to_string(),
            });
        }
        if raw.file_to_save.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "file_to_save",
                reason: "must not be empty".to_string(),
            });
        }

        let timezone = resolve_timezone(&raw.timezone)?;
        let date_from = parse_date("date_from", &raw.date_from)?;
        let date_to = parse_date("date_to", &raw.date_to)?;
        if date_to <= date_from {
            return Err(PartitionError::InvalidRange {
                start: date_from,
                end: date_to,
            }
            .into());
        }

        let max_concurrency = raw.max_concurrency.unwrap_or(DEFAULT_MAX_CONCURRENCY);
        if max_concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_concurrency",
                reason: "must be at least 1".to_string(),
            });
        }

        let timeout_secs = raw
            .request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            api_token: raw.api_token,
            output_path: raw.file_to_save,
            date_from,
            date_to,
            timezone,
            base_url: raw.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            max_concurrency,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| ConfigError::InvalidDate {
        field,
        value: value.to_string(),
    })
}
