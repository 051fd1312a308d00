//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::store::default_store_path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Spreadsheet API configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiConfig {
    /// Apps Script web app `/exec` URL
    pub url: Option<String>,

    /// Optional shared secret, sent as `key`
    pub key: Option<String>,

    /// Link to the backing spreadsheet
    pub sheet_url: Option<String>,

    /// Request timeout; unset means wait indefinitely
    pub request_timeout_secs: Option<u64>,
}

/// Dashboard rendering configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Local record store; defaults to the per-user data directory
    pub store_path: Option<String>,

    #[serde(default = "default_expiring_horizon")]
    pub expiring_horizon_days: i64,

    #[serde(default = "default_alert_window")]
    pub alert_window_days: i64,

    #[serde(default = "default_alert_limit")]
    pub alert_limit: usize,

    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,

    #[serde(default = "default_range")]
    pub default_range: String,
}

fn default_currency() -> String {
    "AED".to_string()
}

fn default_expiring_horizon() -> i64 {
    90
}

fn default_alert_window() -> i64 {
    30
}

fn default_alert_limit() -> usize {
    3
}

fn default_recent_limit() -> usize {
    6
}

fn default_range() -> String {
    "12m".to_string()
}

impl DashboardConfig {
    /// Resolved path of the local record store
    pub fn store_path(&self) -> PathBuf {
        self.store_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(default_store_path)
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            store_path: None,
            expiring_horizon_days: default_expiring_horizon(),
            alert_window_days: default_alert_window(),
            alert_limit: default_alert_limit(),
            recent_limit: default_recent_limit(),
            default_range: default_range(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from an explicit path, else default locations, else environment
    ///
    /// An explicit path that fails to load is an error; default locations
    /// that fail are skipped and reported in [`Resolved::skipped`].
    pub fn resolve(explicit: Option<&Path>) -> Result<Resolved, ConfigError> {
        match explicit {
            Some(path) => Ok(Resolved {
                config: Self::load_with_env(path)?,
                source: Some(path.to_path_buf()),
                skipped: Vec::new(),
            }),
            None => Ok(Self::load_default()),
        }
    }

    /// Load from default locations or environment
    pub fn load_default() -> Resolved {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("rentboard").join("config.toml")),
            Some(PathBuf::from("./rentboard.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths)
    }

    /// First candidate that exists and loads; failures are collected
    pub fn load_first(paths: &[PathBuf]) -> Resolved {
        let mut skipped = Vec::new();

        for path in paths.iter().filter(|p| p.exists()) {
            match Self::load_with_env(path) {
                Ok(config) => {
                    return Resolved {
                        config,
                        source: Some(path.clone()),
                        skipped,
                    }
                }
                Err(e) => skipped.push(e),
            }
        }

        Resolved {
            config: Self::from_env(),
            source: None,
            skipped,
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // API overrides
        if let Ok(url) = std::env::var("RENTBOARD_API_URL") {
            self.api.url = Some(url);
        }
        if let Ok(key) = std::env::var("RENTBOARD_API_KEY") {
            self.api.key = Some(key);
        }
        if let Ok(sheet) = std::env::var("RENTBOARD_SHEET_URL") {
            self.api.sheet_url = Some(sheet);
        }

        // Dashboard overrides
        if let Ok(currency) = std::env::var("RENTBOARD_CURRENCY") {
            self.dashboard.currency = currency;
        }
        if let Ok(path) = std::env::var("RENTBOARD_STORE_PATH") {
            self.dashboard.store_path = Some(path);
        }

        // Logging overrides
        if let Ok(level) = std::env::var("RENTBOARD_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("RENTBOARD_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Outcome of config resolution
///
/// Produced before logging is set up, so the caller reports `source` and
/// `skipped` once a subscriber exists.
#[derive(Debug)]
pub struct Resolved {
    pub config: Config,
    /// File the config came from; `None` means defaults plus environment
    pub source: Option<PathBuf>,
    /// Default locations that exist but failed to load
    pub skipped: Vec<ConfigError>,
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Rentboard Configuration
#
# Environment variables override these settings:
# - RENTBOARD_API_URL
# - RENTBOARD_API_KEY
# - RENTBOARD_SHEET_URL
# - RENTBOARD_CURRENCY
# - RENTBOARD_STORE_PATH
# - RENTBOARD_LOG_LEVEL
# - RENTBOARD_LOG_FORMAT

[api]
# Apps Script web app URL (ends in /exec). Leave unset to use the local store only.
# url = "https://script.google.com/macros/s/<deployment-id>/exec"

# Shared secret checked by the web app, if it expects one
# key = ""

# Link to the spreadsheet, shown on the dashboard
# sheet_url = "https://docs.google.com/spreadsheets/d/<sheet-id>/edit"

# Request timeout in seconds (default: none)
# request_timeout_secs = 30

[dashboard]
# Currency used when formatting amounts
currency = "AED"

# Local copy of the property records (JSON array)
# store_path = "~/.local/share/rentboard/sabir_realestate_properties_v1.json"

# KPI tile: contracts ending within this many days
expiring_horizon_days = 90

# Alert feed: contracts ending within this many days, at most alert_limit shown
alert_window_days = 30
alert_limit = 3

# Recent activity rows
recent_limit = 6

# Profit trend window: 6m, 12m or all
default_range = "12m"

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
