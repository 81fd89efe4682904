use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Backend REST API settings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL, including the `/api` prefix.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text format (default).
    #[default]
    Text,
    /// Structured JSON format.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format: "text" or "json".
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Dashboard display settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Rows fetched per page on the customer list.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Rows shown in dashboard previews.
    #[serde(default = "default_preview_size")]
    pub preview_size: u32,

    /// Fixed "today" (YYYY-MM-DD) used to compute last-visit dates.
    /// The local date is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_date: Option<String>,

    /// Use the dark theme.
    #[serde(default)]
    pub dark_mode: bool,
}

fn default_page_size() -> u32 {
    20
}

fn default_preview_size() -> u32 {
    5
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            preview_size: default_preview_size(),
            base_date: None,
            dark_mode: false,
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Backend connection settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Display settings.
    #[serde(default)]
    pub ui: UiConfig,

    /// Serve data from the built-in demo backend instead of the REST API.
    #[serde(default)]
    pub demo: bool,
}

impl AppConfig {
    /// Check values that serde cannot validate on its own.
    pub fn validate(&self) -> Result<()> {
        validate_base_url(&self.api.base_url)?;

        if self.api.timeout_secs == 0 {
            return Err(Error::Config("api.timeout_secs must be at least 1".to_string()));
        }

        if self.ui.page_size == 0 || self.ui.preview_size == 0 {
            return Err(Error::Config("ui page sizes must be at least 1".to_string()));
        }

        if let Some(date) = &self.ui.base_date {
            chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| {
                Error::Config(format!("Invalid ui.base_date '{}': {}", date, e))
            })?;
        }

        Ok(())
    }

    /// Serialize to a JSON5-compatible string (plain pretty JSON).
    pub fn to_json5(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the configuration to `path`, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json5()?)?;
        tracing::info!(path = %path.display(), "Saved configuration");
        Ok(())
    }
}

/// Check that a base URL uses http or https and has a host part.
pub fn validate_base_url(url: &str) -> Result<()> {
    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
        .ok_or_else(|| {
            Error::Config(format!(
                "Invalid API base URL '{}': must start with http:// or https://",
                url
            ))
        })?;

    if rest.is_empty() || rest.starts_with('/') {
        return Err(Error::Config(format!(
            "Invalid API base URL '{}': missing host",
            url
        )));
    }

    Ok(())
}

/// Default location of the configuration file.
pub fn default_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|dir| dir.join("mokisight").join("config.json5"))
}

/// Load a configuration file in JSON5 format.
pub fn load_config<T: for<'de> Deserialize<'de>>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;

    json5::from_str(&content).map_err(|e| {
        Error::Config(format!(
            "Failed to parse config file '{}': {}",
            path.display(),
            e
        ))
    })
}

/// Load a configuration from a JSON5 string.
pub fn parse_config<T: for<'de> Deserialize<'de>>(content: &str) -> Result<T> {
    json5::from_str(content).map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
}
