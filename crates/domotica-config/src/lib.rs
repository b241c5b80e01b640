//! Shared configuration for the domotica CLI.
//!
//! A TOML file at the platform config path, overlaid with `DOMOTICA_`
//! environment variables, translated into the API client's
//! [`TransportConfig`] and the dashboard settings. The CLI applies its own
//! flag overrides on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use domotica_api::TransportConfig;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Server root the API paths are joined onto.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Default output format for one-shot commands.
    #[serde(default = "default_output")]
    pub output: String,

    /// Request timeout. Unset means requests wait indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    #[serde(default)]
    pub dashboard: Dashboard,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            output: default_output(),
            timeout_secs: None,
            dashboard: Dashboard::default(),
        }
    }
}

/// Settings for the live `watch` dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Dashboard {
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Points kept per chart.
    #[serde(default = "default_max_points")]
    pub max_points: usize,

    /// How long a notification stays up, in milliseconds.
    #[serde(default = "default_notification_ms")]
    pub notification_ms: u64,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            max_points: default_max_points(),
            notification_ms: default_notification_ms(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5000".into()
}
fn default_output() -> String {
    "table".into()
}
fn default_poll_interval() -> u64 {
    5
}
fn default_max_points() -> usize {
    20
}
fn default_notification_ms() -> u64 {
    3000
}

impl Config {
    /// Check the values a file or environment could have gotten wrong.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.parsed_base_url()?;
        if self.dashboard.poll_interval_secs == 0 {
            return Err(invalid("dashboard.poll_interval_secs", "must be at least 1"));
        }
        if self.dashboard.max_points == 0 {
            return Err(invalid("dashboard.max_points", "must be at least 1"));
        }
        if self.timeout_secs == Some(0) {
            return Err(invalid("timeout_secs", "must be at least 1 when set"));
        }
        Ok(())
    }

    /// `base_url` as an `http`/`https` URL.
    pub fn parsed_base_url(&self) -> Result<Url, ConfigError> {
        let url: Url = self
            .base_url
            .parse()
            .map_err(|_| invalid("base_url", format!("invalid URL: {}", self.base_url)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(invalid(
                "base_url",
                format!("expected an http or https URL, got scheme '{other}'"),
            )),
        }
    }

    /// Client transport settings derived from this config.
    pub fn transport(&self) -> TransportConfig {
        let transport = TransportConfig::default();
        match self.timeout_secs {
            Some(secs) => transport.with_timeout(Duration::from_secs(secs)),
            None => transport,
        }
    }
}

impl Dashboard {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn notification_duration(&self) -> Duration {
        Duration::from_millis(self.notification_ms)
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "domotica", "domotica").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("domotica");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` + environment. A missing file leaves the defaults.
///
/// Nested keys use a double underscore in the environment, e.g.
/// `DOMOTICA_DASHBOARD__MAX_POINTS=40`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("DOMOTICA_").split("__"));

    let config: Config = figment.extract()?;
    config.validate()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`, creating parents.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}
