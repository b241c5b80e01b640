//! CLI error types with miette diagnostics.
//!
//! Maps API, core and config errors into user-facing errors with
//! actionable help text and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use domotica_config::ConfigError;
use domotica_core::{CoreError, SensorKind};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the server at {url}")]
    #[diagnostic(
        code(domotica::connection_failed),
        help(
            "Check that the server is running and reachable.\n\
             Set the address with --base-url or `base_url` in the config file."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request to {endpoint} timed out")]
    #[diagnostic(
        code(domotica::timeout),
        help("Raise `timeout_secs` in the config file or check server load.")
    )]
    Timeout { endpoint: String },

    // ── Server responses ─────────────────────────────────────────────
    #[error("{endpoint} does not exist on this server")]
    #[diagnostic(
        code(domotica::not_found),
        help("The server answered 404. Check that --base-url points at the API root.")
    )]
    NotFound { endpoint: String },

    #[error("Server answered HTTP {status} for {endpoint}")]
    #[diagnostic(code(domotica::http_status))]
    HttpStatus { endpoint: String, status: u16 },

    #[error("Invalid response from {endpoint}: {reason}")]
    #[diagnostic(code(domotica::invalid_response))]
    InvalidResponse { endpoint: String, reason: String },

    #[error("The {sensor} sensor returned no numeric reading")]
    #[diagnostic(
        code(domotica::no_reading),
        help("Run with -o json to inspect the raw response.")
    )]
    NoReading { sensor: SensorKind },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(domotica::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(domotica::config),
        help("Inspect the file with: domotica config show")
    )]
    Config(ConfigError),

    #[error("Configuration file already exists at {path}")]
    #[diagnostic(
        code(domotica::config_exists),
        help("Pass --force to overwrite it.")
    )]
    ConfigExists { path: String },

    // ── Background work ──────────────────────────────────────────────
    #[error("Background polling stopped unexpectedly: {reason}")]
    #[diagnostic(
        code(domotica::poller_failed),
        help("Run again with -vv to see the log leading up to the failure.")
    )]
    PollerFailed { reason: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to encode output: {0}")]
    #[diagnostic(code(domotica::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to encode output: {0}")]
    #[diagnostic(code(domotica::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. }
            | Self::ConfigExists { .. }
            | Self::Config(ConfigError::Validation { .. }) => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── Error mapping ────────────────────────────────────────────────────

impl From<domotica_api::Error> for CliError {
    fn from(err: domotica_api::Error) -> Self {
        use domotica_api::Error as Api;

        match err {
            Api::Status {
                endpoint,
                status: 404,
            } => Self::NotFound { endpoint },

            Api::Status { endpoint, status } => Self::HttpStatus { endpoint, status },

            Api::Transport { endpoint, source } if source.is_timeout() => {
                Self::Timeout { endpoint }
            }

            Api::Transport { endpoint, source } => Self::ConnectionFailed {
                url: source
                    .url()
                    .map_or(endpoint, |u| u.as_str().to_owned()),
                source: Box::new(source),
            },

            Api::Decode { endpoint, source } => Self::InvalidResponse {
                endpoint,
                reason: source.to_string(),
            },

            Api::InvalidUrl(e) => Self::Validation {
                field: "base-url".into(),
                reason: e.to_string(),
            },

            Api::Client(reason) => Self::ConnectionFailed {
                url: "(client setup)".into(),
                source: reason.into(),
            },

            e @ Api::InvalidAction(_) => Self::Validation {
                field: "action".into(),
                reason: e.to_string(),
            },

            e @ Api::InvalidDevice(_) => Self::Validation {
                field: "device".into(),
                reason: e.to_string(),
            },

            e @ Api::InvalidSensor(_) => Self::Validation {
                field: "sensor".into(),
                reason: e.to_string(),
            },
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Api(e) => e.into(),
            CoreError::NoReading { sensor } => Self::NoReading { sensor },
            CoreError::ValidationFailed { message } => Self::Validation {
                field: "input".into(),
                reason: message,
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io(e) => Self::Io(e),
            other => Self::Config(other),
        }
    }
}
