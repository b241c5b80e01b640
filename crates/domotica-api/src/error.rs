use thiserror::Error;

/// Top-level error type for the `domotica-api` crate.
///
/// Every request failure names the endpoint it came from so that callers
/// (and the log line emitted before the error is returned) can tell which
/// sensor or device was involved. `domotica-core` wraps these.
#[derive(Debug, Error)]
pub enum Error {
    // ── HTTP ────────────────────────────────────────────────────────
    /// The server answered with a non-success status. The body is never read.
    #[error("HTTP {status} from {endpoint}")]
    Status { endpoint: String, status: u16 },

    /// Connection refused, DNS failure, broken stream, etc.
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response was successful but its body is not valid JSON.
    #[error("invalid JSON from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    // ── Setup ───────────────────────────────────────────────────────
    /// URL parsing error (bad base URL or endpoint path).
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// `reqwest::Client` could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(String),

    // ── Input validation ────────────────────────────────────────────
    #[error("unknown device action '{0}' (expected 'on' or 'off')")]
    InvalidAction(String),

    #[error("unknown device '{0}' (expected air-conditioner, fire-system or lamp)")]
    InvalidDevice(String),

    #[error("unknown sensor '{0}' (expected temperature, smoke or luminosity)")]
    InvalidSensor(String),
}

impl Error {
    /// HTTP status carried by a [`Error::Status`], if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The endpoint a request error originated from.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::Status { endpoint, .. }
            | Self::Transport { endpoint, .. }
            | Self::Decode { endpoint, .. } => Some(endpoint),
            _ => None,
        }
    }

    /// Returns `true` for failures that a later poll may not hit again.
    ///
    /// Nothing in this crate retries; the flag only lets callers pick a
    /// notification severity or log level.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport { source, .. } => source.is_timeout() || source.is_connect(),
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if the server said the endpoint does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}
