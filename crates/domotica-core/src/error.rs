// ── Core error types ──
//
// Request failures pass through untouched so callers can still inspect
// the HTTP status or endpoint; the core adds its own interpretation errors.

use thiserror::Error;

use domotica_api::SensorKind;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Api(#[from] domotica_api::Error),

    /// The sensor answered, but nothing in the body looked like a number.
    #[error("no numeric reading in {sensor} response")]
    NoReading { sensor: SensorKind },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },
}

impl CoreError {
    /// HTTP status of the underlying request failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api(e) => e.status(),
            _ => None,
        }
    }
}
