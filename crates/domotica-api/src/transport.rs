// Transport configuration for building the reqwest::Client.
//
// The API has no timeout semantics of its own: a call resolves or fails
// exactly once. `timeout` stays `None` unless the operator opts in.

use std::time::Duration;

use crate::error::Error;

const USER_AGENT: &str = concat!("domotica/", env!("CARGO_PKG_VERSION"));

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Whole-request timeout. `None` means wait for the server.
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            user_agent: USER_AGENT.into(),
        }
    }
}

impl TransportConfig {
    /// Set a request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder().user_agent(self.user_agent.as_str());

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        builder.build().map_err(|e| Error::Client(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_no_timeout() {
        let cfg = TransportConfig::default();
        assert!(cfg.timeout.is_none());
        assert!(cfg.user_agent.starts_with("domotica/"));
    }

    #[test]
    fn builds_with_timeout() {
        let cfg = TransportConfig::default().with_timeout(Duration::from_secs(5));
        assert_eq!(cfg.timeout, Some(Duration::from_secs(5)));
        assert!(cfg.build_client().is_ok());
    }
}
