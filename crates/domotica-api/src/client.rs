// Home-automation API HTTP client
//
// Wraps `reqwest::Client` with base-URL joining, the JSON content type and
// uniform error reporting. The typed endpoints (sensors, device status and
// control) are inherent methods in `endpoints.rs` so this module stays
// focused on transport mechanics.

use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tracing::{debug, error, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Raw HTTP client for the home-automation API.
///
/// Responses are opaque JSON values. Failures are logged with the endpoint
/// name and then returned; nothing is retried and nothing is swallowed.
#[derive(Debug, Clone)]
pub struct HomeClient {
    http: reqwest::Client,
    base_url: Url,
}

impl HomeClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the server root (e.g. `http://192.168.1.50:5000`);
    /// endpoint paths such as `/api/temperatura` are appended to it.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Url::parse(base_url)?;
        Ok(Self { http, base_url })
    }

    /// The server base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join an endpoint path onto the base URL, keeping any base path prefix.
    pub(crate) fn url(&self, endpoint: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let endpoint = endpoint.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{endpoint}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Issue a request and return the parsed JSON body.
    ///
    /// The body is attached only for non-GET methods; a GET silently drops
    /// it. A non-success status fails with [`Error::Status`] without the
    /// body being read. Every failure is logged before it is returned.
    pub async fn call(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<&Value>,
    ) -> Result<Value, Error> {
        let result = self.execute(endpoint, method, body).await;
        if let Err(ref e) = result {
            error!(endpoint, error = %e, "API call failed");
        }
        result
    }

    /// `call(endpoint, GET, None)`
    pub async fn get(&self, endpoint: &str) -> Result<Value, Error> {
        self.call(endpoint, Method::GET, None).await
    }

    /// `call(endpoint, POST, body)`
    pub async fn post(&self, endpoint: &str, body: Option<&Value>) -> Result<Value, Error> {
        self.call(endpoint, Method::POST, body).await
    }

    async fn execute(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<&Value>,
    ) -> Result<Value, Error> {
        let url = self.url(endpoint)?;
        debug!("{method} {url}");

        let mut builder = self
            .http
            .request(method.clone(), url)
            .header(CONTENT_TYPE, "application/json");

        match body {
            Some(body) if method != Method::GET => {
                builder = builder.body(body.to_string());
            }
            Some(_) => trace!(endpoint, "dropping body on GET request"),
            None => {}
        }

        let resp = builder.send().await.map_err(|source| Error::Transport {
            endpoint: endpoint.to_owned(),
            source,
        })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Status {
                endpoint: endpoint.to_owned(),
                status: status.as_u16(),
            });
        }

        let bytes = resp.bytes().await.map_err(|source| Error::Transport {
            endpoint: endpoint.to_owned(),
            source,
        })?;

        serde_json::from_slice(&bytes).map_err(|source| Error::Decode {
            endpoint: endpoint.to_owned(),
            source,
        })
    }
}
