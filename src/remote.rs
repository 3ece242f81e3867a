//! HTTP adapter for the remote instance.
//!
//! Wraps a ureq agent with base-url joining, bearer auth, and the
//! status-to-taxonomy classification that the kind handlers rely on:
//! 404 means [`Error::NotFound`] (safe to create), 409/412 become
//! [`Error::Conflict`] carrying the raw response body, and everything else
//! propagates as a transport error.

use reconcile::{Error, Result};
use serde_json::Value;
use ureq::Agent;
use ureq::http::Response;

/// Maximum response body size we are willing to buffer (dashboards can be
/// large, but nothing sane exceeds this).
const MAX_BODY_SIZE: u64 = 16 * 1024 * 1024;

/// Blocking JSON client for the remote REST API.
pub struct RemoteClient {
    agent: Agent,
    base_url: String,
    token: Option<String>,
}

impl RemoteClient {
    /// Create a client for the given instance.
    #[must_use]
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        // Non-2xx responses must come back as responses, not errors, so the
        // classification below can read the status and body together.
        let agent: Agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Get the base URL this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join an API path onto the base URL.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET a JSON document.
    pub fn get_json(&self, path: &str) -> Result<Value> {
        let mut request = self
            .agent
            .get(self.url(path))
            .header("Accept", "application/json");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }
        let response = request
            .call()
            .map_err(|e| Error::transport(e.to_string(), None))?;
        Self::decode(response)
    }

    /// POST a JSON document, with optional extra headers.
    pub fn post_json(&self, path: &str, body: &Value, headers: &[(&str, &str)]) -> Result<Value> {
        let mut request = self
            .agent
            .post(self.url(path))
            .header("Accept", "application/json");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let response = request
            .send_json(body)
            .map_err(|e| Error::transport(e.to_string(), None))?;
        Self::decode(response)
    }

    /// PUT a JSON document, with optional extra headers.
    pub fn put_json(&self, path: &str, body: &Value, headers: &[(&str, &str)]) -> Result<Value> {
        let mut request = self
            .agent
            .put(self.url(path))
            .header("Accept", "application/json");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let response = request
            .send_json(body)
            .map_err(|e| Error::transport(e.to_string(), None))?;
        Self::decode(response)
    }

    fn decode(mut response: Response<ureq::Body>) -> Result<Value> {
        let status = response.status().as_u16();

        if (200..300).contains(&status) {
            return response
                .body_mut()
                .with_config()
                .limit(MAX_BODY_SIZE)
                .read_json()
                .map_err(|e| Error::transport(format!("invalid response body: {}", e), Some(status)));
        }

        let body = response
            .body_mut()
            .with_config()
            .limit(MAX_BODY_SIZE)
            .read_to_string()
            .unwrap_or_default();
        Err(classify_status(status, body))
    }
}

/// Map a non-2xx HTTP status to the domain error taxonomy.
fn classify_status(status: u16, body: String) -> Error {
    match status {
        404 => Error::NotFound,
        409 | 412 => Error::conflict(status, body),
        _ => Error::transport(format!("HTTP {}: {}", status, body.trim()), Some(status)),
    }
}
