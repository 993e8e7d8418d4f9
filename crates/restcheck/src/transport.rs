//! The consumed transport boundary.
//!
//! The harness never implements HTTP; it needs one capability, issue a
//! request spec and get back a status and a JSON body, expressed as the
//! [`Transport`] trait. [`HttpTransport`] is the production implementation
//! over reqwest with a bounded per-request timeout, so a stalled call
//! surfaces as a [`TransportError::Timeout`] (and thus an `Aborted`
//! scenario) instead of blocking the run. A [`TransportError::Decode`] is
//! the one variant that does not abort: a resource that answered with a
//! non-JSON body is broken, not unreachable.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::HarnessConfig;
use crate::error::TransportError;
use crate::spec::{Method, RequestSpec};

/// The response surface the harness consumes: status code plus decoded JSON
/// body (`Value::Null` when the response carried no body, as DELETE often
/// does).
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,

    /// Decoded JSON body, `Null` when empty.
    pub body: Value,
}

/// Capability to execute one request spec against the remote resource.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issues the request and captures the response.
    async fn issue(&self, spec: &RequestSpec) -> Result<TransportResponse, TransportError>;
}

/// Plain HTTP/HTTPS transport against a fixed base URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpTransport {
    /// Creates a transport from harness configuration.
    pub fn from_config(config: &HarnessConfig) -> Result<Self, TransportError> {
        Self::new(&config.base_url, config.timeout())
    }

    /// Creates a transport for `base_url` with the given per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        // Validate eagerly so a bad URL fails at construction, not mid-run.
        Url::parse(base_url)?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(TransportError::Request)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    fn target(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn issue(&self, spec: &RequestSpec) -> Result<TransportResponse, TransportError> {
        let url = self.target(spec.path());

        debug!(method = %spec.method(), url = %url, "issuing request");

        let method = match spec.method() {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut request = self.client.request(method, &url);
        if let Some(body) = spec.body() {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout {
                    method: spec.method().to_string(),
                    url: url.clone(),
                    millis: self.timeout.as_millis() as u64,
                }
            } else if e.is_connect() {
                TransportError::Connect {
                    url: url.clone(),
                    message: e.to_string(),
                }
            } else {
                TransportError::Request(e)
            }
        })?;

        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(TransportError::Request)?;

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).map_err(|e| TransportError::Decode {
                url: url.clone(),
                message: e.to_string(),
            })?
        };

        debug!(status, url = %url, "response received");

        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_base_url_is_rejected_at_construction() {
        let err = HttpTransport::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, TransportError::InvalidBaseUrl(_)));
    }

    #[test]
    fn target_joins_base_and_path_with_one_slash() {
        let transport =
            HttpTransport::new("http://localhost:8080/simpleapi/", Duration::from_secs(1))
                .unwrap();
        assert_eq!(
            transport.target("/items/7"),
            "http://localhost:8080/simpleapi/items/7"
        );
        assert_eq!(
            transport.target("items"),
            "http://localhost:8080/simpleapi/items"
        );
    }
}
