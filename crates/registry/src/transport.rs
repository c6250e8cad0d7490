//! HTTP transport abstraction for the CDN
//!
//! The fetcher talks to the CDN through the `CdnTransport` trait so tests can
//! script responses without a network. `HttpTransport` is the production
//! implementation backed by reqwest with a per-request timeout.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::TransportError;

/// Header carrying the CDN access key
pub const CDN_KEY_HEADER: &str = "X-Hive-CDN-Key";

/// User agent reported to the CDN
pub const USER_AGENT: &str = concat!("hive-registry/", env!("CARGO_PKG_VERSION"));

/// Headers for one CDN fetch
#[derive(Debug, Clone)]
pub struct CdnRequest {
    /// CDN access key
    pub key: String,

    /// Client identification
    pub user_agent: String,

    /// Cached entity tag for conditional fetching
    pub if_none_match: Option<String>,
}

/// Response surface consumed by the fetcher
#[derive(Debug, Clone)]
pub struct CdnResponse {
    /// HTTP status code
    pub status: u16,

    /// Entity tag returned by the CDN, if any
    pub etag: Option<String>,

    /// Response body (the supergraph document on success)
    pub body: String,
}

/// Cancellable HTTP GET primitive
///
/// Implementations must abort the in-flight request once the configured
/// timeout elapses; there is no cooperative mid-flight cancellation beyond
/// that.
#[async_trait]
pub trait CdnTransport: Send + Sync {
    /// Issue one GET against `url` with the given headers
    async fn get(&self, url: &str, request: &CdnRequest) -> Result<CdnResponse, TransportError>;
}

/// Production transport backed by reqwest
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with the given per-request timeout
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self { client }
    }
}

#[async_trait]
impl CdnTransport for HttpTransport {
    async fn get(&self, url: &str, request: &CdnRequest) -> Result<CdnResponse, TransportError> {
        let mut builder = self
            .client
            .get(url)
            .header(CDN_KEY_HEADER, &request.key)
            .header(reqwest::header::USER_AGENT, &request.user_agent);

        if let Some(etag) = &request.if_none_match {
            builder = builder.header(reqwest::header::IF_NONE_MATCH, etag);
        }

        let response = builder.send().await.map_err(map_transport_error)?;

        let status = response.status().as_u16();
        let etag = response
            .headers()
            .get(reqwest::header::ETAG)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.text().await.map_err(map_transport_error)?;

        Ok(CdnResponse { status, etag, body })
    }
}

/// Map a reqwest failure onto the transport error taxonomy
fn map_transport_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else if error.is_connect() {
        TransportError::Connect(error.to_string())
    } else {
        TransportError::Other(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_names_client_and_version() {
        assert!(USER_AGENT.starts_with("hive-registry/"));
        assert!(USER_AGENT.len() > "hive-registry/".len());
    }
}
