//! Registry CDN client configuration

use std::time::Duration;

/// Default interval between supergraph poll ticks
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(30_000);

/// Default retry ceiling within a single fetch call
pub const DEFAULT_MAX_RETRIES: u32 = 10;

/// Default per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the supergraph CDN client
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// CDN endpoint serving the supergraph artifact
    pub endpoint: String,

    /// CDN access key, sent as `X-Hive-CDN-Key`
    pub key: String,

    /// Interval between poll ticks
    pub poll_interval: Duration,

    /// Maximum number of retries within one fetch call
    pub max_retries: u32,

    /// Per-request timeout (aborts the in-flight HTTP call)
    pub request_timeout: Duration,
}

impl RegistryConfig {
    /// Create a config with the given endpoint and CDN key
    pub fn new(endpoint: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            key: key.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_retries: DEFAULT_MAX_RETRIES,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Set the polling interval
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the retry ceiling
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the per-request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// URL of the supergraph artifact
    ///
    /// Appends the `supergraph` path segment unless the endpoint already
    /// points at it.
    pub fn supergraph_url(&self) -> String {
        if self.endpoint.ends_with("/supergraph") {
            self.endpoint.clone()
        } else {
            format!("{}/supergraph", self.endpoint.trim_end_matches('/'))
        }
    }
}
