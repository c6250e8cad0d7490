//! Registry client errors

use thiserror::Error;

/// Errors from a supergraph fetch
#[derive(Debug, Error)]
pub enum FetchError {
    /// Terminal HTTP status: retries exhausted, or a status that is never
    /// retried (below 499 and not a cache-recoverable 304)
    #[error("failed to fetch supergraph [{status}]")]
    Status {
        /// Final HTTP status observed
        status: u16,
    },

    /// Connection-level failure, distinct from an HTTP status failure
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

impl FetchError {
    /// HTTP status carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status } => Some(*status),
            FetchError::Transport(_) => None,
        }
    }
}

/// Connection-level transport failures
#[derive(Debug, Error)]
pub enum TransportError {
    /// Request exceeded the configured timeout and was aborted
    #[error("request timed out")]
    Timeout,

    /// Failed to establish a connection
    #[error("connection failed: {0}")]
    Connect(String),

    /// Any other transport failure (DNS, TLS, truncated body)
    #[error("request failed: {0}")]
    Other(String),
}
