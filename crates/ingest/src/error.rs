//! Ingest errors

use thiserror::Error;

/// Errors from a remote batch store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to reach the store at all
    #[error("connection failed: {0}")]
    Connection(String),

    /// The store rejected the insert
    #[error("insert rejected ({status}): {message}")]
    Rejected {
        /// HTTP status returned by the store
        status: u16,
        /// Response body, usually the store's own error text
        message: String,
    },
}

/// Errors from the last-resort fallback sink
#[derive(Debug, Error)]
pub enum FallbackError {
    /// I/O error while persisting the buffer
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced by `write_batch`
#[derive(Debug, Error)]
pub enum WriteError {
    /// The required primary write failed and no fallback sink is configured
    #[error("primary write failed: {0}")]
    Primary(#[source] StoreError),

    /// The primary write failed and the fallback sink failed as well
    #[error("fallback write failed after primary failure ({primary}): {source}")]
    Fallback {
        /// The primary failure that triggered the fallback
        primary: StoreError,
        /// The fallback sink's own failure
        #[source]
        source: FallbackError,
    },
}
