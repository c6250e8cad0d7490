//! Durable last-resort persistence
//!
//! Invoked only when the primary store write fails. The contract is a single
//! `write(buffer, destination)` call; the buffer is the exact header+records
//! batch that failed, so it can be replayed against the store verbatim.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;

use crate::error::FallbackError;

/// Write contract for the last-resort sink
#[async_trait]
pub trait FallbackSink: Send + Sync {
    /// Persist one batch buffer for the given destination table
    async fn write(&self, buffer: &[u8], destination: &str) -> Result<(), FallbackError>;
}

/// Fallback sink that spills batches to local disk
///
/// Directory layout, one file per delegated batch:
///
/// ```text
/// {base_path}/{destination}/{date}/{unix_millis}-{seq}.csv
/// ```
///
/// Files keep the `CSVWithNames` layout of the original batch, so replaying
/// them is a plain re-insert.
pub struct DiskFallback {
    base_path: PathBuf,
    sequence: AtomicU64,
}

impl DiskFallback {
    /// Create a fallback sink rooted at `base_path`
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            sequence: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl FallbackSink for DiskFallback {
    async fn write(&self, buffer: &[u8], destination: &str) -> Result<(), FallbackError> {
        let now = Utc::now();
        let dir = self
            .base_path
            .join(destination)
            .join(now.format("%Y-%m-%d").to_string());

        tokio::fs::create_dir_all(&dir).await?;

        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        let path = dir.join(format!("{}-{:06}.csv", now.timestamp_millis(), seq));

        tokio::fs::write(&path, buffer).await?;

        tracing::info!(
            destination,
            path = %path.display(),
            bytes = buffer.len(),
            "batch spilled to fallback sink"
        );

        Ok(())
    }
}

#[cfg(test)]
#[path = "fallback_test.rs"]
mod fallback_test;
