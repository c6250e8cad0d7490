//! Dual-destination batch writer
//!
//! Writes each batch to a required primary store and, when configured, a
//! best-effort mirror. The mirror's failure is logged and swallowed; the
//! outcome of `write_batch` follows the primary alone. When the primary
//! fails, the exact batch buffer is delegated to the fallback sink.

use std::sync::Arc;

use bytes::Bytes;

use crate::error::WriteError;
use crate::fallback::FallbackSink;
use crate::metrics::WriteMetrics;
use crate::serializer::{assemble, Destination};
use crate::store::BatchStore;

/// Writes telemetry batches to primary and mirror stores
///
/// Holds no mutable state between calls: concurrent `write_batch` calls run
/// independently, and callers own any required backpressure or ordering.
pub struct BatchWriter {
    primary: Arc<dyn BatchStore>,
    mirror: Option<Arc<dyn BatchStore>>,
    fallback: Option<Arc<dyn FallbackSink>>,
    metrics: Arc<WriteMetrics>,
}

impl BatchWriter {
    /// Create a writer with the required primary store
    pub fn new(primary: Arc<dyn BatchStore>) -> Self {
        Self {
            primary,
            mirror: None,
            fallback: None,
            metrics: Arc::new(WriteMetrics::new()),
        }
    }

    /// Configure a best-effort mirror store
    pub fn with_mirror(mut self, mirror: Arc<dyn BatchStore>) -> Self {
        self.mirror = Some(mirror);
        self
    }

    /// Configure a last-resort fallback sink
    pub fn with_fallback(mut self, fallback: Arc<dyn FallbackSink>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Get reference to metrics
    pub fn metrics(&self) -> &WriteMetrics {
        &self.metrics
    }

    /// Get a shared handle to the metrics for reporting
    pub fn metrics_handle(&self) -> Arc<WriteMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Write a batch of pre-serialized operation records
    pub async fn write_operations(&self, records: &[Bytes]) -> Result<(), WriteError> {
        self.write_batch(Destination::Operations, records).await
    }

    /// Write a batch of pre-serialized operation registry records
    pub async fn write_registry(&self, records: &[Bytes]) -> Result<(), WriteError> {
        self.write_batch(Destination::Registry, records).await
    }

    /// Write one batch to the configured destinations
    ///
    /// Succeeds iff the primary write succeeds, or the fallback sink accepts
    /// the buffer after a primary failure. The mirror write never affects the
    /// outcome.
    pub async fn write_batch(
        &self,
        destination: Destination,
        records: &[Bytes],
    ) -> Result<(), WriteError> {
        let buffer = assemble(destination, records);
        let table = destination.table();

        let primary_result = self.dispatch(destination, table, &buffer).await;

        match primary_result {
            Ok(()) => {
                self.metrics.record_batch_written();
                Ok(())
            }
            Err(primary_error) => {
                self.metrics.record_primary_error();

                match &self.fallback {
                    Some(fallback) => {
                        tracing::warn!(
                            store = self.primary.name(),
                            table,
                            error = %primary_error,
                            "primary write failed, delegating batch to fallback sink"
                        );

                        match fallback.write(&buffer, table).await {
                            Ok(()) => {
                                self.metrics.record_fallback_write();
                                Ok(())
                            }
                            Err(fallback_error) => Err(WriteError::Fallback {
                                primary: primary_error,
                                source: fallback_error,
                            }),
                        }
                    }
                    None => Err(WriteError::Primary(primary_error)),
                }
            }
        }
    }

    /// Issue the primary write (timed) and the mirror write concurrently
    ///
    /// Returns the primary outcome; the mirror outcome is logged and dropped.
    async fn dispatch(
        &self,
        destination: Destination,
        table: &str,
        buffer: &Bytes,
    ) -> Result<(), crate::error::StoreError> {
        let primary_write = async {
            // Timer guard drops when the primary write settles, success or
            // failure, independent of the mirror.
            let _timer = self.metrics.start_timer(destination);
            self.primary.insert(table, buffer.clone()).await
        };

        match &self.mirror {
            Some(mirror) => {
                let mirror_write = async {
                    if let Err(error) = mirror.insert(table, buffer.clone()).await {
                        self.metrics.record_mirror_error();
                        tracing::error!(
                            store = mirror.name(),
                            table,
                            error = %error,
                            "best-effort mirror write failed"
                        );
                    }
                };

                let (primary_result, ()) = tokio::join!(primary_write, mirror_write);
                primary_result
            }
            None => primary_write.await,
        }
    }
}

#[cfg(test)]
#[path = "writer_test.rs"]
mod writer_test;
