//! Hive Ingest - usage-telemetry delivery
//!
//! Persists batches of pre-serialized telemetry records to a required primary
//! store and an optional best-effort mirror, falling back to a local durable
//! sink when the primary write fails.
//!
//! # Architecture
//!
//! ```text
//! [Batch producer] --records--> [BatchWriter] --insert--> [primary store]
//!                                    |    \--insert--> [mirror store] (best effort)
//!                                    \--write--> [fallback sink] (primary failure only)
//! ```
//!
//! Each batch is one immutable buffer: a destination-specific header row
//! followed by newline-delimited records. The same buffer is handed to every
//! destination, including the fallback sink.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use hive_ingest::{BatchWriter, ClickHouseStore, ClickHouseStoreConfig, DiskFallback};
//!
//! let primary = Arc::new(ClickHouseStore::new(ClickHouseStoreConfig::default()));
//! let writer = BatchWriter::new(primary)
//!     .with_fallback(Arc::new(DiskFallback::new("/var/lib/hive/fallback")));
//!
//! writer.write_operations(&records).await?;
//! ```

/// Error types
pub mod error;

/// Durable last-resort persistence
pub mod fallback;

/// Write-path metrics
pub mod metrics;

/// Batch buffer assembly and destinations
pub mod serializer;

/// Remote batch stores
pub mod store;

/// Dual-destination batch writer
pub mod writer;

pub use error::{FallbackError, StoreError, WriteError};
pub use fallback::{DiskFallback, FallbackSink};
pub use metrics::{WriteMetrics, WriteMetricsSnapshot, WriteTimer};
pub use serializer::{assemble, Destination, OPERATIONS_FIELDS, REGISTRY_FIELDS};
pub use store::{BatchStore, ClickHouseStore, ClickHouseStoreConfig};
pub use writer::BatchWriter;
