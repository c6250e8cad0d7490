//! Hive Registry - Supergraph CDN client
//!
//! Keeps a local copy of the composed schema document ("supergraph") in sync
//! with the schema registry CDN.
//!
//! # Architecture
//!
//! ```text
//! [SupergraphPoller] --tick--> [SupergraphFetcher] --GET--> [CdnTransport]
//!        |                            |
//!        v                            v
//! [SchemaSubscriber]           [etag cache]
//! ```
//!
//! The fetcher issues conditional HTTP requests (`If-None-Match`) against the
//! CDN and retries server errors up to a bounded ceiling. The poller runs one
//! fetch per tick on a cooperative loop, so at most one fetch is in flight per
//! session.
//!
//! # Example
//!
//! ```ignore
//! use hive_registry::{HttpTransport, RegistryConfig, SupergraphPoller};
//!
//! let config = RegistryConfig::new("https://cdn.example.com/artifacts/v1/abc", "cdn-key");
//! let poller = SupergraphPoller::from_config(&config, HttpTransport::new(config.request_timeout));
//!
//! let session = poller
//!     .initialize(|sdl: &str| println!("supergraph updated ({} bytes)", sdl.len()))
//!     .await?;
//!
//! println!("initial supergraph: {}", session.supergraph_sdl());
//! // ... later
//! session.cleanup();
//! ```

/// Client configuration and defaults
pub mod config;

/// Error types
pub mod error;

/// Conditional supergraph fetcher with bounded retry
pub mod fetcher;

/// Recurring supergraph polling
pub mod poller;

/// HTTP transport abstraction for the CDN
pub mod transport;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::RegistryConfig;
pub use error::{FetchError, TransportError};
pub use fetcher::{content_id, Snapshot, SupergraphFetcher};
pub use poller::{PollSession, SchemaSubscriber, SupergraphPoller};
pub use transport::{CdnRequest, CdnResponse, CdnTransport, HttpTransport};
