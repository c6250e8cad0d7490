//! Conditional supergraph fetcher with bounded retry
//!
//! Fetches the supergraph document from the CDN and keeps a single-entry
//! etag cache so unchanged documents cost a 304 instead of a full body.
//! Server errors (status >= 499) are retried up to a ceiling; anything else
//! fails immediately.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use sha2::{Digest, Sha256};

use crate::config::RegistryConfig;
use crate::error::FetchError;
use crate::transport::{CdnRequest, CdnTransport, USER_AGENT};

/// Content-addressed copy of the supergraph document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Base64-encoded SHA-256 of `supergraph_sdl`
    pub id: String,

    /// The composed schema document
    pub supergraph_sdl: String,
}

impl Snapshot {
    /// Build a snapshot from a freshly fetched document
    pub fn from_document(supergraph_sdl: String) -> Self {
        let id = content_id(&supergraph_sdl);
        Self { id, supergraph_sdl }
    }
}

/// Deterministic content hash of a supergraph document
///
/// Byte-identical documents always produce identical ids.
pub fn content_id(document: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(document.as_bytes());
    BASE64.encode(hasher.finalize())
}

/// Cached result of the last fresh fetch that carried an entity tag
#[derive(Debug, Clone)]
struct CacheEntry {
    etag: String,
    snapshot: Snapshot,
}

/// Fetches the supergraph with conditional requests and bounded retry
///
/// The etag cache is owned exclusively by this instance; the poller runs one
/// fetch at a time, so cache reads and writes are never concurrent.
pub struct SupergraphFetcher<T> {
    transport: T,
    url: String,
    key: String,
    max_retries: u32,
    cache: Option<CacheEntry>,
}

impl<T: CdnTransport> SupergraphFetcher<T> {
    /// Create a fetcher from a registry config and a transport
    pub fn from_config(config: &RegistryConfig, transport: T) -> Self {
        Self {
            transport,
            url: config.supergraph_url(),
            key: config.key.clone(),
            max_retries: config.max_retries,
            cache: None,
        }
    }

    /// URL of the supergraph artifact this fetcher polls
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the current supergraph document
    ///
    /// Returns the cached snapshot on a 304 when a cache entry exists. Retries
    /// on status >= 499 up to the configured ceiling; all other statuses fail
    /// immediately. Connection-level failures propagate unchanged.
    pub async fn fetch(&mut self) -> Result<Snapshot, FetchError> {
        let request = CdnRequest {
            key: self.key.clone(),
            user_agent: USER_AGENT.to_string(),
            if_none_match: self.cache.as_ref().map(|entry| entry.etag.clone()),
        };

        let mut retries = 0u32;

        loop {
            let response = self.transport.get(&self.url, &request).await?;

            if (200..300).contains(&response.status) {
                let snapshot = Snapshot::from_document(response.body);

                // The only path that mutates the cache.
                if let Some(etag) = response.etag {
                    self.cache = Some(CacheEntry {
                        etag,
                        snapshot: snapshot.clone(),
                    });
                }

                return Ok(snapshot);
            }

            if response.status == 304 {
                if let Some(entry) = &self.cache {
                    // Not modified: serve the cached snapshot without
                    // consuming a retry attempt or touching the cache.
                    return Ok(entry.snapshot.clone());
                }
            }

            if retries >= self.max_retries || response.status < 499 {
                return Err(FetchError::Status {
                    status: response.status,
                });
            }

            retries += 1;
        }
    }
}

#[cfg(test)]
#[path = "fetcher_test.rs"]
mod fetcher_test;
