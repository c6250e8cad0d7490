//! Recurring supergraph polling
//!
//! Owns a timer loop that re-fetches the supergraph at a fixed interval and
//! notifies a subscriber whenever a tick yields a document. A failed tick is
//! logged and the next tick is armed regardless; only the initial fetch is
//! fatal.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::config::RegistryConfig;
use crate::error::FetchError;
use crate::fetcher::{Snapshot, SupergraphFetcher};
use crate::transport::CdnTransport;

/// Receives supergraph documents produced by poll ticks
pub trait SchemaSubscriber: Send + Sync + 'static {
    /// Called with the document of every successful, non-empty tick
    fn schema_updated(&self, supergraph_sdl: &str);
}

impl<F> SchemaSubscriber for F
where
    F: Fn(&str) + Send + Sync + 'static,
{
    fn schema_updated(&self, supergraph_sdl: &str) {
        self(supergraph_sdl)
    }
}

/// Polls the supergraph CDN on a cooperative single-task loop
///
/// Exactly one fetch is outstanding at a time: the next tick is scheduled
/// only after the current attempt's outcome has been handled.
pub struct SupergraphPoller<T> {
    fetcher: SupergraphFetcher<T>,
    interval: Duration,
}

impl<T: CdnTransport + 'static> SupergraphPoller<T> {
    /// Create a poller from a registry config and a transport
    pub fn from_config(config: &RegistryConfig, transport: T) -> Self {
        Self {
            fetcher: SupergraphFetcher::from_config(config, transport),
            interval: config.poll_interval,
        }
    }

    /// Create a poller around an existing fetcher
    pub fn new(fetcher: SupergraphFetcher<T>, interval: Duration) -> Self {
        Self { fetcher, interval }
    }

    /// Perform the initial fetch and start the recurring tick loop
    ///
    /// The first fetch is awaited so the caller always receives a usable
    /// document; its failure propagates and nothing is spawned.
    pub async fn initialize<S: SchemaSubscriber>(
        mut self,
        subscriber: S,
    ) -> Result<PollSession, FetchError> {
        let initial = self.fetcher.fetch().await?;

        let token = CancellationToken::new();
        let tick_token = token.clone();
        let interval = self.interval;
        let mut fetcher = self.fetcher;

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = tick_token.cancelled() => break,
                    _ = tokio::time::sleep(interval) => {}
                }

                // The fetch is not raced against cancellation: a tick that
                // has started always runs to completion (at-least-once).
                match fetcher.fetch().await {
                    Ok(snapshot) => {
                        if !snapshot.supergraph_sdl.is_empty() {
                            subscriber.schema_updated(&snapshot.supergraph_sdl);
                        }
                    }
                    Err(error) => {
                        tracing::warn!(error = %error, "failed to update supergraph");
                    }
                }
            }

            tracing::debug!("supergraph polling stopped");
        });

        Ok(PollSession {
            initial,
            token,
            task,
        })
    }
}

/// Handle to a running poll loop
///
/// Dropping the session cancels the pending timer, same as `cleanup`.
#[derive(Debug)]
pub struct PollSession {
    initial: Snapshot,
    token: CancellationToken,
    task: tokio::task::JoinHandle<()>,
}

impl PollSession {
    /// Snapshot returned by the initial fetch
    pub fn initial_snapshot(&self) -> &Snapshot {
        &self.initial
    }

    /// Document returned by the initial fetch
    pub fn supergraph_sdl(&self) -> &str {
        &self.initial.supergraph_sdl
    }

    /// Cancel the pending timer
    ///
    /// A fetch already in flight is not aborted; its outcome is still
    /// delivered to the subscriber before the loop exits.
    pub fn cleanup(&self) {
        self.token.cancel();
    }

    /// Whether the poll loop has exited
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PollSession {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
#[path = "poller_test.rs"]
mod poller_test;
