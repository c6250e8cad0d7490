//! Write-path metrics
//!
//! Atomic counters plus a per-destination wall-clock write timer. The timer
//! is an RAII guard: dropping it records the elapsed time, so the duration is
//! captured even when the write fails or the future is dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::serializer::Destination;

/// Per-destination write timing
#[derive(Debug, Default)]
pub struct DestinationTimes {
    /// Primary writes timed (success or failure)
    pub writes: AtomicU64,

    /// Cumulative primary write time in nanoseconds
    pub write_nanos: AtomicU64,
}

impl DestinationTimes {
    const fn new() -> Self {
        Self {
            writes: AtomicU64::new(0),
            write_nanos: AtomicU64::new(0),
        }
    }

    fn record(&self, elapsed: Duration) {
        self.writes.fetch_add(1, Ordering::Relaxed);
        self.write_nanos
            .fetch_add(elapsed.as_nanos() as u64, Ordering::Relaxed);
    }

    fn snapshot(&self) -> DestinationTimesSnapshot {
        DestinationTimesSnapshot {
            writes: self.writes.load(Ordering::Relaxed),
            write_time: Duration::from_nanos(self.write_nanos.load(Ordering::Relaxed)),
        }
    }
}

/// Point-in-time copy of per-destination timing
#[derive(Debug, Clone, Copy, Default)]
pub struct DestinationTimesSnapshot {
    pub writes: u64,
    pub write_time: Duration,
}

/// Metrics for the dual-sink batch writer
#[derive(Debug, Default)]
pub struct WriteMetrics {
    /// Timing for the operations destination
    pub operations: DestinationTimes,

    /// Timing for the operation registry destination
    pub registry: DestinationTimes,

    /// Batches accepted by the primary store
    pub batches_written: AtomicU64,

    /// Primary write failures
    pub primary_errors: AtomicU64,

    /// Mirror write failures (logged, never surfaced)
    pub mirror_errors: AtomicU64,

    /// Batches delegated to the fallback sink
    pub fallback_writes: AtomicU64,
}

impl WriteMetrics {
    /// Create metrics with all counters at zero
    pub const fn new() -> Self {
        Self {
            operations: DestinationTimes::new(),
            registry: DestinationTimes::new(),
            batches_written: AtomicU64::new(0),
            primary_errors: AtomicU64::new(0),
            mirror_errors: AtomicU64::new(0),
            fallback_writes: AtomicU64::new(0),
        }
    }

    fn times(&self, destination: Destination) -> &DestinationTimes {
        match destination {
            Destination::Operations => &self.operations,
            Destination::Registry => &self.registry,
        }
    }

    /// Start timing one primary write
    ///
    /// The elapsed time is recorded when the returned guard is dropped.
    pub fn start_timer(&self, destination: Destination) -> WriteTimer<'_> {
        WriteTimer {
            times: self.times(destination),
            started: Instant::now(),
        }
    }

    /// Record a batch accepted by the primary store
    #[inline]
    pub fn record_batch_written(&self) {
        self.batches_written.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a primary write failure
    #[inline]
    pub fn record_primary_error(&self) {
        self.primary_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a swallowed mirror write failure
    #[inline]
    pub fn record_mirror_error(&self) {
        self.mirror_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a batch delegated to the fallback sink
    #[inline]
    pub fn record_fallback_write(&self) {
        self.fallback_writes.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of all metrics
    pub fn snapshot(&self) -> WriteMetricsSnapshot {
        WriteMetricsSnapshot {
            operations: self.operations.snapshot(),
            registry: self.registry.snapshot(),
            batches_written: self.batches_written.load(Ordering::Relaxed),
            primary_errors: self.primary_errors.load(Ordering::Relaxed),
            mirror_errors: self.mirror_errors.load(Ordering::Relaxed),
            fallback_writes: self.fallback_writes.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of writer metrics
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteMetricsSnapshot {
    pub operations: DestinationTimesSnapshot,
    pub registry: DestinationTimesSnapshot,
    pub batches_written: u64,
    pub primary_errors: u64,
    pub mirror_errors: u64,
    pub fallback_writes: u64,
}

/// RAII guard timing one primary write
pub struct WriteTimer<'a> {
    times: &'a DestinationTimes,
    started: Instant,
}

impl Drop for WriteTimer<'_> {
    fn drop(&mut self) {
        self.times.record(self.started.elapsed());
    }
}

#[cfg(test)]
#[path = "metrics_test.rs"]
mod metrics_test;
