//! Router metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Dispatch counters for a router and every router derived from it
#[derive(Debug, Default)]
pub struct RouterMetrics {
    /// Records handed to `handle`
    handled_count: AtomicU64,
    /// Successful sink emissions
    delivered_count: AtomicU64,
    /// Emissions that returned an error
    failure_count: AtomicU64,
    /// Emissions that panicked (caught)
    panic_count: AtomicU64,
    /// Sinks skipped because they were not enabled for the level
    skipped_count: AtomicU64,
    /// Records whose route group was empty
    dropped_count: AtomicU64,
}

impl RouterMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handled_count(&self) -> u64 {
        self.handled_count.load(Ordering::Relaxed)
    }

    pub fn inc_handled_count(&self) {
        self.handled_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn delivered_count(&self) -> u64 {
        self.delivered_count.load(Ordering::Relaxed)
    }

    pub fn inc_delivered_count(&self) {
        self.delivered_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    pub fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn panic_count(&self) -> u64 {
        self.panic_count.load(Ordering::Relaxed)
    }

    pub fn inc_panic_count(&self) {
        self.panic_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn skipped_count(&self) -> u64 {
        self.skipped_count.load(Ordering::Relaxed)
    }

    pub fn inc_skipped_count(&self) {
        self.skipped_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn dropped_count(&self) -> u64 {
        self.dropped_count.load(Ordering::Relaxed)
    }

    pub fn inc_dropped_count(&self) {
        self.dropped_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            handled_count: self.handled_count(),
            delivered_count: self.delivered_count(),
            failure_count: self.failure_count(),
            panic_count: self.panic_count(),
            skipped_count: self.skipped_count(),
            dropped_count: self.dropped_count(),
        }
    }
}

/// Snapshot of router metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub handled_count: u64,
    pub delivered_count: u64,
    pub failure_count: u64,
    pub panic_count: u64,
    pub skipped_count: u64,
    pub dropped_count: u64,
}
