//! Router metrics collection
//!
//! Counters go through the `metrics` facade; [`DispatchStats`] aggregates
//! outcomes in memory for end-of-run summaries.

use std::collections::BTreeMap;

use contracts::RouteClass;
use metrics::{counter, histogram};

/// Result of one emission attempt against one sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkOutcome {
    Delivered,
    Failed,
    Panicked,
    /// Sink not enabled for the record's level
    Skipped,
}

impl SinkOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            SinkOutcome::Delivered => "delivered",
            SinkOutcome::Failed => "failed",
            SinkOutcome::Panicked => "panicked",
            SinkOutcome::Skipped => "skipped",
        }
    }
}

/// Record that a record was classified into `class`
pub fn record_routed(class: RouteClass) {
    counter!("slog_router_records_total", "class" => class.as_str()).increment(1);
}

/// Record one sink emission outcome
pub fn record_sink_outcome(sink_name: &str, outcome: SinkOutcome) {
    counter!(
        "slog_router_sink_emits_total",
        "sink" => sink_name.to_string(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
}

/// Record wall time of one `handle` call
pub fn record_dispatch_latency_us(class: RouteClass, latency_us: f64) {
    histogram!("slog_router_dispatch_latency_us", "class" => class.as_str()).record(latency_us);
}

/// In-memory dispatch statistics
#[derive(Debug, Clone, Default)]
pub struct DispatchStats {
    /// Records dispatched
    pub total_records: u64,

    /// Records classified standard
    pub standard_records: u64,

    /// Records classified error
    pub error_records: u64,

    /// Records for which at least one sink failed
    pub failed_records: u64,

    /// Failure count per sink
    pub failures_by_sink: BTreeMap<String, u64>,

    /// Dispatch latency (microseconds)
    pub latency_us: RunningStats,
}

impl DispatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold in one dispatch result
    pub fn update(&mut self, class: RouteClass, failed_sinks: &[&str], latency_us: f64) {
        self.total_records += 1;
        match class {
            RouteClass::Standard => self.standard_records += 1,
            RouteClass::Error => self.error_records += 1,
        }
        if !failed_sinks.is_empty() {
            self.failed_records += 1;
            for sink in failed_sinks {
                *self.failures_by_sink.entry((*sink).to_string()).or_insert(0) += 1;
            }
        }
        self.latency_us.push(latency_us);
    }

    /// Percentage of records with at least one failed sink
    pub fn failure_rate(&self) -> f64 {
        if self.total_records > 0 {
            self.failed_records as f64 / self.total_records as f64 * 100.0
        } else {
            0.0
        }
    }
}

impl std::fmt::Display for DispatchStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Dispatch Summary ===")?;
        writeln!(f, "Total records: {}", self.total_records)?;
        writeln!(f, "Standard: {}", self.standard_records)?;
        writeln!(f, "Error: {}", self.error_records)?;
        writeln!(
            f,
            "Records with failures: {} ({:.2}%)",
            self.failed_records,
            self.failure_rate()
        )?;
        writeln!(f, "Latency (us): {}", self.latency_us)?;

        if !self.failures_by_sink.is_empty() {
            writeln!(f, "Failures by sink:")?;
            for (sink, count) in &self.failures_by_sink {
                writeln!(f, "  {}: {}", sink, count)?;
            }
        }

        Ok(())
    }
}

/// Online statistics (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            self.m2 += delta * (value - self.mean);
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

impl std::fmt::Display for RunningStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.1}, max={:.1}, mean={:.1}, std={:.1} (n={})",
                self.min,
                self.max,
                self.mean(),
                self.std_dev(),
                self.count
            )
        }
    }
}
