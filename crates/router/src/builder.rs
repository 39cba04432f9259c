//! Builder for creating a MultiTargetRouter

use std::sync::Arc;

use contracts::SharedSink;

use crate::logger::Logger;
use crate::metrics::RouterMetrics;
use crate::router::MultiTargetRouter;

/// Incrementally collects sinks for both route classes
#[derive(Default)]
pub struct RouterBuilder {
    name: Option<String>,
    standard_sinks: Vec<SharedSink>,
    error_sinks: Vec<SharedSink>,
    metrics: Option<Arc<RouterMetrics>>,
}

impl RouterBuilder {
    /// Create an empty builder (both groups empty)
    pub fn new() -> Self {
        Self::default()
    }

    /// Router name used in nested error attribution
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Append one sink for below-error records
    pub fn standard_sink(mut self, sink: SharedSink) -> Self {
        self.standard_sinks.push(sink);
        self
    }

    /// Append sinks for below-error records
    pub fn standard_sinks(mut self, sinks: impl IntoIterator<Item = SharedSink>) -> Self {
        self.standard_sinks.extend(sinks);
        self
    }

    /// Append one sink for error-or-above records
    pub fn error_sink(mut self, sink: SharedSink) -> Self {
        self.error_sinks.push(sink);
        self
    }

    /// Append sinks for error-or-above records
    pub fn error_sinks(mut self, sinks: impl IntoIterator<Item = SharedSink>) -> Self {
        self.error_sinks.extend(sinks);
        self
    }

    /// Share an existing metrics instance
    pub fn metrics(mut self, metrics: Arc<RouterMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn build(self) -> MultiTargetRouter {
        let mut router = MultiTargetRouter::new(self.standard_sinks, self.error_sinks);
        if let Some(name) = self.name {
            router = router.with_name(name);
        }
        if let Some(metrics) = self.metrics {
            router = router.with_metrics(metrics);
        }
        router
    }

    /// Build and wrap in a [`Logger`]
    pub fn logger(self) -> Logger {
        Logger::new(self.build().into_shared())
    }
}
