//! MultiTargetRouter - severity split and fan-out to sinks

use std::sync::Arc;
use std::time::Instant;

use contracts::{Attr, Level, LogRecord, LogSink, RouteClass, SharedSink, SinkError};
use observability::SinkOutcome;
use tracing::{debug, warn};

use crate::error::AggregateEmitError;
use crate::fault::guarded_emit;
use crate::metrics::{MetricsSnapshot, RouterMetrics};

const DEFAULT_NAME: &str = "multi_target";

/// Routes below-error records to `standard_sinks` and error-or-above records
/// to `error_sinks`
///
/// Immutable after construction: `with_attrs` and `with_scope` build a new
/// router around freshly derived sinks. Metrics are shared with derived routers.
#[derive(Clone)]
pub struct MultiTargetRouter {
    name: String,
    standard_sinks: Vec<SharedSink>,
    error_sinks: Vec<SharedSink>,
    metrics: Arc<RouterMetrics>,
}

impl std::fmt::Debug for MultiTargetRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiTargetRouter")
            .field("name", &self.name)
            .field("standard_sinks", &sink_names(&self.standard_sinks))
            .field("error_sinks", &sink_names(&self.error_sinks))
            .finish()
    }
}

fn sink_names(sinks: &[SharedSink]) -> Vec<&str> {
    sinks.iter().map(|s| s.name()).collect()
}

impl MultiTargetRouter {
    /// Create a router; either group may be empty
    pub fn new(standard_sinks: Vec<SharedSink>, error_sinks: Vec<SharedSink>) -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            standard_sinks,
            error_sinks,
            metrics: Arc::new(RouterMetrics::new()),
        }
    }

    /// Rename the router (used when it is nested inside another router)
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Attach an existing metrics instance
    pub fn with_metrics(mut self, metrics: Arc<RouterMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn standard_sinks(&self) -> &[SharedSink] {
        &self.standard_sinks
    }

    pub fn error_sinks(&self) -> &[SharedSink] {
        &self.error_sinks
    }

    pub fn metrics(&self) -> &Arc<RouterMetrics> {
        &self.metrics
    }

    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    fn group(&self, class: RouteClass) -> &[SharedSink] {
        match class {
            RouteClass::Standard => &self.standard_sinks,
            RouteClass::Error => &self.error_sinks,
        }
    }

    /// Whether any sink in the group for `level` accepts it
    pub fn enabled(&self, level: Level) -> bool {
        self.group(RouteClass::of(level))
            .iter()
            .any(|sink| sink.enabled(level))
    }

    /// Dispatch `record` to every enabled sink of its group
    ///
    /// Every eligible sink is attempted, each with its own copy of the record.
    ///
    /// # Errors
    /// Returns all sink failures (including caught panics) in sink order
    pub fn handle(&self, record: &LogRecord) -> Result<(), AggregateEmitError> {
        let started = Instant::now();
        let class = RouteClass::of(record.level);
        let sinks = self.group(class);

        self.metrics.inc_handled_count();
        observability::record_routed(class);

        if sinks.is_empty() {
            self.metrics.inc_dropped_count();
            debug!(router = %self.name, class = %class, "No sinks for route class, record dropped");
            return Ok(());
        }

        let mut errors = Vec::new();
        for sink in sinks {
            if !sink.enabled(record.level) {
                self.metrics.inc_skipped_count();
                observability::record_sink_outcome(sink.name(), SinkOutcome::Skipped);
                continue;
            }

            match guarded_emit(sink.as_ref(), record.clone()) {
                Ok(()) => {
                    self.metrics.inc_delivered_count();
                    observability::record_sink_outcome(sink.name(), SinkOutcome::Delivered);
                }
                Err(e) => {
                    if e.is_panic() {
                        self.metrics.inc_panic_count();
                        observability::record_sink_outcome(sink.name(), SinkOutcome::Panicked);
                    } else {
                        self.metrics.inc_failure_count();
                        observability::record_sink_outcome(sink.name(), SinkOutcome::Failed);
                    }
                    warn!(
                        router = %self.name,
                        sink = %sink.name(),
                        level = %record.level,
                        error = %e,
                        "Sink emit failed"
                    );
                    errors.push(e);
                }
            }
        }

        observability::record_dispatch_latency_us(
            class,
            started.elapsed().as_secs_f64() * 1_000_000.0,
        );

        match AggregateEmitError::from_errors(errors) {
            None => Ok(()),
            Some(aggregate) => Err(aggregate),
        }
    }

    /// Derive a router whose sinks all carry `attrs`
    ///
    /// Each sink receives its own copy of the attribute list.
    pub fn with_attrs(&self, attrs: &[Attr]) -> Self {
        self.derive(|sink| sink.with_attrs(attrs.to_vec()))
    }

    /// Derive a router whose sinks all nest output under `name`
    ///
    /// An empty name returns an identical router.
    pub fn with_scope(&self, name: &str) -> Self {
        if name.is_empty() {
            return self.clone();
        }
        self.derive(|sink| sink.with_scope(name))
    }

    fn derive(&self, f: impl Fn(&SharedSink) -> SharedSink) -> Self {
        Self {
            name: self.name.clone(),
            standard_sinks: self.standard_sinks.iter().map(&f).collect(),
            error_sinks: self.error_sinks.iter().map(&f).collect(),
            metrics: Arc::clone(&self.metrics),
        }
    }

    /// Wrap into a shared sink handle
    pub fn into_shared(self) -> SharedSink {
        Arc::new(self)
    }
}

impl LogSink for MultiTargetRouter {
    fn name(&self) -> &str {
        &self.name
    }

    fn enabled(&self, level: Level) -> bool {
        MultiTargetRouter::enabled(self, level)
    }

    fn emit(&self, record: LogRecord) -> Result<(), SinkError> {
        self.handle(&record)
            .map_err(|aggregate| SinkError::nested(&self.name, aggregate))
    }

    fn with_attrs(&self, attrs: Vec<Attr>) -> SharedSink {
        Arc::new(MultiTargetRouter::with_attrs(self, &attrs))
    }

    fn with_scope(&self, name: &str) -> SharedSink {
        Arc::new(MultiTargetRouter::with_scope(self, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::MemorySink;
    use contracts::Value;

    fn record(level: Level, msg: &str) -> LogRecord {
        LogRecord::new(level, msg)
    }

    #[test]
    fn test_standard_records_reach_only_standard_sinks() {
        let a = MemorySink::new("a");
        let b = MemorySink::new("b");
        let router = MultiTargetRouter::new(vec![a.shared()], vec![b.shared()]);

        for level in [Level::Trace, Level::Debug, Level::Info, Level::Warn] {
            router.handle(&record(level, "std")).unwrap();
        }

        assert_eq!(a.len(), 4);
        assert!(b.is_empty());
    }

    #[test]
    fn test_error_records_reach_only_error_sinks() {
        let a = MemorySink::new("a");
        let b = MemorySink::new("b");
        let router = MultiTargetRouter::new(vec![a.shared()], vec![b.shared()]);

        router.handle(&record(Level::Error, "err")).unwrap();
        router.handle(&record(Level::Fatal, "fatal")).unwrap();

        assert!(a.is_empty());
        assert_eq!(b.messages(), vec!["err", "fatal"]);
    }

    #[test]
    fn test_sink_in_both_groups_receives_once_per_record() {
        let a = MemorySink::new("a");
        let b = MemorySink::new("b");
        let router = MultiTargetRouter::new(vec![a.shared()], vec![a.shared(), b.shared()]);

        router.handle(&record(Level::Error, "err")).unwrap();
        assert_eq!(a.messages(), vec!["err"]);
        assert_eq!(b.messages(), vec!["err"]);

        router.handle(&record(Level::Info, "info")).unwrap();
        assert_eq!(a.messages(), vec!["err", "info"]);
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn test_enabled_checks_applicable_group() {
        let a = MemorySink::new("a").with_min_level(Level::Info);
        let router = MultiTargetRouter::new(vec![a.shared()], vec![]);

        assert!(router.enabled(Level::Info));
        assert!(router.enabled(Level::Warn));
        assert!(!router.enabled(Level::Debug));
        // error group is empty
        assert!(!router.enabled(Level::Error));
    }

    #[test]
    fn test_enabled_short_circuits() {
        let first = MemorySink::new("first");
        let second = MemorySink::new("second").panicking("must not be consulted");
        let router = MultiTargetRouter::new(vec![first.shared(), second.shared()], vec![]);

        assert!(router.enabled(Level::Info));
        assert_eq!(first.enabled_calls(), 1);
        assert_eq!(second.enabled_calls(), 0);
    }

    #[test]
    fn test_disabled_sink_is_skipped() {
        let a = MemorySink::new("a").with_min_level(Level::Error);
        let router = MultiTargetRouter::new(vec![a.shared()], vec![]);

        router.handle(&record(Level::Warn, "quiet")).unwrap();

        assert!(a.is_empty());
        let snapshot = router.metrics_snapshot();
        assert_eq!(snapshot.skipped_count, 1);
        assert_eq!(snapshot.delivered_count, 0);
    }

    #[test]
    fn test_empty_group_drops_silently() {
        let b = MemorySink::new("b");
        let router = MultiTargetRouter::new(Vec::new(), vec![b.shared()]);

        assert!(router.handle(&record(Level::Info, "nowhere")).is_ok());
        assert!(!router.enabled(Level::Info));
        assert!(b.is_empty());
        assert_eq!(router.metrics_snapshot().dropped_count, 1);
    }

    #[test]
    fn test_failure_does_not_stop_dispatch() {
        let bad = MemorySink::new("bad").failing("disk full");
        let good = MemorySink::new("good");
        let router = MultiTargetRouter::new(vec![bad.shared(), good.shared()], vec![]);

        let err = router.handle(&record(Level::Info, "hello")).unwrap_err();

        assert_eq!(good.messages(), vec!["hello"]);
        assert_eq!(err.sink_names(), vec!["bad"]);
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn test_panic_is_contained_and_attributed() {
        let boom = MemorySink::new("boom").panicking("sink exploded");
        let after = MemorySink::new("after");
        let router = MultiTargetRouter::new(vec![], vec![boom.shared(), after.shared()]);

        let err = router.handle(&record(Level::Error, "alert")).unwrap_err();

        assert_eq!(after.messages(), vec!["alert"]);
        assert_eq!(err.len(), 1);
        assert!(err.errors()[0].is_panic());
        assert_eq!(err.errors()[0].sink_name(), "boom");
        assert!(err.to_string().contains("sink exploded"));
        assert_eq!(router.metrics_snapshot().panic_count, 1);
    }

    #[test]
    fn test_errors_keep_sink_order() {
        let first = MemorySink::new("first").failing("one");
        let ok = MemorySink::new("ok");
        let second = MemorySink::new("second").panicking("two");
        let router = MultiTargetRouter::new(
            vec![first.shared(), ok.shared(), second.shared()],
            vec![],
        );

        let err = router.handle(&record(Level::Warn, "w")).unwrap_err();

        assert_eq!(err.sink_names(), vec!["first", "second"]);
        assert_eq!(ok.len(), 1);
    }

    #[test]
    fn test_each_sink_gets_its_own_copy() {
        let a = MemorySink::new("a");
        let b = MemorySink::new("b");
        let router = MultiTargetRouter::new(vec![a.shared(), b.shared()], vec![]);

        let original = record(Level::Info, "copy").with_attr("k", "v");
        router.handle(&original).unwrap();

        assert_eq!(a.records()[0].attrs, original.attrs);
        assert_eq!(b.records()[0].attrs, original.attrs);
    }

    #[test]
    fn test_with_attrs_applies_to_both_groups() {
        let a = MemorySink::new("a");
        let b = MemorySink::new("b");
        let router = MultiTargetRouter::new(vec![a.shared()], vec![b.shared()]);

        let derived = router.with_attrs(&[Attr::new("service", "billing")]);
        derived.handle(&record(Level::Info, "i")).unwrap();
        derived.handle(&record(Level::Error, "e")).unwrap();

        for sink in [&a, &b] {
            let captured = sink.records();
            assert_eq!(captured.len(), 1);
            assert_eq!(captured[0].attrs, vec![Attr::new("service", "billing")]);
        }
    }

    #[test]
    fn test_derivation_does_not_alias() {
        let a = MemorySink::new("a");
        let router = MultiTargetRouter::new(vec![a.shared()], vec![]);

        let mut attrs = vec![Attr::new("req", 1)];
        let first = router.with_attrs(&attrs);
        attrs[0].value = Value::Int(2);
        let second = first.with_scope("inner");

        router.handle(&record(Level::Info, "root")).unwrap();
        first.handle(&record(Level::Info, "first")).unwrap();
        second.handle(&record(Level::Info, "second")).unwrap();

        let captured = a.records();
        assert!(captured[0].attrs.is_empty());
        assert!(captured[0].scopes.is_empty());
        assert_eq!(captured[1].attrs, vec![Attr::new("req", 1)]);
        assert!(captured[1].scopes.is_empty());
        assert_eq!(captured[2].attrs, vec![Attr::new("req", 1)]);
        assert_eq!(captured[2].scopes, vec!["inner".to_string()]);
    }

    #[test]
    fn test_empty_scope_is_noop() {
        let a = MemorySink::new("a");
        let router = MultiTargetRouter::new(vec![a.shared()], vec![]);

        let same = router.with_scope("");
        same.handle(&record(Level::Info, "plain")).unwrap();

        assert!(a.records()[0].scopes.is_empty());
        assert_eq!(
            sink_names(same.standard_sinks()),
            sink_names(router.standard_sinks())
        );
        assert!(Arc::ptr_eq(&same.standard_sinks()[0], &router.standard_sinks()[0]));
    }

    #[test]
    fn test_construction_and_derivation_never_emit() {
        let a = MemorySink::new("a");
        let router = MultiTargetRouter::new(vec![a.shared()], vec![a.shared()]);
        let _derived = router.with_attrs(&[Attr::new("k", "v")]).with_scope("s");

        assert!(a.is_empty());
    }

    #[test]
    fn test_nested_router_reports_nested_error() {
        let bad = MemorySink::new("bad").failing("nope");
        let inner = MultiTargetRouter::new(vec![], vec![bad.shared()]).with_name("inner");
        let outer = MultiTargetRouter::new(vec![], vec![inner.into_shared()]);

        let err = outer.handle(&record(Level::Error, "deep")).unwrap_err();

        assert_eq!(err.sink_names(), vec!["inner"]);
        assert!(err.to_string().contains("sink 'bad' write error: nope"));
    }

    #[test]
    fn test_concurrent_handle() {
        let a = MemorySink::new("a");
        let b = MemorySink::new("b");
        let router = MultiTargetRouter::new(vec![a.shared()], vec![b.shared()]);

        std::thread::scope(|s| {
            for t in 0..4 {
                let router = &router;
                s.spawn(move || {
                    for i in 0..25 {
                        let level = if i % 5 == 0 { Level::Error } else { Level::Info };
                        router
                            .handle(&record(level, &format!("t{t}-{i}")))
                            .unwrap();
                    }
                });
            }
        });

        assert_eq!(a.len(), 80);
        assert_eq!(b.len(), 20);
        assert_eq!(router.metrics_snapshot().handled_count, 100);
    }
}
