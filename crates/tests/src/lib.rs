//! # Integration Tests
//!
//! Cross-crate and end-to-end tests.
//!
//! Covers:
//! - Contract snapshots
//! - Routing scenarios over capture sinks
//! - Config file -> router -> file sinks

#[cfg(test)]
mod contract_tests {
    use contracts::{Level, RouteClass, ERROR_THRESHOLD};

    #[test]
    fn test_threshold_partitions_levels() {
        let (standard, error): (Vec<Level>, Vec<Level>) =
            Level::ALL.iter().partition(|l| **l < ERROR_THRESHOLD);

        assert_eq!(standard, vec![Level::Trace, Level::Debug, Level::Info, Level::Warn]);
        assert_eq!(error, vec![Level::Error, Level::Fatal]);
        for level in Level::ALL {
            assert_eq!(
                RouteClass::of(level) == RouteClass::Error,
                level.is_error_class()
            );
        }
    }
}

#[cfg(test)]
mod routing_scenarios {
    use contracts::{Attr, Level, LogRecord, LogSink};
    use router::{MemorySink, MultiTargetRouter, RouterBuilder};

    fn record(level: Level) -> LogRecord {
        LogRecord::new(level, format!("{level} message"))
    }

    /// standard=[A], error=[B]
    #[test]
    fn test_split_routing() {
        let a = MemorySink::new("A");
        let b = MemorySink::new("B");
        let router = RouterBuilder::new()
            .standard_sink(a.shared())
            .error_sink(b.shared())
            .build();

        router.handle(&record(Level::Info)).unwrap();
        assert_eq!(a.len(), 1);
        assert!(b.is_empty());

        router.handle(&record(Level::Error)).unwrap();
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 1);
    }

    /// standard=[A], error=[A, B]
    #[test]
    fn test_sink_in_both_groups_gets_one_copy_per_record() {
        let a = MemorySink::new("A");
        let b = MemorySink::new("B");
        let router = MultiTargetRouter::new(vec![a.shared()], vec![a.shared(), b.shared()]);

        router.handle(&record(Level::Error)).unwrap();
        assert_eq!(a.messages(), vec!["ERROR message"]);
        assert_eq!(b.messages(), vec!["ERROR message"]);

        router.handle(&record(Level::Info)).unwrap();
        assert_eq!(a.len(), 2);
        assert_eq!(b.len(), 1);
    }

    /// standard=[], error=[B]
    #[test]
    fn test_empty_standard_group() {
        let b = MemorySink::new("B");
        let router = MultiTargetRouter::new(Vec::new(), vec![b.shared()]);

        assert!(!router.enabled(Level::Info));
        assert!(router.handle(&record(Level::Info)).is_ok());
        assert!(b.is_empty());
        assert_eq!(b.enabled_calls(), 0);
        assert_eq!(router.metrics_snapshot().dropped_count, 1);
    }

    /// standard=[A rejecting Warn], error=[B]
    #[test]
    fn test_rejecting_sink_yields_no_emissions() {
        let a = MemorySink::new("A").with_min_level(Level::Error);
        let b = MemorySink::new("B");
        let router = MultiTargetRouter::new(vec![a.shared()], vec![b.shared()]);

        assert!(!router.enabled(Level::Warn));
        assert!(router.handle(&record(Level::Warn)).is_ok());
        assert!(a.is_empty());
        assert!(b.is_empty());
        assert_eq!(router.metrics_snapshot().skipped_count, 1);
    }

    #[test]
    fn test_faults_are_isolated_and_attributed() {
        let first = MemorySink::new("first").panicking("exploded");
        let second = MemorySink::new("second").failing("refused");
        let third = MemorySink::new("third");
        let router = MultiTargetRouter::new(
            Vec::new(),
            vec![first.shared(), second.shared(), third.shared()],
        );

        let err = router.handle(&record(Level::Fatal)).unwrap_err();
        assert_eq!(third.len(), 1);
        assert_eq!(err.sink_names(), vec!["first", "second"]);
        assert!(err.errors()[0].is_panic());
        assert!(err.to_string().contains("exploded"));
        assert!(err.to_string().contains("refused"));
    }

    #[test]
    fn test_derivations_do_not_alias() {
        let a = MemorySink::new("A");
        let root = MultiTargetRouter::new(vec![a.shared()], vec![a.shared()]);
        let tagged = root.with_attrs(&[Attr::new("request", 1)]);
        let scoped = tagged.with_scope("db");
        let unchanged = scoped.with_scope("");

        root.handle(&record(Level::Info)).unwrap();
        tagged.handle(&record(Level::Info)).unwrap();
        scoped.handle(&record(Level::Error)).unwrap();
        unchanged.handle(&record(Level::Error)).unwrap();

        let captured = a.records();
        assert!(captured[0].attrs.is_empty() && captured[0].scopes.is_empty());
        assert_eq!(captured[1].attrs, vec![Attr::new("request", 1)]);
        assert!(captured[1].scopes.is_empty());
        assert_eq!(captured[2].scopes, vec!["db".to_string()]);
        assert_eq!(captured[3], captured[2].clone());
    }

    #[test]
    fn test_routers_nest() {
        let audit = MemorySink::new("audit");
        let pager = MemorySink::new("pager").failing("offline");
        let inner = MultiTargetRouter::new(vec![audit.shared()], vec![pager.shared()])
            .with_name("inner");
        let outer = MultiTargetRouter::new(vec![inner.clone().into_shared()], vec![inner.into_shared()]);

        outer.handle(&record(Level::Info)).unwrap();
        assert_eq!(audit.len(), 1);

        let err = outer.handle(&record(Level::Error)).unwrap_err();
        assert_eq!(err.sink_names(), vec!["inner"]);
        assert!(err.to_string().contains("offline"));
    }

    #[test]
    fn test_logger_over_router() {
        let a = MemorySink::new("A");
        let b = MemorySink::new("B");
        let logger = RouterBuilder::new()
            .standard_sink(a.shared())
            .error_sink(b.shared())
            .logger()
            .with_scope("svc");

        logger.info("started", &[]);
        logger.error("crashed", &[Attr::new("code", 3)]);

        assert_eq!(a.messages(), vec!["started"]);
        let crashed = &b.records()[0];
        assert_eq!(crashed.scopes, vec!["svc".to_string()]);
        assert_eq!(crashed.attrs, vec![Attr::new("code", 3)]);
        assert!(logger.sink().enabled(Level::Trace));
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::fs;
    use std::path::Path;

    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{Level, LogRecord};
    use serde_json::Value as JsonValue;

    fn read_lines(path: &Path) -> Vec<JsonValue> {
        fs::read_to_string(path)
            .unwrap_or_default()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    /// Config file -> router -> two file sinks, one shared by both groups
    #[test]
    fn test_config_to_file_sinks() {
        let dir = tempfile::tempdir().unwrap();
        let app = dir.path().join("app.jsonl");
        let alerts = dir.path().join("alerts.jsonl");

        let config = format!(
            r#"
name = "e2e"
scope = "billing"

[attrs]
host = "node-1"

[[sinks]]
name = "app"
sink_type = "file"
level = "debug"
params = {{ path = "{}" }}

[[sinks]]
name = "alerts"
sink_type = "file"
level = "error"
params = {{ path = "{}" }}

[routes]
standard = ["app"]
error = ["app", "alerts"]
"#,
            app.display(),
            alerts.display()
        );

        let blueprint = ConfigLoader::load_from_str(&config, ConfigFormat::Toml).unwrap();
        let router = router::create_router(&blueprint).unwrap();

        router.handle(&LogRecord::new(Level::Trace, "too quiet")).unwrap();
        router
            .handle(&LogRecord::new(Level::Info, "charged").with_attr("amount", 42))
            .unwrap();
        router
            .handle(&LogRecord::new(Level::Error, "card declined").with_attr("code", "E51"))
            .unwrap();

        let app_lines = read_lines(&app);
        assert_eq!(app_lines.len(), 2);
        assert_eq!(app_lines[0]["msg"], "charged");
        assert_eq!(app_lines[0]["host"], "node-1");
        assert_eq!(app_lines[0]["billing"]["amount"], 42);
        assert_eq!(app_lines[1]["level"], "ERROR");

        let alert_lines = read_lines(&alerts);
        assert_eq!(alert_lines.len(), 1);
        assert_eq!(alert_lines[0]["billing"]["code"], "E51");

        let snapshot = router.metrics_snapshot();
        assert_eq!(snapshot.handled_count, 3);
        assert_eq!(snapshot.delivered_count, 3);
        assert_eq!(snapshot.skipped_count, 1);
    }

    #[test]
    fn test_config_with_unwritable_file_fails_at_build() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"").unwrap();
        let path = blocker.join("nested.jsonl");

        let config = format!(
            r#"
[[sinks]]
name = "bad"
sink_type = "file"
params = {{ path = "{}" }}

[routes]
error = ["bad"]
"#,
            path.display()
        );

        let blueprint = ConfigLoader::load_from_str(&config, ConfigFormat::Toml).unwrap();
        let err = router::create_router(&blueprint).unwrap_err();
        assert!(err.to_string().contains("bad"), "got: {err}");
    }

    #[test]
    fn test_dispatch_stats_over_router() {
        let sink = router::MemorySink::new("flaky").failing("nope");
        let router = router::MultiTargetRouter::new(Vec::new(), vec![sink.shared()]);
        let mut stats = observability::DispatchStats::new();

        for level in [Level::Info, Level::Error, Level::Fatal] {
            let class = contracts::RouteClass::of(level);
            match router.handle(&LogRecord::new(level, "x")) {
                Ok(()) => stats.update(class, &[], 1.0),
                Err(e) => stats.update(class, &e.sink_names(), 1.0),
            }
        }

        assert_eq!(stats.total_records, 3);
        assert_eq!(stats.error_records, 2);
        assert_eq!(stats.failed_records, 2);
        assert_eq!(stats.failures_by_sink.get("flaky"), Some(&2));
    }
}
