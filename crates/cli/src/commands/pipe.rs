//! `pipe` command implementation.

use std::io::{self, BufRead};
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use contracts::{Attr, Level, LogRecord, RouteClass, Value};
use observability::DispatchStats;
use router::MultiTargetRouter;
use serde_json::{Map, Value as JsonValue};
use tracing::{debug, info, warn};

use super::build_router;
use crate::cli::PipeArgs;
use crate::error::CliError;

/// Execute the `pipe` command
pub fn run_pipe(args: &PipeArgs) -> Result<()> {
    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
    }

    let router = build_router(&args.config)?;

    let stdin = io::stdin();
    let stats = route_lines(&router, stdin.lock(), args.default_level, args.fail_fast)?;

    eprintln!("{stats}");

    if stats.failed_records > 0 {
        anyhow::bail!(
            "{} of {} records had sink failures",
            stats.failed_records,
            stats.total_records
        );
    }
    Ok(())
}

/// Route every non-blank line of `reader`
///
/// With `fail_fast`, the first aggregate failure is returned as an error;
/// otherwise failures are counted and routing continues.
pub fn route_lines<R: BufRead>(
    router: &MultiTargetRouter,
    reader: R,
    default_level: Level,
    fail_fast: bool,
) -> Result<DispatchStats> {
    let mut stats = DispatchStats::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read input line")?;
        if line.trim().is_empty() {
            continue;
        }

        let record = parse_line(&line, default_level);
        let class = RouteClass::of(record.level);
        let start = Instant::now();
        let result = router.handle(&record);
        let latency_us = start.elapsed().as_secs_f64() * 1_000_000.0;

        match result {
            Ok(()) => stats.update(class, &[], latency_us),
            Err(e) => {
                warn!(line = index + 1, failed = e.len(), "Record had sink failures");
                stats.update(class, &e.sink_names(), latency_us);
                if fail_fast {
                    return Err(CliError::dispatch(e).into());
                }
            }
        }
    }

    info!(records = stats.total_records, "Input exhausted");
    Ok(stats)
}

/// Turn one input line into a record
///
/// A JSON object supplies `level`, `msg` (or `message`), an optional RFC 3339
/// `time`, and attributes from every other key. Anything else is plain text
/// at `default_level`.
pub fn parse_line(line: &str, default_level: Level) -> LogRecord {
    match serde_json::from_str::<JsonValue>(line) {
        Ok(JsonValue::Object(map)) => record_from_object(map, default_level),
        _ => LogRecord::new(default_level, line.trim_end()),
    }
}

fn record_from_object(mut map: Map<String, JsonValue>, default_level: Level) -> LogRecord {
    let level = match map.remove("level") {
        Some(JsonValue::String(s)) => s.parse().unwrap_or_else(|_| {
            debug!(level = %s, "Unknown level, using default");
            default_level
        }),
        _ => default_level,
    };

    let message = match map.remove("msg").or_else(|| map.remove("message")) {
        Some(JsonValue::String(s)) => s,
        Some(other) => other.to_string(),
        None => String::new(),
    };

    let time = match map.remove("time") {
        Some(JsonValue::String(s)) => DateTime::parse_from_rfc3339(&s)
            .map(|t| t.with_timezone(&Utc))
            .ok(),
        _ => None,
    };

    let record = match time {
        Some(time) => LogRecord::at(time, level, message),
        None => LogRecord::new(level, message),
    };
    record.with_attrs(map.into_iter().map(|(key, value)| json_attr(key, value)))
}

fn json_attr(key: String, value: JsonValue) -> Attr {
    match value {
        JsonValue::Object(map) => {
            Attr::group(key, map.into_iter().map(|(k, v)| json_attr(k, v)))
        }
        other => Attr::new(key, json_scalar(other)),
    }
}

fn json_scalar(value: JsonValue) -> Value {
    match value {
        JsonValue::Bool(b) => Value::Bool(b),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else if let Some(u) = n.as_u64() {
                Value::Uint(u)
            } else {
                Value::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        JsonValue::String(s) => Value::String(s),
        other => Value::String(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use router::{MemorySink, RouterBuilder};
    use std::io::Cursor;

    #[test]
    fn test_parse_plain_line() {
        let record = parse_line("service started", Level::Warn);
        assert_eq!(record.level, Level::Warn);
        assert_eq!(record.message, "service started");
        assert!(record.attrs.is_empty());
    }

    #[test]
    fn test_parse_json_line() {
        let record = parse_line(
            r#"{"level":"error","msg":"boom","code":7,"ok":false,"http":{"status":503}}"#,
            Level::Info,
        );
        assert_eq!(record.level, Level::Error);
        assert_eq!(record.message, "boom");
        assert_eq!(record.attrs.len(), 3);
        assert!(record
            .attrs
            .iter()
            .any(|a| a.key == "code" && a.value == Value::Int(7)));
        assert!(record
            .attrs
            .iter()
            .any(|a| a.key == "http" && matches!(a.value, Value::Group(ref g) if g.len() == 1)));
    }

    #[test]
    fn test_parse_json_line_with_time_and_bad_level() {
        let record = parse_line(
            r#"{"level":"loud","message":"m","time":"2024-05-01T12:00:00Z"}"#,
            Level::Debug,
        );
        assert_eq!(record.level, Level::Debug);
        assert_eq!(record.message, "m");
        assert_eq!(record.time.to_rfc3339(), "2024-05-01T12:00:00+00:00");
    }

    #[test]
    fn test_json_array_is_plain_text() {
        let record = parse_line("[1,2,3]", Level::Info);
        assert_eq!(record.message, "[1,2,3]");
    }

    #[test]
    fn test_route_lines_counts_classes() {
        let standard = MemorySink::new("standard");
        let error = MemorySink::new("error");
        let router = RouterBuilder::new()
            .standard_sink(standard.shared())
            .error_sink(error.shared())
            .build();

        let input = "plain info\n\n{\"level\":\"error\",\"msg\":\"bad\"}\n{\"level\":\"warn\",\"msg\":\"meh\"}\n";
        let stats = route_lines(&router, Cursor::new(input), Level::Info, false).unwrap();

        assert_eq!(stats.total_records, 3);
        assert_eq!(stats.standard_records, 2);
        assert_eq!(stats.error_records, 1);
        assert_eq!(standard.messages(), vec!["plain info", "meh"]);
        assert_eq!(error.messages(), vec!["bad"]);
    }

    #[test]
    fn test_route_lines_records_failures() {
        let broken = MemorySink::new("alerts").failing("unreachable");
        let router = RouterBuilder::new().error_sink(broken.shared()).build();

        let input = "{\"level\":\"error\",\"msg\":\"a\"}\n{\"level\":\"fatal\",\"msg\":\"b\"}\n";
        let stats = route_lines(&router, Cursor::new(input), Level::Info, false).unwrap();
        assert_eq!(stats.failed_records, 2);
        assert_eq!(stats.failures_by_sink.get("alerts"), Some(&2));

        let err = route_lines(&router, Cursor::new(input), Level::Info, true).unwrap_err();
        assert!(err.to_string().contains("unreachable"));
    }
}
