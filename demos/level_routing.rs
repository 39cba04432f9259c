//! Level Routing Example
//!
//! Routes records to stdout or stderr by severity, then adds stdout to the
//! error group so error records show up on both streams.
//!
//! Run with: cargo run --bin level_routing

use contracts::{Attr, Level, LogRecord};
use router::{JsonSink, RouterBuilder};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Router diagnostics (failed sinks) on stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::WARN)
        .init();

    let stdout = JsonSink::stdout("stdout", Level::Debug).shared();
    let stderr = JsonSink::stderr("stderr", Level::Info).shared();

    // ==== Split: standard -> stdout, error -> stderr ====
    let split = RouterBuilder::new()
        .name("split")
        .standard_sink(stdout.clone())
        .error_sink(stderr.clone())
        .build()
        .with_attrs(&[Attr::new("demo", "split")]);

    split.handle(&LogRecord::new(Level::Info, "info message").with_attr("key", "value"))?;
    split.handle(&LogRecord::new(Level::Warn, "warn message"))?;
    split.handle(&LogRecord::new(Level::Error, "error message").with_attr("error", "disk full"))?;

    // ==== Overlap: standard -> stdout, error -> stdout + stderr ====
    let overlap = RouterBuilder::new()
        .name("overlap")
        .standard_sink(stdout.clone())
        .error_sinks([stdout, stderr])
        .build()
        .with_scope("example-2");

    overlap.handle(&LogRecord::new(Level::Debug, "debug message"))?;
    overlap.handle(&LogRecord::new(Level::Fatal, "fatal message").with_attr("code", 2))?;

    let snapshot = overlap.metrics_snapshot();
    tracing::warn!(
        handled = snapshot.handled_count,
        delivered = snapshot.delivered_count,
        "Overlap router finished"
    );

    Ok(())
}
