//! LogSink trait - router output interface
//!
//! Defines the abstract capability every destination implements.

use std::sync::Arc;

use crate::{Attr, Level, LogRecord, SinkError};

/// Shared, immutable handle to a sink
pub type SharedSink = Arc<dyn LogSink>;

/// Log destination
///
/// Sinks are value-like: `with_attrs` and `with_scope` return a new sink and
/// leave the receiver untouched. Implementations must be safe to call from
/// several threads at once.
pub trait LogSink: Send + Sync {
    /// Sink name (used for error attribution/metrics)
    fn name(&self) -> &str;

    /// Whether a record at `level` would be accepted
    fn enabled(&self, level: Level) -> bool;

    /// Write one record
    ///
    /// # Errors
    /// Returns the write failure (should name the sink)
    fn emit(&self, record: LogRecord) -> Result<(), SinkError>;

    /// Derive a sink that attaches `attrs` to every future record
    fn with_attrs(&self, attrs: Vec<Attr>) -> SharedSink;

    /// Derive a sink whose future output is nested under `name`
    fn with_scope(&self, name: &str) -> SharedSink;
}
