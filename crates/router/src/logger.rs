//! Logger - record-building front-end over any sink

use contracts::{Attr, Level, LogRecord, LogSink, SharedSink, SinkError};
use tracing::warn;

use crate::router::MultiTargetRouter;

/// Convenience front-end that stamps records and hands them to a sink
///
/// Records are only built when the sink is enabled for the level.
#[derive(Clone)]
pub struct Logger {
    sink: SharedSink,
}

impl Logger {
    pub fn new(sink: SharedSink) -> Self {
        Self { sink }
    }

    pub fn from_router(router: MultiTargetRouter) -> Self {
        Self::new(router.into_shared())
    }

    pub fn sink(&self) -> &SharedSink {
        &self.sink
    }

    pub fn enabled(&self, level: Level) -> bool {
        self.sink.enabled(level)
    }

    /// Build and emit a record, returning the sink's result
    ///
    /// # Errors
    /// Returns the sink failure; a disabled level is `Ok`
    pub fn try_log(
        &self,
        level: Level,
        message: impl Into<String>,
        attrs: &[Attr],
    ) -> Result<(), SinkError> {
        if !self.sink.enabled(level) {
            return Ok(());
        }
        let record = LogRecord::new(level, message).with_attrs(attrs.iter().cloned());
        self.sink.emit(record)
    }

    /// Best-effort logging: failures are reported through tracing only
    pub fn log(&self, level: Level, message: impl Into<String>, attrs: &[Attr]) {
        if let Err(e) = self.try_log(level, message, attrs) {
            warn!(sink = %self.sink.name(), error = %e, "Record not fully delivered");
        }
    }

    pub fn trace(&self, message: impl Into<String>, attrs: &[Attr]) {
        self.log(Level::Trace, message, attrs);
    }

    pub fn debug(&self, message: impl Into<String>, attrs: &[Attr]) {
        self.log(Level::Debug, message, attrs);
    }

    pub fn info(&self, message: impl Into<String>, attrs: &[Attr]) {
        self.log(Level::Info, message, attrs);
    }

    pub fn warn(&self, message: impl Into<String>, attrs: &[Attr]) {
        self.log(Level::Warn, message, attrs);
    }

    pub fn error(&self, message: impl Into<String>, attrs: &[Attr]) {
        self.log(Level::Error, message, attrs);
    }

    pub fn fatal(&self, message: impl Into<String>, attrs: &[Attr]) {
        self.log(Level::Fatal, message, attrs);
    }

    /// Logger whose records all carry `attrs`
    pub fn with_attrs(&self, attrs: &[Attr]) -> Self {
        Self::new(self.sink.with_attrs(attrs.to_vec()))
    }

    /// Logger whose records are nested under `name`
    pub fn with_scope(&self, name: &str) -> Self {
        if name.is_empty() {
            return self.clone();
        }
        Self::new(self.sink.with_scope(name))
    }
}
