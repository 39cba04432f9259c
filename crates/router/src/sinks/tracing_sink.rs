//! TracingSink - re-emits records as tracing events

use std::sync::Arc;

use contracts::{Attr, Level, LogRecord, LogSink, SharedSink, SinkError};

/// Sink that forwards records into the active tracing subscriber
///
/// `Fatal` maps to `ERROR`. Attributes are flattened to `scope.key=value`.
#[derive(Debug, Clone)]
pub struct TracingSink {
    name: String,
    min_level: Level,
    scopes: Vec<String>,
    attrs: Vec<String>,
}

impl TracingSink {
    /// Create a new TracingSink with the given name
    pub fn new(name: impl Into<String>, min_level: Level) -> Self {
        Self {
            name: name.into(),
            min_level,
            scopes: Vec::new(),
            attrs: Vec::new(),
        }
    }

    pub fn shared(&self) -> SharedSink {
        Arc::new(self.clone())
    }

    fn qualify(&self, attr: &Attr) -> String {
        if self.scopes.is_empty() {
            attr.to_string()
        } else {
            format!("{}.{}", self.scopes.join("."), attr)
        }
    }

    /// Copy with `attrs` rendered under the current scope path
    fn tagged(&self, attrs: &[Attr]) -> Self {
        let mut next = self.clone();
        next.attrs.extend(attrs.iter().map(|a| self.qualify(a)));
        next
    }

    /// Copy with one more scope level; an empty name changes nothing
    fn scoped(&self, name: &str) -> Self {
        let mut next = self.clone();
        if !name.is_empty() {
            next.scopes.push(name.to_string());
        }
        next
    }

    /// Fixed attributes followed by the record's, space separated
    fn render_fields(&self, record: &LogRecord) -> String {
        self.attrs
            .iter()
            .cloned()
            .chain(record.attrs.iter().map(|a| self.qualify(a)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl LogSink for TracingSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn enabled(&self, level: Level) -> bool {
        level >= self.min_level
    }

    fn emit(&self, record: LogRecord) -> Result<(), SinkError> {
        let fields = self.render_fields(&record);
        let sink = self.name.as_str();
        let msg = record.message.as_str();
        match record.level {
            Level::Trace => tracing::trace!(sink, fields = %fields, "{msg}"),
            Level::Debug => tracing::debug!(sink, fields = %fields, "{msg}"),
            Level::Info => tracing::info!(sink, fields = %fields, "{msg}"),
            Level::Warn => tracing::warn!(sink, fields = %fields, "{msg}"),
            Level::Error | Level::Fatal => {
                tracing::error!(sink, severity = %record.level, fields = %fields, "{msg}")
            }
        }
        Ok(())
    }

    fn with_attrs(&self, attrs: Vec<Attr>) -> SharedSink {
        Arc::new(self.tagged(&attrs))
    }

    fn with_scope(&self, name: &str) -> SharedSink {
        Arc::new(self.scoped(name))
    }
}
