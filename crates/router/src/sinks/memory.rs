//! MemorySink - captures records in memory, with optional fault injection

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use contracts::{Attr, Level, LogRecord, LogSink, SharedSink, SinkError};

/// A record as seen by a [`MemorySink`], with derived context applied
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedRecord {
    /// Name of the capturing sink
    pub sink: String,
    pub level: Level,
    pub message: String,
    /// Scope path active when the record was emitted, outermost first
    pub scopes: Vec<String>,
    /// Fixed attributes followed by the record's own attributes
    pub attrs: Vec<Attr>,
}

/// How the sink behaves on `emit`
#[derive(Debug, Clone, Default)]
pub enum FailureMode {
    #[default]
    None,
    /// Return [`SinkError::Write`] with the message
    Fail(String),
    /// Panic with the message
    Panic(String),
}

/// Sink that stores every accepted record
///
/// Clones and derived sinks share one store, so a test can keep a clone and
/// inspect what the router delivered.
#[derive(Debug, Clone)]
pub struct MemorySink {
    name: String,
    min_level: Level,
    failure: FailureMode,
    store: Arc<Mutex<Vec<CapturedRecord>>>,
    enabled_calls: Arc<AtomicUsize>,
    attrs: Vec<Attr>,
    scopes: Vec<String>,
}

impl MemorySink {
    /// Create a sink accepting every level
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            min_level: Level::Trace,
            failure: FailureMode::None,
            store: Arc::new(Mutex::new(Vec::new())),
            enabled_calls: Arc::new(AtomicUsize::new(0)),
            attrs: Vec::new(),
            scopes: Vec::new(),
        }
    }

    /// Only accept records at or above `level`
    pub fn with_min_level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }

    /// Fail every emission with `message`
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = FailureMode::Fail(message.into());
        self
    }

    /// Panic on every emission with `message`
    pub fn panicking(mut self, message: impl Into<String>) -> Self {
        self.failure = FailureMode::Panic(message.into());
        self
    }

    /// Shared handle to this sink (store is shared)
    pub fn shared(&self) -> SharedSink {
        Arc::new(self.clone())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<CapturedRecord>> {
        // A panicking emit never holds the lock, so poisoning is recoverable.
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Captured records, oldest first
    pub fn records(&self) -> Vec<CapturedRecord> {
        self.lock().clone()
    }

    /// Captured messages, oldest first
    pub fn messages(&self) -> Vec<String> {
        self.lock().iter().map(|r| r.message.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Number of `enabled` calls across all clones
    pub fn enabled_calls(&self) -> usize {
        self.enabled_calls.load(Ordering::Relaxed)
    }
}

impl LogSink for MemorySink {
    fn name(&self) -> &str {
        &self.name
    }

    fn enabled(&self, level: Level) -> bool {
        self.enabled_calls.fetch_add(1, Ordering::Relaxed);
        level >= self.min_level
    }

    fn emit(&self, record: LogRecord) -> Result<(), SinkError> {
        match &self.failure {
            FailureMode::None => {}
            FailureMode::Fail(message) => return Err(SinkError::write(&self.name, message)),
            FailureMode::Panic(message) => panic!("{message}"),
        }

        let mut attrs = self.attrs.clone();
        attrs.extend(record.attrs);
        self.lock().push(CapturedRecord {
            sink: self.name.clone(),
            level: record.level,
            message: record.message,
            scopes: self.scopes.clone(),
            attrs,
        });
        Ok(())
    }

    fn with_attrs(&self, attrs: Vec<Attr>) -> SharedSink {
        let mut next = self.clone();
        next.attrs.extend(attrs);
        Arc::new(next)
    }

    fn with_scope(&self, name: &str) -> SharedSink {
        let mut next = self.clone();
        if !name.is_empty() {
            next.scopes.push(name.to_string());
        }
        Arc::new(next)
    }
}
