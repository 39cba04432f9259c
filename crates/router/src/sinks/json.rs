//! JsonSink - writes one JSON object per line to a stream or file

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use contracts::{Attr, Level, LogRecord, LogSink, SharedSink, SinkError};
use tracing::{debug, instrument};

use super::layout::JsonLayout;

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// Configuration for a file-backed JsonSink
#[derive(Debug, Clone)]
pub struct FileSinkConfig {
    /// Output file (appended to)
    pub path: PathBuf,
}

impl FileSinkConfig {
    /// Create config from params map
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, String> {
        let path = params
            .get("path")
            .map(PathBuf::from)
            .ok_or_else(|| "missing 'path' parameter".to_string())?;

        Ok(Self { path })
    }
}

/// Sink that encodes records as JSON lines
///
/// Sinks derived through `with_attrs` / `with_scope` share the writer, so
/// lines from related sinks never interleave mid-line.
#[derive(Clone)]
pub struct JsonSink {
    name: String,
    min_level: Level,
    writer: SharedWriter,
    layout: JsonLayout,
}

impl std::fmt::Debug for JsonSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonSink")
            .field("name", &self.name)
            .field("min_level", &self.min_level)
            .field("layout", &self.layout)
            .finish()
    }
}

impl JsonSink {
    /// Create a sink over any writer
    pub fn new<W>(name: impl Into<String>, writer: W, min_level: Level) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            name: name.into(),
            min_level,
            writer: Arc::new(Mutex::new(Box::new(writer))),
            layout: JsonLayout::new(),
        }
    }

    /// Sink writing to stdout
    pub fn stdout(name: impl Into<String>, min_level: Level) -> Self {
        Self::new(name, io::stdout(), min_level)
    }

    /// Sink writing to stderr
    pub fn stderr(name: impl Into<String>, min_level: Level) -> Self {
        Self::new(name, io::stderr(), min_level)
    }

    /// Sink appending to a file; parent directories are created
    #[instrument(name = "json_sink_open_file", skip(name, config), fields(path = %config.path.display()))]
    pub fn file(
        name: impl Into<String>,
        config: &FileSinkConfig,
        min_level: Level,
    ) -> io::Result<Self> {
        if let Some(parent) = config.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.path)?;
        debug!("Opened log file");
        Ok(Self::new(name, file, min_level))
    }

    /// Create a file sink from params map (for factory)
    pub fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
        min_level: Level,
    ) -> io::Result<Self> {
        let config = FileSinkConfig::from_params(params)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        Self::file(name, &config, min_level)
    }

    /// Open a file sink at `path`
    pub fn open(name: impl Into<String>, path: &Path, min_level: Level) -> io::Result<Self> {
        let config = FileSinkConfig {
            path: path.to_path_buf(),
        };
        Self::file(name, &config, min_level)
    }

    pub fn shared(&self) -> SharedSink {
        Arc::new(self.clone())
    }

    /// Lock the writer, recovering from a panic in an earlier write
    fn lock_writer(&self) -> MutexGuard<'_, Box<dyn Write + Send>> {
        self.writer.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn write_line(&self, line: &[u8]) -> Result<(), SinkError> {
        let mut writer = self.lock_writer();
        writer
            .write_all(line)
            .map_err(|e| SinkError::io(&self.name, e))?;
        writer.flush().map_err(|e| SinkError::io(&self.name, e))
    }
}

impl LogSink for JsonSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn enabled(&self, level: Level) -> bool {
        level >= self.min_level
    }

    fn emit(&self, record: LogRecord) -> Result<(), SinkError> {
        let line = self
            .layout
            .encode_line(&record)
            .map_err(|e| SinkError::encode(&self.name, e.to_string()))?;
        self.write_line(&line)
    }

    fn with_attrs(&self, attrs: Vec<Attr>) -> SharedSink {
        Arc::new(Self {
            layout: self.layout.with_attrs(attrs),
            ..self.clone()
        })
    }

    fn with_scope(&self, name: &str) -> SharedSink {
        Arc::new(Self {
            layout: self.layout.with_scope(name),
            ..self.clone()
        })
    }
}

/// Cloneable in-memory writer; all clones append to the same buffer
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer contents as (lossy) UTF-8
    pub fn contents(&self) -> String {
        let buf = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Non-empty lines written so far
    pub fn lines(&self) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut inner = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        inner.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
