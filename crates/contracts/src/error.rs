//! Layered error definitions
//!
//! Categorized by source: config / sink

use thiserror::Error;

/// Configuration and general contract errors
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Failure of a single sink's emission
#[derive(Debug, Error)]
pub enum SinkError {
    /// Underlying writer failed
    #[error("sink '{sink_name}' io error: {source}")]
    Io {
        sink_name: String,
        #[source]
        source: std::io::Error,
    },

    /// Record could not be encoded
    #[error("sink '{sink_name}' encode error: {message}")]
    Encode { sink_name: String, message: String },

    /// Sink rejected or could not complete the write
    #[error("sink '{sink_name}' write error: {message}")]
    Write { sink_name: String, message: String },

    /// Sink panicked; caught at the dispatch fault boundary
    #[error("sink '{sink_name}' panicked: {message}")]
    Panicked { sink_name: String, message: String },

    /// Nested sink (e.g. a router) reported its own failure
    #[error("sink '{sink_name}' failed: {source}")]
    Nested {
        sink_name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl SinkError {
    /// Name of the sink that failed
    pub fn sink_name(&self) -> &str {
        match self {
            Self::Io { sink_name, .. }
            | Self::Encode { sink_name, .. }
            | Self::Write { sink_name, .. }
            | Self::Panicked { sink_name, .. }
            | Self::Nested { sink_name, .. } => sink_name,
        }
    }

    /// Whether the failure came from a caught panic
    pub fn is_panic(&self) -> bool {
        matches!(self, Self::Panicked { .. })
    }

    /// Create io error
    pub fn io(sink_name: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            sink_name: sink_name.into(),
            source,
        }
    }

    /// Create encode error
    pub fn encode(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Encode {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }

    /// Create sink write error
    pub fn write(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Write {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }

    /// Create panic error
    pub fn panicked(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Panicked {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }

    /// Wrap a nested failure
    pub fn nested(
        sink_name: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Nested {
            sink_name: sink_name.into(),
            source: Box::new(source),
        }
    }
}
