//! Router error types

use contracts::SinkError;
use thiserror::Error;

/// All sink failures collected from one `handle` call, in sink order
#[derive(Debug, Error)]
#[error("{}", join_errors(.errors))]
pub struct AggregateEmitError {
    errors: Vec<SinkError>,
}

fn join_errors(errors: &[SinkError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

impl AggregateEmitError {
    /// Wrap collected errors; `None` when nothing failed
    pub fn from_errors(errors: Vec<SinkError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self { errors })
        }
    }

    /// Constituent errors in sink iteration order
    pub fn errors(&self) -> &[SinkError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Names of the failed sinks, in order
    pub fn sink_names(&self) -> Vec<&str> {
        self.errors.iter().map(SinkError::sink_name).collect()
    }

    pub fn into_errors(self) -> Vec<SinkError> {
        self.errors
    }
}

/// Router construction errors
#[derive(Debug, Error)]
pub enum RouterError {
    /// Sink creation error
    #[error("failed to create sink '{name}': {message}")]
    SinkCreation { name: String, message: String },

    /// Route references a sink that is not defined
    #[error("route '{route}' references unknown sink '{name}'")]
    UnknownSink { route: String, name: String },

    /// Contract error (config etc.)
    #[error("contract error: {0}")]
    Contract(#[from] contracts::ContractError),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl RouterError {
    /// Create a sink creation error
    pub fn sink_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkCreation {
            name: name.into(),
            message: message.into(),
        }
    }
}
