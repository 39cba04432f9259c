//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Router could not be built from a valid configuration
    #[error("Failed to build router: {message}")]
    RouterBuild { message: String },

    /// One or more sinks failed for a routed record
    #[error("{failed} sink(s) failed:\n{message}")]
    Dispatch { failed: usize, message: String },
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn router_build(message: impl Into<String>) -> Self {
        Self::RouterBuild {
            message: message.into(),
        }
    }

    /// One bullet per failed sink, in dispatch order
    pub fn dispatch(err: router::AggregateEmitError) -> Self {
        let errors = err.into_errors();
        Self::Dispatch {
            failed: errors.len(),
            message: errors
                .iter()
                .map(|e| format!("  - {e}"))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use router::{AggregateEmitError, SinkError};

    #[test]
    fn test_dispatch_error_lists_sinks() {
        let agg = AggregateEmitError::from_errors(vec![
            SinkError::write("a", "disk full"),
            SinkError::write("b", "timeout"),
        ])
        .unwrap();

        let err = CliError::dispatch(agg);
        let text = err.to_string();
        assert_eq!(
            text,
            "2 sink(s) failed:\n  - sink 'a' write error: disk full\n  - sink 'b' write error: timeout"
        );
    }
}
