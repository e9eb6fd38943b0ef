use std::io;

use thiserror::Error;

/// Library-wide error type for preflight operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The app spec document could not be read.
    #[error("Failed to read {path}: {source}")]
    ReadInput {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The app spec document is not valid structured data.
    #[error("Failed to parse app spec: {details}")]
    Parse { details: String, line: Option<usize>, column: Option<usize> },

    /// Configuration or environment issue.
    #[error("{0}")]
    Configuration(String),

    /// Settings file could not be decoded.
    #[error("Invalid settings file {path}: {details}")]
    Settings { path: String, details: String },

    /// External process could not be driven.
    #[error("Process error running '{command}': {details}")]
    Process { command: String, details: String },

    /// Report serialization failed.
    #[error("Failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }

    pub(crate) fn from_yaml(err: serde_yaml::Error) -> Self {
        let location = err.location();
        AppError::Parse {
            details: err.to_string(),
            line: location.as_ref().map(|loc| loc.line()),
            column: location.as_ref().map(|loc| loc.column()),
        }
    }
}
