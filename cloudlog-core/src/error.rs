//! Error taxonomy for the logging pipeline.

use thiserror::Error;

/// Errors raised while rendering or configuring log output.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// A field of the event could not be rendered to JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The pipeline could not be set up (bad time pattern, facade already set, ...).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Writing a rendered line to its destination failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<log::SetLoggerError> for LoggingError {
    fn from(e: log::SetLoggerError) -> Self {
        LoggingError::Configuration(e.to_string())
    }
}
