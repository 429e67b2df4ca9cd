//! Error types for logging operations.

use std::io;

/// Result type for logging operations.
pub type Result<T> = std::result::Result<T, LoggingError>;

/// Errors that can occur while setting up a logger.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// The log file could not be opened or created.
    #[error("cannot open log file: {0}")]
    Io(#[from] io::Error),

    /// A log level name was not recognised.
    #[error("unknown log level '{0}'")]
    UnknownLevel(String),
}
