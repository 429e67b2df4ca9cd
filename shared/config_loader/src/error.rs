use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while locating, reading or decoding a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
}
