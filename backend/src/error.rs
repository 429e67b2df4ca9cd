use crate::tls::TlsError;
use std::io;

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Tls(#[from] TlsError),
    #[error("configuration error: {0}")]
    Config(#[from] config_loader::ConfigError),
}
