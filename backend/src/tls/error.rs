use std::io;

/// TLS configuration error
#[derive(Debug, thiserror::Error)]
pub enum TlsError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid certificate: {0}")]
    InvalidCertificate(String),
    #[error("native TLS error: {0}")]
    NativeTls(#[from] native_tls::Error),
    #[error("TLS enabled but pkcs12_path is not set")]
    MissingCertificate,
}
