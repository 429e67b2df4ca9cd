use super::error::TlsError;
use native_tls::Identity;
use tokio_native_tls::TlsAcceptor;

/// Builds an async TLS acceptor from a PKCS#12 bundle.
pub fn load_tls_acceptor(pkcs12_path: &str, password: &str) -> Result<TlsAcceptor, TlsError> {
    let identity_data = std::fs::read(pkcs12_path)
        .map_err(|e| TlsError::InvalidCertificate(format!("Cannot open {}: {}", pkcs12_path, e)))?;

    if identity_data.is_empty() {
        return Err(TlsError::InvalidCertificate(
            "Certificate file is empty".to_string(),
        ));
    }

    let identity = Identity::from_pkcs12(&identity_data, password)
        .map_err(|e| TlsError::InvalidCertificate(format!("Invalid PKCS#12 format: {}", e)))?;

    let acceptor = native_tls::TlsAcceptor::new(identity)?;
    Ok(TlsAcceptor::from(acceptor))
}
