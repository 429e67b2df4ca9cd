//! TLS termination for the relay listener.

mod acceptor;
mod error;

pub use acceptor::load_tls_acceptor;
pub use error::TlsError;
