//! Peerchat relay
//!
//! A WebSocket broadcast hub. Every text frame a client sends is forwarded
//! to every connected client, the sender included. The relay never looks
//! inside frames; addressing is the clients' business.

pub mod config;
pub mod error;
pub mod server;
pub mod tls;

pub use config::RelayConfig;
pub use error::RelayError;
pub use server::RelayServer;
