use serde::{Deserialize, Serialize};

/// Listener configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    /// Largest text frame accepted from a client.
    pub max_message_bytes: usize,
    /// Frames buffered per client before a slow reader starts losing them.
    pub channel_capacity: usize,
    pub enable_tls: bool,
    pub pkcs12_path: Option<String>,
    pub pkcs12_password: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_address: "127.0.0.1".to_string(),
            port: 8787,
            max_message_bytes: 64 * 1024,
            channel_capacity: 256,
            enable_tls: false,
            pkcs12_path: None,
            pkcs12_password: None,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}
