use crate::config::{LoggingConfig, ServerConfig};
use config_loader::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Relay configuration, read from JSON
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

impl RelayConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        config_loader::load_json(path)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
