//! Application Configuration
//!
//! Client settings: which relay to signal through, which ICE servers to
//! use, and where to log.

use config_loader::{ConfigError, find_config_file, load_config_file, parse_key_values};
use logging::LogLevel;
use session::peer::DEFAULT_ICE_SERVER;
use session::{DEFAULT_RELAY_URL, PeerOptions, RelayOptions, RuntimeConfig};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "peerchat.conf";
pub const CONFIG_ENV: &str = "PEERCHAT_CONFIG";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// WebSocket URL of the signaling relay
    pub relay_url: String,
    pub ice_servers: Vec<String>,
    /// Accept self-signed relay certificates
    pub accept_invalid_certs: bool,
    pub log_path: PathBuf,
    pub log_level: LogLevel,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            relay_url: DEFAULT_RELAY_URL.to_string(),
            ice_servers: vec![DEFAULT_ICE_SERVER.to_string()],
            accept_invalid_certs: false,
            log_path: PathBuf::from("peerchat.log"),
            log_level: LogLevel::Info,
        }
    }
}

impl AppConfig {
    /// Parses a `key=value` configuration.
    ///
    /// ```text
    /// relay_url=ws://127.0.0.1:8787
    /// ice_servers=stun:stun.l.google.com:19302, stun:stun1.l.google.com:19302
    /// accept_invalid_certs=false
    /// log_path=peerchat.log
    /// log_level=debug
    /// ```
    ///
    /// Unknown keys are skipped with a warning; bad values are errors.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        for (key, value) in parse_key_values(content)? {
            match key.as_str() {
                "relay_url" => config.relay_url = value,
                "ice_servers" => {
                    config.ice_servers = value
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(String::from)
                        .collect();
                }
                "accept_invalid_certs" => {
                    config.accept_invalid_certs = value.parse().map_err(|_| {
                        invalid(&key, &value, "expected true or false")
                    })?;
                }
                "log_path" => config.log_path = PathBuf::from(value),
                "log_level" => {
                    config.log_level = value
                        .parse()
                        .map_err(|e: logging::LoggingError| invalid(&key, &value, &e.to_string()))?;
                }
                _ => eprintln!("Warning: Unknown configuration key '{}' ignored", key),
            }
        }

        Ok(config)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::parse(&load_config_file(path)?)
    }

    /// Loads `explicit` if given, otherwise searches the usual places.
    /// A missing file means defaults; a broken one is reported.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match find_config_file(CONFIG_FILE, CONFIG_ENV) {
                Ok(path) => path,
                Err(ConfigError::FileNotFound(_)) => {
                    println!("No configuration file found, using defaults");
                    return Ok(Self::default());
                }
                Err(e) => return Err(e),
            },
        };
        let config = Self::load_from_file(&path)?;
        println!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            relay_url: self.relay_url.clone(),
            relay: RelayOptions {
                accept_invalid_certs: self.accept_invalid_certs,
            },
            peer: PeerOptions {
                ice_servers: self.ice_servers.clone(),
            },
        }
    }
}

fn invalid(key: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Syntax {
        line: 0,
        message: format!("invalid value '{}' for {}: {}", value, key, reason),
    }
}
