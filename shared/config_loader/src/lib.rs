//! # Config Loader
//!
//! Finds and reads configuration files for the chat client and the relay
//! server. Two formats are supported:
//!
//! - JSON documents decoded straight into a `serde` type ([`load_json`]);
//! - flat `key=value` files with `#` comments ([`parse_key_values`]).
//!
//! ```no_run
//! use config_loader::{find_config_file, load_config_file, parse_key_values};
//!
//! let path = find_config_file("peerchat.conf", "PEERCHAT_CONFIG")?;
//! let pairs = parse_key_values(&load_config_file(&path)?)?;
//! for (key, value) in pairs {
//!     println!("{key} = {value}");
//! }
//! # Ok::<(), config_loader::ConfigError>(())
//! ```

pub mod error;

pub use error::{ConfigError, Result};

use serde::de::DeserializeOwned;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Reads a configuration file into a string without interpreting it.
pub fn load_config_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }
    fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Looks for `filename`, in order:
/// 1. the path held by the environment variable `env_var`;
/// 2. `./config/{filename}`;
/// 3. `./{filename}`.
pub fn find_config_file(filename: &str, env_var: &str) -> Result<PathBuf> {
    if let Ok(path) = env::var(env_var) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Ok(path);
        }
    }

    let candidates = [
        PathBuf::from("./config").join(filename),
        PathBuf::from(".").join(filename),
    ];
    candidates
        .into_iter()
        .find(|p| p.exists())
        .ok_or_else(|| {
            ConfigError::FileNotFound(format!(
                "'{}' (searched ${}, ./config/{}, ./{})",
                filename, env_var, filename, filename
            ))
        })
}

/// Reads and decodes a JSON configuration file.
pub fn load_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let content = load_config_file(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Splits `key=value` lines. Blank lines and `#` comments are skipped,
/// keys and values are trimmed, and a line without `=` is an error.
pub fn parse_key_values(content: &str) -> Result<Vec<(String, String)>> {
    let mut pairs = Vec::new();
    for (index, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            return Err(ConfigError::Syntax {
                line: index + 1,
                message: format!("expected key=value, found '{}'", line),
            });
        };
        pairs.push((key.trim().to_string(), value.trim().to_string()));
    }
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::tempdir;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        port: u16,
        name: String,
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = load_config_file("/path/that/does/not/exist.json");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_find_nonexistent_file() {
        let result = find_config_file(
            "file_that_definitely_does_not_exist_12345.conf",
            "PEERCHAT_TEST_UNSET_VARIABLE",
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_load_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("relay.json");
        std::fs::write(&path, r#"{"port": 8787, "name": "relay"}"#).unwrap();

        let sample: Sample = load_json(&path).unwrap();
        assert_eq!(
            sample,
            Sample {
                port: 8787,
                name: "relay".to_string()
            }
        );
    }

    #[test]
    fn test_load_json_reports_syntax() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ port: ").unwrap();

        let result: Result<Sample> = load_json(&path);
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_parse_key_values() {
        let content = "\
            # client settings\n\
            relay_url = wss://relay.example/ws\n\
            \n\
            log_level=debug\n";
        let pairs = parse_key_values(content).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("relay_url".to_string(), "wss://relay.example/ws".to_string()),
                ("log_level".to_string(), "debug".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_key_values_rejects_bare_line() {
        let err = parse_key_values("relay_url\n").unwrap_err();
        assert!(matches!(err, ConfigError::Syntax { line: 1, .. }));
    }

    #[test]
    fn test_value_may_contain_equals() {
        let pairs = parse_key_values("relay_url=ws://h/?a=b").unwrap();
        assert_eq!(pairs[0].1, "ws://h/?a=b");
    }
}
