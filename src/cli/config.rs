//! Configuration file
//!
//! ```json
//! {
//!   "data_dir": "./data",
//!   "delimiter": "|",
//!   "log_level": "warn",
//!   "max_login_attempts": 3
//! }
//! ```
//!
//! Every field is optional. An explicit `--config` path must exist; the
//! default `./linestore.json` is used only if present.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::observability::Severity;
use crate::session::DEFAULT_MAX_LOGIN_ATTEMPTS;
use crate::store::DEFAULT_DELIMITER;

pub const DEFAULT_CONFIG_PATH: &str = "./linestore.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory holding the store files
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Field delimiter for every store
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Minimum log severity written to stderr
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Failed logins allowed per username in one session
    #[serde(default = "default_max_login_attempts")]
    pub max_login_attempts: u32,
}

fn default_data_dir() -> String {
    ".".to_string()
}
fn default_delimiter() -> char {
    DEFAULT_DELIMITER
}
fn default_log_level() -> String {
    "warn".to_string()
}
fn default_max_login_attempts() -> u32 {
    DEFAULT_MAX_LOGIN_ATTEMPTS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            delimiter: default_delimiter(),
            log_level: default_log_level(),
            max_login_attempts: default_max_login_attempts(),
        }
    }
}

/// A delimiter must not be alphanumeric, whitespace or a line break
pub fn validate_delimiter(d: char) -> CliResult<()> {
    if d.is_alphanumeric() || d.is_whitespace() || d == '\n' || d == '\r' {
        return Err(CliError::config_error(format!(
            "Invalid delimiter {:?}: must not be alphanumeric, whitespace or a line break",
            d
        )));
    }
    Ok(())
}

impl Config {
    /// Load and validate a configuration file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::config_error(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Explicit path, else the default file if present, else defaults
    pub fn resolve(explicit: Option<&Path>) -> CliResult<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn validate(&self) -> CliResult<()> {
        validate_delimiter(self.delimiter)?;

        if self.max_login_attempts == 0 {
            return Err(CliError::config_error("max_login_attempts must be > 0"));
        }

        self.severity()?;

        if self.data_dir.trim().is_empty() {
            return Err(CliError::config_error("data_dir must not be empty"));
        }

        Ok(())
    }

    pub fn severity(&self) -> CliResult<Severity> {
        self.log_level
            .parse::<Severity>()
            .map_err(|e| CliError::config_error(format!("Invalid log_level: {}", e)))
    }

    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }

    /// Path of a store file inside the data directory
    pub fn store_path(&self, file_name: &str) -> PathBuf {
        self.data_path().join(file_name)
    }

    /// Create the data directory if needed; fail if it is not a directory
    pub fn prepare_data_dir(&self) -> CliResult<()> {
        let path = self.data_path();
        if path.exists() {
            if !path.is_dir() {
                return Err(CliError::io_error(format!(
                    "Data directory is not a directory: {}",
                    path.display()
                )));
            }
            return Ok(());
        }
        fs::create_dir_all(path).map_err(|e| {
            CliError::io_error(format!(
                "Failed to create data directory {}: {}",
                path.display(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.data_dir, ".");
        assert_eq!(config.delimiter, '|');
        assert_eq!(config.severity().unwrap(), Severity::Warn);
        assert_eq!(config.max_login_attempts, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("linestore.json");
        fs::write(&path, r#"{"data_dir": "/var/lib/linestore", "delimiter": ";"}"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.data_dir, "/var/lib/linestore");
        assert_eq!(config.delimiter, ';');
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_rejects_bad_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("linestore.json");

        for bad in [
            r#"{"delimiter": "a"}"#,
            r#"{"delimiter": " "}"#,
            r#"{"max_login_attempts": 0}"#,
            r#"{"log_level": "chatty"}"#,
            r#"{"delimiter": "||"}"#,
            r#"{"unknown_key": true}"#,
            "not json",
        ] {
            fs::write(&path, bad).unwrap();
            let err = Config::load(&path).unwrap_err();
            assert_eq!(err.code_str(), "LINESTORE_CLI_CONFIG_ERROR", "input: {}", bad);
        }
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        assert!(Config::resolve(Some(&dir.path().join("missing.json"))).is_err());
    }

    #[test]
    fn test_prepare_data_dir() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            data_dir: dir.path().join("data").display().to_string(),
            ..Config::default()
        };
        config.prepare_data_dir().unwrap();
        assert!(dir.path().join("data").is_dir());
        assert_eq!(config.store_path("students.txt"), dir.path().join("data").join("students.txt"));

        let file = dir.path().join("plain");
        fs::write(&file, "x").unwrap();
        let config = Config {
            data_dir: file.display().to_string(),
            ..Config::default()
        };
        assert!(config.prepare_data_dir().is_err());
    }
}
