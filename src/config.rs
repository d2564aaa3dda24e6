//! Plugin configuration.
//!
//! Configuration is resolved in layers, later layers winning:
//! 1. Built-in defaults
//! 2. A JSON file (`.sql_query.json` in the working directory, or an explicit path)
//! 3. The `SQL_QUERY_SERVER` environment variable (server DSN only)
//! 4. Command-line flags (applied by the caller)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_SERVER: &str = "tcp(127.0.0.1:3306)/";
pub const DEFAULT_MEASUREMENT: &str = "query_plugin";
pub const DEFAULT_DATABASE: &str = "mysql";

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".sql_query.json";

/// Environment variable overriding the server DSN.
pub const SERVER_ENV_VAR: &str = "SQL_QUERY_SERVER";

pub const SAMPLE_CONFIG: &str = r#"{
  "server": "tcp(127.0.0.1:3306)/",
  "measurement": "query_plugin",
  "database": "mysql",
  "query": "SELECT 10 AS field_integer, 20.30 AS field_decimal, 'helloworld' AS field_string, 'tagValue1' AS tag_1, 'tagValue2' AS tag_2 FROM DUAL",
  "tags": ["tag_1", "tag_2"]
}"#;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

/// Settings of one query input instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PluginConfig {
    /// Server DSN: `[username[:password]@][protocol[(address)]]/[?param=value]`
    pub server: String,
    /// Measurement name of every emitted metric
    pub measurement: String,
    /// Database whose existence is checked on the first collection
    pub database: String,
    /// Query producing the metrics; empty means nothing is collected
    pub query: String,
    /// Result columns emitted as tags instead of fields
    pub tags: Vec<String>,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            measurement: DEFAULT_MEASUREMENT.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            query: String::new(),
            tags: Vec::new(),
        }
    }
}

impl PluginConfig {
    /// Load configuration from a JSON file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply environment overrides.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(server) = std::env::var(SERVER_ENV_VAR) {
            if !server.is_empty() {
                self.server = server;
            }
        }
        self
    }

    /// Resolve configuration relative to `dir`.
    ///
    /// An explicit path must exist. Without one, `dir/.sql_query.json` is
    /// used when present and defaults otherwise.
    pub fn resolve_in(dir: &Path, explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match explicit {
            Some(path) => Self::load(path)?,
            None => {
                let path = dir.join(CONFIG_FILE_NAME);
                if path.exists() {
                    Self::load(&path)?
                } else {
                    Self::default()
                }
            }
        };
        Ok(config.with_env_overrides())
    }

    /// Resolve configuration relative to the working directory.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        Self::resolve_in(Path::new("."), explicit)
    }

    /// Reject settings that cannot produce valid metrics.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.measurement.is_empty() {
            return Err(ConfigError::Invalid {
                message: "measurement must not be empty".to_string(),
            });
        }
        if let Some(tag) = self.tags.iter().find(|t| t.is_empty()) {
            return Err(ConfigError::Invalid {
                message: format!("tag column names must not be empty (got {:?})", tag),
            });
        }
        Ok(())
    }
}
