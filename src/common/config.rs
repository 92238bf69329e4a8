//! # Configuration Utilities
//!
//! Configuration structures for the command-line client and the TOML loader
//! they share.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{CasError, Result};

/// Load a TOML configuration file and deserialize it into the specified type.
///
/// # Example
/// ```ignore
/// let config: ClientConfig = load_config("config/client.toml")?;
/// ```
pub fn load_config<T, P>(path: P) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|source| CasError::ConfigLoad {
        source,
        path: path.to_path_buf(),
    })
}

/// Client configuration loaded from TOML.
///
/// # Example TOML
///
/// ```toml
/// [server]
/// address = "127.0.0.1:5570"
///
/// [session]
/// action_sets = ["table"]
///
/// [logging]
/// level = "debug"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub server: ServerInfo,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the compute server listens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Network address of the server (e.g. "127.0.0.1:5570")
    pub address: String,
}

/// Session setup beyond the action sets the biomedical layer always loads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Extra action sets to load right after connecting
    #[serde(default)]
    pub action_sets: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// One of `error`, `warn`, `info`, `debug`, `trace`
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}
