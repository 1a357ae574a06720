//! Service configuration
//!
//! Read from a TOML file, either given explicitly or found at
//! `~/.eurofx/config.toml`. Every field has a default, so an empty file or
//! no file at all is valid.
//!
//! ```toml
//! source = "https://www.ecb.europa.eu/stats/eurofxref/eurofxref-hist.zip"
//! bind_address = "127.0.0.1:8080"
//! timeout_secs = 30
//! max_retries = 3
//! ```

use crate::error::{RatesError, Result};
use crate::ingest::ECB_HISTORY_URL;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_DIR: &str = ".eurofx";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// URL or local path of the rate history (ZIP or CSV)
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,
    /// HTTP download timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_source() -> String {
    ECB_HISTORY_URL.to_string()
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: default_source(),
            bind_address: default_bind_address(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

impl Config {
    /// `~/.eurofx/config.toml`, if a home directory is known
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Parse a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            RatesError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&contents).map_err(|e| {
            RatesError::ConfigError(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Load configuration
    ///
    /// An explicit path must exist and parse. Without one, the default
    /// location is tried and any problem there falls back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(config_path) = path {
            return Self::from_file(config_path);
        }

        match Self::default_path() {
            Some(default_path) if default_path.exists() => match Self::from_file(&default_path) {
                Ok(config) => {
                    log::debug!("Loaded config from {}", default_path.display());
                    Ok(config)
                }
                Err(e) => {
                    log::warn!("{}; using defaults", e);
                    Ok(Config::default())
                }
            },
            _ => Ok(Config::default()),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
