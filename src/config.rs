//! `depscope.toml` loading
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [facts]
//! path = "data/facts.json"
//! ```

use std::path::{Path, PathBuf};

use depscope_server::ServerConfig;
use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_FILE: &str = "depscope.toml";
pub const DEFAULT_FACTS_FILE: &str = "depscope-facts.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerSection,
    pub facts: FactsSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        let defaults = ServerConfig::default();
        ServerSection {
            host: defaults.host,
            port: defaults.port,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FactsSection {
    pub path: PathBuf,
}

impl Default for FactsSection {
    fn default() -> Self {
        FactsSection {
            path: PathBuf::from(DEFAULT_FACTS_FILE),
        }
    }
}

impl Config {
    /// Load `explicit`, or `depscope.toml` in the working directory if present.
    ///
    /// Only an explicitly named file has to exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let fallback = Path::new(CONFIG_FILE);
                if fallback.exists() {
                    Self::from_file(fallback)
                } else {
                    Ok(Config::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Server address with CLI flags taking precedence.
    pub fn server_config(&self, host: Option<String>, port: Option<u16>) -> ServerConfig {
        ServerConfig {
            host: host.unwrap_or_else(|| self.server.host.clone()),
            port: port.unwrap_or(self.server.port),
        }
    }

    pub fn facts_path(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.unwrap_or_else(|| self.facts.path.clone())
    }
}
