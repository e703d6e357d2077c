//! Connection configuration
//!
//! Default config location: ~/.quarry/config.toml
//!
//! ```toml
//! [connections.elasticsearch]
//! host = "localhost"
//! port = 9200
//! user = "elastic"
//! pass = "changeme"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Environment variable naming the connection used when a model doesn't pick one
pub const CONNECTION_ENV: &str = "QUARRY_CONNECTION";

/// Connection used when neither the model nor the environment names one
pub const DEFAULT_CONNECTION: &str = "elasticsearch";

/// Main configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_connections")]
    pub connections: BTreeMap<String, ConnectionConfig>,
}

fn default_connections() -> BTreeMap<String, ConnectionConfig> {
    let mut connections = BTreeMap::new();
    connections.insert(DEFAULT_CONNECTION.to_string(), ConnectionConfig::default());
    connections
}

impl Default for Config {
    fn default() -> Self {
        Self {
            connections: default_connections(),
        }
    }
}

/// Where and how to reach one search engine
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConnectionConfig {
    #[serde(default = "default_scheme")]
    pub scheme: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pass: Option<String>,
    /// Whole-request timeout; none by default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_scheme() -> String {
    "http".to_string()
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    9200
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            scheme: default_scheme(),
            host: default_host(),
            port: default_port(),
            user: None,
            pass: None,
            timeout_secs: None,
        }
    }
}

impl ConnectionConfig {
    pub fn base_url(&self) -> String {
        format!(
            "{}://{}:{}",
            self.scheme,
            self.host.trim_end_matches('/'),
            self.port
        )
    }
}

/// Default config path (~/.quarry/config.toml)
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".quarry")
        .join("config.toml")
}

/// Connection name from [`CONNECTION_ENV`], else [`DEFAULT_CONNECTION`]
pub fn default_connection_name() -> String {
    std::env::var(CONNECTION_ENV)
        .ok()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_CONNECTION.to_string())
}

impl Config {
    /// Load config from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&default_config_path())
    }

    /// Load config from `path`; a missing file gives the default config
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {:?}, using defaults", path);
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject connections that could never be reached
    pub fn validate(&self) -> Result<()> {
        for (name, conn) in &self.connections {
            if conn.host.trim().is_empty() {
                return Err(Error::Config(format!("connection '{}' has an empty host", name)));
            }
            if !matches!(conn.scheme.as_str(), "http" | "https") {
                return Err(Error::Config(format!(
                    "connection '{}' has unsupported scheme '{}'",
                    name, conn.scheme
                )));
            }
        }
        Ok(())
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    /// Look up a named connection
    pub fn connection(&self, name: &str) -> Result<ConnectionConfig> {
        self.connections
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownConnection(name.to_string()))
    }
}
