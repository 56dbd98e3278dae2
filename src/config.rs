//! Server configuration.
//!
//! Loaded from a TOML file at startup. Every field has a default so a
//! minimal deployment can run from an empty file.

use std::net::SocketAddr;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub server: ServerConfig,
    pub listen: ListenConfig,
    pub limits: Limits,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Name used as the prefix of every server-originated message.
    pub name: String,
    /// Message of the day, one entry per 372 reply.
    pub motd: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListenConfig {
    pub address: SocketAddr,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Limits {
    /// Connections beyond this are accepted and immediately closed.
    pub max_clients: usize,
    /// Cap on simultaneously existing channels.
    pub max_channels: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            listen: ListenConfig::default(),
            limits: Limits::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "lark.local".to_owned(),
            motd: vec!["- Welcome to larkd".to_owned()],
        }
    }
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0:6667"
                .parse()
                .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], 6667))),
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_clients: 512,
            max_channels: 64,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }
}
