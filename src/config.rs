//! Server configuration
//!
//! Loaded from TOML; every field has a default so an empty file (or no file at
//! all) gives a working server on `127.0.0.1:5000`.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 5000
//! allow_origin = "*"
//!
//! [limits]
//! max_blocks = 4096
//! max_processes = 4096
//! max_body_bytes = 1048576
//!
//! [logging]
//! filter = "info"
//! ```

use crate::error::{BlockfitError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockfitConfig {
    pub server: ServerConfig,
    pub limits: Limits,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Value of `Access-Control-Allow-Origin` on every response
    pub allow_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 5000,
            allow_origin: "*".to_string(),
        }
    }
}

/// Request size limits enforced by the service before allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_blocks: usize,
    pub max_processes: usize,
    pub max_body_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_blocks: 4096,
            max_processes: 4096,
            max_body_bytes: 1024 * 1024,
        }
    }
}

impl Limits {
    /// Check list lengths against the limits
    pub fn check(&self, blocks: usize, processes: usize) -> Result<()> {
        if blocks > self.max_blocks {
            return Err(BlockfitError::LimitExceeded {
                what: "blocks",
                len: blocks,
                max: self.max_blocks,
            });
        }
        if processes > self.max_processes {
            return Err(BlockfitError::LimitExceeded {
                what: "processes",
                len: processes,
                max: self.max_processes,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, overridden by `RUST_LOG`
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            filter: "info".to_string(),
        }
    }
}

impl BlockfitConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: BlockfitConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from {:?}", path);
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(BlockfitError::Config("server.host cannot be empty".to_string()));
        }
        if self.server.port == 0 {
            return Err(BlockfitError::Config("server.port cannot be 0".to_string()));
        }
        if self.limits.max_blocks == 0 || self.limits.max_processes == 0 {
            return Err(BlockfitError::Config(
                "limits.max_blocks and limits.max_processes must be at least 1".to_string(),
            ));
        }
        if self.limits.max_body_bytes == 0 {
            return Err(BlockfitError::Config(
                "limits.max_body_bytes must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// `host:port` bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
