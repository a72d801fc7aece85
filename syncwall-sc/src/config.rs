//! Sync controller configuration
//!
//! Resolution priority for every setting: command line (or its env
//! fallback) > TOML config file > compiled default.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tokio::time::Duration;

/// Compiled defaults
pub const DEFAULT_PORT: u16 = 5760;
pub const DEFAULT_DISCOVERY_URL: &str = "http://localhost:3000";
pub const DEFAULT_TICK_MS: u64 = 16; // render-tick equivalent, ~60 Hz

/// Optional TOML config file contents
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    pub port: Option<u16>,
    pub discovery_url: Option<String>,
    pub tick_ms: Option<u64>,
}

/// Resolved sync controller configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP control interface port
    pub port: u16,
    /// Base URL of the stream discovery service
    pub discovery_url: String,
    /// Correction loop tick period
    pub tick: Duration,
}

impl Config {
    /// Resolve configuration from CLI/env values and an optional TOML
    /// config file
    pub fn resolve(
        cli_port: Option<u16>,
        cli_discovery_url: Option<String>,
        cli_tick_ms: Option<u64>,
        config_path: Option<&Path>,
    ) -> Result<Self> {
        let file = match config_path {
            Some(path) => {
                let contents = std::fs::read_to_string(path)?;
                toml::from_str::<FileConfig>(&contents)
                    .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?
            }
            None => FileConfig::default(),
        };

        let tick_ms = cli_tick_ms.or(file.tick_ms).unwrap_or(DEFAULT_TICK_MS);
        if tick_ms == 0 {
            return Err(Error::Config("tick_ms must be non-zero".to_string()));
        }

        Ok(Self {
            port: cli_port.or(file.port).unwrap_or(DEFAULT_PORT),
            discovery_url: cli_discovery_url
                .or(file.discovery_url)
                .unwrap_or_else(|| DEFAULT_DISCOVERY_URL.to_string()),
            tick: Duration::from_millis(tick_ms),
        })
    }
}
