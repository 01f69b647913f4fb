//! Configuration for the SSO session server
//!
//! Settings are layered, later sources taking precedence:
//! - Default values
//! - Configuration file (`po-sso.toml`, or `PO_SSO_CONFIG_FILE`)
//! - Environment variables with the `PO_SSO` prefix, nested keys separated by
//!   `__` (e.g. `PO_SSO__PROVIDER__PRIORITY=50`)

use anyhow::{Context, Result};
use config::{Config as ConfigBuilder, Environment, File};
use po_sso_session::{InMemorySessionManager, ProviderConfig};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const DEFAULT_CONFIG_FILE: &str = "po-sso.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerConfig,
    /// SSO session provider settings
    pub provider: ProviderConfig,
    pub sessions: SessionStoreConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to (default: 127.0.0.1)
    pub host: IpAddr,
    /// Port to bind to (default: 3000)
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionStoreConfig {
    /// Session lifetime in seconds (default: 86400 = 24 hours)
    pub ttl_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error), overridden by RUST_LOG
    pub level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
        }
    }
}

impl Default for SessionStoreConfig {
    fn default() -> Self {
        Self { ttl_seconds: 86_400 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from an optional file and the environment.
    ///
    /// Without an explicit path, `PO_SSO_CONFIG_FILE` or `po-sso.toml` is used
    /// when it exists.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = ConfigBuilder::builder();

        let config_path = match path {
            Some(path) => Some(path.to_path_buf()),
            None => {
                let candidate = std::env::var("PO_SSO_CONFIG_FILE")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
                candidate.exists().then_some(candidate)
            }
        };

        if let Some(config_path) = config_path {
            info!("Loading configuration from {}", config_path.display());
            builder = builder.add_source(File::from(config_path));
        } else {
            debug!("No config file found, using defaults");
        }

        builder = builder.add_source(
            Environment::with_prefix("PO_SSO")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        let settings: Settings = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        settings.validate()?;
        Ok(settings)
    }

    /// Validate server-level values; provider settings are checked when the
    /// provider is constructed
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port cannot be 0");
        }

        if self.sessions.ttl_seconds == 0 {
            anyhow::bail!("Session TTL must be positive");
        }
        InMemorySessionManager::new(self.sessions.ttl_seconds)
            .context("Session TTL is out of range")?;

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        let level_lower = self.logging.level.to_lowercase();
        if !valid_levels.contains(&level_lower.as_str()) {
            anyhow::bail!(
                "Invalid log level '{}'. Must be one of: {:?}",
                self.logging.level,
                valid_levels
            );
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server.host, self.server.port)
    }
}
