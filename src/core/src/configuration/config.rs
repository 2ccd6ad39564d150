use super::types::*;
use crate::error_handling::types::ConfigError;
use log::debug;
use serde::Deserialize;
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;

/// Application configuration structure that defines all runtime parameters.
///
/// The configuration is read from a TOML file whose path is given on the
/// command line. Every section and every key is optional; an empty file
/// yields a file-backed store in the working directory, seeding enabled and
/// the HTTP API disabled.
///
/// # Examples
///
/// ```toml
/// [storage]
/// backend = "database"
/// path = "/var/lib/learnhub/learnhub.sqlite3"
///
/// [seed]
/// enabled = true
/// demo_users = false
///
/// [web]
/// enabled = true
/// bind_address = "0.0.0.0"
/// port = 8080
/// ```
///
/// # Fields Overview
///
/// - `storage`: which Collection Store backend to open and where
/// - `seed`: whether the baseline dataset is generated at startup, with or
/// without a demo roster
/// - `web`: the read-only JSON API over the store
#[derive(Debug, Deserialize, PartialEq, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub seed: SeedConfig,
    pub web: WebConfig,
}

impl Config {
    /// Reads and validates the configuration at `path`.
    ///
    /// # Errors
    /// `ConfigError::IoError` if the file cannot be read, `TomlError` if it is
    /// not valid TOML for this structure and `InvalidValue` if
    /// [`Config::validate`] rejects it.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        debug!("Reading configuration from {:?}", path);
        let raw = fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the values serde cannot: the storage path of persistent
    /// backends must not be empty, and an enabled web section needs a
    /// parseable bind address and a non-zero port.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.backend != StorageBackend::Memory {
            if let Some(path) = &self.storage.path {
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidValue("storage.path is empty".into()));
                }
            }
        }
        if self.web.enabled {
            self.web_address()?;
            if self.web.port == 0 {
                return Err(ConfigError::InvalidValue("web.port must be non-zero".into()));
            }
        }
        Ok(())
    }

    /// Socket address the HTTP API binds to.
    pub fn web_address(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.web.bind_address.parse().map_err(|_| {
            ConfigError::InvalidValue(format!("web.bind_address '{}' is not an IP address", self.web.bind_address))
        })?;
        Ok(SocketAddr::new(ip, self.web.port))
    }
}
