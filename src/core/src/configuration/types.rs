use serde::Deserialize;
use std::path::PathBuf;

/// Where the Collection Store keeps its documents.
#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One JSON file per collection under `path/collections/`
    #[default]
    File,
    /// A single SQLite file at `path`
    Database,
    /// Nothing survives the process
    Memory,
}

#[derive(Debug, Deserialize, PartialEq, Clone, Default)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Empty means "next to the working directory" (or `LEARNHUB_DATA_DIR`
    /// for the file backend).
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, PartialEq, Clone)]
#[serde(default)]
pub struct SeedConfig {
    pub enabled: bool,
    pub demo_users: bool,
    /// Fixed PRNG seed, for reproducible demo data
    pub rng_seed: Option<u64>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            demo_users: true,
            rng_seed: None,
        }
    }
}

#[derive(Debug, Deserialize, PartialEq, Clone)]
#[serde(default)]
pub struct WebConfig {
    pub enabled: bool,
    pub bind_address: String,
    pub port: u16,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            bind_address: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}
