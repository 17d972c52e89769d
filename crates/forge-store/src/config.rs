//! Store configuration, read from TOML.
//!
//! ```toml
//! database = "forge.db"
//! busy_timeout_ms = 5000
//! foreign_keys = true
//! seed = { dir = "data/catalog" }
//! ```

use crate::error::StoreResult;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const IN_MEMORY: &str = ":memory:";
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Where the initial catalog comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedSource {
    /// Leave the store empty.
    None,
    /// The embedded starter catalog.
    #[default]
    Starter,
    /// A directory of catalog data files.
    Dir(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// SQLite path, or `":memory:"`.
    pub database: String,
    pub busy_timeout_ms: u64,
    pub foreign_keys: bool,
    pub seed: SeedSource,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database: IN_MEMORY.to_string(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            foreign_keys: true,
            seed: SeedSource::Starter,
        }
    }
}

impl StoreConfig {
    /// A file-backed config with every other setting at its default.
    pub fn with_database(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            ..Self::default()
        }
    }

    pub fn from_toml_str(content: &str) -> StoreResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> StoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn is_in_memory(&self) -> bool {
        self.database == IN_MEMORY
    }
}
