//! Facade configuration.
//!
//! Loaded from TOML; every table and field is optional:
//!
//! ```toml
//! [storage]
//! detect_conflicts = true
//! max_key_size = 65000
//! max_value_size = 1048576
//! purge_interval = 1024
//!
//! [scan]
//! fetch_values = true
//! ```

use std::path::Path;

use kvfacade_storage::StorageConfig;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Settings for the in-memory engine
    pub storage: StorageConfig,
    /// Defaults applied to [`KvFacade::scan_options`](crate::KvFacade::scan_options)
    pub scan: ScanDefaults,
}

/// Defaults for new scan options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanDefaults {
    /// Hand values to the visitor (false = keys only)
    pub fetch_values: bool,
}

impl Default for ScanDefaults {
    fn default() -> Self {
        Self { fetch_values: true }
    }
}

impl Config {
    /// Parse a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }
}
