//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Default key size limit in bytes.
pub const DEFAULT_MAX_KEY_SIZE: usize = 65_000;

/// Default value size limit in bytes (1 MiB).
pub const DEFAULT_MAX_VALUE_SIZE: usize = 1 << 20;

/// Default number of commits between automatic purges.
pub const DEFAULT_PURGE_INTERVAL: u64 = 1024;

/// Configuration for [`MemoryStorage`](crate::MemoryStorage).
///
/// Every field has a default, so a partial TOML table is enough:
///
/// ```toml
/// detect_conflicts = false
/// max_value_size = 4096
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Reject commits whose read set changed since the transaction began
    pub detect_conflicts: bool,
    /// Largest accepted key
    pub max_key_size: usize,
    /// Largest accepted value
    pub max_value_size: usize,
    /// Purge expired entries and tombstones every this many commits; 0 disables
    pub purge_interval: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            detect_conflicts: true,
            max_key_size: DEFAULT_MAX_KEY_SIZE,
            max_value_size: DEFAULT_MAX_VALUE_SIZE,
            purge_interval: DEFAULT_PURGE_INTERVAL,
        }
    }
}

impl StorageConfig {
    /// Enable or disable commit-time conflict detection.
    pub fn detect_conflicts(mut self, enabled: bool) -> Self {
        self.detect_conflicts = enabled;
        self
    }

    /// Set the key size limit.
    pub fn max_key_size(mut self, bytes: usize) -> Self {
        self.max_key_size = bytes;
        self
    }

    /// Set the value size limit.
    pub fn max_value_size(mut self, bytes: usize) -> Self {
        self.max_value_size = bytes;
        self
    }

    /// Set how many commits pass between automatic purges (0 disables).
    pub fn purge_interval(mut self, commits: u64) -> Self {
        self.purge_interval = commits;
        self
    }
}
