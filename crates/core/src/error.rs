//! Error types reported by storage engines.

use thiserror::Error;

/// Errors raised by a storage engine.
///
/// Not-found is deliberately absent: engines report a missing or expired key
/// as `Ok(None)` so callers can tell it apart from a real failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// A key read by the transaction was changed by a concurrent commit
    #[error("transaction conflict on key {key}")]
    Conflict {
        /// Printable form of the conflicting key
        key: String,
    },

    /// Key is empty or exceeds the configured size limit
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Value exceeds the configured size limit
    #[error("value too large: {size} bytes (limit {limit})")]
    ValueTooLarge {
        /// Size of the rejected value
        size: usize,
        /// Configured maximum
        limit: usize,
    },

    /// Cursor accessed while not pointing at an entry
    #[error("cursor is not positioned on an entry")]
    CursorExhausted,

    /// Bug or invariant violation inside the engine
    #[error("internal storage error: {0}")]
    Internal(String),
}

impl StorageError {
    /// Check if retrying the whole operation may succeed.
    pub fn is_conflict(&self) -> bool {
        matches!(self, StorageError::Conflict { .. })
    }

    /// Build a [`StorageError::Conflict`] from raw key bytes.
    pub fn conflict(key: &[u8]) -> Self {
        StorageError::Conflict {
            key: printable(key),
        }
    }
}

/// Result type for storage engine operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Render key bytes for error messages and log fields.
///
/// Valid UTF-8 is shown as-is, anything else as an escaped byte string.
pub fn printable(key: &[u8]) -> String {
    match std::str::from_utf8(key) {
        Ok(s) => s.to_string(),
        Err(_) => key.escape_ascii().to_string(),
    }
}
