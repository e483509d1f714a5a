//! Unified error types for kvfacade.
//!
//! The facade reports two kinds of failure to callers: a key that is not
//! there, and anything the storage engine could not do. Configuration and
//! I/O errors only arise while loading settings.

use kvfacade_core::StorageError;
use thiserror::Error;

/// All kvfacade errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Key does not exist or has expired
    #[error("not found: {0}")]
    NotFound(String),

    /// Any failure reported by the storage engine (open, commit, conflict)
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for kvfacade operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// Check if this is a storage engine error.
    pub fn is_storage(&self) -> bool {
        matches!(self, Error::Storage(_))
    }

    /// Check if this error is retryable.
    ///
    /// The facade never retries on its own; a transaction conflict may
    /// succeed if the caller repeats the whole operation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Storage(e) if e.is_conflict())
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}
