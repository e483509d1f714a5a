//! Core types for kvfacade
//!
//! This crate defines the vocabulary shared by the facade and every storage
//! engine that sits behind it:
//! - [`Ttl`] and [`Clock`]: expiry requests and the time source that enforces them
//! - [`StorageError`]: everything an engine can report
//! - [`traits`]: the engine boundary (transactions and cursors)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod traits;
pub mod ttl;

pub use error::{StorageError, StorageResult};
pub use traits::{Cursor, CursorOptions, ReadTransaction, Storage, WriteTransaction};
pub use ttl::{Clock, ManualClock, Ttl, WallClock};

/// Returns true if `key` starts with `prefix`.
///
/// An empty prefix matches every key.
#[inline]
pub fn has_prefix(key: &[u8], prefix: &[u8]) -> bool {
    key.starts_with(prefix)
}
