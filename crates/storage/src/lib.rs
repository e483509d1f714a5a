//! In-memory storage engine for kvfacade
//!
//! This crate implements the kvfacade engine boundary with:
//! - MemoryStorage: ordered BTreeMap behind an RwLock, copy-on-write commits
//! - Snapshot reads that never block writers
//! - Buffered write transactions with read-set conflict detection
//! - Read-side TTL enforcement via an injected clock
//! - Purge of expired entries and tombstones

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod cursor;
pub mod memory;
pub mod transaction;

pub use config::StorageConfig;
pub use cursor::MemoryCursor;
pub use memory::{MemoryStorage, StorageMetrics};
pub use transaction::{MemoryReadTxn, MemoryWriteTxn};
