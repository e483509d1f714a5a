//! # kvfacade
//!
//! A narrow key-value access layer over an embedded, ordered storage engine.
//!
//! kvfacade exposes six operations (set with optional TTL, batch set, get,
//! batch get, batch delete, and ordered scan with a visitor) and leaves
//! isolation, expiry and storage layout to the engine behind the
//! [`Storage`](kvfacade_core::Storage) trait.
//!
//! ## Quick Start
//!
//! ```ignore
//! use kvfacade::prelude::*;
//!
//! let kv = KvFacade::ephemeral();
//!
//! kv.set("user:1", "alice", Ttl::NoExpiry)?;
//! kv.mset([("user:2", "bob"), ("user:3", "carol")])?;
//!
//! let name = kv.get("user:1")?;
//! let names = kv.mget(&["user:1", "user:9"]); // ["alice", ""]
//!
//! kv.scan(&ScanOptions::new().prefix("user:"), |key, value| {
//!     println!("{:?} = {:?}", key, value);
//!     true // keep going
//! })?;
//!
//! kv.del(&["user:1", "user:9"])?;
//! ```
//!
//! ## Scans
//!
//! A scan starts at `offset` (or the first key), optionally skips the entry
//! equal to `offset`, and walks keys in ascending byte order. A non-empty
//! `prefix` bounds the walk to the keys sharing it. The handler returns
//! `false` to stop; [`ScanOptions::limit`] and [`CancelFlag`] stop it too.

#![warn(missing_docs)]

mod config;
mod database;
mod error;
mod scan;

pub mod prelude;

// Re-export main entry points
pub use config::{Config, ScanDefaults};
pub use database::{KvFacade, KvFacadeBuilder};
pub use error::{Error, Result};
pub use scan::{CancelFlag, Entry, ScanOptions, ScanOutcome, ScanStop};

// Re-export engine-facing types
pub use kvfacade_core::{Clock, ManualClock, StorageError, Ttl, WallClock};
pub use kvfacade_storage::{MemoryStorage, StorageConfig, StorageMetrics};
