//! Convenient imports for kvfacade.
//!
//! ```ignore
//! use kvfacade::prelude::*;
//!
//! let kv = KvFacade::ephemeral();
//! kv.set("key", "value", Ttl::NoExpiry)?;
//! ```

// Main entry point
pub use crate::database::{KvFacade, KvFacadeBuilder};

// Error handling
pub use crate::error::{Error, Result};

// Scans
pub use crate::scan::{CancelFlag, Entry, ScanOptions, ScanOutcome, ScanStop};

// Configuration
pub use crate::config::{Config, ScanDefaults};

// Core types
pub use kvfacade_core::Ttl;
