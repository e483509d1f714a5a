//! Facade Integration Test Suite
//!
//! Exercises every facade operation against the in-memory engine, plus a
//! fault-injecting engine for the error propagation rules.
//!
//! ## Running Tests
//!
//! ```bash
//! # Run the whole suite
//! cargo test --test facade
//!
//! # Run scan tests only
//! cargo test --test facade scan::
//! ```

use std::sync::Arc;

use kvfacade::prelude::*;
use kvfacade::{ManualClock, StorageConfig, StorageError};

// Test modules
pub mod batch_ops;
pub mod properties;
pub mod ttl;

// =============================================================================
// SHARED TEST UTILITIES
// =============================================================================

/// Start time for manual clocks (2024-01-01T00:00:00Z)
pub const T0: i64 = 1_704_067_200_000;

/// Create a facade over a fresh in-memory engine
pub fn create_facade() -> KvFacade {
    KvFacade::ephemeral()
}

/// Create a facade whose expiry clock only moves when the test says so
pub fn create_facade_with_clock() -> (KvFacade, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(T0));
    let kv = KvFacade::builder().clock(clock.clone()).open();
    (kv, clock)
}

/// Write string pairs without expiry
pub fn seed(kv: &KvFacade, pairs: &[(&str, &str)]) {
    kv.mset(pairs.iter().copied()).expect("seed failed");
}

fn utf8(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).expect("test keys are utf-8")
}

/// Keys visited by a scan, in visit order
pub fn scan_keys(kv: &KvFacade, options: &ScanOptions) -> Vec<String> {
    kv.scan_entries(options)
        .expect("scan failed")
        .into_iter()
        .map(|e| utf8(e.key))
        .collect()
}

/// (key, value) pairs visited by a scan, in visit order
pub fn scan_pairs(kv: &KvFacade, options: &ScanOptions) -> Vec<(String, String)> {
    kv.scan_entries(options)
        .expect("scan failed")
        .into_iter()
        .map(|e| (utf8(e.key), utf8(e.value)))
        .collect()
}
