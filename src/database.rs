//! Main entry point for kvfacade.
//!
//! This module provides [`KvFacade`], which maps six typed operations onto
//! storage engine transactions, and [`KvFacadeBuilder`] for configuring the
//! built-in in-memory engine.
//!
//! Every operation opens exactly one transaction scoped to the call:
//!
//! | Operation | Transaction | Error policy |
//! |-----------|-------------|--------------|
//! | `set` | write | surfaces the first failure |
//! | `mset` | write | all-or-nothing |
//! | `get` | read | `NotFound` vs `Storage` |
//! | `mget` | read | per-key failures become empty placeholders |
//! | `del` | write | missing keys are no-ops |
//! | `scan` | read | setup and value-read failures surface |

use std::sync::Arc;

use kvfacade_core::error::printable;
use kvfacade_core::{Clock, CursorOptions, ReadTransaction, Storage, Ttl, WriteTransaction};
use kvfacade_storage::{MemoryStorage, StorageConfig, StorageMetrics};

use crate::config::{Config, ScanDefaults};
use crate::error::{Error, Result};
use crate::scan::{self, Entry, ScanOptions, ScanOutcome};

/// Key-value access layer over a storage engine.
///
/// Holds nothing but the engine handle (and scan defaults), so cloning is
/// cheap and clones share the same keyspace. Independent facades over
/// separate engines can coexist.
///
/// # Example
///
/// ```ignore
/// use kvfacade::prelude::*;
///
/// let kv = KvFacade::ephemeral();
/// kv.set("a", "1", Ttl::NoExpiry)?;
/// kv.set("ab", "2", Ttl::from_millis(30_000))?;
///
/// kv.scan(&ScanOptions::new().prefix("a"), |key, value| {
///     println!("{:?} = {:?}", key, value);
///     true
/// })?;
/// ```
pub struct KvFacade<S: Storage = MemoryStorage> {
    storage: Arc<S>,
    scan_defaults: ScanDefaults,
}

impl<S: Storage> Clone for KvFacade<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            scan_defaults: self.scan_defaults,
        }
    }
}

impl<S: Storage> KvFacade<S> {
    /// Wrap an engine handle.
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            scan_defaults: ScanDefaults::default(),
        }
    }

    /// Override the defaults used by [`scan_options`](Self::scan_options).
    pub fn with_scan_defaults(mut self, defaults: ScanDefaults) -> Self {
        self.scan_defaults = defaults;
        self
    }

    /// The underlying engine.
    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    /// Fresh scan options seeded from the configured defaults.
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions::new().fetch_values(self.scan_defaults.fetch_values)
    }

    // =========================================================================
    // Point operations
    // =========================================================================

    /// Write `value` under `key`, replacing any previous value and expiry.
    ///
    /// [`Ttl::NoExpiry`] (or `Ttl::from_millis(ms)` with `ms <= 0`) never
    /// expires; otherwise the key disappears `ttl` after the write.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn set(&self, key: impl AsRef<[u8]>, value: impl AsRef<[u8]>, ttl: Ttl) -> Result<()> {
        let mut txn = self.storage.begin_write()?;
        txn.put(key.as_ref(), value.as_ref(), ttl)?;
        txn.commit()?;
        Ok(())
    }

    /// Write every pair in one transaction.
    ///
    /// All-or-nothing: if any pair is rejected or the commit fails, none of
    /// the pairs become visible. A key repeated within the call keeps its
    /// last value.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn mset<I, K, V>(&self, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<[u8]>,
        V: AsRef<[u8]>,
    {
        let mut txn = self.storage.begin_write()?;
        let mut count = 0usize;
        for (key, value) in pairs {
            txn.put(key.as_ref(), value.as_ref(), Ttl::NoExpiry)?;
            count += 1;
        }
        let version = txn.commit()?;
        tracing::debug!(pairs = count, version, "mset committed");
        Ok(())
    }

    /// Read the live value under `key`.
    ///
    /// Returns [`Error::NotFound`] when the key is absent or expired.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn get(&self, key: impl AsRef<[u8]>) -> Result<Vec<u8>> {
        let key = key.as_ref();
        let txn = self.storage.begin_read()?;
        let value = txn.get(key)?;
        value.ok_or_else(|| Error::NotFound(printable(key)))
    }

    /// Read several keys from one snapshot.
    ///
    /// The result has one slot per input key, in input order. Any key that
    /// cannot be read (absent, expired, or an engine error) yields an empty
    /// placeholder; errors are logged and never returned.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn mget<K: AsRef<[u8]>>(&self, keys: &[K]) -> Vec<Vec<u8>> {
        let txn = match self.storage.begin_read() {
            Ok(txn) => txn,
            Err(e) => {
                tracing::warn!(keys = keys.len(), error = %e, "mget could not open read transaction");
                return vec![Vec::new(); keys.len()];
            }
        };

        keys.iter()
            .map(|key| match txn.get(key.as_ref()) {
                Ok(Some(value)) => value,
                Ok(None) => Vec::new(),
                Err(e) => {
                    tracing::warn!(key = %printable(key.as_ref()), error = %e, "mget read failed");
                    Vec::new()
                }
            })
            .collect()
    }

    /// Delete every key in one transaction. Missing keys are ignored.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn del<K: AsRef<[u8]>>(&self, keys: &[K]) -> Result<()> {
        let mut txn = self.storage.begin_write()?;
        for key in keys {
            txn.delete(key.as_ref())?;
        }
        let version = txn.commit()?;
        tracing::debug!(keys = keys.len(), version, "del committed");
        Ok(())
    }

    // =========================================================================
    // Scans
    // =========================================================================

    /// Visit entries in ascending key order until the range is exhausted or
    /// `handler` returns false.
    ///
    /// The scan reads one snapshot; writes committed after it starts are
    /// not observed. Stopping early (handler, limit, cancel) is not an error.
    /// Unlike [`mget`](Self::mget), a failure to read an entry's value
    /// aborts the scan with [`Error::Storage`].
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn scan<F>(&self, options: &ScanOptions, handler: F) -> Result<ScanOutcome>
    where
        F: FnMut(Vec<u8>, Vec<u8>) -> bool,
    {
        let txn = self.storage.begin_read()?;
        let mut cursor = txn.cursor(CursorOptions {
            prefetch_values: options.fetch_values,
        })?;
        let outcome = scan::run(&mut cursor, options, handler)?;
        tracing::debug!(visited = outcome.visited, stop = ?outcome.stop, "scan finished");
        Ok(outcome)
    }

    /// Collect the entries a scan would visit.
    pub fn scan_entries(&self, options: &ScanOptions) -> Result<Vec<Entry>> {
        let mut entries = Vec::new();
        self.scan(options, |key, value| {
            entries.push(Entry { key, value });
            true
        })?;
        Ok(entries)
    }
}

impl KvFacade<MemoryStorage> {
    /// Facade over a fresh in-memory engine with default settings.
    pub fn ephemeral() -> Self {
        Self::builder().open()
    }

    /// Create a builder for an in-memory facade.
    pub fn builder() -> KvFacadeBuilder {
        KvFacadeBuilder::new()
    }

    /// Drop expired entries and tombstones from the engine.
    ///
    /// Expired keys are already invisible; this only reclaims memory. The
    /// engine also purges on its own every `purge_interval` commits.
    pub fn purge_expired(&self) -> usize {
        self.storage.purge()
    }

    /// Engine activity counters.
    pub fn metrics(&self) -> StorageMetrics {
        self.storage.metrics()
    }
}

/// Builder for an in-memory [`KvFacade`].
///
/// # Example
///
/// ```ignore
/// let kv = KvFacade::builder()
///     .config(Config::load("kvfacade.toml")?)
///     .clock(Arc::new(ManualClock::new(0)))
///     .open();
/// ```
pub struct KvFacadeBuilder {
    config: Config,
    clock: Option<Arc<dyn Clock>>,
}

impl KvFacadeBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            clock: None,
        }
    }

    /// Use a full configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Replace only the engine settings.
    pub fn storage_config(mut self, storage: StorageConfig) -> Self {
        self.config.storage = storage;
        self
    }

    /// Time source for expiry decisions (wall clock by default).
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build the engine and wrap it.
    pub fn open(self) -> KvFacade<MemoryStorage> {
        let mut storage = MemoryStorage::with_config(self.config.storage);
        if let Some(clock) = self.clock {
            storage = storage.with_clock(clock);
        }
        KvFacade::new(Arc::new(storage)).with_scan_defaults(self.config.scan)
    }
}

impl Default for KvFacadeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
