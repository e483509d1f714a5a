//! Ordered in-memory engine
//!
//! Replaces an on-disk LSM with a single BTreeMap published through an
//! `RwLock<Arc<..>>`. Readers clone the `Arc` and keep a private snapshot;
//! commits copy-on-write the map, so a reader never blocks a writer.
//!
//! # Design
//!
//! - Global version: AtomicU64, incremented once per committed transaction
//! - Slot: value (or tombstone), absolute expiry, version of the last change
//! - Commit lock: serializes validation and apply for write transactions
//! - Writer registry: start versions of in-flight write transactions, used to
//!   keep `purge` from discarding slots that conflict detection still needs
//!
//! # Example
//!
//! ```ignore
//! use kvfacade_storage::MemoryStorage;
//! use kvfacade_core::{Storage, WriteTransaction, Ttl};
//!
//! let storage = MemoryStorage::new();
//! let mut txn = storage.begin_write()?;
//! txn.put(b"user:1", b"alice", Ttl::NoExpiry)?;
//! txn.commit()?;
//! ```

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use kvfacade_core::error::printable;
use kvfacade_core::{Clock, Storage, StorageError, StorageResult, WallClock};
use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::config::StorageConfig;
use crate::transaction::{MemoryReadTxn, MemoryWriteTxn};

/// One stored key: live value or tombstone.
#[derive(Debug, Clone)]
pub(crate) struct Slot {
    /// `None` marks a delete
    pub(crate) value: Option<Vec<u8>>,
    /// Absolute expiry in epoch millis, `None` never expires
    pub(crate) expires_at: Option<i64>,
    /// Commit version that last wrote this slot
    pub(crate) version: u64,
}

impl Slot {
    /// The value if it is neither deleted nor expired at `now`.
    pub(crate) fn live(&self, now: i64) -> Option<&[u8]> {
        match (&self.value, self.expires_at) {
            (None, _) => None,
            (Some(_), Some(ts)) if now >= ts => None,
            (Some(value), _) => Some(value.as_slice()),
        }
    }
}

pub(crate) type Tree = BTreeMap<Vec<u8>, Slot>;

/// A write staged inside a transaction.
#[derive(Debug, Clone)]
pub(crate) enum PendingWrite {
    Put {
        value: Vec<u8>,
        expires_at: Option<i64>,
    },
    Delete,
}

/// Counters describing engine activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StorageMetrics {
    /// Current commit version
    pub version: u64,
    /// Write transactions committed
    pub committed: u64,
    /// Write transactions dropped or rejected without committing
    pub aborted: u64,
    /// Read and write transactions currently open
    pub active_transactions: u64,
    /// Keys that are neither deleted nor expired
    pub live_keys: u64,
}

/// Ordered in-memory storage engine.
///
/// # Thread Safety
///
/// All operations are thread-safe:
/// - begin_read(): clones the current snapshot `Arc` under a short read lock
/// - commit: holds the commit lock for validation and apply
/// - purge(): holds the commit lock, so it never interleaves with a commit
pub struct MemoryStorage {
    /// Published snapshot
    data: RwLock<Arc<Tree>>,
    /// Global version for snapshots
    version: AtomicU64,
    /// Serializes validate-then-apply
    commit_lock: Mutex<()>,
    /// Start version -> number of open write transactions
    writers: Mutex<BTreeMap<u64, usize>>,
    clock: Arc<dyn Clock>,
    config: StorageConfig,
    committed: AtomicU64,
    aborted: AtomicU64,
    active: AtomicU64,
}

impl MemoryStorage {
    /// Create an empty engine with default settings and the wall clock.
    pub fn new() -> Self {
        Self::with_config(StorageConfig::default())
    }

    /// Create an empty engine with the given settings.
    pub fn with_config(config: StorageConfig) -> Self {
        Self {
            data: RwLock::new(Arc::new(Tree::new())),
            version: AtomicU64::new(0),
            commit_lock: Mutex::new(()),
            writers: Mutex::new(BTreeMap::new()),
            clock: Arc::new(WallClock),
            config,
            committed: AtomicU64::new(0),
            aborted: AtomicU64::new(0),
            active: AtomicU64::new(0),
        }
    }

    /// Replace the clock used for expiry decisions.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Engine settings.
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Current commit version.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    /// Snapshot of the activity counters.
    ///
    /// `live_keys` walks the current snapshot, so this is O(n).
    pub fn metrics(&self) -> StorageMetrics {
        let (tree, version) = self.snapshot();
        let now = self.now_millis();
        StorageMetrics {
            version,
            committed: self.committed.load(Ordering::Relaxed),
            aborted: self.aborted.load(Ordering::Relaxed),
            active_transactions: self.active.load(Ordering::Acquire),
            live_keys: tree.values().filter(|s| s.live(now).is_some()).count() as u64,
        }
    }

    /// Drop expired entries and tombstones.
    ///
    /// Slots newer than the oldest open write transaction are kept so its
    /// commit can still see that they changed. Returns the number removed.
    pub fn purge(&self) -> usize {
        let _commit_guard = self.commit_lock.lock();
        self.purge_locked()
    }

    /// Purge body; the caller holds the commit lock.
    fn purge_locked(&self) -> usize {
        let watermark = self
            .writers
            .lock()
            .keys()
            .next()
            .copied()
            .unwrap_or(u64::MAX);
        let now = self.now_millis();

        let mut data = self.data.write();
        let removable: Vec<Vec<u8>> = data
            .iter()
            .filter(|(_, slot)| slot.version <= watermark && slot.live(now).is_none())
            .map(|(key, _)| key.clone())
            .collect();
        if removable.is_empty() {
            return 0;
        }

        let tree = Arc::make_mut(&mut data);
        for key in &removable {
            tree.remove(key);
        }
        tracing::debug!(removed = removable.len(), watermark, "purged dead slots");
        removable.len()
    }

    // ========================================================================
    // Crate-internal hooks used by transactions
    // ========================================================================

    #[inline]
    pub(crate) fn now_millis(&self) -> i64 {
        self.clock.now_millis()
    }

    pub(crate) fn snapshot(&self) -> (Arc<Tree>, u64) {
        let data = self.data.read();
        (Arc::clone(&data), self.version())
    }

    pub(crate) fn txn_opened(&self) {
        self.active.fetch_add(1, Ordering::AcqRel);
    }

    pub(crate) fn txn_closed(&self) {
        self.active.fetch_sub(1, Ordering::AcqRel);
    }

    pub(crate) fn register_writer(&self) -> (Arc<Tree>, u64) {
        let mut writers = self.writers.lock();
        let (tree, version) = self.snapshot();
        *writers.entry(version).or_insert(0) += 1;
        (tree, version)
    }

    pub(crate) fn unregister_writer(&self, start_version: u64, committed: bool) {
        let mut writers = self.writers.lock();
        if let Some(count) = writers.get_mut(&start_version) {
            *count -= 1;
            if *count == 0 {
                writers.remove(&start_version);
            }
        }
        drop(writers);
        if committed {
            self.committed.fetch_add(1, Ordering::Relaxed);
        } else {
            self.aborted.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn check_key(&self, key: &[u8]) -> StorageResult<()> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey("key is empty".to_string()));
        }
        if key.len() > self.config.max_key_size {
            return Err(StorageError::InvalidKey(format!(
                "key is {} bytes, limit is {}",
                key.len(),
                self.config.max_key_size
            )));
        }
        Ok(())
    }

    pub(crate) fn check_value(&self, value: &[u8]) -> StorageResult<()> {
        if value.len() > self.config.max_value_size {
            return Err(StorageError::ValueTooLarge {
                size: value.len(),
                limit: self.config.max_value_size,
            });
        }
        Ok(())
    }

    /// Validate the read set and publish the staged writes.
    ///
    /// Commit sequence:
    /// 1. Acquire commit lock
    /// 2. Reject if any key in `reads` changed after `start_version`
    /// 3. Allocate the next version and copy-on-write the tree
    /// 4. Publish the new version
    /// 5. Every `purge_interval` versions, purge dead slots
    pub(crate) fn apply(
        &self,
        start_version: u64,
        reads: &FxHashSet<Vec<u8>>,
        pending: BTreeMap<Vec<u8>, PendingWrite>,
    ) -> StorageResult<u64> {
        let _commit_guard = self.commit_lock.lock();

        if self.config.detect_conflicts && !reads.is_empty() {
            let (current, _) = self.snapshot();
            for key in reads {
                if current.get(key).is_some_and(|s| s.version > start_version) {
                    tracing::debug!(key = %printable(key), start_version, "read set conflict");
                    return Err(StorageError::conflict(key));
                }
            }
        }

        if pending.is_empty() {
            return Ok(self.version());
        }

        let writes = pending.len();
        let mut data = self.data.write();
        let version = self.version() + 1;
        let tree = Arc::make_mut(&mut data);
        for (key, write) in pending {
            match write {
                PendingWrite::Put { value, expires_at } => {
                    tree.insert(
                        key,
                        Slot {
                            value: Some(value),
                            expires_at,
                            version,
                        },
                    );
                }
                PendingWrite::Delete => {
                    if let Some(slot) = tree.get_mut(&key) {
                        *slot = Slot {
                            value: None,
                            expires_at: None,
                            version,
                        };
                    }
                }
            }
        }
        self.version.store(version, Ordering::Release);
        drop(data);

        tracing::debug!(version, writes, "committed write transaction");
        let interval = self.config.purge_interval;
        if interval > 0 && version % interval == 0 {
            self.purge_locked();
        }
        Ok(version)
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStorage")
            .field("version", &self.version())
            .field("active", &self.active.load(Ordering::Relaxed))
            .field("config", &self.config)
            .finish()
    }
}

impl Storage for MemoryStorage {
    type ReadTxn<'a> = MemoryReadTxn<'a> where Self: 'a;
    type WriteTxn<'a> = MemoryWriteTxn<'a> where Self: 'a;

    #[tracing::instrument(level = "trace", skip_all)]
    fn begin_read(&self) -> StorageResult<MemoryReadTxn<'_>> {
        Ok(MemoryReadTxn::new(self))
    }

    #[tracing::instrument(level = "trace", skip_all)]
    fn begin_write(&self) -> StorageResult<MemoryWriteTxn<'_>> {
        Ok(MemoryWriteTxn::new(self))
    }
}
