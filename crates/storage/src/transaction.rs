//! Read and write transactions over [`MemoryStorage`].

use std::collections::BTreeMap;
use std::sync::Arc;

use kvfacade_core::{CursorOptions, ReadTransaction, StorageResult, Ttl, WriteTransaction};
use rustc_hash::FxHashSet;

use crate::cursor::MemoryCursor;
use crate::memory::{MemoryStorage, PendingWrite, Tree};

/// Read-only view of one snapshot.
///
/// Holds an `Arc` of the tree as it was when the transaction began; commits
/// made afterwards are invisible to it.
pub struct MemoryReadTxn<'a> {
    storage: &'a MemoryStorage,
    snapshot: Arc<Tree>,
    version: u64,
}

impl<'a> MemoryReadTxn<'a> {
    pub(crate) fn new(storage: &'a MemoryStorage) -> Self {
        let (snapshot, version) = storage.snapshot();
        storage.txn_opened();
        Self {
            storage,
            snapshot,
            version,
        }
    }

    /// Commit version this snapshot was taken at.
    pub fn version(&self) -> u64 {
        self.version
    }
}

impl ReadTransaction for MemoryReadTxn<'_> {
    type Cursor<'t> = MemoryCursor<'t> where Self: 't;

    fn get(&self, key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        let now = self.storage.now_millis();
        Ok(self
            .snapshot
            .get(key)
            .and_then(|slot| slot.live(now))
            .map(<[u8]>::to_vec))
    }

    // Values already live in memory; the prefetch hint has nothing to skip.
    fn cursor(&self, _options: CursorOptions) -> StorageResult<MemoryCursor<'_>> {
        Ok(MemoryCursor::new(&self.snapshot, self.storage.now_millis()))
    }
}

impl Drop for MemoryReadTxn<'_> {
    fn drop(&mut self) {
        self.storage.txn_closed();
    }
}

/// Buffered read-write transaction.
///
/// Writes are staged locally and published atomically by
/// [`commit`](WriteTransaction::commit). Keys read through
/// [`get`](WriteTransaction::get) are validated at commit when conflict
/// detection is enabled (first committer wins).
pub struct MemoryWriteTxn<'a> {
    storage: &'a MemoryStorage,
    /// `None` once commit has started
    snapshot: Option<Arc<Tree>>,
    start_version: u64,
    pending: BTreeMap<Vec<u8>, PendingWrite>,
    reads: FxHashSet<Vec<u8>>,
    committed: bool,
}

impl<'a> MemoryWriteTxn<'a> {
    pub(crate) fn new(storage: &'a MemoryStorage) -> Self {
        let (snapshot, start_version) = storage.register_writer();
        storage.txn_opened();
        Self {
            storage,
            snapshot: Some(snapshot),
            start_version,
            pending: BTreeMap::new(),
            reads: FxHashSet::default(),
            committed: false,
        }
    }

    /// Commit version this transaction started from.
    pub fn start_version(&self) -> u64 {
        self.start_version
    }

    /// Number of staged puts and deletes.
    pub fn pending_writes(&self) -> usize {
        self.pending.len()
    }
}

impl WriteTransaction for MemoryWriteTxn<'_> {
    fn get(&mut self, key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        let now = self.storage.now_millis();
        if let Some(write) = self.pending.get(key) {
            return Ok(match write {
                PendingWrite::Put { value, expires_at } => match expires_at {
                    Some(ts) if now >= *ts => None,
                    _ => Some(value.clone()),
                },
                PendingWrite::Delete => None,
            });
        }

        self.reads.insert(key.to_vec());
        Ok(self
            .snapshot
            .as_ref()
            .and_then(|tree| tree.get(key))
            .and_then(|slot| slot.live(now))
            .map(<[u8]>::to_vec))
    }

    fn put(&mut self, key: &[u8], value: &[u8], ttl: Ttl) -> StorageResult<()> {
        self.storage.check_key(key)?;
        self.storage.check_value(value)?;
        let expires_at = ttl.expires_at(self.storage.now_millis());
        self.pending.insert(
            key.to_vec(),
            PendingWrite::Put {
                value: value.to_vec(),
                expires_at,
            },
        );
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> StorageResult<()> {
        self.storage.check_key(key)?;
        self.pending.insert(key.to_vec(), PendingWrite::Delete);
        Ok(())
    }

    fn commit(mut self) -> StorageResult<u64> {
        // Without our reference, apply mutates the tree in place unless a reader holds it.
        self.snapshot = None;
        let pending = std::mem::take(&mut self.pending);
        let version = self.storage.apply(self.start_version, &self.reads, pending)?;
        self.committed = true;
        Ok(version)
    }
}

impl Drop for MemoryWriteTxn<'_> {
    fn drop(&mut self) {
        if !self.committed {
            tracing::trace!(
                start_version = self.start_version,
                discarded = self.pending.len(),
                "write transaction dropped without commit"
            );
        }
        self.storage
            .unregister_writer(self.start_version, self.committed);
        self.storage.txn_closed();
    }
}
