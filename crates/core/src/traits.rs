//! Storage engine boundary
//!
//! The facade talks to its engine only through these traits. An engine must
//! provide:
//! - read-only transactions that observe one consistent snapshot
//! - read-write transactions that apply all of their writes or none
//! - per-key expiry, honored transparently on every read path
//! - ordered cursors supporting seek, advance and prefix-bounded validity
//!
//! Transactions and cursors release their engine resources when dropped.
//! Dropping an uncommitted [`WriteTransaction`] discards its writes.

use crate::error::StorageResult;
use crate::ttl::Ttl;

/// Options for opening a [`Cursor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorOptions {
    /// Hint that values will be read for most entries.
    ///
    /// When false the engine may skip materializing values. Calling
    /// [`Cursor::value`] is still allowed.
    pub prefetch_values: bool,
}

impl Default for CursorOptions {
    fn default() -> Self {
        Self {
            prefetch_values: true,
        }
    }
}

/// An ordered byte-keyed storage engine.
pub trait Storage: Send + Sync {
    /// Snapshot transaction type
    type ReadTxn<'a>: ReadTransaction
    where
        Self: 'a;

    /// Buffered read-write transaction type
    type WriteTxn<'a>: WriteTransaction
    where
        Self: 'a;

    /// Open a read-only transaction over the current snapshot.
    fn begin_read(&self) -> StorageResult<Self::ReadTxn<'_>>;

    /// Open a read-write transaction.
    fn begin_write(&self) -> StorageResult<Self::WriteTxn<'_>>;
}

/// Read access to one consistent snapshot.
pub trait ReadTransaction {
    /// Cursor type borrowing from this transaction
    type Cursor<'t>: Cursor
    where
        Self: 't;

    /// Fetch a copy of the live value under `key`.
    ///
    /// Returns `Ok(None)` if the key is absent or expired.
    fn get(&self, key: &[u8]) -> StorageResult<Option<Vec<u8>>>;

    /// Open a cursor over the snapshot. The cursor starts unpositioned;
    /// call [`Cursor::rewind`] or [`Cursor::seek`] first.
    fn cursor(&self, options: CursorOptions) -> StorageResult<Self::Cursor<'_>>;
}

/// Buffered writes applied atomically on commit.
pub trait WriteTransaction {
    /// Read `key`, seeing this transaction's own pending writes first.
    ///
    /// Keys read here join the transaction's read set and are checked for
    /// concurrent modification at commit.
    fn get(&mut self, key: &[u8]) -> StorageResult<Option<Vec<u8>>>;

    /// Stage a write of `value` under `key` with the given expiry.
    fn put(&mut self, key: &[u8], value: &[u8], ttl: Ttl) -> StorageResult<()>;

    /// Stage a delete. Deleting a missing key is not an error.
    fn delete(&mut self, key: &[u8]) -> StorageResult<()>;

    /// Apply every staged write atomically.
    ///
    /// Returns the commit version assigned to the writes.
    fn commit(self) -> StorageResult<u64>;
}

/// Positioned iterator over an ordered snapshot.
///
/// Expired entries are never observed through a cursor.
pub trait Cursor {
    /// Position at the first key of the keyspace.
    fn rewind(&mut self);

    /// Position at the first key greater than or equal to `key`.
    fn seek(&mut self, key: &[u8]);

    /// True while the cursor points at an entry.
    fn valid(&self) -> bool;

    /// True while the cursor points at an entry whose key starts with `prefix`.
    fn valid_for_prefix(&self, prefix: &[u8]) -> bool {
        match self.key() {
            Some(key) => crate::has_prefix(key, prefix),
            None => false,
        }
    }

    /// Advance to the next entry.
    fn next(&mut self);

    /// Key of the current entry, borrowed from the cursor.
    fn key(&self) -> Option<&[u8]>;

    /// Value of the current entry, borrowed from the cursor.
    fn value(&self) -> StorageResult<&[u8]>;
}
