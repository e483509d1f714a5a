//! Ordered cursor over a snapshot tree.

use std::collections::btree_map::Range;
use std::ops::Bound;

use kvfacade_core::{Cursor, StorageError, StorageResult};

use crate::memory::{Slot, Tree};

/// Cursor over one [`MemoryReadTxn`](crate::MemoryReadTxn) snapshot.
///
/// Tombstones and entries expired at cursor creation time are skipped, so
/// `valid()` is true only on live entries.
pub struct MemoryCursor<'t> {
    tree: &'t Tree,
    now: i64,
    range: Option<Range<'t, Vec<u8>, Slot>>,
    current: Option<(&'t [u8], &'t [u8])>,
}

impl<'t> MemoryCursor<'t> {
    pub(crate) fn new(tree: &'t Tree, now: i64) -> Self {
        Self {
            tree,
            now,
            range: None,
            current: None,
        }
    }

    fn position(&mut self, start: Bound<&[u8]>) {
        self.range = Some(self.tree.range::<[u8], _>((start, Bound::Unbounded)));
        self.settle();
    }

    /// Move to the next live entry of the active range.
    fn settle(&mut self) {
        self.current = None;
        let now = self.now;
        if let Some(range) = self.range.as_mut() {
            for (key, slot) in range.by_ref() {
                if let Some(value) = slot.live(now) {
                    self.current = Some((key.as_slice(), value));
                    break;
                }
            }
        }
    }
}

impl Cursor for MemoryCursor<'_> {
    fn rewind(&mut self) {
        self.position(Bound::Unbounded);
    }

    fn seek(&mut self, key: &[u8]) {
        self.position(Bound::Included(key));
    }

    fn valid(&self) -> bool {
        self.current.is_some()
    }

    fn next(&mut self) {
        self.settle();
    }

    fn key(&self) -> Option<&[u8]> {
        self.current.map(|(key, _)| key)
    }

    fn value(&self) -> StorageResult<&[u8]> {
        self.current
            .map(|(_, value)| value)
            .ok_or(StorageError::CursorExhausted)
    }
}
