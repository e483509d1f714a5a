//! Ordered scans over the keyspace.
//!
//! A scan turns a flat [`ScanOptions`] into a cursor walk:
//!
//! ```text
//! 1. position   no offset, no prefix -> rewind
//!               otherwise -> seek(max(offset, prefix)), step past offset if excluded
//! 2. check      cursor valid, key has prefix (first miss ends the scan),
//!               limit not reached, not cancelled
//! 3. visit      copy key (and value if fetched) out of the cursor, call handler
//! 4. advance    stop at once if the handler returned false
//! ```
//!
//! Keys arrive in strictly ascending byte order. The handler receives owned
//! buffers, so nothing it keeps depends on the cursor staying alive.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use kvfacade_core::{Cursor, StorageError};

use crate::error::Result;

/// Shared flag that stops a running scan.
///
/// Clone it into another thread and call [`cancel`](CancelFlag::cancel); the
/// scan checks it before every visit and returns with
/// [`ScanStop::Cancelled`].
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Create an untripped flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Trip the flag.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Check whether the flag has been tripped.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Options controlling one scan.
///
/// # Example
///
/// ```ignore
/// let opts = ScanOptions::new().prefix("user:").offset("user:100").keys_only();
/// facade.scan(&opts, |key, _| {
///     println!("{:?}", key);
///     true
/// })?;
/// ```
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Starting key; empty starts at the first key
    pub offset: Vec<u8>,
    /// Visit the entry equal to `offset` if it exists
    pub include_offset: bool,
    /// Only visit keys starting with this; empty means no filter
    pub prefix: Vec<u8>,
    /// Hand values to the handler; when false it receives empty values
    pub fetch_values: bool,
    /// Maximum number of entries to visit
    pub limit: Option<usize>,
    /// External stop signal
    pub cancel: Option<CancelFlag>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            offset: Vec::new(),
            include_offset: false,
            prefix: Vec::new(),
            fetch_values: true,
            limit: None,
            cancel: None,
        }
    }
}

impl ScanOptions {
    /// Scan everything, fetching values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start at `offset`.
    pub fn offset(mut self, offset: impl AsRef<[u8]>) -> Self {
        self.offset = offset.as_ref().to_vec();
        self
    }

    /// Whether the entry equal to the offset is visited.
    pub fn include_offset(mut self, include: bool) -> Self {
        self.include_offset = include;
        self
    }

    /// Restrict the scan to keys starting with `prefix`.
    pub fn prefix(mut self, prefix: impl AsRef<[u8]>) -> Self {
        self.prefix = prefix.as_ref().to_vec();
        self
    }

    /// Whether values are handed to the visitor.
    pub fn fetch_values(mut self, fetch: bool) -> Self {
        self.fetch_values = fetch;
        self
    }

    /// Shorthand for `fetch_values(false)`.
    pub fn keys_only(self) -> Self {
        self.fetch_values(false)
    }

    /// Visit at most `limit` entries.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Stop when `flag` is tripped.
    pub fn cancel_on(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }
}

/// Why a scan ended. None of these is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStop {
    /// No entries left in the keyspace
    Exhausted,
    /// Reached the first key past the prefix range
    PrefixEnd,
    /// The handler returned false
    Handler,
    /// Visited `limit` entries
    Limit,
    /// The cancel flag was tripped
    Cancelled,
}

/// Summary of a finished scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Entries passed to the handler
    pub visited: usize,
    /// Why the scan ended
    pub stop: ScanStop,
}

/// A key and its value as observed by a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Key bytes
    pub key: Vec<u8>,
    /// Value bytes, empty when values were not fetched
    pub value: Vec<u8>,
}

/// Drive `cursor` according to `options`, calling `handler` per entry.
///
/// A failure to read the current value aborts the scan; entries are never
/// skipped silently.
pub(crate) fn run<C, F>(
    cursor: &mut C,
    options: &ScanOptions,
    mut handler: F,
) -> Result<ScanOutcome>
where
    C: Cursor,
    F: FnMut(Vec<u8>, Vec<u8>) -> bool,
{
    position(cursor, options);

    let mut visited = 0;
    let stop = loop {
        if !cursor.valid() {
            break ScanStop::Exhausted;
        }
        if !options.prefix.is_empty() && !cursor.valid_for_prefix(&options.prefix) {
            break ScanStop::PrefixEnd;
        }
        if options.limit.is_some_and(|limit| visited >= limit) {
            break ScanStop::Limit;
        }
        if options.cancel.as_ref().is_some_and(CancelFlag::is_cancelled) {
            break ScanStop::Cancelled;
        }

        let key = cursor
            .key()
            .map(<[u8]>::to_vec)
            .ok_or(StorageError::CursorExhausted)?;
        let value = if options.fetch_values {
            cursor.value()?.to_vec()
        } else {
            Vec::new()
        };

        visited += 1;
        if !handler(key, value) {
            break ScanStop::Handler;
        }
        cursor.next();
    };

    Ok(ScanOutcome { visited, stop })
}

/// Place the cursor on the first entry the scan may visit.
///
/// A prefix raises the start to the beginning of its range, so keys sorting
/// before the prefix never end the scan early.
fn position<C: Cursor>(cursor: &mut C, options: &ScanOptions) {
    let offset = options.offset.as_slice();
    let prefix = options.prefix.as_slice();

    if offset.is_empty() && prefix.is_empty() {
        cursor.rewind();
        return;
    }

    cursor.seek(offset.max(prefix));
    if !offset.is_empty() && !options.include_offset && cursor.key() == Some(offset) {
        cursor.next();
    }
}
