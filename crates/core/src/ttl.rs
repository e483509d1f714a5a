//! Time-to-live requests and time sources.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

/// Expiry requested for a single write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Ttl {
    /// The value lives until it is overwritten or deleted
    #[default]
    NoExpiry,
    /// The value becomes invisible once this much time has passed
    ExpireAfter(Duration),
}

impl Ttl {
    /// Interpret a millisecond count; zero or negative means no expiry.
    ///
    /// # Examples
    ///
    /// ```
    /// use kvfacade_core::Ttl;
    /// use std::time::Duration;
    ///
    /// assert_eq!(Ttl::from_millis(0), Ttl::NoExpiry);
    /// assert_eq!(Ttl::from_millis(-5), Ttl::NoExpiry);
    /// assert_eq!(Ttl::from_millis(250), Ttl::ExpireAfter(Duration::from_millis(250)));
    /// ```
    pub fn from_millis(ms: i64) -> Self {
        if ms <= 0 {
            Ttl::NoExpiry
        } else {
            Ttl::ExpireAfter(Duration::from_millis(ms as u64))
        }
    }

    /// Absolute expiry in epoch milliseconds for a write made at `now_ms`.
    ///
    /// A zero-length duration is treated as no expiry. Durations are rounded
    /// up to whole milliseconds, so any non-zero TTL outlives the write.
    pub fn expires_at(&self, now_ms: i64) -> Option<i64> {
        match self {
            Ttl::NoExpiry => None,
            Ttl::ExpireAfter(d) if d.is_zero() => None,
            Ttl::ExpireAfter(d) => {
                let ms = (d.as_nanos() + 999_999) / 1_000_000;
                let ms = i64::try_from(ms).unwrap_or(i64::MAX);
                Some(now_ms.saturating_add(ms))
            }
        }
    }
}

impl From<Duration> for Ttl {
    fn from(d: Duration) -> Self {
        if d.is_zero() {
            Ttl::NoExpiry
        } else {
            Ttl::ExpireAfter(d)
        }
    }
}

/// Source of the current time used for expiry decisions.
pub trait Clock: Send + Sync {
    /// Current time as milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}

/// Clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct WallClock;

impl Clock for WallClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Clock that only moves when told to.
///
/// Lets tests cross expiry boundaries without sleeping.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    /// Create a clock frozen at `start_ms`.
    pub fn new(start_ms: i64) -> Self {
        Self {
            now: AtomicI64::new(start_ms),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let ms = i64::try_from(by.as_millis()).unwrap_or(i64::MAX);
        self.now.fetch_add(ms, Ordering::SeqCst);
    }

    /// Jump to an absolute time.
    pub fn set(&self, now_ms: i64) {
        self.now.store(now_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}
