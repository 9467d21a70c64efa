//! Millisecond time sources for the time-aware cache

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

/// Process-wide origin shared by every `SystemClock`
static ORIGIN: OnceLock<Instant> = OnceLock::new();

/// Whole milliseconds in `duration`, saturating at `u64::MAX`
pub(crate) fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Source of the current time in milliseconds
///
/// Only differences between readings matter, so the epoch is up to the
/// implementation.
pub trait Clock: Send + Sync {
    /// Current time in milliseconds
    fn now_millis(&self) -> u64;
}

/// Monotonic wall clock
///
/// All instances count from the same process-wide origin, so readings taken
/// through different `SystemClock` values can be compared.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Create a handle to the process clock
    pub fn new() -> Self {
        SystemClock
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        saturating_millis(ORIGIN.get_or_init(Instant::now).elapsed())
    }
}

/// Clock that only moves when told to
///
/// Clones share the same counter, so a test can keep one handle and hand
/// another to the cache.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    millis: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a clock reading `millis`
    pub fn new(millis: u64) -> Self {
        Self {
            millis: Arc::new(AtomicU64::new(millis)),
        }
    }

    /// Move the clock forward, stopping at `u64::MAX`
    pub fn advance(&self, by: Duration) {
        let by = saturating_millis(by);
        // The closure always returns Some, so the update cannot fail
        let _ = self
            .millis
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |now| {
                Some(now.saturating_add(by))
            });
    }

    /// Set the clock to an absolute reading
    pub fn set(&self, millis: u64) {
        self.millis.store(millis, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.millis.load(Ordering::Relaxed)
    }
}
