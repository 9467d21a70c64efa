//! Stale policies: predicates deciding whether the eldest entry must go
//!
//! A policy sees the eldest entry and the current entry count at call time.
//! It must not hold a reference to the cache it judges.

use std::sync::Arc;
use std::time::Duration;

use crate::clock::{saturating_millis, Clock};
use crate::traits::EldestEntry;

/// Decides whether the current eldest entry is stale
pub trait StalePolicy<K, V> {
    /// Whether `eldest` should be evicted from a cache holding `len` entries
    fn should_remove_eldest(&self, eldest: &EldestEntry<'_, K, V>, len: usize) -> bool;

    /// Whether stale entries must also be purged before every read
    fn runs_on_read(&self) -> bool {
        false
    }
}

/// Adapts a closure `(eldest, len) -> bool` into a policy
#[derive(Debug, Clone, Copy)]
pub struct FnPolicy<F>(pub F);

impl<K, V, F> StalePolicy<K, V> for FnPolicy<F>
where
    F: Fn(&EldestEntry<'_, K, V>, usize) -> bool,
{
    fn should_remove_eldest(&self, eldest: &EldestEntry<'_, K, V>, len: usize) -> bool {
        (self.0)(eldest, len)
    }
}

impl<K, V, P> StalePolicy<K, V> for Box<P>
where
    P: StalePolicy<K, V> + ?Sized,
{
    fn should_remove_eldest(&self, eldest: &EldestEntry<'_, K, V>, len: usize) -> bool {
        (**self).should_remove_eldest(eldest, len)
    }

    fn runs_on_read(&self) -> bool {
        (**self).runs_on_read()
    }
}

/// Never evicts anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverStale;

impl<K, V> StalePolicy<K, V> for NeverStale {
    fn should_remove_eldest(&self, _eldest: &EldestEntry<'_, K, V>, _len: usize) -> bool {
        false
    }
}

/// Evicts while the cache holds more than `capacity` entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityPolicy {
    capacity: usize,
}

impl CapacityPolicy {
    /// Bound the cache to `capacity` entries
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<K, V> StalePolicy<K, V> for CapacityPolicy {
    fn should_remove_eldest(&self, _eldest: &EldestEntry<'_, K, V>, len: usize) -> bool {
        len > self.capacity
    }
}

/// Evicts the eldest entry once it is older than `max_age`
///
/// Age is measured from the entry's last write. Entries that carry no
/// timestamp never expire. The policy also runs before every read, so an
/// expired key is gone before a lookup can hit it.
#[derive(Clone)]
pub struct ExpirePolicy {
    max_age_millis: u64,
    clock: Arc<dyn Clock>,
}

impl ExpirePolicy {
    /// Expire entries older than `max_age`, measured with `clock`
    pub fn new(max_age: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            max_age_millis: saturating_millis(max_age),
            clock,
        }
    }

    /// Maximum age in milliseconds
    pub fn max_age_millis(&self) -> u64 {
        self.max_age_millis
    }
}

impl std::fmt::Debug for ExpirePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpirePolicy")
            .field("max_age_millis", &self.max_age_millis)
            .finish_non_exhaustive()
    }
}

impl<K, V> StalePolicy<K, V> for ExpirePolicy {
    fn should_remove_eldest(&self, eldest: &EldestEntry<'_, K, V>, _len: usize) -> bool {
        match eldest.written_at {
            Some(written_at) => {
                self.clock.now_millis().saturating_sub(written_at) > self.max_age_millis
            }
            None => false,
        }
    }

    fn runs_on_read(&self) -> bool {
        true
    }
}
