//! Time-aware cache: LRU plus a write timestamp per key
//!
//! Timestamps are refreshed on every put and never on get. Pair the cache with
//! an [`ExpirePolicy`](crate::ExpirePolicy) to evict entries by age.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use ahash::RandomState;

use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};
use crate::lru::LruCache;
use crate::traits::{Cache, EldestEntry};

/// LRU cache that records when each key was last written
pub struct TimeAwareCache<K, V> {
    lru: LruCache<K, V>,
    written_at: HashMap<K, u64, RandomState>,
    clock: Arc<dyn Clock>,
}

impl<K, V> TimeAwareCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a cache stamped by the system clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock::new()))
    }

    /// Create a cache stamped by `clock`
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            lru: LruCache::new(),
            written_at: HashMap::with_hasher(RandomState::new()),
            clock,
        }
    }

    /// Clock used for timestamps
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Last write time of `key`, or `None` if it is not cached
    pub fn timestamp_of(&self, key: &K) -> Option<u64> {
        self.written_at.get(key).copied()
    }

    /// Verify the LRU structure and that every cached key has a timestamp
    pub fn check_invariants(&self) -> Result<()> {
        self.lru.check_invariants()?;

        if self.written_at.len() != self.lru.len() {
            return Err(Error::InvalidState(format!(
                "{} timestamps for {} entries",
                self.written_at.len(),
                self.lru.len()
            )));
        }
        if self.written_at.keys().any(|key| !self.lru.contains(key)) {
            return Err(Error::InvalidState(
                "timestamp kept for an evicted key".to_string(),
            ));
        }

        Ok(())
    }
}

impl<K, V> Default for TimeAwareCache<K, V>
where
    K: Hash + Eq + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Cache<K, V> for TimeAwareCache<K, V>
where
    K: Hash + Eq + Clone,
{
    fn get(&mut self, key: &K) -> Option<&V> {
        self.lru.get(key)
    }

    fn put(&mut self, key: K, value: V) -> Option<V> {
        self.written_at.insert(key.clone(), self.clock.now_millis());
        self.lru.put(key, value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        self.written_at.remove(key);
        self.lru.remove(key)
    }

    fn contains(&self, key: &K) -> bool {
        self.lru.contains(key)
    }

    fn peek(&self, key: &K) -> Option<&V> {
        self.lru.peek(key)
    }

    fn len(&self) -> usize {
        self.lru.len()
    }

    fn clear(&mut self) {
        self.written_at.clear();
        self.lru.clear();
    }

    fn eldest_entry(&self) -> Option<EldestEntry<'_, K, V>> {
        let eldest = self.lru.eldest_entry()?;
        Some(EldestEntry {
            written_at: self.timestamp_of(eldest.key),
            ..eldest
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::time::Duration;

    fn cache_at(millis: u64) -> (TimeAwareCache<&'static str, u32>, ManualClock) {
        let clock = ManualClock::new(millis);
        (TimeAwareCache::with_clock(Arc::new(clock.clone())), clock)
    }

    #[test]
    fn test_put_records_timestamp() {
        let (mut cache, clock) = cache_at(1_000);

        cache.put("a", 1);
        clock.advance(Duration::from_millis(25));
        cache.put("b", 2);

        assert_eq!(cache.timestamp_of(&"a"), Some(1_000));
        assert_eq!(cache.timestamp_of(&"b"), Some(1_025));
        assert_eq!(cache.timestamp_of(&"c"), None);
    }

    #[test]
    fn test_get_does_not_restamp() {
        let (mut cache, clock) = cache_at(0);

        cache.put("a", 1);
        clock.advance(Duration::from_millis(500));
        assert_eq!(cache.get(&"a"), Some(&1));

        assert_eq!(cache.timestamp_of(&"a"), Some(0));
    }

    #[test]
    fn test_put_refreshes_timestamp() {
        let (mut cache, clock) = cache_at(0);

        cache.put("a", 1);
        clock.advance(Duration::from_millis(40));
        cache.put("a", 2);

        assert_eq!(cache.timestamp_of(&"a"), Some(40));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_eldest_carries_timestamp() {
        let (mut cache, clock) = cache_at(10);

        cache.put("a", 1);
        clock.advance(Duration::from_millis(5));
        cache.put("b", 2);
        cache.get(&"a");

        let eldest = cache.eldest_entry().unwrap();
        assert_eq!(*eldest.key, "b");
        assert_eq!(eldest.written_at, Some(15));
    }

    #[test]
    fn test_remove_and_clear_purge_timestamps() {
        let (mut cache, _clock) = cache_at(0);

        cache.put("a", 1);
        cache.put("b", 2);
        assert_eq!(cache.remove(&"a"), Some(1));
        assert_eq!(cache.timestamp_of(&"a"), None);
        cache.check_invariants().unwrap();

        cache.clear();
        assert_eq!(cache.timestamp_of(&"b"), None);
        assert!(cache.is_empty());
        cache.check_invariants().unwrap();
    }
}
