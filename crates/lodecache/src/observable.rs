//! Observable cache: notifications and stale eviction around any cache
//!
//! ```text
//! get:  [purge if policy runs on read] -> on_hit / on_miss -> value
//! put:  structural update -> on_put -> [evict while stale, if key was new]
//! ```

use std::sync::Arc;

use tracing::trace;

use crate::error::{Error, Result};
use crate::listener::{BroadcastListener, CacheListener};
use crate::policy::StalePolicy;
use crate::traits::{Cache, EldestEntry};

/// A cache wired to a stale policy and a set of listeners
pub struct ObservableCache<K, V, C, P> {
    inner: C,
    policy: P,
    listeners: BroadcastListener<K, V>,
}

impl<K, V, C, P> ObservableCache<K, V, C, P>
where
    K: Clone,
    C: Cache<K, V>,
    P: StalePolicy<K, V>,
{
    /// Wrap `inner`, evicting whatever `policy` marks stale
    pub fn new(inner: C, policy: P) -> Self {
        Self {
            inner,
            policy,
            listeners: BroadcastListener::new(),
        }
    }

    /// Register a listener; listeners are notified in registration order
    pub fn add_listener(&mut self, listener: Arc<dyn CacheListener<K, V>>) {
        self.listeners.add_listener(listener);
    }

    /// Replace the stale policy
    ///
    /// Takes effect from the next put (or read, for read-time policies).
    pub fn set_stale_policy(&mut self, policy: P) {
        self.policy = policy;
    }

    /// Current stale policy
    pub fn stale_policy(&self) -> &P {
        &self.policy
    }

    /// Underlying cache
    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Look up `key`, notifying `on_hit` or `on_miss`
    ///
    /// When the policy runs on read, stale entries (possibly including `key`)
    /// are evicted first. A miss never inserts anything.
    pub fn get(&mut self, key: &K) -> Result<Option<&V>> {
        if self.policy.runs_on_read() {
            self.clear_stale_entries()?;
        }

        if !self.inner.contains(key) {
            self.listeners.on_miss(key)?;
            return Ok(None);
        }

        self.listeners.on_hit(key)?;
        Ok(self.inner.get(key))
    }

    /// Insert or update `key`, notify `on_put`, then evict stale entries
    ///
    /// Eviction only runs when `key` was new: an update does not grow the
    /// cache. A failing `on_put` listener is reported after eviction so the
    /// policy's bound still holds.
    pub fn put(&mut self, key: K, value: V) -> Result<()> {
        let is_new = !self.inner.contains(&key);
        self.inner.put(key.clone(), value);

        let notified = match self.inner.peek(&key) {
            Some(value) => self.listeners.on_put(&key, value),
            None => Ok(()),
        };

        let evicted = if is_new {
            self.clear_stale_entries().map(|_| ())
        } else {
            Ok(())
        };
        notified.and(evicted)
    }

    /// Remove `key` without notifying listeners
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.inner.remove(key)
    }

    /// Check for `key` without notifying listeners or touching recency
    pub fn contains(&self, key: &K) -> bool {
        self.inner.contains(key)
    }

    /// Look up `key` without notifying listeners or touching recency
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.inner.peek(key)
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// The entry the underlying cache would give up first
    pub fn eldest_entry(&self) -> Option<EldestEntry<'_, K, V>> {
        self.inner.eldest_entry()
    }

    /// Evict eldest entries while the stale policy approves
    ///
    /// Each round removes one entry, so the loop ends at the latest when the
    /// cache is empty. Returns the number of evicted entries. Eviction runs to
    /// completion even if an `on_evict` listener fails; the first failure is
    /// returned afterwards.
    pub fn clear_stale_entries(&mut self) -> Result<usize> {
        let mut evicted = 0;
        let mut failure: Option<Error> = None;

        loop {
            let key = match self.inner.eldest_entry() {
                Some(eldest) if self.policy.should_remove_eldest(&eldest, self.inner.len()) => {
                    eldest.key.clone()
                }
                _ => break,
            };

            let Some(value) = self.inner.remove(&key) else {
                break;
            };
            evicted += 1;
            trace!(remaining = self.inner.len(), "evicted stale entry");

            if let Err(err) = self.listeners.on_evict(&key, &value) {
                failure.get_or_insert(err);
            }
        }

        match failure {
            Some(err) => Err(err),
            None => Ok(evicted),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::fifo::FifoCache;
    use crate::listener::StatsListener;
    use crate::lru::LruCache;
    use crate::policy::{CapacityPolicy, ExpirePolicy, NeverStale};
    use crate::time_aware::TimeAwareCache;
    use parking_lot::Mutex;
    use std::time::Duration;

    type BoundedLru =
        ObservableCache<&'static str, u32, LruCache<&'static str, u32>, CapacityPolicy>;

    fn lru(capacity: usize) -> BoundedLru {
        ObservableCache::new(LruCache::new(), CapacityPolicy::new(capacity))
    }

    #[derive(Default)]
    struct Events(Mutex<Vec<String>>);

    impl CacheListener<&'static str, u32> for Events {
        fn on_hit(&self, key: &&'static str) -> Result<()> {
            self.0.lock().push(format!("hit {}", key));
            Ok(())
        }

        fn on_miss(&self, key: &&'static str) -> Result<()> {
            self.0.lock().push(format!("miss {}", key));
            Ok(())
        }

        fn on_put(&self, key: &&'static str, value: &u32) -> Result<()> {
            self.0.lock().push(format!("put {}={}", key, value));
            Ok(())
        }

        fn on_evict(&self, key: &&'static str, _value: &u32) -> Result<()> {
            self.0.lock().push(format!("evict {}", key));
            Ok(())
        }
    }

    #[test]
    fn test_lru_eviction_scenario() {
        let mut cache = lru(2);

        cache.put("x", 1).unwrap();
        cache.put("y", 2).unwrap();
        cache.put("z", 3).unwrap(); // Should evict x
        assert!(!cache.contains(&"x"));

        assert_eq!(cache.get(&"y").unwrap(), Some(&2));
        cache.put("w", 4).unwrap(); // Should evict z, not y

        assert!(!cache.contains(&"z"));
        assert!(cache.contains(&"y"));
        assert!(cache.contains(&"w"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_update_does_not_evict() {
        let mut cache = lru(2);

        cache.put("a", 1).unwrap();
        cache.put("b", 2).unwrap();
        cache.put("a", 10).unwrap();

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.peek(&"a"), Some(&10));
        assert_eq!(cache.eldest_entry().map(|e| *e.key), Some("b"));
    }

    #[test]
    fn test_fifo_capacity_ignores_reads() {
        let mut cache = ObservableCache::new(FifoCache::new(), CapacityPolicy::new(2));

        cache.put("a", 1).unwrap();
        cache.put("b", 2).unwrap();
        cache.get(&"a").unwrap();
        cache.put("c", 3).unwrap(); // FIFO: a goes even though it was read

        assert!(!cache.contains(&"a"));
        assert!(cache.contains(&"b"));
        assert!(cache.contains(&"c"));
    }

    #[test]
    fn test_event_order() {
        let events = Arc::new(Events::default());
        let mut cache = lru(1);
        cache.add_listener(events.clone());

        cache.get(&"a").unwrap();
        cache.put("a", 1).unwrap();
        cache.get(&"a").unwrap();
        cache.put("b", 2).unwrap();

        assert_eq!(
            *events.0.lock(),
            vec!["miss a", "put a=1", "hit a", "put b=2", "evict a"]
        );
    }

    #[test]
    fn test_zero_capacity_evicts_new_entry() {
        let stats = Arc::new(StatsListener::new());
        let mut cache = lru(0);
        cache.add_listener(stats.clone());

        cache.put("a", 1).unwrap();

        assert!(cache.is_empty());
        assert_eq!(stats.updates(), 1);
        assert_eq!(stats.evictions(), 1);
    }

    #[test]
    fn test_expire_policy_purges_before_read() {
        let clock = ManualClock::new(0);
        let shared: Arc<dyn crate::clock::Clock> = Arc::new(clock.clone());
        let mut cache = ObservableCache::new(
            TimeAwareCache::with_clock(shared.clone()),
            ExpirePolicy::new(Duration::from_millis(100), shared),
        );
        let stats = Arc::new(StatsListener::new());
        cache.add_listener(stats.clone());

        cache.put("old", 1).unwrap();
        clock.advance(Duration::from_millis(60));
        cache.put("new", 2).unwrap();
        clock.advance(Duration::from_millis(60));

        // Reading "new" purges "old" first
        assert_eq!(cache.get(&"new").unwrap(), Some(&2));
        assert!(!cache.contains(&"old"));
        assert_eq!(cache.inner().timestamp_of(&"old"), None);

        clock.advance(Duration::from_millis(100));
        assert_eq!(cache.get(&"new").unwrap(), None);
        assert!(cache.is_empty());
        assert_eq!(stats.hits(), 1);
        assert_eq!(stats.misses(), 1);
        assert_eq!(stats.evictions(), 2);
        cache.inner().check_invariants().unwrap();
    }

    #[test]
    fn test_huge_max_age_keeps_entries() {
        let clock = ManualClock::new(0);
        let shared: Arc<dyn crate::clock::Clock> = Arc::new(clock.clone());
        let mut cache = ObservableCache::new(
            TimeAwareCache::with_clock(shared.clone()),
            ExpirePolicy::new(Duration::from_secs(1 << 62), shared),
        );

        cache.put("k", 1).unwrap();
        clock.advance(Duration::from_millis(1));
        assert_eq!(cache.get(&"k").unwrap(), Some(&1));
    }

    #[test]
    fn test_system_clocks_built_apart_agree() {
        let policy = ExpirePolicy::new(
            Duration::from_millis(100),
            Arc::new(crate::clock::SystemClock::new()),
        );
        std::thread::sleep(Duration::from_millis(200));
        let mut cache = ObservableCache::new(TimeAwareCache::new(), policy);

        cache.put("k", 1).unwrap();
        std::thread::sleep(Duration::from_millis(10));
        assert_eq!(cache.get(&"k").unwrap(), Some(&1));
    }

    #[test]
    fn test_failing_put_listener_still_evicts() {
        struct RejectPuts;
        impl CacheListener<&'static str, u32> for RejectPuts {
            fn on_put(&self, _key: &&'static str, _value: &u32) -> Result<()> {
                Err(Error::listener("read-only observer"))
            }
        }

        let mut cache = lru(1);
        cache.add_listener(Arc::new(RejectPuts));

        cache.put("a", 1).unwrap_err();
        assert!(matches!(cache.put("b", 2), Err(Error::Listener(_))));

        assert_eq!(cache.len(), 1);
        assert!(cache.contains(&"b"));
    }

    #[test]
    fn test_clear_and_remove_are_silent() {
        let events = Arc::new(Events::default());
        let mut cache = ObservableCache::new(LruCache::new(), NeverStale);
        cache.add_listener(events.clone());

        cache.put("a", 1).unwrap();
        assert_eq!(cache.remove(&"a"), Some(1));
        cache.put("b", 2).unwrap();
        cache.clear();

        assert!(cache.is_empty());
        assert!(cache.eldest_entry().is_none());
        assert_eq!(*events.0.lock(), vec!["put a=1", "put b=2"]);
    }

    #[test]
    fn test_set_stale_policy_applies_on_next_put() {
        let mut cache = lru(10);
        for (i, key) in ["a", "b", "c", "d"].into_iter().enumerate() {
            cache.put(key, i as u32).unwrap();
        }

        cache.set_stale_policy(CapacityPolicy::new(2));
        assert_eq!(cache.len(), 4);
        assert_eq!(cache.stale_policy().capacity(), 2);

        cache.put("e", 4).unwrap();
        assert_eq!(cache.len(), 2);
        assert!(cache.contains(&"d"));
        assert!(cache.contains(&"e"));
    }
}
