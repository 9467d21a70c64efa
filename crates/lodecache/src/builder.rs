//! Cache factory
//!
//! Builds an [`ObservableCache`] bounded either by entry count (FIFO or LRU)
//! or by entry age (time-aware LRU), with boxed inner cache and policy so
//! every configuration has the same type.
//!
//! ```rust
//! use lodecache::{CacheBuilder, DynCache, Strategy};
//!
//! let mut cache: DynCache<&str, u32> = CacheBuilder::with_capacity(Strategy::Lru, 2).build();
//! cache.put("x", 1).unwrap();
//! cache.put("y", 2).unwrap();
//! cache.put("z", 3).unwrap();
//! assert!(!cache.contains(&"x"));
//! ```

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use crate::clock::{Clock, SystemClock};
use crate::fifo::FifoCache;
use crate::listener::CacheListener;
use crate::lru::LruCache;
use crate::observable::ObservableCache;
use crate::policy::{CapacityPolicy, ExpirePolicy, StalePolicy};
use crate::time_aware::TimeAwareCache;
use crate::traits::Cache;

/// Observable cache with type-erased storage and policy
pub type DynCache<K, V> = ObservableCache<
    K,
    V,
    Box<dyn Cache<K, V> + Send>,
    Box<dyn StalePolicy<K, V> + Send + Sync>,
>;

/// Ordering used by a capacity-bounded cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// First In, First Out eviction.
    Fifo,
    /// Least Recently Used eviction.
    Lru,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Fifo => write!(f, "fifo"),
            Strategy::Lru => write!(f, "lru"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Bound {
    Capacity(Strategy, usize),
    Expiration(Duration),
}

/// Builder for creating cache instances
pub struct CacheBuilder<K, V> {
    bound: Bound,
    clock: Option<Arc<dyn Clock>>,
    listeners: Vec<Arc<dyn CacheListener<K, V>>>,
}

impl<K, V> CacheBuilder<K, V> {
    /// Cache evicting while it holds more than `capacity` entries
    pub fn with_capacity(strategy: Strategy, capacity: usize) -> Self {
        Self::bounded(Bound::Capacity(strategy, capacity))
    }

    /// Time-aware LRU cache expiring entries older than `max_age`
    pub fn with_expiration(max_age: Duration) -> Self {
        Self::bounded(Bound::Expiration(max_age))
    }

    fn bounded(bound: Bound) -> Self {
        Self {
            bound,
            clock: None,
            listeners: Vec::new(),
        }
    }

    /// Time source for expiring caches (defaults to [`SystemClock`])
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Register a listener on the built cache
    pub fn listener(mut self, listener: Arc<dyn CacheListener<K, V>>) -> Self {
        self.listeners.push(listener);
        self
    }

    /// Build the cache
    pub fn build(self) -> DynCache<K, V>
    where
        K: Hash + Eq + Clone + Send + 'static,
        V: Send + 'static,
    {
        let inner: Box<dyn Cache<K, V> + Send>;
        let policy: Box<dyn StalePolicy<K, V> + Send + Sync>;
        match self.bound {
            Bound::Capacity(strategy, capacity) => {
                inner = match strategy {
                    Strategy::Fifo => Box::new(FifoCache::with_capacity(capacity)),
                    Strategy::Lru => Box::new(LruCache::with_capacity(capacity)),
                };
                policy = Box::new(CapacityPolicy::new(capacity));
            }
            Bound::Expiration(max_age) => {
                let clock = self
                    .clock
                    .unwrap_or_else(|| Arc::new(SystemClock::new()));
                inner = Box::new(TimeAwareCache::with_clock(clock.clone()));
                policy = Box::new(ExpirePolicy::new(max_age, clock));
            }
        }

        let mut cache = ObservableCache::new(inner, policy);
        for listener in self.listeners {
            cache.add_listener(listener);
        }
        cache
    }
}
