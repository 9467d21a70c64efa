//! Cache event listeners
//!
//! Listeners run synchronously on the thread performing the cache operation.
//! A listener error aborts the fan-out and is returned to the caller of that
//! operation; the engine never swallows it.

mod key_stats;
mod stats;

use std::sync::Arc;

use crate::error::Result;

pub use key_stats::KeyStatsListener;
pub use stats::StatsListener;

/// Receives cache events
///
/// Every method defaults to doing nothing, so a listener implements only the
/// events it cares about.
pub trait CacheListener<K, V>: Send + Sync {
    /// A lookup found `key`
    fn on_hit(&self, _key: &K) -> Result<()> {
        Ok(())
    }

    /// A lookup did not find `key`
    fn on_miss(&self, _key: &K) -> Result<()> {
        Ok(())
    }

    /// `key` was inserted or updated with `value`
    fn on_put(&self, _key: &K, _value: &V) -> Result<()> {
        Ok(())
    }

    /// The stale policy evicted `key`
    fn on_evict(&self, _key: &K, _value: &V) -> Result<()> {
        Ok(())
    }
}

/// Forwards every event to the listeners registered with it
pub struct BroadcastListener<K, V> {
    listeners: Vec<Arc<dyn CacheListener<K, V>>>,
}

impl<K, V> BroadcastListener<K, V> {
    /// Create a broadcaster with no listeners
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Register a listener; events reach listeners in registration order
    pub fn add_listener(&mut self, listener: Arc<dyn CacheListener<K, V>>) {
        self.listeners.push(listener);
    }

    /// Number of registered listeners
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Check if no listener is registered
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<K, V> Default for BroadcastListener<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> CacheListener<K, V> for BroadcastListener<K, V> {
    fn on_hit(&self, key: &K) -> Result<()> {
        for listener in &self.listeners {
            listener.on_hit(key)?;
        }
        Ok(())
    }

    fn on_miss(&self, key: &K) -> Result<()> {
        for listener in &self.listeners {
            listener.on_miss(key)?;
        }
        Ok(())
    }

    fn on_put(&self, key: &K, value: &V) -> Result<()> {
        for listener in &self.listeners {
            listener.on_put(key, value)?;
        }
        Ok(())
    }

    fn on_evict(&self, key: &K, value: &V) -> Result<()> {
        for listener in &self.listeners {
            listener.on_evict(key, value)?;
        }
        Ok(())
    }
}
