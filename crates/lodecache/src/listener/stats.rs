//! Aggregate cache statistics

use std::sync::atomic::{AtomicU64, Ordering};

use super::CacheListener;
use crate::error::Result;

/// Counts hits, misses, updates and evictions across all keys
#[derive(Debug, Default)]
pub struct StatsListener {
    hits: AtomicU64,
    misses: AtomicU64,
    updates: AtomicU64,
    evictions: AtomicU64,
}

impl StatsListener {
    /// Create new stats tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Get total hits
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Get total misses
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Get total updates (put operations)
    pub fn updates(&self) -> u64 {
        self.updates.load(Ordering::Relaxed)
    }

    /// Get total stale evictions
    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }

    /// Calculate hit ratio (0.0 to 1.0)
    pub fn hit_ratio(&self) -> f64 {
        let hits = self.hits();
        let total = hits + self.misses();
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }

    /// Reset all statistics
    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.updates.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
    }
}

impl<K, V> CacheListener<K, V> for StatsListener {
    fn on_hit(&self, _key: &K) -> Result<()> {
        self.hits.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn on_miss(&self, _key: &K) -> Result<()> {
        self.misses.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn on_put(&self, _key: &K, _value: &V) -> Result<()> {
        self.updates.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn on_evict(&self, _key: &K, _value: &V) -> Result<()> {
        self.evictions.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listener(stats: &StatsListener) -> &dyn CacheListener<&'static str, u32> {
        stats
    }

    #[test]
    fn test_stats_basic() {
        let stats = StatsListener::new();
        let events = listener(&stats);

        events.on_hit(&"a").unwrap();
        events.on_hit(&"b").unwrap();
        events.on_miss(&"c").unwrap();
        events.on_put(&"c", &3).unwrap();
        events.on_evict(&"a", &1).unwrap();

        assert_eq!(stats.hits(), 2);
        assert_eq!(stats.misses(), 1);
        assert_eq!(stats.updates(), 1);
        assert_eq!(stats.evictions(), 1);
        assert_eq!(stats.hit_ratio(), 2.0 / 3.0);
    }

    #[test]
    fn test_stats_reset() {
        let stats = StatsListener::new();
        let events = listener(&stats);

        events.on_hit(&"a").unwrap();
        events.on_miss(&"b").unwrap();
        stats.reset();

        assert_eq!(stats.hits(), 0);
        assert_eq!(stats.misses(), 0);
        assert_eq!(stats.hit_ratio(), 0.0);
    }
}
