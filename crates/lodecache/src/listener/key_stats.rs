//! Per-key cache statistics

use std::collections::HashMap;
use std::hash::Hash;

use ahash::RandomState;
use parking_lot::Mutex;

use super::CacheListener;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy)]
struct Count {
    count: u64,
    first_seen: u64,
}

#[derive(Debug)]
struct Counter<K> {
    counts: HashMap<K, Count, RandomState>,
    next_seq: u64,
}

impl<K> Counter<K>
where
    K: Hash + Eq + Clone,
{
    fn new() -> Self {
        Self {
            counts: HashMap::with_hasher(RandomState::new()),
            next_seq: 0,
        }
    }

    fn bump(&mut self, key: &K) {
        if let Some(entry) = self.counts.get_mut(key) {
            entry.count += 1;
            return;
        }
        self.counts.insert(
            key.clone(),
            Count {
                count: 1,
                first_seen: self.next_seq,
            },
        );
        self.next_seq += 1;
    }

    fn distinct(&self) -> usize {
        self.counts.len()
    }

    fn get(&self, key: &K) -> u64 {
        self.counts.get(key).map_or(0, |entry| entry.count)
    }

    fn top(&self, n: usize, what: &str) -> Result<Vec<K>> {
        if n > self.counts.len() {
            return Err(Error::InvalidArgument(format!(
                "asked for top {} {} keys, only {} distinct keys recorded",
                n,
                what,
                self.counts.len()
            )));
        }

        let mut ranked: Vec<(&K, &Count)> = self.counts.iter().collect();
        // Highest count first, earliest key first among equal counts
        ranked.sort_unstable_by(|a, b| {
            b.1.count
                .cmp(&a.1.count)
                .then(a.1.first_seen.cmp(&b.1.first_seen))
        });
        Ok(ranked
            .into_iter()
            .take(n)
            .map(|(key, _)| key.clone())
            .collect())
    }
}

#[derive(Debug)]
struct KeyCounters<K> {
    hits: Counter<K>,
    misses: Counter<K>,
    updates: Counter<K>,
}

/// Counts hits, misses and updates for each key
///
/// Ties in the top-key rankings go to the key that was counted first.
#[derive(Debug)]
pub struct KeyStatsListener<K> {
    counters: Mutex<KeyCounters<K>>,
}

impl<K> KeyStatsListener<K>
where
    K: Hash + Eq + Clone,
{
    /// Create an empty per-key tracker
    pub fn new() -> Self {
        Self {
            counters: Mutex::new(KeyCounters {
                hits: Counter::new(),
                misses: Counter::new(),
                updates: Counter::new(),
            }),
        }
    }

    /// Number of hits recorded for `key`
    pub fn key_hits(&self, key: &K) -> u64 {
        self.counters.lock().hits.get(key)
    }

    /// Number of misses recorded for `key`
    pub fn key_misses(&self, key: &K) -> u64 {
        self.counters.lock().misses.get(key)
    }

    /// Number of updates recorded for `key`
    pub fn key_updates(&self, key: &K) -> u64 {
        self.counters.lock().updates.get(key)
    }

    /// Number of distinct keys hit at least once
    pub fn hit_key_count(&self) -> usize {
        self.counters.lock().hits.distinct()
    }

    /// Number of distinct keys missed at least once
    pub fn missed_key_count(&self) -> usize {
        self.counters.lock().misses.distinct()
    }

    /// Number of distinct keys updated at least once
    pub fn updated_key_count(&self) -> usize {
        self.counters.lock().updates.distinct()
    }

    /// The `n` most hit keys, most hit first
    ///
    /// Fails with [`Error::InvalidArgument`] when `n` exceeds the number of
    /// keys that have been hit at least once.
    pub fn top_hit_keys(&self, n: usize) -> Result<Vec<K>> {
        self.counters.lock().hits.top(n, "hit")
    }

    /// The `n` most missed keys, most missed first
    pub fn top_missed_keys(&self, n: usize) -> Result<Vec<K>> {
        self.counters.lock().misses.top(n, "missed")
    }

    /// The `n` most updated keys, most updated first
    pub fn top_updated_keys(&self, n: usize) -> Result<Vec<K>> {
        self.counters.lock().updates.top(n, "updated")
    }
}

impl<K> Default for KeyStatsListener<K>
where
    K: Hash + Eq + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> CacheListener<K, V> for KeyStatsListener<K>
where
    K: Hash + Eq + Clone + Send,
{
    fn on_hit(&self, key: &K) -> Result<()> {
        self.counters.lock().hits.bump(key);
        Ok(())
    }

    fn on_miss(&self, key: &K) -> Result<()> {
        self.counters.lock().misses.bump(key);
        Ok(())
    }

    fn on_put(&self, key: &K, _value: &V) -> Result<()> {
        self.counters.lock().updates.bump(key);
        Ok(())
    }
}
