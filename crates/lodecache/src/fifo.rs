//! FIFO (First In, First Out) cache implementation
//!
//! Insertion-ordered map: reads never reorder, updates keep the original
//! position, and the eldest entry is the first surviving insertion.

use std::collections::HashMap;
use std::hash::Hash;
use std::mem;

use ahash::RandomState;

use crate::error::{Error, Result};
use crate::list::{Iter, LinkedSlab, SlotId};
use crate::traits::{Cache, EldestEntry};

/// Insertion-ordered cache
#[derive(Debug)]
pub struct FifoCache<K, V> {
    map: HashMap<K, SlotId, RandomState>,
    order: LinkedSlab<K, V>,
}

impl<K, V> FifoCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create an empty FIFO cache
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty FIFO cache with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
            order: LinkedSlab::with_capacity(capacity),
        }
    }

    /// Entries from newest to eldest insertion
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.order.iter()
    }

    /// Verify that the index and the insertion order hold the same keys
    pub fn check_invariants(&self) -> Result<()> {
        self.order.check_invariants()?;

        if self.map.len() != self.order.len() {
            return Err(Error::InvalidState(format!(
                "index holds {} keys, order list holds {} nodes",
                self.map.len(),
                self.order.len()
            )));
        }

        for (key, &id) in &self.map {
            match self.order.get(id) {
                Some((node_key, _)) if node_key == key => {}
                _ => {
                    return Err(Error::InvalidState(format!(
                        "index entry points at slot {} with a different key",
                        id.index()
                    )))
                }
            }
        }

        Ok(())
    }
}

impl<K, V> Default for FifoCache<K, V>
where
    K: Hash + Eq + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Cache<K, V> for FifoCache<K, V>
where
    K: Hash + Eq + Clone,
{
    fn get(&mut self, key: &K) -> Option<&V> {
        self.peek(key)
    }

    fn put(&mut self, key: K, value: V) -> Option<V> {
        match self.map.get(&key) {
            Some(&id) => self
                .order
                .value_mut(id)
                .map(|slot| mem::replace(slot, value)),
            None => {
                let id = self.order.push_front(key.clone(), value);
                self.map.insert(key, id);
                None
            }
        }
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        let id = self.map.remove(key)?;
        self.order.remove(id).ok().map(|(_, value)| value)
    }

    fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    fn peek(&self, key: &K) -> Option<&V> {
        let id = *self.map.get(key)?;
        self.order.get(id).map(|(_, value)| value)
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn clear(&mut self) {
        self.map.clear();
        self.order.clear();
    }

    fn eldest_entry(&self) -> Option<EldestEntry<'_, K, V>> {
        let tail = self.order.tail()?;
        self.order
            .get(tail)
            .map(|(key, value)| EldestEntry::new(key, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_eldest_is_first_inserted() {
        let mut cache = FifoCache::new();
        assert!(cache.eldest_entry().is_none());

        cache.put("a", 1);
        cache.put("b", 2);
        cache.put("c", 3);

        assert_eq!(cache.eldest_entry().map(|e| *e.key), Some("a"));
    }

    #[test]
    fn test_fifo_get_does_not_reorder() {
        let mut cache = FifoCache::new();

        cache.put("a", 1);
        cache.put("b", 2);
        assert_eq!(cache.get(&"a"), Some(&1));
        assert_eq!(cache.get(&"a"), Some(&1));

        assert_eq!(cache.eldest_entry().map(|e| *e.key), Some("a"));
    }

    #[test]
    fn test_fifo_update_keeps_position() {
        let mut cache = FifoCache::new();

        cache.put("a", 1);
        cache.put("b", 2);
        assert_eq!(cache.put("a", 10), Some(1));

        let eldest = cache.eldest_entry().unwrap();
        assert_eq!((*eldest.key, *eldest.value), ("a", 10));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_fifo_remove_preserves_order() {
        let mut cache = FifoCache::new();

        cache.put("a", 1);
        cache.put("b", 2);
        cache.put("c", 3);

        assert_eq!(cache.remove(&"b"), Some(2));
        assert_eq!(cache.remove(&"missing"), None);
        let order: Vec<_> = cache.iter().map(|(k, _)| *k).collect();
        assert_eq!(order, vec!["c", "a"]);

        assert_eq!(cache.remove(&"a"), Some(1));
        assert_eq!(cache.eldest_entry().map(|e| *e.key), Some("c"));
    }

    #[test]
    fn test_fifo_invariants_after_churn() {
        let mut cache = FifoCache::new();

        for round in 0..4u32 {
            cache.put("a", round);
            cache.put("b", round);
            cache.remove(&"a");
            cache.put("c", round);
            cache.check_invariants().unwrap();
        }

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.iter().count(), 2);
    }

    #[test]
    fn test_fifo_clear() {
        let mut cache = FifoCache::new();

        cache.put("a", 1);
        cache.clear();

        assert!(cache.is_empty());
        assert!(cache.eldest_entry().is_none());
        assert_eq!(cache.get(&"a"), None);
    }
}
