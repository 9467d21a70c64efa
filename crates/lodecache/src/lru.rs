//! LRU (Least Recently Used) cache implementation
//!
//! Hash index over an arena-backed linked list: every lookup and update moves
//! the touched node to the head, and the tail is the eldest entry. get, put and
//! remove are all O(1).

use std::collections::HashMap;
use std::hash::Hash;
use std::mem;

use ahash::RandomState;

use crate::error::{Error, Result};
use crate::list::{Iter, LinkedSlab, SlotId};
use crate::traits::{Cache, EldestEntry};

/// Recency-ordered cache
///
/// Unbounded on its own; wrap it in an
/// [`ObservableCache`](crate::ObservableCache) with a stale policy to bound it.
#[derive(Debug)]
pub struct LruCache<K, V> {
    map: HashMap<K, SlotId, RandomState>,
    list: LinkedSlab<K, V>,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create an empty LRU cache
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty LRU cache with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
            list: LinkedSlab::with_capacity(capacity),
        }
    }

    /// Entries from most to least recently used
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.list.iter()
    }

    /// Verify that the index and the recency list hold the same keys
    pub fn check_invariants(&self) -> Result<()> {
        self.list.check_invariants()?;

        if self.map.len() != self.list.len() {
            return Err(Error::InvalidState(format!(
                "index holds {} keys, list holds {} nodes",
                self.map.len(),
                self.list.len()
            )));
        }

        for (key, &id) in &self.map {
            match self.list.get(id) {
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

impl<K, V> Default for LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Cache<K, V> for LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    fn get(&mut self, key: &K) -> Option<&V> {
        let id = *self.map.get(key)?;
        // Index and list move in lockstep, so the slot is always linked
        self.list.move_to_front(id).ok()?;
        self.list.get(id).map(|(_, value)| value)
    }

    fn put(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&id) = self.map.get(&key) {
            // Update existing
            let old = self.list.value_mut(id).map(|slot| mem::replace(slot, value));
            self.list.move_to_front(id).ok()?;
            old
        } else {
            // Insert new
            let id = self.list.push_front(key.clone(), value);
            self.map.insert(key, id);
            None
        }
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        let id = self.map.remove(key)?;
        self.list.remove(id).ok().map(|(_, value)| value)
    }

    fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    fn peek(&self, key: &K) -> Option<&V> {
        let id = *self.map.get(key)?;
        self.list.get(id).map(|(_, value)| value)
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn clear(&mut self) {
        self.map.clear();
        self.list.clear();
    }

    fn eldest_entry(&self) -> Option<EldestEntry<'_, K, V>> {
        let tail = self.list.tail()?;
        self.list
            .get(tail)
            .map(|(key, value)| EldestEntry::new(key, value))
    }
}
