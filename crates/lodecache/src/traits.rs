//! The capability contract shared by every cache variant

/// Borrowed view of the entry a cache would give up first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EldestEntry<'a, K, V> {
    /// Entry key
    pub key: &'a K,
    /// Entry value
    pub value: &'a V,
    /// Last write time in clock milliseconds, for caches that record one
    pub written_at: Option<u64>,
}

impl<'a, K, V> EldestEntry<'a, K, V> {
    /// Entry without a write timestamp
    pub fn new(key: &'a K, value: &'a V) -> Self {
        Self {
            key,
            value,
            written_at: None,
        }
    }
}

/// Operations every cache variant implements
///
/// Caches only keep their structure in order. Notifications and stale
/// eviction live in [`ObservableCache`](crate::ObservableCache).
pub trait Cache<K, V> {
    /// Look up a value, updating recency where the variant tracks it
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Insert or update a value, returning the value it replaced
    fn put(&mut self, key: K, value: V) -> Option<V>;

    /// Remove a key, returning its value
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Check for a key without touching recency
    fn contains(&self, key: &K) -> bool;

    /// Look up a value without touching recency
    fn peek(&self, key: &K) -> Option<&V>;

    /// Number of stored key-value pairs
    fn len(&self) -> usize;

    /// Check if the cache holds no entries
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry
    fn clear(&mut self);

    /// The entry this variant evicts first, if any
    fn eldest_entry(&self) -> Option<EldestEntry<'_, K, V>>;
}

impl<K, V, C> Cache<K, V> for Box<C>
where
    C: Cache<K, V> + ?Sized,
{
    fn get(&mut self, key: &K) -> Option<&V> {
        (**self).get(key)
    }

    fn put(&mut self, key: K, value: V) -> Option<V> {
        (**self).put(key, value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        (**self).remove(key)
    }

    fn contains(&self, key: &K) -> bool {
        (**self).contains(key)
    }

    fn peek(&self, key: &K) -> Option<&V> {
        (**self).peek(key)
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }

    fn clear(&mut self) {
        (**self).clear()
    }

    fn eldest_entry(&self) -> Option<EldestEntry<'_, K, V>> {
        (**self).eldest_entry()
    }
}
