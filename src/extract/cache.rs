//! Fixed-capacity least-recently-used cache.
//!
//! Entries live in a `HashMap` stamped with a monotonically increasing tick;
//! a `BTreeMap` keyed by tick gives the recency order, so the oldest entry is
//! always `recency.first_key_value()`. Lookups and inserts are `O(log n)`.
//!
//! The cache itself is not synchronized. [`super::CachedExtractor`] wraps it in
//! a `Mutex`.

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

#[derive(Debug)]
pub struct LruCache<K, V> {
    capacity: usize,
    entries: HashMap<K, (V, u64)>,
    recency: BTreeMap<u64, K>,
    tick: u64,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// A capacity of zero disables caching: inserts are dropped.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            recency: BTreeMap::new(),
            tick: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Membership test that does not refresh recency.
    #[cfg(test)]
    fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries.contains_key(key)
    }

    /// Look up `key`, marking it most recently used on a hit.
    pub fn get<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let tick = self.next_tick();
        let (value, stamp) = self.entries.get_mut(key)?;
        let previous = std::mem::replace(stamp, tick);
        if let Some(owned_key) = self.recency.remove(&previous) {
            self.recency.insert(tick, owned_key);
        }
        Some(value.clone())
    }

    /// Insert or replace `key`, returning the entry evicted to make room.
    pub fn insert(&mut self, key: K, value: V) -> Option<(K, V)> {
        if self.capacity == 0 {
            return None;
        }
        let tick = self.next_tick();

        if let Some((existing, stamp)) = self.entries.get_mut(&key) {
            *existing = value;
            let previous = std::mem::replace(stamp, tick);
            self.recency.remove(&previous);
            self.recency.insert(tick, key);
            return None;
        }

        let mut evicted = None;
        if self.entries.len() >= self.capacity {
            if let Some((_, oldest)) = self.recency.pop_first() {
                if let Some((old_value, _)) = self.entries.remove(&oldest) {
                    evicted = Some((oldest, old_value));
                }
            }
        }

        self.entries.insert(key.clone(), (value, tick));
        self.recency.insert(tick, key);
        evicted
    }

    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }
}
