//! A key → set-of-values map used as the indexing primitive.
//!
//! Keys and values keep insertion order (backed by `indexmap`) so iteration is
//! deterministic. A key is present iff its value set is non-empty: removing
//! the last value removes the key.

use indexmap::{IndexMap, IndexSet};
use std::borrow::Borrow;
use std::hash::Hash;

#[derive(Debug, Clone)]
pub struct SetMultimap<K, V> {
    map: IndexMap<K, IndexSet<V>>,
}

impl<K, V> Default for SetMultimap<K, V> {
    fn default() -> Self {
        Self {
            map: IndexMap::new(),
        }
    }
}

impl<K, V> SetMultimap<K, V>
where
    K: Hash + Eq,
    V: Hash + Eq,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.contains_key(key)
    }

    pub fn contains<Q, R>(&self, key: &Q, value: &R) -> bool
    where
        K: Borrow<Q>,
        V: Borrow<R>,
        Q: Hash + Eq + ?Sized,
        R: Hash + Eq + ?Sized,
    {
        self.map.get(key).is_some_and(|values| values.contains(value))
    }

    /// Current value set for `key`. Never returns an empty set.
    pub fn get<Q>(&self, key: &Q) -> Option<&IndexSet<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.get(key)
    }

    /// Replace the whole value set for `key`. An empty set removes the key.
    pub fn set(&mut self, key: K, values: IndexSet<V>) {
        if values.is_empty() {
            self.map.shift_remove(&key);
        } else {
            self.map.insert(key, values);
        }
    }

    /// Insert `value` under `key`, creating the set if needed. Idempotent.
    pub fn add(&mut self, key: K, value: V) {
        self.map.entry(key).or_default().insert(value);
    }

    /// Remove `value` from `key`'s set, dropping the key once the set is empty.
    ///
    /// Returns whether the value was present.
    pub fn remove<Q, R>(&mut self, key: &Q, value: &R) -> bool
    where
        K: Borrow<Q>,
        V: Borrow<R>,
        Q: Hash + Eq + ?Sized,
        R: Hash + Eq + ?Sized,
    {
        let Some(values) = self.map.get_mut(key) else {
            return false;
        };
        let removed = values.shift_remove(value);
        if values.is_empty() {
            self.map.shift_remove(key);
        }
        removed
    }

    /// Remove `key` and its whole value set.
    pub fn remove_key<Q>(&mut self, key: &Q) -> Option<IndexSet<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.shift_remove(key)
    }

    /// Iterate `(key, values)` pairs in key insertion order.
    ///
    /// Each call starts a fresh pass over the current state.
    pub fn entries(&self) -> impl Iterator<Item = (&K, &IndexSet<V>)> {
        self.map.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.map.keys()
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }
}
