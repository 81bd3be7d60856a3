//! An explicit cache for expensive values, such as loaded embeddings, keyed by
//! their configuration.

use std::{
    collections::{hash_map::Entry, HashMap},
    hash::Hash,
};

/// A cache that builds each value at most once.
///
/// The cache is an ordinary value owned by the caller and passed by reference
/// to whatever needs it. Failed builds are not cached.
#[derive(Debug, Clone)]
pub struct KeyedCache<K, V> {
    /// The values built so far.
    values: HashMap<K, V>,
}

impl<K, V> Default for KeyedCache<K, V> {
    fn default() -> Self {
        Self { values: HashMap::new() }
    }
}

impl<K: Eq + Hash + Clone, V> KeyedCache<K, V> {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value for `key`, building it with `factory` if it is not in
    /// the cache yet.
    ///
    /// # Errors
    ///
    /// * Whatever `factory` returns. The cache is left unchanged.
    pub fn get_or_create<E, F>(&mut self, key: &K, factory: F) -> Result<&V, E>
    where
        F: FnOnce(&K) -> Result<V, E>,
    {
        match self.values.entry(key.clone()) {
            Entry::Occupied(e) => Ok(e.into_mut()),
            Entry::Vacant(e) => Ok(e.insert(factory(key)?)),
        }
    }

    /// The value for `key`, if it has been built.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.values.get(key)
    }

    /// Whether a value for `key` has been built.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.values.contains_key(key)
    }

    /// The number of cached values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
