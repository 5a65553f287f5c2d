//! Sorted single-key index over shared entities

use std::borrow::Borrow;
use std::sync::Arc;

/// Entities kept ordered by one key, with binary-search lookup.
///
/// The key is extracted once on insert and stored alongside the entity, so
/// lookups never re-derive it.
#[derive(Debug)]
pub struct SortedIndex<K, T> {
    entries: Vec<(K, Arc<T>)>,
    key: fn(&T) -> K,
}

impl<K: Ord, T> SortedIndex<K, T> {
    /// Create an empty index using `key` as the extractor
    pub fn new(key: fn(&T) -> K) -> Self {
        Self {
            entries: Vec::new(),
            key,
        }
    }

    /// Insert at the sorted position, returns false if the key is already present
    pub fn insert(&mut self, entity: Arc<T>) -> bool {
        let key = (self.key)(&entity);
        match self.entries.binary_search_by(|(k, _)| k.cmp(&key)) {
            Ok(_) => false,
            Err(pos) => {
                self.entries.insert(pos, (key, entity));
                true
            }
        }
    }

    /// Exact-match lookup
    pub fn find<Q>(&self, key: &Q) -> Option<Arc<T>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.entries
            .binary_search_by(|(k, _)| k.borrow().cmp(key))
            .ok()
            .map(|pos| Arc::clone(&self.entries[pos].1))
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.entries
            .binary_search_by(|(k, _)| k.borrow().cmp(key))
            .is_ok()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in ascending order
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }
}
