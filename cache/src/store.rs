//! Per-category record store with its id and name indices

use std::sync::Arc;

use dexcache_protocol::Key;

use crate::index::SortedIndex;
use crate::types::Entity;

/// Append-only storage for one category.
///
/// Every stored entity is reachable through both indices; `insert` is the
/// only way in and updates all three together.
#[derive(Debug)]
pub struct Store<T> {
    records: Vec<Arc<T>>,
    by_id: SortedIndex<u32, T>,
    by_name: SortedIndex<String, T>,
}

impl<T: Entity> Store<T> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            by_id: SortedIndex::new(T::id),
            by_name: SortedIndex::new(|entity: &T| entity.name().to_string()),
        }
    }

    /// Look up by either key kind
    pub fn find(&self, key: &Key) -> Option<Arc<T>> {
        match key {
            Key::Id(id) => self.by_id.find(id),
            Key::Name(name) => self.by_name.find(name.as_str()),
        }
    }

    /// Insert unless an entity with the same id or name is already stored.
    ///
    /// Returns the stored entity, which is the earlier one when the insert
    /// lost a race against another resolution of the same record.
    pub fn insert(&mut self, entity: T) -> Arc<T> {
        if let Some(existing) = self
            .by_id
            .find(&entity.id())
            .or_else(|| self.by_name.find(entity.name()))
        {
            return existing;
        }

        let entity = Arc::new(entity);
        self.records.push(Arc::clone(&entity));
        self.by_id.insert(Arc::clone(&entity));
        self.by_name.insert(Arc::clone(&entity));
        entity
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Entities in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<T>> {
        self.records.iter()
    }

    /// Sizes of (records, id index, name index)
    pub fn index_sizes(&self) -> (usize, usize, usize) {
        (self.records.len(), self.by_id.len(), self.by_name.len())
    }
}

impl<T: Entity> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}
