//! Index-or-fetch resolution and the shared cache context

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use dexcache_protocol::{Category, Key, Source};
use tokio::sync::{Mutex as AsyncMutex, OnceCell};
use tracing::{debug, trace};

use crate::config::{CacheConfig, Localization};
use crate::error::CacheError;
use crate::search::Directory;
use crate::store::Store;
use crate::types::{Ability, Entity, Move, Pokemon, Species, Type};

/// Store and indices of one category, plus the in-flight fetch gates.
///
/// The store lock is only held for index lookups and inserts, never across
/// a fetch. A gate per uncached key makes concurrent callers for that key
/// wait for the first caller's fetch instead of issuing their own.
#[derive(Debug)]
pub struct Table<T> {
    store: RwLock<Store<T>>,
    inflight: Mutex<HashMap<Key, Arc<AsyncMutex<()>>>>,
}

impl<T: Entity> Table<T> {
    fn new() -> Self {
        Self {
            store: RwLock::new(Store::new()),
            inflight: Mutex::new(HashMap::new()),
        }
    }

    /// Index lookup, no I/O
    pub fn find(&self, key: &Key) -> Option<Arc<T>> {
        self.store
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .find(key)
    }

    pub fn len(&self) -> usize {
        self.store
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sizes of (records, id index, name index)
    pub fn index_sizes(&self) -> (usize, usize, usize) {
        self.store
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .index_sizes()
    }

    /// Every cached entity, in insertion order
    pub fn snapshot(&self) -> Vec<Arc<T>> {
        self.store
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    fn insert(&self, entity: T) -> Arc<T> {
        self.store
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(entity)
    }

    /// Join (or open) the in-flight gate for `key`
    fn gate(&self, key: &Key) -> Gate<'_, T> {
        let mut inflight = self
            .inflight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let lock = Arc::clone(inflight.entry(key.clone()).or_default());
        Gate {
            table: self,
            key: key.clone(),
            lock,
        }
    }
}

/// A caller's hold on an in-flight gate.
///
/// Dropping it, on any path including cancellation, removes the map entry
/// once no other caller holds the same gate. Callers still queued keep it
/// alive so late arrivals line up behind them instead of opening a new one.
struct Gate<'a, T> {
    table: &'a Table<T>,
    key: Key,
    lock: Arc<AsyncMutex<()>>,
}

impl<T> Drop for Gate<'_, T> {
    fn drop(&mut self) {
        let mut inflight = self
            .table
            .inflight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let ours = inflight
            .get(&self.key)
            .is_some_and(|lock| Arc::ptr_eq(lock, &self.lock));
        // Map entry plus this hold: nobody else is waiting
        if ours && Arc::strong_count(&self.lock) == 2 {
            inflight.remove(&self.key);
        }
    }
}

/// The lookup cache: one table per category in front of a backing source.
///
/// Construct once and share it (by reference or `Arc`) between every
/// concurrent query. Entries are never evicted.
pub struct Cache<S> {
    source: S,
    config: CacheConfig,
    localization: Arc<Localization>,
    pokemon: Table<Pokemon>,
    species: Table<Species>,
    types: Table<Type>,
    abilities: Table<Ability>,
    moves: Table<Move>,
    pub(crate) directory: OnceCell<Directory>,
}

impl<S: Source> Cache<S> {
    pub fn new(source: S) -> Self {
        Self::with_config(source, CacheConfig::default())
    }

    pub fn with_config(source: S, config: CacheConfig) -> Self {
        let localization = Arc::new(config.localization.clone());
        Self {
            source,
            config,
            localization,
            pokemon: Table::new(),
            species: Table::new(),
            types: Table::new(),
            abilities: Table::new(),
            moves: Table::new(),
            directory: OnceCell::new(),
        }
    }

    /// Use a prebuilt search directory instead of scanning the source
    pub fn with_directory(self, directory: Directory) -> Self {
        Self {
            directory: OnceCell::new_with(Some(directory)),
            ..self
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn localization(&self) -> &Localization {
        &self.localization
    }

    pub async fn pokemon_by_id(&self, id: u32) -> Result<Arc<Pokemon>, CacheError> {
        self.resolve(&self.pokemon, Key::Id(id)).await
    }

    pub async fn pokemon_by_name(&self, name: &str) -> Result<Arc<Pokemon>, CacheError> {
        self.resolve(&self.pokemon, name_key(name)?).await
    }

    pub async fn species_by_name(&self, name: &str) -> Result<Arc<Species>, CacheError> {
        self.resolve(&self.species, name_key(name)?).await
    }

    pub async fn type_by_name(&self, name: &str) -> Result<Arc<Type>, CacheError> {
        self.resolve(&self.types, name_key(name)?).await
    }

    pub async fn ability_by_name(&self, name: &str) -> Result<Arc<Ability>, CacheError> {
        self.resolve(&self.abilities, name_key(name)?).await
    }

    pub async fn move_by_name(&self, name: &str) -> Result<Arc<Move>, CacheError> {
        self.resolve(&self.moves, name_key(name)?).await
    }

    pub fn pokemon(&self) -> &Table<Pokemon> {
        &self.pokemon
    }

    pub fn species(&self) -> &Table<Species> {
        &self.species
    }

    pub fn types(&self) -> &Table<Type> {
        &self.types
    }

    pub fn abilities(&self) -> &Table<Ability> {
        &self.abilities
    }

    pub fn moves(&self) -> &Table<Move> {
        &self.moves
    }

    /// Number of cached entities in a category
    pub fn cached(&self, category: Category) -> usize {
        match category {
            Category::Pokemon => self.pokemon.len(),
            Category::Species => self.species.len(),
            Category::Type => self.types.len(),
            Category::Ability => self.abilities.len(),
            Category::Move => self.moves.len(),
        }
    }

    async fn resolve<T: Entity>(&self, table: &Table<T>, key: Key) -> Result<Arc<T>, CacheError> {
        let category = T::CATEGORY;
        if let Some(hit) = table.find(&key) {
            trace!(%category, %key, "cache hit");
            return Ok(hit);
        }

        let gate = table.gate(&key);
        let _pending = gate.lock.lock().await;

        // The caller holding the gate before us may have inserted it
        if let Some(hit) = table.find(&key) {
            trace!(%category, %key, "resolved by concurrent fetch");
            return Ok(hit);
        }

        self.fetch_and_insert(table, &key).await
    }

    async fn fetch_and_insert<T: Entity>(
        &self,
        table: &Table<T>,
        key: &Key,
    ) -> Result<Arc<T>, CacheError> {
        let category = T::CATEGORY;
        debug!(%category, %key, "cache miss, fetching");

        let Some(raw) = self.source.fetch(category, key).await? else {
            debug!(%category, %key, "not present in backing source");
            return Err(CacheError::NotFound {
                category,
                key: key.clone(),
            });
        };

        let entity = T::from_raw(raw, &self.localization)?;
        let matches = match key {
            Key::Id(id) => entity.id() == *id,
            Key::Name(name) => entity.name() == name.as_str(),
        };
        if !matches {
            return Err(CacheError::DataIntegrity(format!(
                "requested {} {} but received {} (#{})",
                category,
                key,
                entity.name(),
                entity.id()
            )));
        }

        Ok(table.insert(entity))
    }
}

/// Parse user text into an id; digits only
pub fn parse_id(text: &str) -> Result<u32, CacheError> {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CacheError::InvalidArgument(format!(
            "'{}' is not a numeric id",
            text
        )));
    }
    text.parse::<u32>()
        .map_err(|_| CacheError::InvalidArgument(format!("id '{}' is out of range", text)))
}

fn name_key(name: &str) -> Result<Key, CacheError> {
    if name.is_empty() {
        return Err(CacheError::InvalidArgument("name cannot be empty".to_string()));
    }
    if name.contains('/') || name.chars().any(char::is_whitespace) {
        return Err(CacheError::InvalidArgument(format!(
            "'{}' is not a valid identifier",
            name
        )));
    }
    // Sources serve `pokemon/6` for both keys; an id must come in as an id
    if name.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CacheError::InvalidArgument(format!(
            "'{}' is an id, not a name",
            name
        )));
    }
    Ok(Key::name(name))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::fixtures::{self, MemorySource};
    use crate::memo::Field;

    fn cache() -> Cache<MemorySource> {
        Cache::new(MemorySource::dex())
    }

    #[tokio::test]
    async fn test_second_resolution_is_an_index_hit() {
        let cache = cache();

        let first = cache.pokemon_by_id(6).await.unwrap();
        let second = cache.pokemon_by_id(6).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.source().fetches(Category::Pokemon, 6u32), 1);
    }

    #[tokio::test]
    async fn test_insert_is_visible_through_both_indices() {
        let cache = cache();

        let by_id = cache.pokemon_by_id(6).await.unwrap();
        let by_name = cache.pokemon_by_name("charizard").await.unwrap();

        assert!(Arc::ptr_eq(&by_id, &by_name));
        assert_eq!(cache.source().total_fetches(), 1);
        assert_eq!(cache.pokemon().index_sizes(), (1, 1, 1));
    }

    #[tokio::test]
    async fn test_missing_record_is_not_found_and_not_cached() {
        let cache = cache();
        cache.pokemon_by_id(6).await.unwrap();

        let err = cache.pokemon_by_name("missingno").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(cache.pokemon().index_sizes(), (1, 1, 1));

        // No negative caching
        let err = cache.pokemon_by_name("missingno").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(cache.source().fetches(Category::Pokemon, "missingno"), 2);
    }

    #[tokio::test]
    async fn test_concurrent_resolution_fetches_once() {
        let cache = Arc::new(Cache::new(
            MemorySource::dex().with_delay(Duration::from_millis(20)),
        ));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move { cache.type_by_name("fire").await })
            })
            .collect();

        let mut resolved = Vec::new();
        for task in tasks {
            resolved.push(task.await.unwrap().unwrap());
        }

        assert_eq!(cache.source().fetches(Category::Type, "fire"), 1);
        assert!(resolved.iter().all(|kind| Arc::ptr_eq(kind, &resolved[0])));
        assert_eq!(cache.types().len(), 1);
    }

    #[tokio::test]
    async fn test_racing_id_and_name_lookups_keep_one_entity() {
        let cache = Cache::new(MemorySource::dex().with_delay(Duration::from_millis(10)));

        let (by_id, by_name) = tokio::join!(
            cache.pokemon_by_id(6),
            cache.pokemon_by_name("charizard")
        );

        assert!(Arc::ptr_eq(&by_id.unwrap(), &by_name.unwrap()));
        assert_eq!(cache.pokemon().index_sizes(), (1, 1, 1));
    }

    fn open_gates<T: Entity>(table: &Table<T>) -> usize {
        table.inflight.lock().unwrap().len()
    }

    #[tokio::test]
    async fn test_late_caller_waits_behind_retry_after_failed_fetch() {
        let source = MemorySource::dex()
            .with_delay(Duration::from_millis(100))
            .with_failures(1);
        let cache = Arc::new(Cache::new(source));

        let spawn = |cache: &Arc<Cache<MemorySource>>| {
            let cache = Arc::clone(cache);
            tokio::spawn(async move { cache.type_by_name("fire").await })
        };

        // First fetch fails at ~100ms, the queued caller retries until ~200ms
        let first = spawn(&cache);
        tokio::time::sleep(Duration::from_millis(20)).await;
        let queued = spawn(&cache);
        tokio::time::sleep(Duration::from_millis(110)).await;
        let late = spawn(&cache);

        assert!(matches!(first.await.unwrap(), Err(CacheError::Fetch(_))));
        let queued = queued.await.unwrap().unwrap();
        let late = late.await.unwrap().unwrap();

        assert!(Arc::ptr_eq(&queued, &late));
        assert_eq!(cache.source().fetches(Category::Type, "fire"), 2);
        assert_eq!(open_gates(cache.types()), 0);
    }

    #[tokio::test]
    async fn test_cancelled_fetch_releases_its_gate() {
        let cache = Arc::new(Cache::new(
            MemorySource::dex().with_delay(Duration::from_millis(100)),
        ));

        let task = {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move { cache.type_by_name("fire").await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        task.abort();
        assert!(task.await.unwrap_err().is_cancelled());

        assert_eq!(open_gates(cache.types()), 0);
        assert!(cache.types().is_empty());

        cache.type_by_name("fire").await.unwrap();
        assert_eq!(cache.source().fetches(Category::Type, "fire"), 2);
    }

    #[tokio::test]
    async fn test_gates_are_released_after_resolution() {
        let cache = cache();

        cache.pokemon_by_id(6).await.unwrap();
        cache.pokemon_by_name("missingno").await.unwrap_err();

        assert_eq!(open_gates(cache.pokemon()), 0);
    }

    #[tokio::test]
    async fn test_invalid_names_are_rejected_without_io() {
        let cache = cache();

        for name in ["", "char izard", "pokemon/6", "fire\n", "6", "006"] {
            let err = cache.pokemon_by_name(name).await.unwrap_err();
            assert!(matches!(err, CacheError::InvalidArgument(_)), "{name:?}");
        }
        assert_eq!(cache.source().total_fetches(), 0);
        assert!(cache.pokemon().is_empty());
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("6").unwrap(), 6);
        assert_eq!(parse_id(" 151 ").unwrap(), 151);
        assert_eq!(parse_id("006").unwrap(), 6);

        for text in ["", "six", "-6", "6.0", "+6", "99999999999"] {
            assert!(
                matches!(parse_id(text), Err(CacheError::InvalidArgument(_))),
                "{text:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_key_mismatch_is_integrity_error() {
        let source = MemorySource::dex().with_override(
            Category::Pokemon,
            Key::name("charizard"),
            fixtures::charmander(),
        );
        let cache = Cache::new(source);

        let err = cache.pokemon_by_name("charizard").await.unwrap_err();
        assert!(matches!(err, CacheError::DataIntegrity(_)));
        assert!(cache.pokemon().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_record_is_integrity_error() {
        let source = MemorySource::new().with(Category::Type, json!({ "id": "ten", "name": "fire" }));
        let cache = Cache::new(source);

        let err = cache.type_by_name("fire").await.unwrap_err();
        assert!(matches!(err, CacheError::DataIntegrity(_)));
        assert!(cache.types().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_error_leaves_cache_untouched() {
        let cache = cache();
        cache.source().set_failing(true);

        let err = cache.move_by_name("flamethrower").await.unwrap_err();
        assert!(matches!(err, CacheError::Fetch(_)));
        assert!(cache.moves().is_empty());

        cache.source().set_failing(false);
        let mv = cache.move_by_name("flamethrower").await.unwrap();
        assert_eq!(mv.id(), 53);
    }

    #[tokio::test]
    async fn test_pokemon_fields_resolve_lazily() {
        let cache = cache();
        let charizard = cache.pokemon_by_id(6).await.unwrap();

        assert!(matches!(charizard.types_state(), Field::Unresolved));
        assert_eq!(cache.source().total_fetches(), 1);

        let types: Vec<_> = charizard
            .types(&cache)
            .await
            .unwrap()
            .iter()
            .map(|kind| kind.name().to_string())
            .collect();
        assert_eq!(types, vec!["fire", "flying"]);
        assert!(charizard.types_state().is_resolved());

        let fetched = cache.source().total_fetches();
        charizard.types(&cache).await.unwrap();
        assert_eq!(cache.source().total_fetches(), fetched);
    }

    #[tokio::test]
    async fn test_related_records_are_shared_between_pokemon() {
        let cache = cache();
        let charizard = cache.pokemon_by_name("charizard").await.unwrap();
        let charmander = cache.pokemon_by_name("charmander").await.unwrap();

        let a = &charizard.types(&cache).await.unwrap()[0];
        let b = &charmander.types(&cache).await.unwrap()[0];

        assert!(Arc::ptr_eq(a, b));
        assert_eq!(cache.source().fetches(Category::Type, "fire"), 1);
    }

    #[tokio::test]
    async fn test_hidden_ability_empty_and_resolved() {
        let cache = cache();

        let charizard = cache.pokemon_by_id(6).await.unwrap();
        let hidden = charizard.hidden_ability(&cache).await.unwrap().unwrap();
        assert_eq!(hidden.name(), "solar-power");

        let mew = cache.pokemon_by_id(151).await.unwrap();
        assert!(mew.hidden_ability(&cache).await.unwrap().is_none());
        assert!(matches!(mew.hidden_ability_state(), Field::Empty));
    }

    #[tokio::test]
    async fn test_missing_related_record_is_integrity_error() {
        let source = MemorySource::new().with(
            Category::Pokemon,
            fixtures::pokemon(
                999,
                "glitch",
                "glitch",
                &["shadow"],
                &[],
                [1, 1, 1, 1, 1, 1],
            ),
        );
        let cache = Cache::new(source);
        let glitch = cache.pokemon_by_id(999).await.unwrap();

        let err = glitch.types(&cache).await.unwrap_err();
        assert!(matches!(err, CacheError::DataIntegrity(_)));
        assert!(matches!(glitch.types_state(), Field::Unresolved));
    }

    #[tokio::test]
    async fn test_cached_counts_per_category() {
        let cache = cache();
        let charizard = cache.pokemon_by_id(6).await.unwrap();
        charizard.abilities(&cache).await.unwrap();
        charizard.hidden_ability(&cache).await.unwrap();

        assert_eq!(cache.cached(Category::Pokemon), 1);
        assert_eq!(cache.cached(Category::Ability), 2);
        assert_eq!(cache.cached(Category::Type), 0);
    }
}
