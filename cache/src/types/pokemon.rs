//! Cached Pokemon records and their cross-referenced fields

use std::sync::Arc;

use dexcache_protocol::{AbilitySlot, Category, PokemonRecord, Source, parse_record};
use futures_util::future::try_join_all;
use serde_json::Value;

use super::{Ability, BaseStats, Entity, Type, related};
use crate::config::Localization;
use crate::error::CacheError;
use crate::memo::{AsyncMemo, Field, Memo};
use crate::resolver::Cache;

/// A Pokemon (one variety of a species), e.g. "charizard" or "charizard-mega-x".
///
/// Related records (species, types, abilities) are resolved through the
/// cache the first time an accessor needs them and memoized afterwards.
#[derive(Debug)]
pub struct Pokemon {
    raw: Value,
    record: PokemonRecord,
    display_name: AsyncMemo<String>,
    types: AsyncMemo<Vec<Arc<Type>>>,
    abilities: AsyncMemo<Vec<Arc<Ability>>>,
    hidden_ability: AsyncMemo<Arc<Ability>>,
    stats: Memo<BaseStats>,
}

impl Pokemon {
    pub fn record(&self) -> &PokemonRecord {
        &self.record
    }

    fn owner(&self) -> String {
        format!("pokemon {}", self.record.name)
    }

    /// Localized name taken from the species record.
    ///
    /// `None` when the species has no name in the configured locale.
    pub async fn display_name<S: Source>(
        &self,
        cache: &Cache<S>,
    ) -> Result<Option<&str>, CacheError> {
        let name = self
            .display_name
            .get_or_try_resolve(|| async {
                let species = cache
                    .species_by_name(&self.record.species.name)
                    .await
                    .map_err(|e| related(e, &self.owner()))?;
                Ok::<_, CacheError>(species.display_name().map(str::to_string))
            })
            .await?;
        Ok(name.map(String::as_str))
    }

    pub fn display_name_state(&self) -> Field<&String> {
        self.display_name.state()
    }

    /// Types in slot order
    pub async fn types<S: Source>(&self, cache: &Cache<S>) -> Result<&[Arc<Type>], CacheError> {
        let types = self
            .types
            .get_or_try_resolve(|| async {
                let lookups = self
                    .record
                    .type_names()
                    .into_iter()
                    .map(|name| cache.type_by_name(name));
                let types = try_join_all(lookups)
                    .await
                    .map_err(|e| related(e, &self.owner()))?;
                Ok::<_, CacheError>(Some(types))
            })
            .await?;
        Ok(types.map(Vec::as_slice).unwrap_or_default())
    }

    pub fn types_state(&self) -> Field<&Vec<Arc<Type>>> {
        self.types.state()
    }

    /// Regular (non-hidden) abilities in slot order
    pub async fn abilities<S: Source>(
        &self,
        cache: &Cache<S>,
    ) -> Result<&[Arc<Ability>], CacheError> {
        let abilities = self
            .abilities
            .get_or_try_resolve(|| async {
                let lookups = self
                    .ability_slots(false)
                    .into_iter()
                    .map(|slot| cache.ability_by_name(&slot.ability.name));
                let abilities = try_join_all(lookups)
                    .await
                    .map_err(|e| related(e, &self.owner()))?;
                Ok::<_, CacheError>(Some(abilities))
            })
            .await?;
        Ok(abilities.map(Vec::as_slice).unwrap_or_default())
    }

    /// The hidden ability, `None` when the Pokemon has none
    pub async fn hidden_ability<S: Source>(
        &self,
        cache: &Cache<S>,
    ) -> Result<Option<&Arc<Ability>>, CacheError> {
        self.hidden_ability
            .get_or_try_resolve(|| async {
                match self.ability_slots(true).first() {
                    Some(slot) => cache
                        .ability_by_name(&slot.ability.name)
                        .await
                        .map(Some)
                        .map_err(|e| related(e, &self.owner())),
                    None => Ok(None),
                }
            })
            .await
    }

    pub fn hidden_ability_state(&self) -> Field<&Arc<Ability>> {
        self.hidden_ability.state()
    }

    /// Base stats in canonical order; an unknown stat name is an integrity error
    pub fn stats(&self) -> Result<BaseStats, CacheError> {
        let stats = self
            .stats
            .get_or_try_resolve(|| BaseStats::from_entries(&self.record.stats).map(Some))?;
        Ok(stats.copied().unwrap_or_default())
    }

    fn ability_slots(&self, hidden: bool) -> Vec<&AbilitySlot> {
        let mut slots: Vec<&AbilitySlot> = self
            .record
            .abilities
            .iter()
            .filter(|slot| slot.is_hidden == hidden)
            .collect();
        slots.sort_by_key(|slot| slot.slot);
        slots
    }
}

impl Entity for Pokemon {
    const CATEGORY: Category = Category::Pokemon;

    fn from_raw(raw: Value, _localization: &Arc<Localization>) -> Result<Self, CacheError> {
        let record = parse_record(&raw)?;
        Ok(Self {
            raw,
            record,
            display_name: AsyncMemo::new(),
            types: AsyncMemo::new(),
            abilities: AsyncMemo::new(),
            hidden_ability: AsyncMemo::new(),
            stats: Memo::new(),
        })
    }

    fn id(&self) -> u32 {
        self.record.id
    }

    fn name(&self) -> &str {
        &self.record.name
    }

    fn raw(&self) -> &Value {
        &self.raw
    }
}
