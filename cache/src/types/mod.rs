//! Cached entity types

mod ability;
mod moves;
mod pokemon;
mod pokemon_type;
mod species;
mod stats;

pub use ability::Ability;
pub use moves::Move;
pub use pokemon::Pokemon;
pub use pokemon_type::Type;
pub use species::Species;
pub use stats::BaseStats;

use std::fmt::Debug;
use std::sync::Arc;

use dexcache_protocol::{Category, Localized, first_localized};
use serde_json::Value;

use crate::config::Localization;
use crate::error::CacheError;
use crate::memo::Memo;

/// A record the cache can store and index.
///
/// `id` and `name` are extracted on construction and never change.
pub trait Entity: Debug + Send + Sync + Sized + 'static {
    const CATEGORY: Category;

    /// Build the entity from a raw payload
    fn from_raw(raw: Value, localization: &Arc<Localization>) -> Result<Self, CacheError>;

    fn id(&self) -> u32;

    fn name(&self) -> &str;

    /// Payload as received from the backing source
    fn raw(&self) -> &Value;
}

/// Memoized first name matching the configured locale
fn localized_name<'a>(
    memo: &'a Memo<String>,
    names: &[Localized],
    localization: &Localization,
) -> Option<&'a str> {
    memo.get_or_resolve(|| first_localized(names, &localization.locale).map(str::to_string))
        .map(String::as_str)
}

/// Collapse the hard line breaks and form feeds PokeAPI keeps in flavor text
fn clean_flavor_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A related record that should exist but does not is a data problem, not a
/// missing lookup
fn related(err: CacheError, owner: &str) -> CacheError {
    match err {
        CacheError::NotFound { category, key } => {
            CacheError::DataIntegrity(format!("{} references missing {} {}", owner, category, key))
        }
        other => other,
    }
}
