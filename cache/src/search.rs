//! Fuzzy search over localized species names

use std::collections::HashMap;

use dexcache_protocol::{Category, Source};
use futures_util::{StreamExt, TryStreamExt, stream};
use tracing::{info, warn};

use crate::error::CacheError;
use crate::resolver::Cache;

/// One display name and the variant keys it stands for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    pub variants: Vec<String>,
    folded: String,
}

/// Localized display name → variant keys, in scan order.
///
/// Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    entries: Vec<DirectoryEntry>,
    positions: HashMap<String, usize>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add variants under a display name; a repeated name appends to its entry
    pub fn add(&mut self, name: impl Into<String>, variants: impl IntoIterator<Item = String>) {
        let name = name.into();
        let position = match self.positions.get(&name) {
            Some(position) => *position,
            None => {
                self.entries.push(DirectoryEntry {
                    folded: name.to_lowercase(),
                    name: name.clone(),
                    variants: Vec::new(),
                });
                self.positions.insert(name, self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        self.entries[position].variants.extend(variants);
    }

    /// Scan every species the source lists and index it by localized name.
    ///
    /// Species are resolved through the cache, so they stay cached afterwards.
    /// A species without a name in the locale is entered under its identifier.
    pub async fn build<S: Source>(cache: &Cache<S>) -> Result<Self, CacheError> {
        let names = cache.source().list(Category::Species).await?;
        let concurrency = cache.config().search_concurrency.max(1);

        let scanned: Vec<_> = stream::iter(names)
            .map(|name| async move {
                match cache.species_by_name(&name).await {
                    Ok(species) => Ok(Some(species)),
                    Err(CacheError::NotFound { .. }) => {
                        warn!(species = %name, "listed species missing from source, skipping");
                        Ok(None)
                    }
                    Err(e) => Err(e),
                }
            })
            .buffered(concurrency)
            .try_collect()
            .await?;

        let mut directory = Self::new();
        for species in scanned.into_iter().flatten() {
            let name = species
                .display_name()
                .unwrap_or_else(|| species.record().name.as_str())
                .to_string();
            directory.add(name, species.varieties());
        }

        info!(entries = directory.len(), "search directory built");
        Ok(directory)
    }

    /// Variant keys whose display name matches `term`.
    ///
    /// `term` is split on whitespace into lowercase keywords. Entries equal to
    /// a keyword come first, then entries containing a keyword, each group in
    /// scan order. Overlapping entries may repeat a variant.
    pub fn search(&self, term: &str) -> Vec<String> {
        let keywords: Vec<String> = term.split_whitespace().map(str::to_lowercase).collect();
        if keywords.is_empty() {
            return Vec::new();
        }

        let mut exact = Vec::new();
        let mut partial = Vec::new();
        for entry in &self.entries {
            if keywords.iter().any(|keyword| *keyword == entry.folded) {
                exact.extend(entry.variants.iter().cloned());
            } else if keywords
                .iter()
                .any(|keyword| entry.folded.contains(keyword.as_str()))
            {
                partial.extend(entry.variants.iter().cloned());
            }
        }

        exact.extend(partial);
        exact
    }

    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&DirectoryEntry> {
        self.positions.get(name).map(|position| &self.entries[*position])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Shape of a search result, for picking a reply path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matches {
    None,
    One(String),
    Many(Vec<String>),
}

impl From<Vec<String>> for Matches {
    fn from(mut keys: Vec<String>) -> Self {
        match keys.len() {
            0 => Matches::None,
            1 => Matches::One(keys.remove(0)),
            _ => Matches::Many(keys),
        }
    }
}
