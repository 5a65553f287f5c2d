//! Indexed, lazily-populated lookup cache over PokeAPI records.
//!
//! Records are fetched from a backing [`Source`] the first time they are
//! asked for, indexed by id and by name, and kept for the life of the
//! process. Fields that point at other records (a Pokemon's species, types
//! and abilities; a move's type) are resolved through the same cache on
//! first access and memoized.
//!
//! # Overview
//!
//! ```text
//! dexcache-protocol (records, keys, Source trait)
//!        │
//!        ▼
//! dexcache (store + indices, resolver, search, render) ← THIS CRATE
//!        │
//!        └─> dexcache-client (HTTP / snapshot sources, config)
//! ```
//!
//! # Main Types
//!
//! - [`Cache`] - Shared context: one table per category in front of a source
//! - [`Pokemon`], [`Species`], [`Type`], [`Ability`], [`Move`] - Cached entities
//! - [`Field`] - Tri-state view of a lazily resolved field
//! - [`Directory`] - Localized name → variant keys, for fuzzy search
//! - [`Reply`] - Rendered text or the not-found reply
//!
//! # Example Usage
//!
//! ```ignore
//! use dexcache::Cache;
//!
//! let cache = Cache::new(source);
//!
//! // First call fetches, later calls are index hits
//! let reply = cache.query_by_id(6).await?;
//! println!("{}", reply.text());
//!
//! for key in cache.fuzzy_search("char").await? {
//!     println!("{key}");
//! }
//! ```

pub mod config;
pub mod error;
pub mod index;
pub mod memo;
pub mod query;
pub mod render;
pub mod resolver;
pub mod search;
pub mod store;
pub mod types;

#[cfg(test)]
mod fixtures;

pub use config::{CacheConfig, Localization};
pub use error::CacheError;
pub use memo::Field;
pub use query::{NOT_FOUND_TEXT, Reply};
pub use resolver::{Cache, Table, parse_id};
pub use search::{Directory, DirectoryEntry, Matches};
pub use types::{Ability, BaseStats, Entity, Move, Pokemon, Species, Type};

pub use dexcache_protocol::{Category, Key, Source, SourceError, Stat};
