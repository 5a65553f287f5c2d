//! User-facing queries: one call in, one rendered reply out

use std::fmt;

use dexcache_protocol::Source;
use tracing::debug;

use crate::error::CacheError;
use crate::render::{render_move, render_pokemon};
use crate::resolver::{Cache, parse_id};
use crate::search::Directory;

/// Text shown when the requested primary record does not exist
pub const NOT_FOUND_TEXT: &str = "Not found.";

/// Outcome of a query that did not fail.
///
/// `NotFound` only means the requested key is absent from the source. Missing
/// related records surface as [`CacheError::DataIntegrity`] instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Rendered(String),
    NotFound,
}

impl Reply {
    pub fn text(&self) -> &str {
        match self {
            Reply::Rendered(text) => text,
            Reply::NotFound => NOT_FOUND_TEXT,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Reply::NotFound)
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

fn into_reply(result: Result<String, CacheError>) -> Result<Reply, CacheError> {
    match result {
        Ok(text) => Ok(Reply::Rendered(text)),
        Err(CacheError::NotFound { category, key }) => {
            debug!(%category, %key, "query for missing record");
            Ok(Reply::NotFound)
        }
        Err(e) => Err(e),
    }
}

impl<S: Source> Cache<S> {
    /// Render the Pokemon with the given national id
    pub async fn query_by_id(&self, id: u32) -> Result<Reply, CacheError> {
        into_reply(
            async {
                let pokemon = self.pokemon_by_id(id).await?;
                render_pokemon(self, &pokemon).await
            }
            .await,
        )
    }

    /// Like [`Cache::query_by_id`], for an id still in text form
    pub async fn query_by_id_text(&self, id: &str) -> Result<Reply, CacheError> {
        self.query_by_id(parse_id(id)?).await
    }

    /// Render the Pokemon with the given identifier, e.g. "charizard-mega-x"
    pub async fn query_by_name(&self, name: &str) -> Result<Reply, CacheError> {
        into_reply(
            async {
                let pokemon = self.pokemon_by_name(name).await?;
                render_pokemon(self, &pokemon).await
            }
            .await,
        )
    }

    /// Render the move with the given identifier, e.g. "flamethrower"
    pub async fn query_move_by_name(&self, name: &str) -> Result<Reply, CacheError> {
        into_reply(
            async {
                let mv = self.move_by_name(name).await?;
                render_move(self, &mv).await
            }
            .await,
        )
    }

    /// The search directory, built from the source on first use
    pub async fn directory(&self) -> Result<&Directory, CacheError> {
        self.directory.get_or_try_init(|| Directory::build(self)).await
    }

    /// Variant keys whose localized species name matches `term`
    pub async fn fuzzy_search(&self, term: &str) -> Result<Vec<String>, CacheError> {
        Ok(self.directory().await?.search(term))
    }
}
