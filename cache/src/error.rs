//! Error taxonomy for cache lookups

use dexcache_protocol::{Category, Key, ParseError, SourceError};
use thiserror::Error;

/// Errors returned by cache lookups and lazy field resolution
#[derive(Error, Debug)]
pub enum CacheError {
    /// Absent from both the index and the backing source
    #[error("{category} {key} does not exist")]
    NotFound { category: Category, key: Key },

    /// Malformed lookup key
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Backing source unreachable or answered unexpectedly
    #[error("fetch failed: {0}")]
    Fetch(#[from] SourceError),

    /// Backing source returned data of an unexpected shape
    #[error("data integrity error: {0}")]
    DataIntegrity(String),
}

impl CacheError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::NotFound { .. })
    }
}

impl From<ParseError> for CacheError {
    fn from(err: ParseError) -> Self {
        CacheError::DataIntegrity(err.to_string())
    }
}
