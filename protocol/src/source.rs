use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::request::{Category, Key};

/// Failures reaching or reading the backing source.
///
/// A record that simply does not exist is not an error: `fetch` reports it
/// as `Ok(None)`.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("undecodable payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Backing source of raw records.
///
/// Implement this trait to put the cache in front of a new data source.
///
/// # Example
///
/// ```ignore
/// struct Fixed(serde_json::Value);
///
/// #[async_trait]
/// impl Source for Fixed {
///     async fn fetch(&self, _: Category, _: &Key) -> Result<Option<Value>, SourceError> {
///         Ok(Some(self.0.clone()))
///     }
///
///     async fn list(&self, _: Category) -> Result<Vec<String>, SourceError> {
///         Ok(Vec::new())
///     }
/// }
/// ```
#[async_trait]
pub trait Source: Send + Sync {
    /// Fetch one raw record, `Ok(None)` when the source has no such record.
    async fn fetch(&self, category: Category, key: &Key) -> Result<Option<Value>, SourceError>;

    /// Names of every record the source holds for a category.
    async fn list(&self, category: Category) -> Result<Vec<String>, SourceError>;
}

#[async_trait]
impl<S: Source + ?Sized> Source for Box<S> {
    async fn fetch(&self, category: Category, key: &Key) -> Result<Option<Value>, SourceError> {
        (**self).fetch(category, key).await
    }

    async fn list(&self, category: Category) -> Result<Vec<String>, SourceError> {
        (**self).list(category).await
    }
}

#[async_trait]
impl<S: Source + ?Sized> Source for Arc<S> {
    async fn fetch(&self, category: Category, key: &Key) -> Result<Option<Value>, SourceError> {
        (**self).fetch(category, key).await
    }

    async fn list(&self, category: Category) -> Result<Vec<String>, SourceError> {
        (**self).list(category).await
    }
}
