use async_trait::async_trait;
use dexcache_protocol::{Category, Key, Source, SourceError};
use serde_json::Value;
use tracing::{debug, warn};

use crate::snapshot::SnapshotSource;

/// Snapshot first, upstream on a miss.
///
/// Records fetched upstream are written back to the snapshot, so a later
/// process finds them locally. A failed write is logged and the record is
/// still returned.
#[derive(Debug, Clone)]
pub struct MirrorSource<U> {
    snapshot: SnapshotSource,
    upstream: U,
}

impl<U: Source> MirrorSource<U> {
    pub fn new(snapshot: SnapshotSource, upstream: U) -> Self {
        Self { snapshot, upstream }
    }

    pub fn snapshot(&self) -> &SnapshotSource {
        &self.snapshot
    }

    pub fn upstream(&self) -> &U {
        &self.upstream
    }
}

#[async_trait]
impl<U: Source> Source for MirrorSource<U> {
    async fn fetch(&self, category: Category, key: &Key) -> Result<Option<Value>, SourceError> {
        if let Some(raw) = self.snapshot.fetch(category, key).await? {
            return Ok(Some(raw));
        }

        debug!(%category, %key, "snapshot miss, asking upstream");
        let Some(raw) = self.upstream.fetch(category, key).await? else {
            return Ok(None);
        };
        if let Err(e) = self.snapshot.write(category, &raw).await {
            warn!(%category, %key, error = %e, "could not mirror record into snapshot");
        }
        Ok(Some(raw))
    }

    /// Listings always come from upstream; a snapshot may be partial
    async fn list(&self, category: Category) -> Result<Vec<String>, SourceError> {
        self.upstream.list(category).await
    }
}
