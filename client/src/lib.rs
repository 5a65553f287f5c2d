//! Backing sources for the dexcache lookup cache.
//!
//! - [`HttpSource`] talks to PokeAPI (or any server with the same layout)
//! - [`SnapshotSource`] reads records from JSON files on disk
//! - [`MirrorSource`] reads a snapshot and fills it from upstream on a miss
//!
//! [`connect`] picks one of them from a [`Config`] and wraps it in a
//! [`Cache`].

mod config;
mod http;
mod mirror;
mod snapshot;

use anyhow::{Context, Result};
use tracing::info;

pub use config::{
    Config, ConfigError, ENV_BASE_URL, ENV_LOCALE, ENV_SEARCH_CONCURRENCY, ENV_SNAPSHOT_DIR,
    ENV_VERSION_GROUP,
};
pub use http::{HttpSource, POKEAPI_URL};
pub use mirror::MirrorSource;
pub use snapshot::SnapshotSource;

pub use dexcache::{Cache, CacheError, Reply};
pub use dexcache_protocol::{Category, Key, Source, SourceError};

/// Build a cache over the source `config` describes.
///
/// With a snapshot directory the cache reads through a [`MirrorSource`],
/// otherwise straight from HTTP.
pub async fn connect(config: Config) -> Result<Cache<Box<dyn Source>>> {
    let http = HttpSource::new(&config.base_url);

    let source: Box<dyn Source> = match &config.snapshot_dir {
        Some(dir) => {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("Failed to create snapshot directory {}", dir.display()))?;
            info!(snapshot = %dir.display(), upstream = %config.base_url, "using mirrored source");
            Box::new(MirrorSource::new(SnapshotSource::new(dir), http))
        }
        None => {
            info!(upstream = %config.base_url, "using HTTP source");
            Box::new(http)
        }
    };

    Ok(Cache::with_config(source, config.cache))
}
