use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use dexcache_protocol::{Category, Key, Source, SourceError};
use serde_json::Value;
use tokio::fs;
use tracing::debug;

/// Reads records from JSON files laid out as `<root>/<category>/<key>.json`.
///
/// Every record is stored twice, once under its id and once under its name,
/// so both lookups are a single file read.
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    root: PathBuf,
}

impl SnapshotSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn record_path(&self, category: Category, key: &Key) -> PathBuf {
        self.root
            .join(category.path())
            .join(format!("{}.json", key.to_path_segment()))
    }

    /// Store a raw record under both its id and its name
    pub async fn write(&self, category: Category, raw: &Value) -> Result<(), SourceError> {
        let id = raw.get("id").and_then(Value::as_u64);
        let name = raw.get("name").and_then(Value::as_str);
        let (Some(id), Some(name)) = (id, name) else {
            return Err(SourceError::Io(std::io::Error::new(
                ErrorKind::InvalidData,
                format!("{} record without id and name", category),
            )));
        };
        let id = u32::try_from(id).map_err(|_| {
            SourceError::Io(std::io::Error::new(
                ErrorKind::InvalidData,
                format!("{} id {} out of range", category, id),
            ))
        })?;

        fs::create_dir_all(self.root.join(category.path())).await?;
        let body = serde_json::to_vec_pretty(raw)?;
        for key in [Key::Id(id), Key::name(name)] {
            fs::write(self.record_path(category, &key), &body).await?;
        }
        debug!(%category, id, name, "record written to snapshot");
        Ok(())
    }
}

#[async_trait]
impl Source for SnapshotSource {
    async fn fetch(&self, category: Category, key: &Key) -> Result<Option<Value>, SourceError> {
        let path = self.record_path(category, key);
        match fs::read(&path).await {
            Ok(body) => Ok(Some(serde_json::from_slice(&body)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Record names, sorted; the id-named copies are skipped
    async fn list(&self, category: Category) -> Result<Vec<String>, SourceError> {
        let mut entries = match fs::read_dir(self.root.join(category.path())).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            if !stem.bytes().all(|b| b.is_ascii_digit()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}
