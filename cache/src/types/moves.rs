//! Cached move records

use std::sync::Arc;

use dexcache_protocol::{Category, MoveRecord, Source, first_flavor_text, parse_record};
use serde_json::Value;

use super::{Entity, Type, clean_flavor_text, localized_name, related};
use crate::config::Localization;
use crate::error::CacheError;
use crate::memo::{AsyncMemo, Field, Memo};
use crate::resolver::Cache;

#[derive(Debug)]
pub struct Move {
    raw: Value,
    record: MoveRecord,
    localization: Arc<Localization>,
    display_name: Memo<String>,
    flavor_text: Memo<String>,
    kind: AsyncMemo<Arc<Type>>,
}

impl Move {
    pub fn record(&self) -> &MoveRecord {
        &self.record
    }

    pub fn display_name(&self) -> Option<&str> {
        localized_name(&self.display_name, &self.record.names, &self.localization)
    }

    /// Description for the configured locale and version group
    pub fn flavor_text(&self) -> Option<&str> {
        self.flavor_text
            .get_or_resolve(|| {
                first_flavor_text(
                    &self.record.flavor_text_entries,
                    &self.localization.locale,
                    &self.localization.version_group,
                )
                .map(clean_flavor_text)
            })
            .map(String::as_str)
    }

    pub fn flavor_text_state(&self) -> Field<&String> {
        self.flavor_text.state()
    }

    /// The move's type, fetched through the cache on first access
    pub async fn kind<S: Source>(&self, cache: &Cache<S>) -> Result<Arc<Type>, CacheError> {
        let kind = self
            .kind
            .get_or_try_resolve(|| async {
                cache
                    .type_by_name(&self.record.kind.name)
                    .await
                    .map(Some)
                    .map_err(|e| related(e, &format!("move {}", self.record.name)))
            })
            .await?;

        kind.cloned().ok_or_else(|| {
            CacheError::DataIntegrity(format!("move {} has no type", self.record.name))
        })
    }

    pub fn kind_state(&self) -> Field<&Arc<Type>> {
        self.kind.state()
    }

    pub fn power(&self) -> Option<u32> {
        self.record.power
    }

    pub fn accuracy(&self) -> Option<u32> {
        self.record.accuracy
    }

    pub fn pp(&self) -> Option<u32> {
        self.record.pp
    }

    /// "physical", "special" or "status"
    pub fn damage_class(&self) -> Option<&str> {
        self.record.damage_class.as_ref().map(|class| class.name.as_str())
    }
}

impl Entity for Move {
    const CATEGORY: Category = Category::Move;

    fn from_raw(raw: Value, localization: &Arc<Localization>) -> Result<Self, CacheError> {
        let record = parse_record(&raw)?;
        Ok(Self {
            raw,
            record,
            localization: Arc::clone(localization),
            display_name: Memo::new(),
            flavor_text: Memo::new(),
            kind: AsyncMemo::new(),
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
