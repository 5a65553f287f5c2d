//! Cached ability records

use std::sync::Arc;

use dexcache_protocol::{AbilityRecord, Category, first_flavor_text, parse_record};
use serde_json::Value;

use super::{Entity, clean_flavor_text, localized_name};
use crate::config::Localization;
use crate::error::CacheError;
use crate::memo::{Field, Memo};

#[derive(Debug)]
pub struct Ability {
    raw: Value,
    record: AbilityRecord,
    localization: Arc<Localization>,
    display_name: Memo<String>,
    flavor_text: Memo<String>,
}

impl Ability {
    pub fn record(&self) -> &AbilityRecord {
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
}

impl Entity for Ability {
    const CATEGORY: Category = Category::Ability;

    fn from_raw(raw: Value, localization: &Arc<Localization>) -> Result<Self, CacheError> {
        let record = parse_record(&raw)?;
        Ok(Self {
            raw,
            record,
            localization: Arc::clone(localization),
            display_name: Memo::new(),
            flavor_text: Memo::new(),
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
