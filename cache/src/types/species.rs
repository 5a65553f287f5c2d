//! Cached species records

use std::sync::Arc;

use dexcache_protocol::{Category, SpeciesRecord, parse_record};
use serde_json::Value;

use super::{Entity, localized_name};
use crate::config::Localization;
use crate::error::CacheError;
use crate::memo::Memo;

/// Species-level record: localized names and the Pokemon varieties it covers
#[derive(Debug)]
pub struct Species {
    raw: Value,
    record: SpeciesRecord,
    localization: Arc<Localization>,
    display_name: Memo<String>,
}

impl Species {
    pub fn record(&self) -> &SpeciesRecord {
        &self.record
    }

    pub fn display_name(&self) -> Option<&str> {
        localized_name(&self.display_name, &self.record.names, &self.localization)
    }

    /// Pokemon identifiers of every variety of this species
    pub fn varieties(&self) -> Vec<String> {
        self.record.variety_names()
    }
}

impl Entity for Species {
    const CATEGORY: Category = Category::Species;

    fn from_raw(raw: Value, localization: &Arc<Localization>) -> Result<Self, CacheError> {
        let record = parse_record(&raw)?;
        Ok(Self {
            raw,
            record,
            localization: Arc::clone(localization),
            display_name: Memo::new(),
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
