//! Cached type records

use std::sync::Arc;

use dexcache_protocol::{Category, TypeRecord, parse_record};
use serde_json::Value;

use super::{Entity, localized_name};
use crate::config::Localization;
use crate::error::CacheError;
use crate::memo::{Field, Memo};

/// An elemental type, e.g. "fire"
#[derive(Debug)]
pub struct Type {
    raw: Value,
    record: TypeRecord,
    localization: Arc<Localization>,
    display_name: Memo<String>,
}

impl Type {
    pub fn record(&self) -> &TypeRecord {
        &self.record
    }

    /// Localized name, `None` when the record has no name in the locale
    pub fn display_name(&self) -> Option<&str> {
        localized_name(&self.display_name, &self.record.names, &self.localization)
    }

    pub fn display_name_state(&self) -> Field<&String> {
        self.display_name.state()
    }
}

impl Entity for Type {
    const CATEGORY: Category = Category::Type;

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
