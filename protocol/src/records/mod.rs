mod ability;
mod moves;
mod pokemon;
mod species;
mod types;

pub use ability::AbilityRecord;
pub use moves::MoveRecord;
pub use pokemon::{AbilitySlot, PokemonRecord, StatEntry, TypeSlot};
pub use species::{SpeciesRecord, Variety};
pub use types::TypeRecord;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ParseError;

/// Reference to another record: {"name": ..., "url": ...}
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

impl NamedResource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: String::new(),
        }
    }
}

/// One entry of a record's `names` list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Localized {
    pub name: String,
    pub language: NamedResource,
}

/// One entry of a record's `flavor_text_entries` list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlavorText {
    pub flavor_text: String,
    pub language: NamedResource,
    #[serde(default)]
    pub version_group: Option<NamedResource>,
}

/// Decode a raw payload into its typed view
pub fn parse_record<T: DeserializeOwned>(raw: &Value) -> Result<T, ParseError> {
    if !raw.is_object() {
        return Err(ParseError::InvalidFormat(
            "record payload must be a JSON object".to_string(),
        ));
    }

    T::deserialize(raw).map_err(|e| {
        if e.to_string().starts_with("missing field") {
            ParseError::MissingField(e.to_string())
        } else {
            ParseError::InvalidFormat(e.to_string())
        }
    })
}

/// First name whose language matches `locale`
pub fn first_localized<'a>(names: &'a [Localized], locale: &str) -> Option<&'a str> {
    names
        .iter()
        .find(|entry| entry.language.name == locale)
        .map(|entry| entry.name.as_str())
}

/// First flavor text matching both `locale` and `version_group`
pub fn first_flavor_text<'a>(
    entries: &'a [FlavorText],
    locale: &str,
    version_group: &str,
) -> Option<&'a str> {
    entries
        .iter()
        .find(|entry| {
            entry.language.name == locale
                && entry
                    .version_group
                    .as_ref()
                    .is_some_and(|group| group.name == version_group)
        })
        .map(|entry| entry.flavor_text.as_str())
}
