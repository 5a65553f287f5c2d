use serde::{Deserialize, Serialize};

use super::{FlavorText, Localized};

/// `ability/{id or name}` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityRecord {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub names: Vec<Localized>,
    #[serde(default)]
    pub flavor_text_entries: Vec<FlavorText>,
}
