use serde::{Deserialize, Serialize};

use super::{FlavorText, Localized, NamedResource};

/// `move/{id or name}` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub names: Vec<Localized>,
    #[serde(default)]
    pub flavor_text_entries: Vec<FlavorText>,
    #[serde(rename = "type")]
    pub kind: NamedResource,

    // Status moves have no power, some moves never miss
    #[serde(default)]
    pub power: Option<u32>,
    #[serde(default)]
    pub accuracy: Option<u32>,
    #[serde(default)]
    pub pp: Option<u32>,
    #[serde(default)]
    pub damage_class: Option<NamedResource>,
}
