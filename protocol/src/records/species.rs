use serde::{Deserialize, Serialize};

use super::{Localized, NamedResource};

/// `pokemon-species/{id or name}` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesRecord {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub names: Vec<Localized>,
    #[serde(default)]
    pub varieties: Vec<Variety>,
}

impl SpeciesRecord {
    /// Pokemon identifiers of every variety, default form first as listed
    pub fn variety_names(&self) -> Vec<String> {
        self.varieties
            .iter()
            .map(|variety| variety.pokemon.name.clone())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variety {
    pub is_default: bool,
    pub pokemon: NamedResource,
}
