use serde::{Deserialize, Serialize};

use super::Localized;

/// `type/{id or name}` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeRecord {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub names: Vec<Localized>,
}
