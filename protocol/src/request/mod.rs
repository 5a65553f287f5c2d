use std::fmt;

/// Record categories served by the backing source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Pokemon,
    Species,
    Type,
    Ability,
    Move,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Pokemon,
        Category::Species,
        Category::Type,
        Category::Ability,
        Category::Move,
    ];

    /// Endpoint path segment, also used as the snapshot directory name
    pub fn path(&self) -> &'static str {
        match self {
            Self::Pokemon => "pokemon",
            Self::Species => "pokemon-species",
            Self::Type => "type",
            Self::Ability => "ability",
            Self::Move => "move",
        }
    }

    /// Parse from an endpoint path segment
    pub fn from_path(s: &str) -> Option<Self> {
        match s {
            "pokemon" => Some(Self::Pokemon),
            "pokemon-species" => Some(Self::Species),
            "type" => Some(Self::Type),
            "ability" => Some(Self::Ability),
            "move" => Some(Self::Move),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Lookup key for a single record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// Numeric identifier
    Id(u32),

    /// Backing-source identifier, e.g. "charizard"
    Name(String),
}

impl Key {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// Serialize as the trailing path segment: CATEGORY/KEY
    pub fn to_path_segment(&self) -> String {
        match self {
            Self::Id(id) => id.to_string(),
            Self::Name(name) => name.clone(),
        }
    }
}

impl From<u32> for Key {
    fn from(id: u32) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "#{}", id),
            Self::Name(name) => f.write_str(name),
        }
    }
}
