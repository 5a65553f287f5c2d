//! Cache configuration

/// Locale and game version used to pick localized strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Localization {
    /// Language code matched against `language.name`, e.g. "es"
    pub locale: String,

    /// Version group matched against flavor text entries, e.g. "sword-shield"
    pub version_group: String,
}

impl Default for Localization {
    fn default() -> Self {
        Self {
            locale: "es".to_string(),
            version_group: "sword-shield".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub localization: Localization,

    /// Species fetched in parallel while building the search directory
    pub search_concurrency: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            localization: Localization::default(),
            search_concurrency: 8,
        }
    }
}
