use std::env;
use std::path::PathBuf;

use dexcache::{CacheConfig, Localization};
use thiserror::Error;

use crate::http::POKEAPI_URL;

pub const ENV_BASE_URL: &str = "DEXCACHE_BASE_URL";
pub const ENV_SNAPSHOT_DIR: &str = "DEXCACHE_SNAPSHOT_DIR";
pub const ENV_LOCALE: &str = "DEXCACHE_LOCALE";
pub const ENV_VERSION_GROUP: &str = "DEXCACHE_VERSION_GROUP";
pub const ENV_SEARCH_CONCURRENCY: &str = "DEXCACHE_SEARCH_CONCURRENCY";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a positive integer, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },

    #[error("{name} cannot be empty")]
    Empty { name: &'static str },
}

/// Where records come from and how they are localized
#[derive(Debug, Clone)]
pub struct Config {
    /// PokeAPI base URL, without the trailing slash
    pub base_url: String,

    /// When set, records are read from (and mirrored into) this directory
    pub snapshot_dir: Option<PathBuf>,

    pub cache: CacheConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: POKEAPI_URL.to_string(),
            snapshot_dir: None,
            cache: CacheConfig::default(),
        }
    }
}

impl Config {
    /// Defaults overridden by `DEXCACHE_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Like [`Config::from_env`], reading variables through `lookup`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let defaults = Localization::default();

        if let Some(url) = lookup(ENV_BASE_URL) {
            config.base_url = non_empty(ENV_BASE_URL, url)?
                .trim_end_matches('/')
                .to_string();
        }
        if let Some(dir) = lookup(ENV_SNAPSHOT_DIR).filter(|dir| !dir.is_empty()) {
            config.snapshot_dir = Some(PathBuf::from(dir));
        }

        config.cache.localization = Localization {
            locale: match lookup(ENV_LOCALE) {
                Some(locale) => non_empty(ENV_LOCALE, locale)?,
                None => defaults.locale,
            },
            version_group: match lookup(ENV_VERSION_GROUP) {
                Some(group) => non_empty(ENV_VERSION_GROUP, group)?,
                None => defaults.version_group,
            },
        };

        if let Some(value) = lookup(ENV_SEARCH_CONCURRENCY) {
            config.cache.search_concurrency = match value.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidNumber {
                        name: ENV_SEARCH_CONCURRENCY,
                        value,
                    });
                }
            };
        }

        Ok(config)
    }
}

fn non_empty(name: &'static str, value: String) -> Result<String, ConfigError> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(ConfigError::Empty { name });
    }
    Ok(value)
}
