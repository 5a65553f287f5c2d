//! In-memory source and PokeAPI-shaped records for tests

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dexcache_protocol::{Category, Key, Source, SourceError};
use serde_json::{Value, json};

/// Serves a fixed set of records and counts every fetch
#[derive(Default)]
pub struct MemorySource {
    records: Vec<(Category, Value)>,
    overrides: HashMap<(Category, Key), Value>,
    fetches: Mutex<HashMap<(Category, Key), usize>>,
    total: AtomicUsize,
    failing: AtomicBool,
    failures: AtomicUsize,
    delay: Option<Duration>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Charizard, Charmander and Mew with their species, types, abilities,
    /// plus two moves
    pub fn dex() -> Self {
        Self::new()
            .with(Category::Pokemon, charizard())
            .with(Category::Pokemon, charmander())
            .with(Category::Pokemon, mew())
            .with(Category::Species, species(6, "charizard", Some("Charizard"), &[
                "charizard",
                "charizard-mega-x",
                "charizard-mega-y",
            ]))
            .with(Category::Species, species(4, "charmander", Some("Charmander"), &[
                "charmander",
            ]))
            .with(Category::Species, species(151, "mew", Some("Mew"), &["mew"]))
            .with(Category::Type, kind(10, "fire", "Fuego"))
            .with(Category::Type, kind(3, "flying", "Volador"))
            .with(Category::Type, kind(14, "psychic", "Psíquico"))
            .with(Category::Type, kind(1, "normal", "Normal"))
            .with(
                Category::Ability,
                ability(66, "blaze", "Mar Llamas", Some("Potencia sus movimientos\nde tipo Fuego.")),
            )
            .with(
                Category::Ability,
                ability(94, "solar-power", "Poder Solar", Some("Con sol, sube su\u{c}Ataque Especial.")),
            )
            .with(Category::Ability, ability(28, "synchronize", "Sincronía", None))
            .with(
                Category::Move,
                moves(53, "flamethrower", "Lanzallamas", "fire", Some(90), Some(100), 15, "special"),
            )
            .with(
                Category::Move,
                moves(14, "swords-dance", "Danza Espada", "normal", None, None, 20, "status"),
            )
    }

    pub fn with(mut self, category: Category, record: Value) -> Self {
        self.records.push((category, record));
        self
    }

    /// Answer `key` with `record` regardless of what the record says it is
    pub fn with_override(mut self, category: Category, key: Key, record: Value) -> Self {
        self.overrides.insert((category, key), record);
        self
    }

    /// Sleep before answering each fetch
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail the next `count` fetches, then answer normally
    pub fn with_failures(self, count: usize) -> Self {
        self.failures.store(count, Ordering::SeqCst);
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Fetches issued for one key
    pub fn fetches(&self, category: Category, key: impl Into<Key>) -> usize {
        self.fetches
            .lock()
            .unwrap()
            .get(&(category, key.into()))
            .copied()
            .unwrap_or(0)
    }

    /// Fetches issued for any key
    pub fn total_fetches(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    fn lookup(&self, category: Category, key: &Key) -> Option<Value> {
        if let Some(record) = self.overrides.get(&(category, key.clone())) {
            return Some(record.clone());
        }
        self.records
            .iter()
            .filter(|(c, _)| *c == category)
            .map(|(_, record)| record)
            .find(|record| match key {
                Key::Id(id) => record["id"].as_u64() == Some(u64::from(*id)),
                Key::Name(name) => record["name"].as_str() == Some(name.as_str()),
            })
            .cloned()
    }
}

#[async_trait]
impl Source for MemorySource {
    async fn fetch(&self, category: Category, key: &Key) -> Result<Option<Value>, SourceError> {
        self.total.fetch_add(1, Ordering::SeqCst);
        *self
            .fetches
            .lock()
            .unwrap()
            .entry((category, key.clone()))
            .or_default() += 1;

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let scheduled = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if scheduled || self.failing.load(Ordering::SeqCst) {
            return Err(SourceError::Transport {
                url: format!("memory://{}/{}", category, key),
                message: "connection refused".to_string(),
            });
        }
        Ok(self.lookup(category, key))
    }

    async fn list(&self, category: Category) -> Result<Vec<String>, SourceError> {
        Ok(self
            .records
            .iter()
            .filter(|(c, _)| *c == category)
            .filter_map(|(_, record)| record["name"].as_str().map(str::to_string))
            .collect())
    }
}

fn localized(language: &str, name: &str) -> Value {
    json!({ "name": name, "language": { "name": language, "url": "" } })
}

fn stats(values: [u16; 6]) -> Value {
    let names = [
        "hp",
        "attack",
        "defense",
        "special-attack",
        "special-defense",
        "speed",
    ];
    Value::Array(
        names
            .iter()
            .zip(values)
            .map(|(name, value)| json!({ "base_stat": value, "effort": 0, "stat": { "name": name } }))
            .collect(),
    )
}

pub fn pokemon(
    id: u32,
    name: &str,
    species: &str,
    types: &[&str],
    abilities: &[(&str, bool)],
    base: [u16; 6],
) -> Value {
    let types: Vec<Value> = types
        .iter()
        .enumerate()
        .map(|(i, kind)| json!({ "slot": i + 1, "type": { "name": kind } }))
        .collect();
    let abilities: Vec<Value> = abilities
        .iter()
        .enumerate()
        .map(|(i, (ability, hidden))| {
            json!({
                "ability": { "name": ability },
                "is_hidden": hidden,
                "slot": if *hidden { 3 } else { i + 1 },
            })
        })
        .collect();
    json!({
        "id": id,
        "name": name,
        "species": { "name": species },
        "types": types,
        "abilities": abilities,
        "stats": stats(base),
    })
}

pub fn charizard() -> Value {
    pokemon(
        6,
        "charizard",
        "charizard",
        &["fire", "flying"],
        &[("blaze", false), ("solar-power", true)],
        [78, 84, 78, 109, 85, 100],
    )
}

pub fn charmander() -> Value {
    pokemon(
        4,
        "charmander",
        "charmander",
        &["fire"],
        &[("blaze", false), ("solar-power", true)],
        [39, 52, 43, 60, 50, 65],
    )
}

pub fn mew() -> Value {
    pokemon(
        151,
        "mew",
        "mew",
        &["psychic"],
        &[("synchronize", false)],
        [100, 100, 100, 100, 100, 100],
    )
}

pub fn species(id: u32, name: &str, spanish: Option<&str>, varieties: &[&str]) -> Value {
    let mut names = vec![localized("en", &capitalize(name))];
    if let Some(spanish) = spanish {
        names.push(localized("es", spanish));
    }
    let varieties: Vec<Value> = varieties
        .iter()
        .enumerate()
        .map(|(i, variety)| json!({ "is_default": i == 0, "pokemon": { "name": variety } }))
        .collect();
    json!({ "id": id, "name": name, "names": names, "varieties": varieties })
}

pub fn kind(id: u32, name: &str, spanish: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "names": [localized("ja", name), localized("es", spanish)],
    })
}

pub fn ability(id: u32, name: &str, spanish: &str, flavor: Option<&str>) -> Value {
    let mut entries = vec![json!({
        "flavor_text": "English text.",
        "language": { "name": "en" },
        "version_group": { "name": "sword-shield" },
    })];
    if let Some(flavor) = flavor {
        entries.push(json!({
            "flavor_text": "Texto antiguo.",
            "language": { "name": "es" },
            "version_group": { "name": "x-y" },
        }));
        entries.push(json!({
            "flavor_text": flavor,
            "language": { "name": "es" },
            "version_group": { "name": "sword-shield" },
        }));
    }
    json!({
        "id": id,
        "name": name,
        "names": [localized("es", spanish)],
        "flavor_text_entries": entries,
    })
}

#[allow(clippy::too_many_arguments)]
pub fn moves(
    id: u32,
    name: &str,
    spanish: &str,
    kind: &str,
    power: Option<u32>,
    accuracy: Option<u32>,
    pp: u32,
    class: &str,
) -> Value {
    json!({
        "id": id,
        "name": name,
        "names": [localized("es", spanish)],
        "flavor_text_entries": [{
            "flavor_text": format!("Descripción de\n{}.", spanish),
            "language": { "name": "es" },
            "version_group": { "name": "sword-shield" },
        }],
        "type": { "name": kind },
        "power": power,
        "accuracy": accuracy,
        "pp": pp,
        "damage_class": { "name": class },
    })
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
