//! Fixed-format text blocks for Pokemon and moves

use dexcache_protocol::Source;

use crate::error::CacheError;
use crate::resolver::Cache;
use crate::types::{Ability, Entity, Move, Pokemon};

const LABEL_WIDTH: usize = 16;

/// Render a Pokemon, resolving its species, types and abilities as needed.
///
/// ```text
/// #006 Charizard
/// Types: Fuego / Volador
/// Abilities:
///   Mar Llamas: <flavor text>
///   Poder Solar (Hidden): <flavor text>
/// Base stats:
///   HP              78
///   ...
/// ```
pub async fn render_pokemon<S: Source>(
    cache: &Cache<S>,
    pokemon: &Pokemon,
) -> Result<String, CacheError> {
    let mut lines = Vec::new();

    let name = pokemon.display_name(cache).await?.unwrap_or_default();
    lines.push(format!("#{:03} {}", pokemon.id(), name));

    let types: Vec<&str> = pokemon
        .types(cache)
        .await?
        .iter()
        .map(|kind| kind.display_name().unwrap_or_default())
        .collect();
    lines.push(format!("Types: {}", types.join(" / ")));

    lines.push("Abilities:".to_string());
    for ability in pokemon.abilities(cache).await? {
        lines.push(ability_line(ability, false));
    }
    if let Some(hidden) = pokemon.hidden_ability(cache).await? {
        lines.push(ability_line(hidden, true));
    }

    lines.push("Base stats:".to_string());
    for (stat, value) in pokemon.stats()?.iter() {
        lines.push(format!("  {:<LABEL_WIDTH$}{}", stat.label(), value));
    }

    Ok(lines.join("\n"))
}

/// Render a move, resolving its type as needed.
///
/// ```text
/// Lanzallamas
/// Type: Fuego | Class: special
/// Power: 90 | Accuracy: 100 | PP: 15
/// <flavor text>
/// ```
pub async fn render_move<S: Source>(cache: &Cache<S>, mv: &Move) -> Result<String, CacheError> {
    let kind = mv.kind(cache).await?;

    let mut lines = vec![
        mv.display_name().unwrap_or_default().to_string(),
        format!(
            "Type: {} | Class: {}",
            kind.display_name().unwrap_or_default(),
            mv.damage_class().unwrap_or("-")
        ),
        format!(
            "Power: {} | Accuracy: {} | PP: {}",
            or_dash(mv.power()),
            or_dash(mv.accuracy()),
            or_dash(mv.pp())
        ),
    ];
    if let Some(flavor) = mv.flavor_text() {
        lines.push(flavor.to_string());
    }

    Ok(lines.join("\n"))
}

fn ability_line(ability: &Ability, hidden: bool) -> String {
    let name = ability.display_name().unwrap_or_default();
    let marker = if hidden { " (Hidden)" } else { "" };
    match ability.flavor_text() {
        Some(flavor) => format!("  {}{}: {}", name, marker, flavor),
        None => format!("  {}{}", name, marker),
    }
}

fn or_dash(value: Option<u32>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}
