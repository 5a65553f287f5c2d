use thiserror::Error;

pub mod request;
pub mod records;
pub mod source;
pub mod stat;

pub use records::{
    AbilityRecord, AbilitySlot, FlavorText, Localized, MoveRecord, NamedResource, PokemonRecord,
    SpeciesRecord, StatEntry, TypeRecord, TypeSlot, Variety, first_flavor_text, first_localized,
    parse_record,
};
pub use request::{Category, Key};
pub use source::{Source, SourceError};
pub use stat::Stat;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid record format: {0}")]
    InvalidFormat(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Unknown stat: {0}")]
    UnknownStat(String),
}
