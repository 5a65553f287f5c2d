//! Base stat vector in canonical order

use dexcache_protocol::{ParseError, Stat, StatEntry};

/// Base stats ordered HP, Attack, Defense, Sp. Attack, Sp. Defense, Speed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BaseStats([u16; 6]);

impl BaseStats {
    /// Reorder raw stat entries into the canonical sequence.
    ///
    /// Any stat name outside the six known ones is an error; stats missing
    /// from the payload stay at 0.
    pub fn from_entries(entries: &[StatEntry]) -> Result<Self, ParseError> {
        let mut stats = Self::default();
        for entry in entries {
            let stat = Stat::from_api(&entry.stat.name)
                .ok_or_else(|| ParseError::UnknownStat(entry.stat.name.clone()))?;
            stats.set(stat, entry.base_stat);
        }
        Ok(stats)
    }

    pub fn new(values: [u16; 6]) -> Self {
        Self(values)
    }

    /// Get the value for a stat
    pub fn get(&self, stat: Stat) -> u16 {
        self.0[stat.position()]
    }

    /// Set the value for a stat
    pub fn set(&mut self, stat: Stat, value: u16) {
        self.0[stat.position()] = value;
    }

    /// Sum of all six stats
    pub fn total(&self) -> u32 {
        self.0.iter().map(|v| *v as u32).sum()
    }

    /// (stat, value) pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Stat, u16)> + '_ {
        Stat::ALL.iter().map(|stat| (*stat, self.get(*stat)))
    }

    pub fn as_array(&self) -> [u16; 6] {
        self.0
    }
}
