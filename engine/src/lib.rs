//! Rules engine for a Fabula-style tabletop character sheet.
//!
//! Computes derived state (resource pools, defenses, initiative) and guards
//! mutations (equipment slots, statuses, progression) for a single character.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod character;
pub mod classes;
pub mod conditions;
mod content;
pub mod derived;
pub mod equipment;
pub mod error;
pub mod inventory;
pub mod items;
pub mod progress;
pub mod progression;
pub mod resources;
pub mod rules;
pub mod session;
pub mod store;

pub use catalog::{Catalog, CatalogProvider};
pub use character::{Bond, Character, Special, Therioform};
pub use classes::{CharClass, HeroicSkill, Skill, Spell};
pub use conditions::Status;
pub use equipment::{Equipped, Slot};
pub use error::RuleError;
pub use items::Item;
pub use progress::ProgressState;
pub use resources::Resource;
pub use session::{Session, SheetView};
pub use store::{CharacterStore, StoreConfig, YamlDirStore};

/// Smallest attribute die.
pub const MIN_DIE: u8 = 6;
/// Largest attribute die.
pub const MAX_DIE: u8 = 12;
/// Required sum of the four base dice when a character is created.
pub const CREATION_ATTRIBUTE_TOTAL: u8 = 32;

pub fn is_valid_die(value: u8) -> bool {
    matches!(value, 6 | 8 | 10 | 12)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeName {
    Dexterity,
    Might,
    Insight,
    Willpower,
}

impl AttributeName {
    pub const ALL: [AttributeName; 4] = [
        AttributeName::Dexterity,
        AttributeName::Might,
        AttributeName::Insight,
        AttributeName::Willpower,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AttributeName::Dexterity => "dexterity",
            AttributeName::Might => "might",
            AttributeName::Insight => "insight",
            AttributeName::Willpower => "willpower",
        }
    }
}

impl fmt::Display for AttributeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One attribute die. `current` is a cached value refreshed by the
/// condition engine; `base` is the character's own die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawAttribute")]
pub struct Attribute {
    pub base: u8,
    pub current: u8,
}

#[derive(Deserialize)]
struct RawAttribute {
    base: u8,
    #[serde(default)]
    current: Option<u8>,
}

impl TryFrom<RawAttribute> for Attribute {
    type Error = RuleError;

    fn try_from(raw: RawAttribute) -> Result<Self, Self::Error> {
        if !is_valid_die(raw.base) {
            return Err(RuleError::InvalidDie(raw.base));
        }
        let current = raw.current.unwrap_or(raw.base).clamp(MIN_DIE, MAX_DIE);
        Ok(Self {
            base: raw.base,
            current,
        })
    }
}

impl Attribute {
    pub fn new(base: u8) -> Result<Self, RuleError> {
        if !is_valid_die(base) {
            return Err(RuleError::InvalidDie(base));
        }
        Ok(Self {
            base,
            current: base,
        })
    }
}

impl Default for Attribute {
    fn default() -> Self {
        Self {
            base: 8,
            current: 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Attributes {
    pub dexterity: Attribute,
    pub might: Attribute,
    pub insight: Attribute,
    pub willpower: Attribute,
}

impl Attributes {
    /// Build from base dice in dexterity, might, insight, willpower order.
    pub fn from_dice(dexterity: u8, might: u8, insight: u8, willpower: u8) -> Result<Self, RuleError> {
        Ok(Self {
            dexterity: Attribute::new(dexterity)?,
            might: Attribute::new(might)?,
            insight: Attribute::new(insight)?,
            willpower: Attribute::new(willpower)?,
        })
    }

    pub fn get(&self, name: AttributeName) -> &Attribute {
        match name {
            AttributeName::Dexterity => &self.dexterity,
            AttributeName::Might => &self.might,
            AttributeName::Insight => &self.insight,
            AttributeName::Willpower => &self.willpower,
        }
    }

    pub fn get_mut(&mut self, name: AttributeName) -> &mut Attribute {
        match name {
            AttributeName::Dexterity => &mut self.dexterity,
            AttributeName::Might => &mut self.might,
            AttributeName::Insight => &mut self.insight,
            AttributeName::Willpower => &mut self.willpower,
        }
    }

    pub fn base_total(&self) -> u8 {
        AttributeName::ALL.iter().map(|n| self.get(*n).base).sum()
    }

    /// Creation-time check: every die valid and the four summing to 32.
    pub fn validate_creation(&self) -> Result<(), RuleError> {
        for name in AttributeName::ALL {
            let base = self.get(name).base;
            if !is_valid_die(base) {
                return Err(RuleError::InvalidDie(base));
            }
        }
        let total = self.base_total();
        if total != CREATION_ATTRIBUTE_TOTAL {
            return Err(RuleError::AttributeTotal {
                expected: CREATION_ATTRIBUTE_TOTAL,
                actual: total,
            });
        }
        Ok(())
    }
}
