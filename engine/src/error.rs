use thiserror::Error;

use crate::AttributeName;
use crate::resources::Resource;

/// Rejected rule operation. The aggregate is left exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("level {0} should be between 1 and 60")]
    InvalidLevel(u32),

    #[error("{0} should not be empty")]
    EmptyField(&'static str),

    #[error("d{0} is not a valid attribute die")]
    InvalidDie(u8),

    #[error("starting attributes must total {expected}, got {actual}")]
    AttributeTotal { expected: u8, actual: u8 },

    #[error("a bond needs a name")]
    UnnamedBond,

    #[error("the bond with {0} needs at least one emotion")]
    EmptyBond(String),

    #[error("{0} cannot be equipped")]
    Unequippable(String),

    #[error("{0} is not in the backpack")]
    ItemNotFound(String),

    #[error("not enough zenit: {cost} needed, {available} available")]
    InsufficientZenit { cost: u32, available: u32 },

    #[error("no {kind} named {name} in the catalog")]
    NotInCatalog { kind: &'static str, name: String },

    #[error("class {0} is not part of this character")]
    ClassNotFound(String),

    #[error("class {0} is already part of this character")]
    ClassAlreadyAdded(String),

    #[error("three classes are still unmastered; master one before adding another")]
    TooManyClasses,

    #[error("skill {skill} does not belong to class {class}")]
    SkillNotFound { class: String, skill: String },

    #[error("no skill points left to allocate")]
    NoSkillPoints,

    #[error("skill {skill} is already at level {max}")]
    SkillMaxed { skill: String, max: u32 },

    #[error("skill {0} has no levels to remove")]
    SkillEmpty(String),

    #[error("level 60 is the highest level")]
    MaxLevelReached,

    #[error("no heroic skill is available until another class is mastered")]
    HeroicSkillLocked,

    #[error("heroic skill {0} is already known")]
    HeroicSkillOwned(String),

    #[error("the requirements of heroic skill {0} are not met")]
    HeroicRequirementsUnmet(String),

    #[error("attributes cannot be increased at level {level} with a total of {total}")]
    AttributeIncreaseLocked { level: u8, total: u8 },

    #[error("{0} is already d12")]
    AttributeMaxed(AttributeName),

    #[error("{class} already knows the spell {spell}")]
    SpellKnown { class: String, spell: String },

    #[error("{0} cannot learn more spells")]
    SpellSlotsFull(String),

    #[error("{feature} limit of {limit} reached")]
    SpecialLimit { feature: &'static str, limit: u32 },

    #[error("therioform {0} is not unlocked")]
    TherioformLocked(String),

    #[error("not enough {resource}: {needed} needed, {available} available")]
    InsufficientResource {
        resource: Resource,
        needed: u32,
        available: u32,
    },

    #[error("skill levels ({allocated}) must equal the character level ({level}) before saving")]
    Incomplete { level: u8, allocated: u32 },
}
