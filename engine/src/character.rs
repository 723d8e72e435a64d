//! The character aggregate: everything a player chose for their hero.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classes::{CharClass, HeroicSkill, Martial, Spell};
use crate::error::RuleError;
use crate::inventory::Inventory;
use crate::rules::{MAX_LEVEL, MIN_LEVEL};
use crate::{AttributeName, Attributes};

/// Character level, always within 1..=60.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Level(u8);

impl Level {
    pub fn new(value: u32) -> Result<Self, RuleError> {
        if (u32::from(MIN_LEVEL)..=u32::from(MAX_LEVEL)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(RuleError::InvalidLevel(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Level {
    fn default() -> Self {
        Self(5)
    }
}

impl TryFrom<u32> for Level {
    type Error = RuleError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Level> for u32 {
    fn from(level: Level) -> Self {
        u32::from(level.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Therioform {
    pub name: String,
    /// Attribute boosted while the form is manifested.
    #[serde(default)]
    pub attribute: Option<AttributeName>,
    /// Manifesting this form raises defense to the theriomorphosis floor.
    #[serde(default)]
    pub defense_floor: bool,
}

impl Therioform {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().to_lowercase(),
            attribute: None,
            defense_floor: false,
        }
    }

    pub fn boosting(mut self, attribute: AttributeName) -> Self {
        self.attribute = Some(attribute);
        self
    }

    pub fn with_defense_floor(mut self) -> Self {
        self.defense_floor = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DanceDuration {
    #[default]
    Instantaneous,
    NextTurn,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dance {
    pub name: String,
    #[serde(default)]
    pub duration: DanceDuration,
}

/// Unlocked special features, independent of equipment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Special {
    #[serde(default)]
    pub therioforms: Vec<Therioform>,
    #[serde(default)]
    pub dances: Vec<Dance>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Respect {
    Admiration,
    Inferiority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trust {
    Loyalty,
    Mistrust,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Affinity {
    Affection,
    Hatred,
}

/// A named relationship carrying at most one emotion per axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBond")]
pub struct Bond {
    name: String,
    respect: Option<Respect>,
    trust: Option<Trust>,
    affinity: Option<Affinity>,
}

#[derive(Deserialize)]
struct RawBond {
    name: String,
    #[serde(default)]
    respect: Option<Respect>,
    #[serde(default)]
    trust: Option<Trust>,
    #[serde(default)]
    affinity: Option<Affinity>,
}

impl TryFrom<RawBond> for Bond {
    type Error = RuleError;

    fn try_from(raw: RawBond) -> Result<Self, Self::Error> {
        Bond::new(raw.name, raw.respect, raw.trust, raw.affinity)
    }
}

impl Bond {
    pub fn new(
        name: impl Into<String>,
        respect: Option<Respect>,
        trust: Option<Trust>,
        affinity: Option<Affinity>,
    ) -> Result<Self, RuleError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RuleError::UnnamedBond);
        }
        if respect.is_none() && trust.is_none() && affinity.is_none() {
            return Err(RuleError::EmptyBond(name));
        }
        Ok(Self {
            name,
            respect,
            trust,
            affinity,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn respect(&self) -> Option<Respect> {
        self.respect
    }

    pub fn trust(&self) -> Option<Trust> {
        self.trust
    }

    pub fn affinity(&self) -> Option<Affinity> {
        self.affinity
    }

    /// Number of emotions the bond carries (1..=3).
    pub fn strength(&self) -> usize {
        usize::from(self.respect.is_some())
            + usize::from(self.trust.is_some())
            + usize::from(self.affinity.is_some())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(default)]
    name: String,
    #[serde(default)]
    identity: String,
    #[serde(default)]
    theme: String,
    #[serde(default)]
    origin: String,
    #[serde(default)]
    level: Level,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub classes: Vec<CharClass>,
    /// Known spells keyed by lower-case class name.
    #[serde(default)]
    pub spells: IndexMap<String, Vec<Spell>>,
    #[serde(default)]
    pub heroic_skills: Vec<HeroicSkill>,
    #[serde(default)]
    pub inventory: Inventory,
    #[serde(default)]
    pub special: Special,
    #[serde(default)]
    bonds: Vec<Bond>,
}

impl Default for Character {
    fn default() -> Self {
        Self::new()
    }
}

fn require(field: &'static str, value: String) -> Result<String, RuleError> {
    if value.trim().is_empty() {
        Err(RuleError::EmptyField(field))
    } else {
        Ok(value)
    }
}

impl Character {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: String::new(),
            identity: String::new(),
            theme: String::new(),
            origin: String::new(),
            level: Level::default(),
            attributes: Attributes::default(),
            classes: Vec::new(),
            spells: IndexMap::new(),
            heroic_skills: Vec::new(),
            inventory: Inventory::default(),
            special: Special::default(),
            bonds: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn level(&self) -> u8 {
        self.level.get()
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), RuleError> {
        self.name = require("name", name.into())?;
        Ok(())
    }

    pub fn set_identity(&mut self, identity: impl Into<String>) -> Result<(), RuleError> {
        self.identity = require("identity", identity.into())?;
        Ok(())
    }

    pub fn set_theme(&mut self, theme: impl Into<String>) -> Result<(), RuleError> {
        self.theme = require("theme", theme.into())?;
        Ok(())
    }

    pub fn set_origin(&mut self, origin: impl Into<String>) -> Result<(), RuleError> {
        self.origin = require("origin", origin.into())?;
        Ok(())
    }

    pub fn set_level(&mut self, level: u32) -> Result<(), RuleError> {
        self.level = Level::new(level)?;
        Ok(())
    }

    /// Skill levels allocated across every class.
    pub fn skill_total(&self) -> u32 {
        self.classes.iter().map(CharClass::class_level).sum()
    }

    pub fn class(&self, name: &str) -> Option<&CharClass> {
        let name = name.to_lowercase();
        self.classes.iter().find(|c| c.name == name)
    }

    pub fn class_mut(&mut self, name: &str) -> Option<&mut CharClass> {
        let name = name.to_lowercase();
        self.classes.iter_mut().find(|c| c.name == name)
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.class(name).is_some()
    }

    /// True when some class has the skill at level 1 or more.
    pub fn has_skill(&self, skill: &str) -> bool {
        self.classes
            .iter()
            .any(|c| c.skill_level(skill).is_some_and(|level| level > 0))
    }

    /// Highest level the character holds in a skill across all classes.
    pub fn best_skill_level(&self, skill: &str) -> u32 {
        self.classes
            .iter()
            .filter_map(|c| c.skill_level(skill))
            .max()
            .unwrap_or(0)
    }

    pub fn skill_level(&self, class: &str, skill: &str) -> Option<u32> {
        self.class(class).and_then(|c| c.skill_level(skill))
    }

    pub fn mastered_classes(&self) -> usize {
        self.classes.iter().filter(|c| c.is_mastered()).count()
    }

    pub fn spells_for(&self, class: &str) -> &[Spell] {
        self.spells
            .get(&class.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn all_spells(&self) -> impl Iterator<Item = &Spell> {
        self.spells.values().flatten()
    }

    pub fn has_heroic_skill(&self, name: &str) -> bool {
        self.heroic_skills.iter().any(|h| h.name == name)
    }

    pub fn martial(&self) -> Martial {
        Martial::from_classes(&self.classes)
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn add_bond(&mut self, bond: Bond) {
        self.bonds.push(bond);
    }

    pub fn remove_bond(&mut self, name: &str) -> Option<Bond> {
        let idx = self.bonds.iter().position(|b| b.name == name)?;
        Some(self.bonds.remove(idx))
    }
}
