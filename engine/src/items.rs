//! Item hierarchy: a shared base record plus a variant tag.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::AttributeName;
use crate::rules::{self, TWIN_SHIELDS_DAMAGE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grip {
    #[default]
    OneHanded,
    TwoHanded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponRange {
    #[default]
    Melee,
    Ranged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponCategory {
    Arcane,
    Bow,
    #[default]
    Brawling,
    Firearm,
    Dagger,
    Flail,
    Heavy,
    Spear,
    Sword,
    Thrown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageType {
    #[default]
    Physical,
    Air,
    Earth,
    Ice,
    Fire,
    Lightning,
    Dark,
    Light,
    Poison,
}

impl DamageType {
    pub fn as_str(self) -> &'static str {
        match self {
            DamageType::Physical => "physical",
            DamageType::Air => "air",
            DamageType::Earth => "earth",
            DamageType::Ice => "ice",
            DamageType::Fire => "fire",
            DamageType::Lightning => "lightning",
            DamageType::Dark => "dark",
            DamageType::Light => "light",
            DamageType::Poison => "poison",
        }
    }
}

impl fmt::Display for DamageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponStats {
    #[serde(default)]
    pub martial: bool,
    #[serde(default)]
    pub grip: Grip,
    #[serde(default)]
    pub range: WeaponRange,
    #[serde(default)]
    pub category: WeaponCategory,
    #[serde(default)]
    pub damage_type: DamageType,
    #[serde(default = "default_accuracy")]
    pub accuracy: [AttributeName; 2],
    #[serde(default)]
    pub bonus_accuracy: i32,
    #[serde(default)]
    pub bonus_damage: i32,
}

fn default_accuracy() -> [AttributeName; 2] {
    [AttributeName::Dexterity, AttributeName::Might]
}

impl Default for WeaponStats {
    fn default() -> Self {
        Self {
            martial: false,
            grip: Grip::OneHanded,
            range: WeaponRange::Melee,
            category: WeaponCategory::Brawling,
            damage_type: DamageType::Physical,
            accuracy: default_accuracy(),
            bonus_accuracy: 0,
            bonus_damage: 0,
        }
    }
}

/// Armor defense is either read from an attribute die or a flat score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArmorDefense {
    Flat(i32),
    Attribute(AttributeName),
}

impl Default for ArmorDefense {
    fn default() -> Self {
        ArmorDefense::Attribute(AttributeName::Dexterity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmorStats {
    #[serde(default)]
    pub martial: bool,
    #[serde(default)]
    pub defense: ArmorDefense,
    #[serde(default = "default_magic_defense")]
    pub magic_defense: AttributeName,
}

fn default_magic_defense() -> AttributeName {
    AttributeName::Insight
}

impl Default for ArmorStats {
    fn default() -> Self {
        Self {
            martial: false,
            defense: ArmorDefense::default(),
            magic_defense: default_magic_defense(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShieldStats {
    #[serde(default)]
    pub martial: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemKind {
    Weapon(WeaponStats),
    Armor(ArmorStats),
    Shield(ShieldStats),
    Accessory,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    #[serde(default)]
    pub cost: u32,
    #[serde(default = "default_quality")]
    pub quality: String,
    #[serde(default)]
    pub bonus_defense: i32,
    #[serde(default)]
    pub bonus_magic_defense: i32,
    #[serde(default)]
    pub bonus_initiative: i32,
    pub kind: ItemKind,
    /// Names of the owned items this one was fused from.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fused_from: Vec<String>,
}

fn default_quality() -> String {
    rules::items::NO_QUALITY.to_owned()
}

impl Item {
    pub fn new(name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            name: name.into(),
            cost: 0,
            quality: default_quality(),
            bonus_defense: 0,
            bonus_magic_defense: 0,
            bonus_initiative: 0,
            kind,
            fused_from: Vec::new(),
        }
    }

    pub fn weapon(name: impl Into<String>, stats: WeaponStats) -> Self {
        Self::new(name, ItemKind::Weapon(stats))
    }

    pub fn armor(name: impl Into<String>, stats: ArmorStats) -> Self {
        Self::new(name, ItemKind::Armor(stats))
    }

    pub fn shield(name: impl Into<String>) -> Self {
        Self::new(name, ItemKind::Shield(ShieldStats::default()))
    }

    pub fn accessory(name: impl Into<String>) -> Self {
        Self::new(name, ItemKind::Accessory)
    }

    pub fn with_defense(mut self, bonus_defense: i32, bonus_magic_defense: i32) -> Self {
        self.bonus_defense = bonus_defense;
        self.bonus_magic_defense = bonus_magic_defense;
        self
    }

    pub fn with_initiative(mut self, bonus_initiative: i32) -> Self {
        self.bonus_initiative = bonus_initiative;
        self
    }

    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost = cost;
        self
    }

    /// Fists: free, melee, one-handed brawling with the standard accuracy pair.
    /// Computed on demand and never stored in an inventory.
    pub fn unarmed_strike() -> Self {
        Self::weapon(rules::items::UNARMED_STRIKE, WeaponStats::default())
    }

    /// Fuse two shields into one two-handed weapon. Defense bonuses add up,
    /// accuracy rolls might twice.
    pub fn twin_shields(first: &Item, second: &Item) -> Self {
        let martial = first.is_martial() || second.is_martial();
        let stats = WeaponStats {
            martial,
            grip: Grip::TwoHanded,
            range: WeaponRange::Melee,
            category: WeaponCategory::Brawling,
            damage_type: DamageType::Physical,
            accuracy: [AttributeName::Might, AttributeName::Might],
            bonus_accuracy: 0,
            bonus_damage: TWIN_SHIELDS_DAMAGE,
        };
        let mut fused = Self::weapon(rules::items::TWIN_SHIELDS, stats)
            .with_cost(first.cost + second.cost)
            .with_defense(
                first.bonus_defense + second.bonus_defense,
                first.bonus_magic_defense + second.bonus_magic_defense,
            );
        fused.fused_from = vec![first.name.clone(), second.name.clone()];
        fused
    }

    pub fn weapon_stats(&self) -> Option<&WeaponStats> {
        match &self.kind {
            ItemKind::Weapon(stats) => Some(stats),
            _ => None,
        }
    }

    pub fn armor_stats(&self) -> Option<&ArmorStats> {
        match &self.kind {
            ItemKind::Armor(stats) => Some(stats),
            _ => None,
        }
    }

    pub fn is_shield(&self) -> bool {
        matches!(self.kind, ItemKind::Shield(_))
    }

    pub fn is_two_handed(&self) -> bool {
        self.weapon_stats()
            .is_some_and(|stats| stats.grip == Grip::TwoHanded)
    }

    pub fn is_martial(&self) -> bool {
        match &self.kind {
            ItemKind::Weapon(stats) => stats.martial,
            ItemKind::Armor(stats) => stats.martial,
            ItemKind::Shield(stats) => stats.martial,
            ItemKind::Accessory | ItemKind::Other => false,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            ItemKind::Weapon(_) => "weapon",
            ItemKind::Armor(_) => "armor",
            ItemKind::Shield(_) => "shield",
            ItemKind::Accessory => "accessory",
            ItemKind::Other => "item",
        }
    }
}
