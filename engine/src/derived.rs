//! Defenses, initiative, and attack profiles derived from gear and attributes.

use std::fmt;

use serde::Serialize;

use crate::character::Character;
use crate::equipment::Slot;
use crate::items::{ArmorDefense, DamageType, Item, WeaponRange, WeaponStats};
use crate::progress::ProgressState;
use crate::rules::{TRANSFORMATION_DEFENSE_BASE, skills};
use crate::{AttributeName, Attributes};

fn armor_base(character: &Character) -> i32 {
    let attributes = &character.attributes;
    match character
        .inventory
        .equipped
        .get(Slot::Armor)
        .and_then(Item::armor_stats)
        .map(|stats| stats.defense)
    {
        Some(ArmorDefense::Flat(value)) => value,
        Some(ArmorDefense::Attribute(name)) => i32::from(attributes.get(name).current),
        None => i32::from(attributes.dexterity.current),
    }
}

/// Level of the rogue's dodge skill, added straight to defense.
fn dodge_bonus(character: &Character) -> i32 {
    character
        .skill_level(skills::ROGUE, skills::DODGE)
        .map_or(0, |level| level as i32)
}

/// Defense floor granted by a manifested form, if one is active.
pub fn transformation_floor(character: &Character, progress: &ProgressState) -> Option<i32> {
    let floored = progress.active_therioforms.iter().any(|form| form.defense_floor);
    if !floored {
        return None;
    }
    let level = character.best_skill_level(skills::THERIOMORPHOSIS) as i32;
    Some(TRANSFORMATION_DEFENSE_BASE + level / 2)
}

pub fn defense(character: &Character, progress: &ProgressState) -> i32 {
    let value =
        armor_base(character) + character.inventory.equipped.bonus_defense() + dodge_bonus(character);
    match transformation_floor(character, progress) {
        Some(floor) => value.max(floor),
        None => value,
    }
}

pub fn magic_defense(character: &Character) -> i32 {
    let equipped = &character.inventory.equipped;
    let attribute = equipped
        .get(Slot::Armor)
        .and_then(Item::armor_stats)
        .map_or(AttributeName::Insight, |stats| stats.magic_defense);
    i32::from(character.attributes.get(attribute).current) + equipped.bonus_magic_defense()
}

/// Symbolic initiative roll: two dice and an optional flat modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Initiative {
    pub insight: u8,
    pub dexterity: u8,
    pub modifier: i32,
}

impl fmt::Display for Initiative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{} + d{}", self.insight, self.dexterity)?;
        if self.modifier != 0 {
            write!(f, " {:+}", self.modifier)?;
        }
        Ok(())
    }
}

pub fn initiative(character: &Character) -> Initiative {
    Initiative {
        insight: character.attributes.insight.current,
        dexterity: character.attributes.dexterity.current,
        modifier: character.inventory.equipped.bonus_initiative(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttackProfile {
    pub weapon: String,
    pub range: WeaponRange,
    pub accuracy: [u8; 2],
    pub bonus_accuracy: i32,
    pub bonus_damage: i32,
    pub damage_type: DamageType,
}

impl AttackProfile {
    fn from_weapon(name: &str, stats: &WeaponStats, attributes: &Attributes) -> Self {
        let [first, second] = stats.accuracy;
        Self {
            weapon: name.to_owned(),
            range: stats.range,
            accuracy: [attributes.get(first).current, attributes.get(second).current],
            bonus_accuracy: stats.bonus_accuracy,
            bonus_damage: stats.bonus_damage,
            damage_type: stats.damage_type,
        }
    }
}

impl fmt::Display for AttackProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: d{} + d{}", self.weapon, self.accuracy[0], self.accuracy[1])?;
        if self.bonus_accuracy != 0 {
            write!(f, " {:+}", self.bonus_accuracy)?;
        }
        write!(f, ", HR {:+} {}", self.bonus_damage, self.damage_type)
    }
}

/// One profile per weapon in hand, or the unarmed strike when the hands hold none.
pub fn attacks(character: &Character) -> Vec<AttackProfile> {
    let attributes = &character.attributes;
    let held = character.inventory.equipped.weapons();
    if held.is_empty() {
        let fists = Item::unarmed_strike();
        return fists
            .weapon_stats()
            .map(|stats| AttackProfile::from_weapon(&fists.name, stats, attributes))
            .into_iter()
            .collect();
    }
    held.into_iter()
        .filter_map(|item| {
            item.weapon_stats()
                .map(|stats| AttackProfile::from_weapon(&item.name, stats, attributes))
        })
        .collect()
}
