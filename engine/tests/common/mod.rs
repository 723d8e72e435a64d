#![allow(dead_code)]

use fabula_engine::classes::{CharClass, ClassBonus, HeroicSkill, Skill};
use fabula_engine::items::{ArmorDefense, ArmorStats, Grip, WeaponStats};
use fabula_engine::{Attributes, Character, Item};

/// A named level-`level` character with the given base dice
/// (dexterity, might, insight, willpower) and no classes.
pub fn character(level: u32, dice: [u8; 4]) -> Character {
    let mut c = Character::new();
    c.set_name("Ayla").unwrap();
    c.set_identity("Wandering knight").unwrap();
    c.set_theme("Duty").unwrap();
    c.set_origin("Aldaria").unwrap();
    c.set_level(level).unwrap();
    let [dex, mig, ins, wil] = dice;
    c.attributes = Attributes::from_dice(dex, mig, ins, wil).unwrap();
    c
}

/// Class with skills given as (name, max level, current level).
pub fn class(name: &str, bonus: Option<(ClassBonus, u32)>, skills: &[(&str, u32, u32)]) -> CharClass {
    let mut class = CharClass::new(name);
    if let Some((kind, value)) = bonus {
        class = class.with_bonus(kind, value);
    }
    for (skill, max, level) in skills {
        class = class.with_skill(Skill::new(*skill, *max).with_level(*level));
    }
    class
}

/// A class whose skills add up to exactly 10.
pub fn mastered(name: &str) -> CharClass {
    class(name, Some((ClassBonus::Hp, 5)), &[("first", 5, 5), ("second", 5, 5)])
}

pub fn heroic(character: &mut Character, name: &str) {
    character.heroic_skills.push(HeroicSkill::new(name));
}

pub fn one_handed(name: &str) -> Item {
    Item::weapon(name, WeaponStats::default())
}

pub fn two_handed(name: &str) -> Item {
    Item::weapon(
        name,
        WeaponStats {
            grip: Grip::TwoHanded,
            ..WeaponStats::default()
        },
    )
}

pub fn shield(name: &str, bonus_defense: i32) -> Item {
    Item::shield(name).with_defense(bonus_defense, 0)
}

pub fn flat_armor(name: &str, defense: i32) -> Item {
    Item::armor(
        name,
        ArmorStats {
            defense: ArmorDefense::Flat(defense),
            ..ArmorStats::default()
        },
    )
}
