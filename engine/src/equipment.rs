//! Slot state machine for the two hands, the body, and the accessory.
//!
//! Without a heroic skill that allows it, a two-handed weapon in the main
//! hand never shares the hands with an off-hand occupant. Dual two-handed
//! wielding lifts that for weapons and shields; dual shieldbearer lifts it
//! for shields.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::character::Character;
use crate::error::RuleError;
use crate::items::{Item, ItemKind};
use crate::rules::heroic;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    MainHand,
    OffHand,
    Armor,
    Accessory,
}

impl Slot {
    pub const ALL: [Slot; 4] = [Slot::MainHand, Slot::OffHand, Slot::Armor, Slot::Accessory];

    pub fn as_str(self) -> &'static str {
        match self {
            Slot::MainHand => "main_hand",
            Slot::OffHand => "off_hand",
            Slot::Armor => "armor",
            Slot::Accessory => "accessory",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Slot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Slot::ALL
            .into_iter()
            .find(|slot| slot.as_str() == normalized)
            .ok_or_else(|| format!("unknown slot '{}'", s))
    }
}

/// Heroic skills that change how hands may be filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WieldingRules {
    /// Two-handed weapons count as one-handed for dual wielding.
    pub dual_two_handed: bool,
    /// A second shield fuses with the first into twin shields.
    pub dual_shieldbearer: bool,
}

impl WieldingRules {
    pub fn for_character(character: &Character) -> Self {
        Self {
            dual_two_handed: character.has_heroic_skill(heroic::MONKEY_GRIP),
            dual_shieldbearer: character.has_heroic_skill(heroic::DUAL_SHIELDBEARER),
        }
    }

    fn blocks_off_hand(&self, main: Option<&Item>) -> bool {
        !self.dual_two_handed && main.is_some_and(Item::is_two_handed)
    }

    fn shield_blocked_by(&self, main: Option<&Item>) -> bool {
        !self.dual_shieldbearer && self.blocks_off_hand(main)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Equipped {
    #[serde(default)]
    main_hand: Option<Item>,
    #[serde(default)]
    off_hand: Option<Item>,
    #[serde(default)]
    armor: Option<Item>,
    #[serde(default)]
    accessory: Option<Item>,
}

impl Equipped {
    pub fn get(&self, slot: Slot) -> Option<&Item> {
        self.slot_ref(slot).as_ref()
    }

    fn slot_ref(&self, slot: Slot) -> &Option<Item> {
        match slot {
            Slot::MainHand => &self.main_hand,
            Slot::OffHand => &self.off_hand,
            Slot::Armor => &self.armor,
            Slot::Accessory => &self.accessory,
        }
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut Option<Item> {
        match slot {
            Slot::MainHand => &mut self.main_hand,
            Slot::OffHand => &mut self.off_hand,
            Slot::Armor => &mut self.armor,
            Slot::Accessory => &mut self.accessory,
        }
    }

    pub fn is_empty(&self) -> bool {
        Slot::ALL.iter().all(|slot| self.get(*slot).is_none())
    }

    /// Equip an item, dispatching on its variant. Items that fit no slot
    /// are rejected and nothing changes.
    pub fn equip(&mut self, item: Item, rules: WieldingRules) -> Result<(), RuleError> {
        match &item.kind {
            ItemKind::Armor(_) => self.place(Slot::Armor, item),
            ItemKind::Accessory => self.place(Slot::Accessory, item),
            ItemKind::Weapon(_) => self.equip_weapon(item, rules),
            ItemKind::Shield(_) => self.equip_shield(item, rules),
            ItemKind::Other => return Err(RuleError::Unequippable(item.name)),
        }
        Ok(())
    }

    fn place(&mut self, slot: Slot, item: Item) {
        tracing::debug!(%slot, item = %item.name, "equipped");
        *self.slot_mut(slot) = Some(item);
    }

    fn clear(&mut self, slot: Slot) {
        if let Some(old) = self.slot_mut(slot).take() {
            tracing::debug!(%slot, item = %old.name, "slot cleared");
        }
    }

    fn equip_weapon(&mut self, weapon: Item, rules: WieldingRules) {
        if weapon.is_two_handed() && !rules.dual_two_handed {
            self.clear(Slot::OffHand);
            self.place(Slot::MainHand, weapon);
            return;
        }

        let main_pairs = self
            .main_hand
            .as_ref()
            .is_some_and(|main| main.weapon_stats().is_some() && !rules.blocks_off_hand(Some(main)));

        if self.main_hand.is_none() {
            self.place(Slot::MainHand, weapon);
        } else if self.off_hand.is_none() && main_pairs {
            self.place(Slot::OffHand, weapon);
        } else {
            self.place(Slot::MainHand, weapon);
        }
    }

    fn equip_shield(&mut self, shield: Item, rules: WieldingRules) {
        if rules.dual_shieldbearer && self.off_hand.as_ref().is_some_and(Item::is_shield) {
            if let Some(first) = self.off_hand.take() {
                let fused = Item::twin_shields(&first, &shield);
                tracing::debug!(first = %first.name, second = %shield.name, "shields fused");
                self.place(Slot::MainHand, fused);
            }
            return;
        }

        if rules.shield_blocked_by(self.main_hand.as_ref()) {
            self.clear(Slot::MainHand);
        }
        self.place(Slot::OffHand, shield);
    }

    /// Clear a slot. Clearing an empty slot is a no-op.
    pub fn unequip(&mut self, slot: Slot) -> Option<Item> {
        let old = self.slot_mut(slot).take();
        if let Some(item) = &old {
            tracing::debug!(%slot, item = %item.name, "unequipped");
        }
        old
    }

    /// Non-empty occupants in slot order.
    pub fn items(&self) -> Vec<&Item> {
        Slot::ALL.iter().filter_map(|slot| self.get(*slot)).collect()
    }

    pub fn slot_of(&self, name: &str) -> Option<Slot> {
        Slot::ALL
            .into_iter()
            .find(|slot| self.get(*slot).is_some_and(|item| item.name == name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slot_of(name).is_some()
    }

    /// Owned copies of `name` tied up in the slots, counting shields fused
    /// into twin shields.
    pub fn copies_in_use(&self, name: &str) -> usize {
        self.items()
            .iter()
            .map(|item| {
                usize::from(item.name == name)
                    + item.fused_from.iter().filter(|source| *source == name).count()
            })
            .sum()
    }

    /// The slot whose occupant is `name` or was fused from it.
    pub fn slot_holding(&self, name: &str) -> Option<Slot> {
        self.slot_of(name).or_else(|| {
            Slot::ALL.into_iter().find(|slot| {
                self.get(*slot)
                    .is_some_and(|item| item.fused_from.iter().any(|source| source == name))
            })
        })
    }

    /// Weapons held in either hand; shields are not weapons.
    pub fn weapons(&self) -> Vec<&Item> {
        [&self.main_hand, &self.off_hand]
            .into_iter()
            .flatten()
            .filter(|item| item.weapon_stats().is_some())
            .collect()
    }

    pub fn bonus_defense(&self) -> i32 {
        self.items().iter().map(|i| i.bonus_defense).sum()
    }

    pub fn bonus_magic_defense(&self) -> i32 {
        self.items().iter().map(|i| i.bonus_magic_defense).sum()
    }

    pub fn bonus_initiative(&self) -> i32 {
        self.items().iter().map(|i| i.bonus_initiative).sum()
    }
}
