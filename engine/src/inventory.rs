use serde::{Deserialize, Serialize};

use crate::equipment::Equipped;
use crate::error::RuleError;
use crate::items::{Item, ItemKind};

/// Currency, worn gear, and the unordered bag of everything else owned.
///
/// Equipped items are also expected to be owned (present in the backpack),
/// one owned copy per occupied slot. Removing the last free copy of an item
/// unequips it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default)]
    pub zenit: u32,
    #[serde(default)]
    pub equipped: Equipped,
    #[serde(default)]
    pub backpack: Vec<Item>,
}

impl Inventory {
    pub fn add(&mut self, item: Item) {
        tracing::debug!(item = %item.name, "item added to backpack");
        self.backpack.push(item);
    }

    /// Take one item with this name out of the backpack. When fewer copies
    /// remain than are equipped, the equipped one goes too.
    pub fn remove(&mut self, name: &str) -> Result<Item, RuleError> {
        let idx = self
            .backpack
            .iter()
            .position(|i| i.name == name)
            .ok_or_else(|| RuleError::ItemNotFound(name.to_owned()))?;
        let item = self.backpack.remove(idx);
        if self.owned(&item.name) < self.equipped.copies_in_use(&item.name) {
            if let Some(slot) = self.equipped.slot_holding(&item.name) {
                self.equipped.unequip(slot);
            }
        }
        tracing::debug!(item = %item.name, "item removed from backpack");
        Ok(item)
    }

    pub fn purchase(&mut self, item: Item) -> Result<(), RuleError> {
        if item.cost > self.zenit {
            return Err(RuleError::InsufficientZenit {
                cost: item.cost,
                available: self.zenit,
            });
        }
        self.zenit -= item.cost;
        tracing::debug!(item = %item.name, cost = item.cost, zenit = self.zenit, "item purchased");
        self.backpack.push(item);
        Ok(())
    }

    pub fn find(&self, name: &str) -> Option<&Item> {
        self.backpack.iter().find(|i| i.name == name)
    }

    pub fn owned(&self, name: &str) -> usize {
        self.backpack.iter().filter(|i| i.name == name).count()
    }

    /// An owned copy of `name` that no slot is using yet.
    pub fn spare(&self, name: &str) -> Option<&Item> {
        if self.owned(name) > self.equipped.copies_in_use(name) {
            self.find(name)
        } else {
            None
        }
    }

    pub fn weapons(&self) -> impl Iterator<Item = &Item> {
        self.backpack
            .iter()
            .filter(|i| matches!(i.kind, ItemKind::Weapon(_)))
    }

    pub fn armors(&self) -> impl Iterator<Item = &Item> {
        self.backpack
            .iter()
            .filter(|i| matches!(i.kind, ItemKind::Armor(_)))
    }

    pub fn shields(&self) -> impl Iterator<Item = &Item> {
        self.backpack.iter().filter(|i| i.is_shield())
    }

    pub fn accessories(&self) -> impl Iterator<Item = &Item> {
        self.backpack
            .iter()
            .filter(|i| matches!(i.kind, ItemKind::Accessory))
    }

    pub fn other_items(&self) -> impl Iterator<Item = &Item> {
        self.backpack
            .iter()
            .filter(|i| matches!(i.kind, ItemKind::Other))
    }
}
