//! A play or editing session over one character and its progress.
//!
//! The session owns both records and borrows the catalog. Every mutation
//! either completes or returns an error with both records untouched.

use std::collections::BTreeMap;
use std::fmt;

use anyhow::Result;
use serde::Serialize;
use uuid::Uuid;

use crate::AttributeName;
use crate::catalog::CatalogProvider;
use crate::character::Character;
use crate::classes::HeroicSkill;
use crate::conditions::{self, AttributeDeltas, Status};
use crate::derived::{self, AttackProfile};
use crate::equipment::{Slot, WieldingRules};
use crate::error::RuleError;
use crate::items::Item;
use crate::progress::ProgressState;
use crate::progression;
use crate::resources::{self, Pools, Potion, Resource};
use crate::rules::{MAX_MANIFESTED_FORMS, skills};
use crate::store::{CharacterStore, Loaded};

/// Where manifested forms come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Manifestation {
    /// Unlocked forms only, at most two at once.
    Theriomorphosis,
    /// Any catalog form, as many as the genoclepsis level.
    Genoclepsis,
}

pub struct Session<'a> {
    catalog: &'a dyn CatalogProvider,
    character: Character,
    progress: ProgressState,
}

impl<'a> Session<'a> {
    /// Start a session. Cached attribute values and deficits are brought in
    /// line with the progress record immediately.
    pub fn new(catalog: &'a dyn CatalogProvider, character: Character, progress: ProgressState) -> Self {
        let mut session = Self {
            catalog,
            character,
            progress,
        };
        session.refresh();
        session
    }

    pub fn from_loaded(catalog: &'a dyn CatalogProvider, loaded: Loaded) -> Self {
        Self::new(catalog, loaded.character, loaded.progress)
    }

    pub fn id(&self) -> Uuid {
        self.character.id
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn progress(&self) -> &ProgressState {
        &self.progress
    }

    pub fn into_parts(self) -> (Character, ProgressState) {
        (self.character, self.progress)
    }

    /// Recompute cached attribute values and re-clamp deficits.
    pub fn refresh(&mut self) -> AttributeDeltas {
        let net = conditions::refresh_current_attributes(&mut self.character, &self.progress);
        self.progress.normalize(&Pools::of(&self.character));
        net
    }

    // Equipment

    /// Equip an owned copy of an item that is not already in a slot.
    pub fn equip(&mut self, name: &str) -> Result<(), RuleError> {
        let item = self
            .character
            .inventory
            .spare(name)
            .cloned()
            .ok_or_else(|| RuleError::ItemNotFound(name.to_owned()))?;
        let rules = WieldingRules::for_character(&self.character);
        self.character.inventory.equipped.equip(item, rules)
    }

    pub fn unequip(&mut self, slot: Slot) -> Option<Item> {
        self.character.inventory.equipped.unequip(slot)
    }

    /// Buy a catalog item into the backpack.
    pub fn purchase(&mut self, name: &str) -> Result<(), RuleError> {
        let item = self.catalog.item(name).ok_or_else(|| RuleError::NotInCatalog {
            kind: "item",
            name: name.to_owned(),
        })?;
        self.character.inventory.purchase(item)
    }

    // Conditions

    pub fn add_status(&mut self, status: Status) -> AttributeDeltas {
        self.progress.add_status(status);
        self.refresh()
    }

    pub fn remove_status(&mut self, status: Status) -> AttributeDeltas {
        self.progress.remove_status(status);
        self.refresh()
    }

    pub fn toggle_improved(&mut self, attribute: AttributeName) -> AttributeDeltas {
        self.progress.toggle_improved(attribute);
        self.refresh()
    }

    // Resources

    pub fn spend(&mut self, resource: Resource, amount: u32) {
        resources::spend(&self.character, &mut self.progress, resource, amount);
    }

    pub fn recover(&mut self, resource: Resource, amount: u32) {
        resources::recover(&self.character, &mut self.progress, resource, amount);
    }

    pub fn drink_potion(&mut self, potion: Potion) -> Result<(), RuleError> {
        resources::drink_potion(&self.character, &mut self.progress, potion)
    }

    /// Manifest forms for the scene, paying a third of current HP (rounded
    /// down). Replaces whatever was active before; an empty list just ends
    /// the current transformation.
    pub fn manifest(&mut self, names: &[&str], via: Manifestation) -> Result<(), RuleError> {
        if names.is_empty() {
            self.end_transformations();
            return Ok(());
        }
        let (limit, feature) = match via {
            Manifestation::Theriomorphosis => {
                let limit = if self.character.has_skill(skills::THERIOMORPHOSIS) {
                    MAX_MANIFESTED_FORMS as u32
                } else {
                    0
                };
                (limit, "manifested therioform")
            }
            Manifestation::Genoclepsis => (
                self.character
                    .skill_level(skills::MUTANT, skills::GENOCLEPSIS)
                    .unwrap_or(0),
                "genoclepsis therioform",
            ),
        };
        if names.len() as u32 > limit {
            return Err(RuleError::SpecialLimit { feature, limit });
        }

        let mut forms = Vec::with_capacity(names.len());
        for name in names {
            let wanted = name.to_lowercase();
            let form = match via {
                Manifestation::Theriomorphosis => self
                    .character
                    .special
                    .therioforms
                    .iter()
                    .find(|f| f.name == wanted)
                    .cloned(),
                Manifestation::Genoclepsis => self.catalog.therioform(&wanted),
            };
            forms.push(form.ok_or_else(|| RuleError::TherioformLocked(wanted.clone()))?);
        }

        let cost = resources::current(&self.character, &self.progress, Resource::Hp) / 3;
        self.spend(Resource::Hp, cost);
        tracing::debug!(character = %self.character.id, forms = ?names, hp_cost = cost, "therioforms manifested");
        self.progress.active_therioforms = forms;
        self.refresh();
        Ok(())
    }

    pub fn end_transformations(&mut self) {
        self.progress.active_therioforms.clear();
        tracing::debug!(character = %self.character.id, "transformations ended");
        self.refresh();
    }

    // Progression

    pub fn add_class(&mut self, name: &str) -> Result<(), RuleError> {
        let class = self.catalog.class(name).ok_or_else(|| RuleError::NotInCatalog {
            kind: "class",
            name: name.to_owned(),
        })?;
        progression::add_class(&mut self.character, class)
    }

    pub fn allocate_skill_point(&mut self, class: &str, skill: &str) -> Result<(), RuleError> {
        progression::allocate_skill_point(&mut self.character, class, skill)
    }

    pub fn remove_skill_point(&mut self, class: &str, skill: &str) -> Result<(), RuleError> {
        progression::remove_skill_point(&mut self.character, class, skill)?;
        self.progress.normalize(&Pools::of(&self.character));
        Ok(())
    }

    pub fn level_up(&mut self, class: &str, skill: &str) -> Result<(), RuleError> {
        progression::level_up(&mut self.character, class, skill)
    }

    /// Heroic skills from the catalog the character could pick right now.
    pub fn heroic_skill_options<'c>(
        &self,
        candidates: impl IntoIterator<Item = &'c HeroicSkill>,
    ) -> Vec<String> {
        if !progression::can_add_heroic_skill(&self.character) {
            return Vec::new();
        }
        candidates
            .into_iter()
            .filter(|skill| progression::heroic_skill_available(&self.character, skill))
            .map(|skill| skill.name.clone())
            .collect()
    }

    pub fn add_heroic_skill(&mut self, name: &str) -> Result<(), RuleError> {
        let skill = self
            .catalog
            .heroic_skill(name)
            .ok_or_else(|| RuleError::NotInCatalog {
                kind: "heroic skill",
                name: name.to_owned(),
            })?;
        progression::add_heroic_skill(&mut self.character, skill)
    }

    pub fn increase_attribute(&mut self, attribute: AttributeName) -> Result<(), RuleError> {
        progression::increase_attribute(&mut self.character, attribute)?;
        self.refresh();
        Ok(())
    }

    pub fn learn_spell(&mut self, class: &str, spell: &str) -> Result<(), RuleError> {
        let found = self.catalog.spell(class, spell).ok_or_else(|| RuleError::NotInCatalog {
            kind: "spell",
            name: spell.to_owned(),
        })?;
        progression::learn_spell(&mut self.character, class, found)
    }

    pub fn unlock_therioform(&mut self, name: &str) -> Result<(), RuleError> {
        let form = self.catalog.therioform(name).ok_or_else(|| RuleError::NotInCatalog {
            kind: "therioform",
            name: name.to_owned(),
        })?;
        progression::unlock_therioform(&mut self.character, form)
    }

    pub fn unlock_dance(&mut self, name: &str) -> Result<(), RuleError> {
        let dance = self.catalog.dance(name).ok_or_else(|| RuleError::NotInCatalog {
            kind: "dance",
            name: name.to_owned(),
        })?;
        progression::unlock_dance(&mut self.character, dance)
    }

    // Persistence

    /// Save both records. The character must be complete.
    pub fn save(&self, store: &dyn CharacterStore) -> Result<()> {
        store.save_character(&self.character)?;
        store.save_progress(self.character.id, &self.progress)?;
        Ok(())
    }

    pub fn save_progress(&self, store: &dyn CharacterStore) -> Result<()> {
        store.save_progress(self.character.id, &self.progress)
    }

    pub fn sheet(&self) -> SheetView {
        SheetView::build(&self.character, &self.progress)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeView {
    pub base: u8,
    pub current: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolView {
    pub max: u32,
    pub current: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressionFlags {
    pub complete: bool,
    pub skill_points_available: u32,
    pub can_add_class: bool,
    pub can_add_heroic_skill: bool,
    pub can_increase_attribute: bool,
}

/// Everything the sheet shows, computed once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetView {
    pub id: Uuid,
    pub name: String,
    pub identity: String,
    pub theme: String,
    pub origin: String,
    pub level: u8,
    pub classes: BTreeMap<String, u32>,
    pub attributes: BTreeMap<AttributeName, AttributeView>,
    pub pools: BTreeMap<Resource, PoolView>,
    pub crisis_threshold: u32,
    pub in_crisis: bool,
    pub defense: i32,
    pub magic_defense: i32,
    pub initiative: String,
    pub attacks: Vec<AttackProfile>,
    pub equipped: BTreeMap<Slot, String>,
    pub statuses: Vec<Status>,
    pub active_therioforms: Vec<String>,
    pub progression: ProgressionFlags,
}

impl SheetView {
    pub fn build(character: &Character, progress: &ProgressState) -> Self {
        let attributes = AttributeName::ALL
            .into_iter()
            .map(|name| {
                let attr = character.attributes.get(name);
                (
                    name,
                    AttributeView {
                        base: attr.base,
                        current: attr.current,
                    },
                )
            })
            .collect();
        let pools = Resource::ALL
            .into_iter()
            .map(|resource| {
                (
                    resource,
                    PoolView {
                        max: resources::max(character, resource),
                        current: resources::current(character, progress, resource),
                    },
                )
            })
            .collect();
        let equipped = Slot::ALL
            .into_iter()
            .filter_map(|slot| {
                character
                    .inventory
                    .equipped
                    .get(slot)
                    .map(|item| (slot, item.name.clone()))
            })
            .collect();

        Self {
            id: character.id,
            name: character.name().to_owned(),
            identity: character.identity().to_owned(),
            theme: character.theme().to_owned(),
            origin: character.origin().to_owned(),
            level: character.level(),
            classes: character
                .classes
                .iter()
                .map(|c| (c.name.clone(), c.class_level()))
                .collect(),
            attributes,
            pools,
            crisis_threshold: resources::crisis_threshold(character),
            in_crisis: resources::in_crisis(character, progress),
            defense: derived::defense(character, progress),
            magic_defense: derived::magic_defense(character),
            initiative: derived::initiative(character).to_string(),
            attacks: derived::attacks(character),
            equipped,
            statuses: progress.statuses.iter().copied().collect(),
            active_therioforms: progress
                .active_therioforms
                .iter()
                .map(|f| f.name.clone())
                .collect(),
            progression: ProgressionFlags {
                complete: progression::is_complete(character),
                skill_points_available: progression::skill_points_available(character),
                can_add_class: progression::can_add_class(character),
                can_add_heroic_skill: progression::can_add_heroic_skill(character),
                can_increase_attribute: progression::can_increase_attribute(character),
            },
        }
    }
}

impl fmt::Display for SheetView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} (level {})", self.name, self.level)?;
        if !self.classes.is_empty() {
            let classes: Vec<String> = self
                .classes
                .iter()
                .map(|(name, level)| format!("{} {}", name, level))
                .collect();
            writeln!(f, "classes: {}", classes.join(", "))?;
        }
        let dice: Vec<String> = self
            .attributes
            .iter()
            .map(|(name, attr)| format!("{} d{}", name, attr.current))
            .collect();
        writeln!(f, "{}", dice.join(", "))?;
        for (resource, pool) in &self.pools {
            writeln!(f, "{}: {}/{}", resource, pool.current, pool.max)?;
        }
        if self.in_crisis {
            writeln!(f, "crisis (threshold {})", self.crisis_threshold)?;
        }
        writeln!(f, "defense {}, magic defense {}", self.defense, self.magic_defense)?;
        writeln!(f, "initiative {}", self.initiative)?;
        for attack in &self.attacks {
            writeln!(f, "attack {}", attack)?;
        }
        for (slot, item) in &self.equipped {
            writeln!(f, "{}: {}", slot, item)?;
        }
        if !self.statuses.is_empty() {
            let statuses: Vec<&str> = self.statuses.iter().map(|s| s.as_str()).collect();
            writeln!(f, "statuses: {}", statuses.join(", "))?;
        }
        if !self.active_therioforms.is_empty() {
            writeln!(f, "manifested: {}", self.active_therioforms.join(", "))?;
        }
        if !self.progression.complete {
            writeln!(
                f,
                "skill points to allocate: {}",
                self.progression.skill_points_available
            )?;
        }
        Ok(())
    }
}
