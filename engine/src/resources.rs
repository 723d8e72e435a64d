//! Resource pools: hit points, mind points, inventory points.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::character::Character;
use crate::classes::ClassBonus;
use crate::error::RuleError;
use crate::progress::ProgressState;
use crate::rules::{
    BASE_IP, DEEP_POCKETS_IP_BONUS, DEEP_POCKETS_POTION_IP_COST, HEROIC_POOL_BONUS_HIGH,
    HEROIC_POOL_BONUS_LOW, HEROIC_TIER_LEVEL, POTION_IP_COST, POTION_RESTORE, heroic,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Hp,
    Mp,
    Ip,
}

impl Resource {
    pub const ALL: [Resource; 3] = [Resource::Hp, Resource::Mp, Resource::Ip];

    pub fn as_str(self) -> &'static str {
        match self {
            Resource::Hp => "hp",
            Resource::Mp => "mp",
            Resource::Ip => "ip",
        }
    }

    fn class_bonus(self) -> ClassBonus {
        match self {
            Resource::Hp => ClassBonus::Hp,
            Resource::Mp => ClassBonus::Mp,
            Resource::Ip => ClassBonus::Ip,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Resource::ALL
            .into_iter()
            .find(|r| r.as_str() == wanted)
            .ok_or_else(|| format!("unknown resource '{}'", s))
    }
}

fn class_bonus_total(character: &Character, resource: Resource) -> u32 {
    let kind = resource.class_bonus();
    character.classes.iter().map(|c| c.bonus_for(kind)).sum()
}

/// Tiered heroic bonus to HP or MP: 10 below level 40, 20 from level 40 on.
fn heroic_tier_bonus(character: &Character, skill: &str) -> u32 {
    if !character.has_heroic_skill(skill) {
        0
    } else if character.level() < HEROIC_TIER_LEVEL {
        HEROIC_POOL_BONUS_LOW
    } else {
        HEROIC_POOL_BONUS_HIGH
    }
}

pub fn max_hp(character: &Character) -> u32 {
    u32::from(character.level())
        + u32::from(character.attributes.might.base) * 5
        + class_bonus_total(character, Resource::Hp)
        + heroic_tier_bonus(character, heroic::IRON_BODY)
}

pub fn max_mp(character: &Character) -> u32 {
    u32::from(character.level())
        + u32::from(character.attributes.willpower.base) * 5
        + class_bonus_total(character, Resource::Mp)
        + heroic_tier_bonus(character, heroic::IRON_WILL)
}

pub fn max_ip(character: &Character) -> u32 {
    let deep_pockets = if character.has_heroic_skill(heroic::DEEP_POCKETS) {
        DEEP_POCKETS_IP_BONUS
    } else {
        0
    };
    BASE_IP + class_bonus_total(character, Resource::Ip) + deep_pockets
}

pub fn max(character: &Character, resource: Resource) -> u32 {
    match resource {
        Resource::Hp => max_hp(character),
        Resource::Mp => max_mp(character),
        Resource::Ip => max_ip(character),
    }
}

/// Max minus deficit. Saturates in case the deficit was clamped against a
/// larger pool than the current one.
pub fn current(character: &Character, progress: &ProgressState, resource: Resource) -> u32 {
    max(character, resource).saturating_sub(progress.deficit(resource))
}

pub fn crisis_threshold(character: &Character) -> u32 {
    max_hp(character) / 2
}

pub fn in_crisis(character: &Character, progress: &ProgressState) -> bool {
    current(character, progress, Resource::Hp) <= crisis_threshold(character)
}

/// Maximum of every pool, computed once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pools {
    pub hp: u32,
    pub mp: u32,
    pub ip: u32,
}

impl Pools {
    pub fn of(character: &Character) -> Self {
        Self {
            hp: max_hp(character),
            mp: max_mp(character),
            ip: max_ip(character),
        }
    }

    pub fn max(&self, resource: Resource) -> u32 {
        match resource {
            Resource::Hp => self.hp,
            Resource::Mp => self.mp,
            Resource::Ip => self.ip,
        }
    }
}

/// Lose up to `amount` of a pool. The deficit never exceeds the maximum.
pub fn spend(character: &Character, progress: &mut ProgressState, resource: Resource, amount: u32) {
    let max = max(character, resource);
    let deficit = progress.deficit(resource).saturating_add(amount);
    progress.set_deficit(resource, deficit, max);
}

/// Regain up to `amount` of a pool. The deficit never drops below zero.
pub fn recover(character: &Character, progress: &mut ProgressState, resource: Resource, amount: u32) {
    let max = max(character, resource);
    let deficit = progress.deficit(resource).saturating_sub(amount);
    progress.set_deficit(resource, deficit, max);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Potion {
    Health,
    Mana,
}

impl Potion {
    pub fn restores(self) -> Resource {
        match self {
            Potion::Health => Resource::Hp,
            Potion::Mana => Resource::Mp,
        }
    }
}

pub fn potion_ip_cost(character: &Character) -> u32 {
    if character.has_heroic_skill(heroic::DEEP_POCKETS) {
        DEEP_POCKETS_POTION_IP_COST
    } else {
        POTION_IP_COST
    }
}

/// Pay the IP cost and restore 50 of the potion's pool. Rejected without
/// change when current IP cannot cover the cost.
pub fn drink_potion(
    character: &Character,
    progress: &mut ProgressState,
    potion: Potion,
) -> Result<(), RuleError> {
    let cost = potion_ip_cost(character);
    let available = current(character, progress, Resource::Ip);
    if available < cost {
        return Err(RuleError::InsufficientResource {
            resource: Resource::Ip,
            needed: cost,
            available,
        });
    }
    spend(character, progress, Resource::Ip, cost);
    recover(character, progress, potion.restores(), POTION_RESTORE);
    tracing::debug!(character = %character.id, ?potion, ip_cost = cost, "potion used");
    Ok(())
}
