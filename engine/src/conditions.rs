//! Status conditions and the attribute modifier engine.
//!
//! `current` on each attribute is a cached value. The functions here are the
//! only place it is rewritten; callers refresh it explicitly.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::character::Character;
use crate::progress::ProgressState;
use crate::rules::{IMPROVED_ATTRIBUTE_BONUS, STATUS_MALUS, TRANSFORMATION_ATTRIBUTE_BONUS};
use crate::{AttributeName, Attributes, MAX_DIE, MIN_DIE};

/// Per-attribute signed adjustment, one entry for each of the four attributes.
pub type AttributeDeltas = BTreeMap<AttributeName, i32>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Dazed,
    Enraged,
    Poisoned,
    Shaken,
    Slow,
    Weak,
}

impl Status {
    pub const ALL: [Status; 6] = [
        Status::Dazed,
        Status::Enraged,
        Status::Poisoned,
        Status::Shaken,
        Status::Slow,
        Status::Weak,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Dazed => "dazed",
            Status::Enraged => "enraged",
            Status::Poisoned => "poisoned",
            Status::Shaken => "shaken",
            Status::Slow => "slow",
            Status::Weak => "weak",
        }
    }

    /// Attributes this status lowers.
    pub fn affects(self) -> &'static [AttributeName] {
        use AttributeName::*;
        match self {
            Status::Dazed => &[Insight],
            Status::Enraged => &[Insight, Dexterity],
            Status::Poisoned => &[Might, Willpower],
            Status::Shaken => &[Willpower],
            Status::Slow => &[Dexterity],
            Status::Weak => &[Might],
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| format!("unknown status '{}'", s))
    }
}

fn zeroed() -> AttributeDeltas {
    AttributeName::ALL.into_iter().map(|name| (name, 0)).collect()
}

/// Summed penalties of the given statuses. Stacking is additive.
pub fn status_maluses<'a>(statuses: impl IntoIterator<Item = &'a Status>) -> AttributeDeltas {
    let mut maluses = zeroed();
    for status in statuses {
        for name in status.affects() {
            *maluses.entry(*name).or_default() += STATUS_MALUS;
        }
    }
    maluses
}

/// Summed bonuses from improved attributes and manifested therioforms.
pub fn attribute_bonuses(progress: &ProgressState) -> AttributeDeltas {
    let mut bonuses = zeroed();
    for name in &progress.improved_attributes {
        *bonuses.entry(*name).or_default() += IMPROVED_ATTRIBUTE_BONUS;
    }
    for name in progress.active_therioforms.iter().filter_map(|form| form.attribute) {
        *bonuses.entry(name).or_default() += TRANSFORMATION_ATTRIBUTE_BONUS;
    }
    bonuses
}

fn die_after(base: u8, delta: i32) -> u8 {
    (i32::from(base) + delta).clamp(i32::from(MIN_DIE), i32::from(MAX_DIE)) as u8
}

/// Recompute and cache `current = max(6, base + malus)` for every attribute.
/// Returns how far each attribute was lowered (`base - current`).
pub fn apply_status_maluses(
    attributes: &mut Attributes,
    progress: &ProgressState,
) -> AttributeDeltas {
    let maluses = status_maluses(&progress.statuses);
    let mut lowered = zeroed();
    for name in AttributeName::ALL {
        let attr = attributes.get_mut(name);
        let malus = maluses.get(&name).copied().unwrap_or(0);
        attr.current = (i32::from(attr.base) + malus).max(i32::from(MIN_DIE)) as u8;
        lowered.insert(name, i32::from(attr.base) - i32::from(attr.current));
    }
    lowered
}

/// Recompute and cache `current = min(12, base + bonus)` for every attribute.
/// Returns how far each attribute was raised (`current - base`).
///
/// Overwrites whatever `apply_status_maluses` cached; call it second.
pub fn apply_attribute_bonuses(
    attributes: &mut Attributes,
    progress: &ProgressState,
) -> AttributeDeltas {
    let bonuses = attribute_bonuses(progress);
    let mut raised = zeroed();
    for name in AttributeName::ALL {
        let attr = attributes.get_mut(name);
        let bonus = bonuses.get(&name).copied().unwrap_or(0);
        attr.current = (i32::from(attr.base) + bonus).min(i32::from(MAX_DIE)) as u8;
        raised.insert(name, i32::from(attr.current) - i32::from(attr.base));
    }
    raised
}

/// Net refresh of every cached `current` value: maluses and bonuses are
/// summed first and the result is clamped to the die range once, so the
/// outcome does not depend on evaluation order.
///
/// Returns `current - base` per attribute.
pub fn refresh_current_attributes(
    character: &mut Character,
    progress: &ProgressState,
) -> AttributeDeltas {
    let maluses = status_maluses(&progress.statuses);
    let bonuses = attribute_bonuses(progress);
    let mut net = zeroed();
    for name in AttributeName::ALL {
        let delta = maluses.get(&name).copied().unwrap_or(0) + bonuses.get(&name).copied().unwrap_or(0);
        let attr = character.attributes.get_mut(name);
        attr.current = die_after(attr.base, delta);
        net.insert(name, i32::from(attr.current) - i32::from(attr.base));
    }
    tracing::debug!(character = %character.id, ?net, "current attributes refreshed");
    net
}
