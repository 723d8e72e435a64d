use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::AttributeName;
use crate::character::Therioform;
use crate::conditions::Status;
use crate::resources::{Pools, Resource};

/// Transient play state, persisted apart from the character it belongs to.
///
/// Deficits count how much of each pool is currently unavailable and stay
/// within `0..=max` for the pools they were last clamped against.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProgressState {
    #[serde(default)]
    pub hp_deficit: u32,
    #[serde(default)]
    pub mp_deficit: u32,
    #[serde(default)]
    pub ip_deficit: u32,
    #[serde(default)]
    pub statuses: BTreeSet<Status>,
    /// Therioforms manifested for the current scene.
    #[serde(default)]
    pub active_therioforms: Vec<Therioform>,
    #[serde(default)]
    pub improved_attributes: BTreeSet<AttributeName>,
}

impl ProgressState {
    pub fn deficit(&self, resource: Resource) -> u32 {
        match resource {
            Resource::Hp => self.hp_deficit,
            Resource::Mp => self.mp_deficit,
            Resource::Ip => self.ip_deficit,
        }
    }

    fn deficit_mut(&mut self, resource: Resource) -> &mut u32 {
        match resource {
            Resource::Hp => &mut self.hp_deficit,
            Resource::Mp => &mut self.mp_deficit,
            Resource::Ip => &mut self.ip_deficit,
        }
    }

    /// Store a deficit, clamped to the pool's maximum.
    pub fn set_deficit(&mut self, resource: Resource, value: u32, max: u32) {
        let clamped = value.min(max);
        *self.deficit_mut(resource) = clamped;
        tracing::debug!(%resource, deficit = clamped, max, "deficit set");
    }

    /// Re-clamp every deficit, e.g. after a level or attribute change lowered a pool.
    pub fn normalize(&mut self, pools: &Pools) {
        for resource in Resource::ALL {
            let max = pools.max(resource);
            let slot = self.deficit_mut(resource);
            *slot = (*slot).min(max);
        }
    }

    /// Returns false when the status was already present.
    pub fn add_status(&mut self, status: Status) -> bool {
        let added = self.statuses.insert(status);
        if added {
            tracing::debug!(%status, "status added");
        }
        added
    }

    /// Returns false when the status was not present.
    pub fn remove_status(&mut self, status: Status) -> bool {
        let removed = self.statuses.remove(&status);
        if removed {
            tracing::debug!(%status, "status removed");
        }
        removed
    }

    pub fn has_status(&self, status: Status) -> bool {
        self.statuses.contains(&status)
    }

    /// Flip an attribute in or out of the improved set; returns the new membership.
    pub fn toggle_improved(&mut self, attribute: AttributeName) -> bool {
        let improved = if self.improved_attributes.remove(&attribute) {
            false
        } else {
            self.improved_attributes.insert(attribute);
            true
        };
        tracing::debug!(%attribute, improved, "improved attribute toggled");
        improved
    }

    pub fn is_transformed(&self) -> bool {
        !self.active_therioforms.is_empty()
    }
}
