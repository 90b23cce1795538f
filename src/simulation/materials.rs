//! Material profile lookup
//!
//! Pure per-kind data: how conductive a body is, whether it counts as fuel
//! for the heat source, and the optional temperature past which its visual
//! dryness effect is suppressed (read by graphics code, never by the core).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::entity::EntityKind;

/// Fuel data for kinds the heat source can consume.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FuelProfile {
    /// Consumption speed factor; higher eats faster.
    pub eat_speed: f32,
}

/// Immutable thermal properties of one entity kind.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MaterialProfile {
    /// How fast this body's temperature follows a heat differential.
    pub conductivity: f32,
    /// Present for kinds the heat source can consume.
    pub fuel: Option<FuelProfile>,
    /// Temperature above which the dryness visual is suppressed; a
    /// read-only fact for external graphics collaborators.
    pub dry_threshold: Option<f32>,
}

impl MaterialProfile {
    pub fn inedible(conductivity: f32) -> Self {
        MaterialProfile {
            conductivity,
            fuel: None,
            dry_threshold: None,
        }
    }

    pub fn edible(conductivity: f32, eat_speed: f32) -> Self {
        MaterialProfile {
            conductivity,
            fuel: Some(FuelProfile { eat_speed }),
            dry_threshold: None,
        }
    }

    pub fn creature(conductivity: f32, dry_threshold: f32) -> Self {
        MaterialProfile {
            conductivity,
            fuel: None,
            dry_threshold: Some(dry_threshold),
        }
    }

    pub fn is_fuel(&self) -> bool {
        self.fuel.is_some()
    }
}

/// Registry of material profiles, seeded with the built-in kinds and open
/// to host overrides and extensions.
pub struct MaterialTable {
    profiles: HashMap<EntityKind, MaterialProfile>,
    fallback: MaterialProfile,
}

impl MaterialTable {
    pub fn new() -> Self {
        let mut table = MaterialTable {
            profiles: HashMap::new(),
            fallback: MaterialProfile::inedible(0.025),
        };
        table.register_defaults();
        table
    }

    fn register_defaults(&mut self) {
        self.register(EntityKind::FRUIT, MaterialProfile::edible(0.2, 1.0));
        self.register(EntityKind::GRUB, MaterialProfile::edible(0.2, 1.0));
        self.register(EntityKind::FLY, MaterialProfile::edible(0.2, 1.0));

        self.register(EntityKind::SPEAR, MaterialProfile::inedible(0.50));
        self.register(EntityKind::ROCK, MaterialProfile::inedible(0.05));
        self.register(EntityKind::PLAYER, MaterialProfile::inedible(0.02));
        self.register(EntityKind::PEARL, MaterialProfile::inedible(0.05));
        self.register(EntityKind::SEED_POD, MaterialProfile::inedible(0.05));

        self.register(EntityKind::SPIDER, MaterialProfile::creature(0.15, 0.0));
        self.register(EntityKind::SKIMMER, MaterialProfile::creature(0.15, 0.4));
        self.register(EntityKind::HUNTER, MaterialProfile::creature(0.09, 0.25));
        self.register(EntityKind::WEAVER, MaterialProfile::creature(0.11, 0.25));
        self.register(EntityKind::CREATURE, MaterialProfile::inedible(0.07));
    }

    /// Register or override the profile for a kind.
    pub fn register(&mut self, kind: EntityKind, profile: MaterialProfile) {
        self.profiles.insert(kind, profile);
    }

    /// Profile for `kind`, falling back to the generic-object profile for
    /// unregistered kinds.
    pub fn get(&self, kind: EntityKind) -> &MaterialProfile {
        self.profiles.get(&kind).unwrap_or(&self.fallback)
    }
}

impl Default for MaterialTable {
    fn default() -> Self {
        Self::new()
    }
}
