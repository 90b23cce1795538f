pub mod burn;
pub mod kind;
pub mod player;
pub mod thermal;

use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use burn::SeedBurnState;
pub use kind::EntityKind;
pub use player::{PlayerInput, PlayerState};
pub use thermal::ThermalState;

/// Unique identifier for entities in a room.
///
/// Ids are allocated by the owning [`crate::world::Room`] and stay stable
/// for the entity's lifetime; the thermal/burn records live and die with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

bitflags! {
    /// Lifecycle flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct EntityFlags: u8 {
        /// Dead but still physically present (corpses keep cooling/burning).
        const DEAD = 1 << 0;
        /// Destroyed this tick; skipped by all further steps and pruned at
        /// the end of the tick.
        const DOOMED = 1 << 1;
    }
}

/// A discrete contact point on an entity's body, used for collision,
/// submersion and water-strike queries. Position/velocity/submersion are
/// maintained by the physics layer; this core reads them and only writes
/// velocity for the seed-pod completion kick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyChunk {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub mass: f32,
    /// Fraction of this chunk under water, in `[0, 1]`.
    pub submersion: f32,
}

impl BodyChunk {
    pub fn new(pos: Vec2, radius: f32, mass: f32) -> Self {
        BodyChunk {
            pos,
            vel: Vec2::ZERO,
            radius,
            mass,
            submersion: 0.0,
        }
    }
}

/// Anchor of one segment on a composite entity's extent, mirroring how a
/// seed sits on a stalk: `lateral` is the side offset in `[-1, 1]`,
/// `along` is the position along the tip-to-root axis in `[0, 1]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SegmentAnchor {
    pub lateral: f32,
    pub along: f32,
}

/// Any simulated physical body capable of holding a temperature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub chunks: Vec<BodyChunk>,
    /// Index of the primary contact point (cools fastest when submerged).
    pub main_chunk: usize,
    pub flags: EntityFlags,
    /// Accumulated rain exposure reported by the environment, 0 when dry.
    pub rain_soak: f32,
    pub thermal: ThermalState,
    /// Segment anchors; empty for non-composite entities.
    pub segments: Vec<SegmentAnchor>,
    /// Per-segment burn progress; meaningful only for composite entities.
    pub burn: SeedBurnState,
    /// Present on player-controlled entities.
    pub player: Option<PlayerState>,
}

impl Entity {
    pub(crate) fn new(id: EntityId, kind: EntityKind, chunks: Vec<BodyChunk>) -> Self {
        Entity {
            id,
            kind,
            chunks,
            main_chunk: 0,
            flags: EntityFlags::empty(),
            rain_soak: 0.0,
            thermal: ThermalState::new(),
            segments: Vec::new(),
            burn: SeedBurnState::new(),
            player: None,
        }
    }

    /// Total body mass, the sum over contact points.
    pub fn total_mass(&self) -> f32 {
        self.chunks.iter().map(|chunk| chunk.mass).sum()
    }

    /// The primary contact point.
    pub fn main(&self) -> &BodyChunk {
        &self.chunks[self.main_chunk]
    }

    /// Composite entities burn segment by segment.
    pub fn is_composite(&self) -> bool {
        !self.segments.is_empty()
    }

    pub fn is_dead(&self) -> bool {
        self.flags.contains(EntityFlags::DEAD)
    }

    pub fn is_doomed(&self) -> bool {
        self.flags.contains(EntityFlags::DOOMED)
    }

    /// Mark dead; the body stays in the room.
    pub fn kill(&mut self) {
        self.flags.insert(EntityFlags::DEAD);
    }

    /// Mark destroyed; excluded from all further processing this tick and
    /// pruned at the end of it.
    pub fn doom(&mut self) {
        self.flags.insert(EntityFlags::DOOMED);
    }

    /// Mean submersion across contact points.
    pub fn submersion(&self) -> f32 {
        if self.chunks.is_empty() {
            0.0
        } else {
            self.chunks.iter().map(|chunk| chunk.submersion).sum::<f32>() / self.chunks.len() as f32
        }
    }

    /// True when every contact point is completely under water.
    pub fn fully_submerged(&self) -> bool {
        !self.chunks.is_empty() && self.chunks.iter().all(|chunk| chunk.submersion >= 1.0)
    }
}
