//! # Smolder - thermal/combustion simulation core
//!
//! The heat layer of a 2D physical-object game: pairwise heat exchange
//! between bodies, water cooling, segment-level combustion for composite
//! plants, and the player-driven "heat what I'm holding" interaction.
//! Rendering, audio and rigid-body physics live outside; this crate
//! consumes contact and submersion facts and emits effect data.

pub mod entity;
pub mod simulation;
pub mod world;

/// Common imports for internal use
pub mod prelude {
    pub use crate::entity::{BodyChunk, Entity, EntityId, EntityKind, SegmentAnchor};
    pub use crate::simulation::{
        ContactEvent, MaterialProfile, MaterialTable, ReactionTable, ThermalConfig,
        ThermalSimulator,
    };
    pub use crate::world::{AttachmentKind, Room};
    pub use glam::Vec2;
}
