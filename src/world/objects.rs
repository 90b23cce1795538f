//! Transient room objects and effect data
//!
//! Water-producing objects (drips, waterfalls) are supplied by the
//! environment; steam puffs, fire sprites and smoke emitters are spawned by
//! the core as pure effect data for an external renderer. Sound cues go
//! through a per-tick queue the host drains.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Stable handle to a transient room object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

/// A falling water drip; spent (consumed) on the first hot contact.
#[derive(Debug, Clone)]
pub struct WaterDrip {
    pub pos: Vec2,
    pub vel: Vec2,
    pub width: f32,
    pub spent: bool,
}

/// A waterfall volume. Anything inside the strike region gets doused,
/// scaled by `flow`.
#[derive(Debug, Clone)]
pub struct Waterfall {
    pub left: f32,
    pub right: f32,
    /// Bottom of the falling volume.
    pub strike_level: f32,
    /// Top of the falling volume.
    pub start_level: f32,
    /// Current flow, 0 when dried up.
    pub flow: f32,
}

impl Waterfall {
    /// True when `pos` lies inside the strike region grown by `margin` on
    /// every side (a chunk is struck when its radius overlaps the volume).
    pub fn strikes(&self, pos: Vec2, margin: f32) -> bool {
        pos.x >= self.left - margin
            && pos.x <= self.right + margin
            && pos.y >= self.strike_level - margin
            && pos.y <= self.start_level + margin
    }
}

/// A hissing puff of steam rising off a cooled body.
#[derive(Debug, Clone)]
pub struct SteamPuff {
    pub pos: Vec2,
    pub vel: Vec2,
    pub intensity: f32,
    /// Remaining lifetime in ticks.
    pub life: u32,
}

/// A single fire particle.
#[derive(Debug, Clone)]
pub struct FireSprite {
    pub pos: Vec2,
    /// Drawn in front of the scene rather than behind it.
    pub foreground: bool,
    pub life: u32,
}

/// A persistent wispy smoke source, tracked by an entity's smoke slot while
/// it keeps emitting.
#[derive(Debug, Clone)]
pub struct SmokeEmitter {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: u32,
}

/// Everything that can live in a room's transient update list.
#[derive(Debug, Clone)]
pub enum RoomObject {
    Drip(WaterDrip),
    Waterfall(Waterfall),
    Steam(SteamPuff),
    Fire(FireSprite),
    Smoke(SmokeEmitter),
}

impl RoomObject {
    /// Per-tick aging. Returns false once the object should be removed.
    pub(crate) fn age(&mut self) -> bool {
        match self {
            RoomObject::Drip(drip) => !drip.spent,
            // Waterfalls persist until the environment removes them.
            RoomObject::Waterfall(_) => true,
            RoomObject::Steam(steam) => {
                steam.life = steam.life.saturating_sub(1);
                steam.life > 0
            }
            RoomObject::Fire(fire) => {
                fire.life = fire.life.saturating_sub(1);
                fire.life > 0
            }
            RoomObject::Smoke(smoke) => {
                smoke.life = smoke.life.saturating_sub(1);
                smoke.life > 0
            }
        }
    }
}

/// A room object together with its handle.
#[derive(Debug, Clone)]
pub struct KeyedObject {
    pub id: ObjectId,
    pub object: RoomObject,
}

/// Sound cues the core requests; playback is external.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundId {
    SteamHiss,
    FireCrackle,
    DouseRumble,
}

/// One requested sound, described as data.
#[derive(Debug, Clone)]
pub struct SoundCue {
    pub sound: SoundId,
    pub pos: Vec2,
    pub volume: f32,
    pub pitch: f32,
}
