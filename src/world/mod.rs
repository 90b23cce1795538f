//! Room management - the entity arena, attachments and transient objects

mod objects;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::{BodyChunk, Entity, EntityId, EntityKind, PlayerState, SegmentAnchor};

pub use objects::{
    FireSprite, KeyedObject, ObjectId, RoomObject, SmokeEmitter, SoundCue, SoundId, SteamPuff,
    WaterDrip, Waterfall,
};

/// How two entities are attached to one another. Attachments are owned by
/// the physics layer and mirrored into the room; the core only reads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttachmentKind {
    /// Held in a hand. Retains heat when the holder generates it.
    Grasp,
    /// Carried on the back. Retains heat like a grasp.
    Worn,
    /// Impaled, snagged or otherwise stuck; an open thermal contact.
    Stuck,
}

/// A sustained relation between a holder (`a`) and a held entity (`b`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Attachment {
    pub a: EntityId,
    pub b: EntityId,
    pub kind: AttachmentKind,
}

impl Attachment {
    /// Grasped and worn items neither gain nor lose heat passively: contact
    /// with a heat-generating holder is modeled as perfect insulation.
    pub fn insulating(&self) -> bool {
        matches!(self.kind, AttachmentKind::Grasp | AttachmentKind::Worn)
    }
}

/// A room: the live collection of entities, their attachments, and the
/// transient objects (water and effects) updated alongside them.
///
/// Single-writer-per-tick: all mutation happens synchronously inside the
/// simulator's tick, in a fixed step order.
pub struct Room {
    next_entity: u64,
    entities: Vec<Entity>,
    pub attachments: Vec<Attachment>,
    objects: Vec<KeyedObject>,
    next_object: u64,
    sounds: Vec<SoundCue>,
}

impl Room {
    pub fn new() -> Self {
        Room {
            next_entity: 1,
            entities: Vec::new(),
            attachments: Vec::new(),
            objects: Vec::new(),
            next_object: 1,
            sounds: Vec::new(),
        }
    }

    // -- Entities --

    /// Add an entity and return its id.
    pub fn spawn(&mut self, kind: EntityKind, chunks: Vec<BodyChunk>) -> EntityId {
        let id = EntityId(self.next_entity);
        self.next_entity += 1;
        self.entities.push(Entity::new(id, kind, chunks));
        id
    }

    /// Add a player-controlled entity.
    pub fn spawn_player(&mut self, chunks: Vec<BodyChunk>) -> EntityId {
        let id = self.spawn(EntityKind::PLAYER, chunks);
        if let Some(player) = self.get_mut(id) {
            player.player = Some(PlayerState::new());
        }
        id
    }

    /// Add a composite (segmented) entity. The burn array is sized lazily
    /// on first access.
    pub fn spawn_composite(
        &mut self,
        kind: EntityKind,
        chunks: Vec<BodyChunk>,
        segments: Vec<SegmentAnchor>,
    ) -> EntityId {
        let id = self.spawn(kind, chunks);
        if let Some(entity) = self.get_mut(id) {
            entity.segments = segments;
        }
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|entity| entity.id == id)
    }

    pub fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.iter().position(|entity| entity.id == id)
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Mutable access to two distinct entities at once, for pairwise
    /// exchanges.
    pub fn pair_mut(&mut self, i: usize, j: usize) -> (&mut Entity, &mut Entity) {
        assert_ne!(i, j, "pairwise access requires two distinct entities");
        if i < j {
            let (left, right) = self.entities.split_at_mut(j);
            (&mut left[i], &mut right[0])
        } else {
            let (left, right) = self.entities.split_at_mut(i);
            (&mut right[0], &mut left[j])
        }
    }

    // -- Attachments --

    pub fn attach(&mut self, a: EntityId, b: EntityId, kind: AttachmentKind) {
        self.attachments.push(Attachment { a, b, kind });
    }

    pub fn detach(&mut self, a: EntityId, b: EntityId) {
        self.attachments
            .retain(|att| !(att.a == a && att.b == b) && !(att.a == b && att.b == a));
    }

    /// Ids of entities currently grasped by `holder`.
    pub fn grasped_by(&self, holder: EntityId) -> Vec<EntityId> {
        self.attachments
            .iter()
            .filter(|att| att.a == holder && att.kind == AttachmentKind::Grasp)
            .map(|att| att.b)
            .collect()
    }

    /// Whether the entity at `index` is insulated from passive diffusion:
    /// it generates heat itself, or it hangs on an insulating attachment
    /// whose holder does.
    pub fn retains_heat(&self, index: usize, is_heat_source: impl Fn(&Entity) -> bool) -> bool {
        let entity = &self.entities[index];
        if is_heat_source(entity) {
            return true;
        }
        self.attachments.iter().any(|att| {
            if !att.insulating() {
                return false;
            }
            let holder = if att.b == entity.id {
                att.a
            } else if att.a == entity.id {
                att.b
            } else {
                return false;
            };
            self.get(holder).is_some_and(&is_heat_source)
        })
    }

    // -- Transient objects --

    pub fn add_object(&mut self, object: RoomObject) -> ObjectId {
        let id = ObjectId(self.next_object);
        self.next_object += 1;
        self.objects.push(KeyedObject { id, object });
        id
    }

    pub fn object(&self, id: ObjectId) -> Option<&RoomObject> {
        self.objects
            .iter()
            .find(|keyed| keyed.id == id)
            .map(|keyed| &keyed.object)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut RoomObject> {
        self.objects
            .iter_mut()
            .find(|keyed| keyed.id == id)
            .map(|keyed| &mut keyed.object)
    }

    pub fn objects(&self) -> impl Iterator<Item = &KeyedObject> {
        self.objects.iter()
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Swap the live object list out for iteration. Objects spawned while
    /// the snapshot is held land in the (empty) live list and are preserved
    /// by [`Room::merge_objects`]; nothing is revisited or skipped.
    pub(crate) fn take_objects(&mut self) -> Vec<KeyedObject> {
        std::mem::take(&mut self.objects)
    }

    /// Restore a snapshot taken with [`Room::take_objects`], appending any
    /// objects spawned in the meantime.
    pub(crate) fn merge_objects(&mut self, mut snapshot: Vec<KeyedObject>) {
        snapshot.append(&mut self.objects);
        self.objects = snapshot;
    }

    pub fn spawn_steam(&mut self, pos: Vec2, vel: Vec2, intensity: f32) -> ObjectId {
        self.add_object(RoomObject::Steam(SteamPuff {
            pos,
            vel,
            intensity,
            life: 40,
        }))
    }

    pub fn spawn_fire_sprite(&mut self, pos: Vec2, foreground: bool, life: u32) -> ObjectId {
        self.add_object(RoomObject::Fire(FireSprite {
            pos,
            foreground,
            life,
        }))
    }

    // -- Sounds --

    pub fn push_sound(&mut self, sound: SoundId, pos: Vec2, volume: f32, pitch: f32) {
        self.sounds.push(SoundCue {
            sound,
            pos,
            volume,
            pitch,
        });
    }

    /// Hand the tick's sound requests to the host.
    pub fn drain_sounds(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.sounds)
    }

    // -- Upkeep --

    /// End-of-tick upkeep: age transient objects, prune doomed entities and
    /// drop attachments that lost an endpoint.
    pub(crate) fn end_tick(&mut self) {
        self.objects.retain_mut(|keyed| keyed.object.age());

        let doomed: Vec<EntityId> = self
            .entities
            .iter()
            .filter(|entity| entity.is_doomed())
            .map(|entity| entity.id)
            .collect();
        if !doomed.is_empty() {
            log::debug!("pruning {} destroyed entities", doomed.len());
            self.entities.retain(|entity| !entity.is_doomed());
            self.attachments
                .retain(|att| !doomed.contains(&att.a) && !doomed.contains(&att.b));
        }
    }
}

impl Default for Room {
    fn default() -> Self {
        Self::new()
    }
}
