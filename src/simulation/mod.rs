//! Simulation systems - heat exchange, water cooling, combustion, interaction

pub mod combustion;
pub mod config;
pub mod heat_exchange;
pub mod interaction;
mod materials;
pub mod thresholds;
pub mod water;

use glam::Vec2;
use rand::Rng;

use crate::entity::{Entity, EntityId, EntityKind};
use crate::world::{Room, SoundId};

pub use combustion::{combustion_step, radiate};
pub use config::{ConfigError, ThermalConfig};
pub use heat_exchange::{exchange, passive_diffusion};
pub use interaction::player_step;
pub use materials::{FuelProfile, MaterialProfile, MaterialTable};
pub use thresholds::{ReactionTable, ThresholdReaction, ThresholdRule};
pub use water::water_step;

/// Role predicate for the privileged heat source: the one body that gains
/// heat from any contact but never loses it except through explicitly
/// gated interactions. Supplied by the host and evaluated fresh every time
/// it is consulted - the role can move between entities.
pub type HeatSourceFn = fn(&Entity) -> bool;

/// Default role: a living player-controlled entity.
pub fn default_heat_source(entity: &Entity) -> bool {
    entity.kind == EntityKind::PLAYER && entity.player.is_some() && !entity.is_dead()
}

/// A collision reported by the physics layer for this tick: an
/// instantaneous jolt of contact, exchanging heat much faster than
/// sustained touch and hard enough to drain even the privileged source.
#[derive(Debug, Clone, Copy)]
pub struct ContactEvent {
    pub a: EntityId,
    pub b: EntityId,
    /// Impact strength in `[0, 1]`, scaling the exchange speed.
    pub impact: f32,
}

/// The tick orchestrator. Owns the tuning, the material table and the
/// threshold table; the room and the RNG are passed in so runs are
/// reproducible and free of ambient state.
pub struct ThermalSimulator {
    pub config: ThermalConfig,
    pub materials: MaterialTable,
    pub thresholds: ReactionTable,
    heat_source: HeatSourceFn,
}

impl ThermalSimulator {
    pub fn new(config: ThermalConfig) -> Self {
        ThermalSimulator {
            config,
            materials: MaterialTable::new(),
            thresholds: ReactionTable::new(),
            heat_source: default_heat_source,
        }
    }

    /// Replace the privileged-role predicate.
    pub fn set_heat_source(&mut self, predicate: HeatSourceFn) {
        self.heat_source = predicate;
    }

    /// Whether `entity` currently holds the privileged role.
    pub fn is_heat_source(&self, entity: &Entity) -> bool {
        (self.heat_source)(entity)
    }

    /// Advance one simulation tick.
    ///
    /// Step order matters: exchanges run first so freshly transferred heat
    /// is visible to the same tick's diffusion and buffer integration,
    /// then water, combustion and the player interaction, then upkeep.
    pub fn tick(&self, room: &mut Room, contacts: &[ContactEvent], rng: &mut impl Rng) {
        let source = self.heat_source;

        // 1. Collision jolts.
        for contact in contacts {
            let (Some(i), Some(j)) = (room.index_of(contact.a), room.index_of(contact.b)) else {
                continue;
            };
            if i == j || room.entities()[i].is_doomed() || room.entities()[j].is_doomed() {
                continue;
            }
            let speed = self.config.collision_speed * contact.impact.clamp(0.0, 1.0);
            let (a, b) = room.pair_mut(i, j);
            exchange(a, b, &self.materials, speed, true, source);
        }

        // 2. Sustained attachments, skipping heat-retaining ones.
        let attachments = room.attachments.clone();
        for att in attachments {
            let retaining = att.insulating()
                && (room.get(att.a).is_some_and(source) || room.get(att.b).is_some_and(source));
            if retaining {
                continue;
            }
            let (Some(i), Some(j)) = (room.index_of(att.a), room.index_of(att.b)) else {
                continue;
            };
            if i == j || room.entities()[i].is_doomed() || room.entities()[j].is_doomed() {
                continue;
            }
            // Both directions, each through its own material's conductivity.
            let (a, b) = room.pair_mut(i, j);
            exchange(a, b, &self.materials, self.config.exchange_speed, false, source);
            let (b, a) = room.pair_mut(j, i);
            exchange(b, a, &self.materials, self.config.exchange_speed, false, source);
        }

        // 3. Passive diffusion for everything not insulated by the source.
        for i in 0..room.entity_count() {
            if room.entities()[i].is_doomed() || room.retains_heat(i, source) {
                continue;
            }
            passive_diffusion(
                &mut room.entities_mut()[i],
                &self.materials,
                self.config.passive_decay,
                self.config.zero_epsilon,
            );
        }

        // 4. Buffer integration and the steam-hiss countdown.
        for i in 0..room.entity_count() {
            if room.entities()[i].is_doomed() {
                continue;
            }
            let hiss_pos = {
                let entity = &mut room.entities_mut()[i];
                entity.thermal.integrate(self.config.buffer_rate);
                if entity.thermal.steam_sound > 0 {
                    entity.thermal.steam_sound -= 1;
                    Some(entity.main().pos)
                } else {
                    None
                }
            };
            if let Some(pos) = hiss_pos {
                room.push_sound(SoundId::SteamHiss, pos, 0.4, 1.15);
            }
        }

        // 5. Water cooling.
        for i in 0..room.entity_count() {
            water_step(room, i, &self.config, rng);
        }

        // 6. Combustion for composite entities.
        for i in 0..room.entity_count() {
            if room.entities()[i].is_composite() {
                combustion_step(room, i, &self.materials, &self.config, rng, source);
            }
        }

        // 7. The player heating/douse interaction.
        for i in 0..room.entity_count() {
            if room.entities()[i].player.is_some() {
                player_step(
                    room,
                    i,
                    &self.materials,
                    &self.thresholds,
                    &self.config,
                    rng,
                    source,
                );
            }
        }

        // 8. Upkeep: age transients, prune destroyed entities.
        room.end_tick();
    }
}

impl Default for ThermalSimulator {
    fn default() -> Self {
        Self::new(ThermalConfig::default())
    }
}

/// Scatter fire sprites over an entity's main chunk, the shared visual for
/// anything bursting into flame.
pub fn burst_into_flame(room: &mut Room, index: usize, rng: &mut impl Rng, intensity: f32) {
    let (pos, radius) = {
        let main = room.entities()[index].main();
        (main.pos, main.radius)
    };
    let count = (10.0 + radius * intensity) as u32;
    for _ in 0..count {
        let offset = random_unit_circle(rng) * radius * 0.8;
        room.spawn_fire_sprite(pos + offset, chance(rng, 0.5), 60);
    }
}

// -- Shared math helpers --

pub(crate) fn chance(rng: &mut impl Rng, probability: f32) -> bool {
    rng.random::<f32>() < probability
}

pub(crate) fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t.clamp(0.0, 1.0)
}

pub(crate) fn inverse_lerp(from: f32, to: f32, value: f32) -> f32 {
    if (to - from).abs() <= f32::EPSILON {
        0.0
    } else {
        ((value - from) / (to - from)).clamp(0.0, 1.0)
    }
}

/// Uniformly distributed point inside the unit circle.
pub(crate) fn random_unit_circle(rng: &mut impl Rng) -> Vec2 {
    let angle = rng.random::<f32>() * std::f32::consts::TAU;
    let radius = rng.random::<f32>().sqrt();
    Vec2::new(angle.cos(), angle.sin()) * radius
}

pub(crate) fn closest_point_on_segment(a: Vec2, b: Vec2, point: Vec2) -> Vec2 {
    let ab = b - a;
    let length_sq = ab.length_squared();
    if length_sq <= f32::EPSILON {
        return a;
    }
    let t = ((point - a).dot(ab) / length_sq).clamp(0.0, 1.0);
    a + ab * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::BodyChunk;
    use crate::world::AttachmentKind;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    fn rng() -> Xoshiro256StarStar {
        Xoshiro256StarStar::seed_from_u64(1)
    }

    fn chunk_at(x: f32, mass: f32) -> BodyChunk {
        BodyChunk::new(Vec2::new(x, 0.0), 5.0, mass)
    }

    #[test]
    fn test_helpers() {
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
        assert_eq!(lerp(0.0, 10.0, 2.0), 10.0, "lerp clamps t");
        assert_eq!(inverse_lerp(10.0, 20.0, 15.0), 0.5);
        assert_eq!(inverse_lerp(10.0, 20.0, 0.0), 0.0);

        let mid = closest_point_on_segment(Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(5.0, 3.0));
        assert_eq!(mid, Vec2::new(5.0, 0.0));
        let end = closest_point_on_segment(Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(20.0, 0.0));
        assert_eq!(end, Vec2::new(10.0, 0.0));

        let mut rng = rng();
        for _ in 0..100 {
            assert!(random_unit_circle(&mut rng).length() <= 1.0 + 1e-6);
        }
    }

    #[test]
    fn test_collision_exchange_drains_the_source() {
        let simulator = ThermalSimulator::default();
        let mut room = Room::new();
        let player = room.spawn_player(vec![chunk_at(0.0, 0.7)]);
        let rock = room.spawn(EntityKind::ROCK, vec![chunk_at(6.0, 0.5)]);
        room.get_mut(player).unwrap().thermal.set_temperature(1.0);

        let contacts = [ContactEvent {
            a: player,
            b: rock,
            impact: 1.0,
        }];
        simulator.tick(&mut room, &contacts, &mut rng());

        assert!(
            room.get(player).unwrap().thermal.temperature() < 1.0,
            "a hard collision may drain even the privileged source"
        );
        assert!(room.get(rock).unwrap().thermal.temperature() > 0.0);
    }

    #[test]
    fn test_exchange_visible_to_same_tick_diffusion() {
        // A stuck (open) attachment transfers heat before diffusion runs,
        // so the cold side both gains and immediately starts decaying in
        // one tick: its end temperature is below the pure transfer amount.
        let simulator = ThermalSimulator::default();
        let mut room = Room::new();
        let hot = room.spawn(EntityKind::ROCK, vec![chunk_at(0.0, 1.0)]);
        let cold = room.spawn(EntityKind::SPEAR, vec![chunk_at(4.0, 1.0)]);
        room.get_mut(hot).unwrap().thermal.set_temperature(1.0);
        room.attach(hot, cold, AttachmentKind::Stuck);

        simulator.tick(&mut room, &[], &mut rng());

        let cold_temp = room.get(cold).unwrap().thermal.temperature();
        assert!(cold_temp > 0.0, "stick contact transferred heat");

        // Pure transfer without decay, both directions.
        let spear_cond = simulator.materials.get(EntityKind::SPEAR).conductivity;
        let transferred = 1.0 * spear_cond * simulator.config.exchange_speed * 0.5
            + 1.0 * simulator.materials.get(EntityKind::ROCK).conductivity
                * simulator.config.exchange_speed
                * 0.5;
        assert!(
            cold_temp < transferred,
            "diffusion must see the fresh heat in the same tick: {cold_temp} vs {transferred}"
        );
    }

    #[test]
    fn test_grasped_item_is_insulated() {
        let simulator = ThermalSimulator::default();
        let mut room = Room::new();
        let player = room.spawn_player(vec![chunk_at(0.0, 0.7)]);
        let rock = room.spawn(EntityKind::ROCK, vec![chunk_at(6.0, 0.5)]);
        room.get_mut(rock).unwrap().thermal.set_temperature(0.5);
        room.attach(player, rock, AttachmentKind::Grasp);

        simulator.tick(&mut room, &[], &mut rng());

        // No exchange through the retaining grasp, no passive decay.
        assert_eq!(room.get(rock).unwrap().thermal.temperature(), 0.5);
    }

    #[test]
    fn test_loose_entity_decays() {
        let simulator = ThermalSimulator::default();
        let mut room = Room::new();
        let rock = room.spawn(EntityKind::ROCK, vec![chunk_at(0.0, 0.5)]);
        room.get_mut(rock).unwrap().thermal.set_temperature(0.5);

        simulator.tick(&mut room, &[], &mut rng());

        assert!(room.get(rock).unwrap().thermal.temperature() < 0.5);
    }

    #[test]
    fn test_buffer_integration_and_hiss() {
        let simulator = ThermalSimulator::default();
        let mut room = Room::new();
        let rock = room.spawn(EntityKind::ROCK, vec![chunk_at(0.0, 0.5)]);
        room.get_mut(rock).unwrap().thermal.deposit(1.0);
        room.get_mut(rock).unwrap().thermal.steam_sound = 2;

        simulator.tick(&mut room, &[], &mut rng());

        let entity = room.get(rock).unwrap();
        assert!(entity.thermal.temperature() > 0.0, "buffer fed temperature");
        assert!(entity.thermal.pending_change() < 1.0);
        assert!(entity.thermal.pending_change() >= 0.0, "buffer invariant");
        assert_eq!(entity.thermal.steam_sound, 1);

        let sounds = room.drain_sounds();
        assert!(sounds.iter().any(|cue| cue.sound == SoundId::SteamHiss));
    }

    #[test]
    fn test_buffer_invariant_every_tick() {
        let simulator = ThermalSimulator::default();
        let mut room = Room::new();
        let player = room.spawn_player(vec![chunk_at(0.0, 0.7)]);
        let fruit = room.spawn(EntityKind::FRUIT, vec![chunk_at(6.0, 0.1)]);
        room.attach(player, fruit, AttachmentKind::Grasp);
        room.get_mut(player).unwrap().thermal.deposit(0.8);
        let mut rng = rng();

        for _ in 0..50 {
            simulator.tick(&mut room, &[], &mut rng);
            for entity in room.entities() {
                assert!(entity.thermal.pending_change() >= 0.0);
            }
        }
    }

    #[test]
    fn test_default_heat_source_role() {
        let mut room = Room::new();
        let player = room.spawn_player(vec![chunk_at(0.0, 0.7)]);
        let rock = room.spawn(EntityKind::ROCK, vec![chunk_at(6.0, 0.5)]);

        assert!(default_heat_source(room.get(player).unwrap()));
        assert!(!default_heat_source(room.get(rock).unwrap()));

        room.get_mut(player).unwrap().kill();
        assert!(
            !default_heat_source(room.get(player).unwrap()),
            "a dead player no longer generates heat"
        );
    }
}
