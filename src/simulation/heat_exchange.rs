//! Pairwise heat exchange, passive diffusion and buffer integration
//!
//! The exchange rule is deliberately asymmetric: the privileged heat source
//! may gain heat from any contact but only loses it when the caller opts in
//! (collision damage). Lighter bodies equilibrate faster than heavy ones.

use crate::entity::Entity;
use crate::simulation::materials::MaterialTable;

/// Exchange heat between two touching entities.
///
/// `speed` scales the whole transfer: ~0.05 for sustained contact, higher
/// for an instantaneous collision jolt. `drain_heat` lets the privileged
/// source lose heat, used for collision-damage scenarios.
///
/// The transfer is weighted by mass ratio so the lighter body moves further
/// toward equilibrium, and by the conductivity of `a`'s material.
pub fn exchange(
    a: &mut Entity,
    b: &mut Entity,
    materials: &MaterialTable,
    speed: f32,
    drain_heat: bool,
    is_heat_source: impl Fn(&Entity) -> bool,
) {
    if speed <= 0.0 || a.id == b.id {
        return;
    }
    let total_mass = a.total_mass() + b.total_mass();
    if total_mass <= 0.0 {
        return;
    }

    // Lighter bodies lose/gain heat faster than heavier ones.
    let mass_ratio = b.total_mass() / total_mass;
    let conductivity = materials.get(a.kind).conductivity;
    let flow = b.thermal.temperature() - a.thermal.temperature();

    let a_may_cool = !is_heat_source(a) || drain_heat;
    let b_may_cool = !is_heat_source(b) || drain_heat;

    if a_may_cool || flow > 0.0 {
        a.thermal.add_temperature(flow * conductivity * speed * mass_ratio);
    }
    if b_may_cool || flow < 0.0 {
        b.thermal
            .add_temperature(-(flow * conductivity * speed * (1.0 - mass_ratio)));
    }
}

/// Per-tick passive heat loss for an entity not in heat-retaining contact
/// with the source: a fraction of its own heat, scaled by conductivity.
/// Snaps to exactly zero below `epsilon` so decay terminates.
pub fn passive_diffusion(
    entity: &mut Entity,
    materials: &MaterialTable,
    decay_rate: f32,
    epsilon: f32,
) {
    let conductivity = materials.get(entity.kind).conductivity;
    let loss = entity.thermal.temperature() * conductivity * decay_rate;
    entity.thermal.add_temperature(-loss);
    entity.thermal.snap_to_zero(epsilon);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{BodyChunk, EntityId, EntityKind};
    use glam::Vec2;

    fn entity(id: u64, kind: EntityKind, mass: f32, temperature: f32) -> Entity {
        let mut e = Entity::new(EntityId(id), kind, vec![BodyChunk::new(Vec2::ZERO, 5.0, mass)]);
        e.thermal.set_temperature(temperature);
        e
    }

    fn never_source(_: &Entity) -> bool {
        false
    }

    fn player_source(entity: &Entity) -> bool {
        entity.kind == EntityKind::PLAYER
    }

    #[test]
    fn test_mass_ratio_weighting() {
        // Lighter entity (mass 1) at 1.0 against heavier (mass 3) at 0.0,
        // conductivity 0.2, speed 0.05. The lighter side's change must be
        // three times the heavier side's.
        let mut table = MaterialTable::new();
        table.register(
            EntityKind::DEBRIS,
            crate::simulation::materials::MaterialProfile::inedible(0.2),
        );

        let mut light = entity(1, EntityKind::DEBRIS, 1.0, 1.0);
        let mut heavy = entity(2, EntityKind::DEBRIS, 3.0, 0.0);
        exchange(&mut light, &mut heavy, &table, 0.05, false, never_source);

        let light_delta = 1.0 - light.thermal.temperature();
        let heavy_delta = heavy.thermal.temperature();
        assert!(light_delta > 0.0, "lighter entity must cool");
        assert!(heavy_delta > 0.0, "heavier entity must warm");
        assert!(
            (light_delta - 3.0 * heavy_delta).abs() < 1e-6,
            "lighter side's change must be 3x the heavier side's: {light_delta} vs {heavy_delta}"
        );
    }

    #[test]
    fn test_privileged_source_never_drained() {
        let table = MaterialTable::new();
        let mut player = entity(1, EntityKind::PLAYER, 0.7, 0.9);
        let mut rock = entity(2, EntityKind::ROCK, 0.5, 0.0);

        exchange(&mut player, &mut rock, &table, 0.05, false, player_source);

        assert_eq!(player.thermal.temperature(), 0.9);
        assert!(rock.thermal.temperature() > 0.0, "the rock still warms up");
    }

    #[test]
    fn test_drain_heat_opt_in() {
        let table = MaterialTable::new();
        let mut player = entity(1, EntityKind::PLAYER, 0.7, 0.9);
        let mut rock = entity(2, EntityKind::ROCK, 0.5, 0.0);

        exchange(&mut player, &mut rock, &table, 0.25, true, player_source);

        assert!(player.thermal.temperature() < 0.9, "collision damage drains");
    }

    #[test]
    fn test_source_still_gains() {
        let table = MaterialTable::new();
        let mut player = entity(1, EntityKind::PLAYER, 0.7, 0.1);
        let mut hot_rock = entity(2, EntityKind::ROCK, 0.5, 1.0);

        exchange(&mut player, &mut hot_rock, &table, 0.05, false, player_source);

        assert!(player.thermal.temperature() > 0.1);
    }

    #[test]
    fn test_transfer_bounded() {
        // The combined temperature change stays within
        // |flow| * conductivity * speed; no energy is manufactured.
        let table = MaterialTable::new();
        let mut a = entity(1, EntityKind::ROCK, 2.0, 0.8);
        let mut b = entity(2, EntityKind::ROCK, 1.0, 0.1);
        let before = a.thermal.temperature() + b.thermal.temperature();
        let flow = (0.8f32 - 0.1).abs();

        exchange(&mut a, &mut b, &table, 0.05, false, never_source);

        let after = a.thermal.temperature() + b.thermal.temperature();
        let bound = flow * table.get(EntityKind::ROCK).conductivity * 0.05;
        assert!((after - before).abs() <= bound + 1e-6);
    }

    #[test]
    fn test_zero_speed_is_noop() {
        let table = MaterialTable::new();
        let mut a = entity(1, EntityKind::ROCK, 1.0, 0.8);
        let mut b = entity(2, EntityKind::ROCK, 1.0, 0.1);

        exchange(&mut a, &mut b, &table, 0.0, false, never_source);

        assert_eq!(a.thermal.temperature(), 0.8);
        assert_eq!(b.thermal.temperature(), 0.1);
    }

    #[test]
    fn test_diffusion_decays_and_snaps() {
        let table = MaterialTable::new();
        let mut rock = entity(1, EntityKind::ROCK, 1.0, 0.5);

        passive_diffusion(&mut rock, &table, 0.1, 0.001);
        assert!(rock.thermal.temperature() < 0.5);
        assert!(rock.thermal.temperature() > 0.0);

        // Run until the epsilon snap fires; it must land on exactly zero.
        for _ in 0..10_000 {
            passive_diffusion(&mut rock, &table, 0.1, 0.001);
        }
        assert_eq!(rock.thermal.temperature(), 0.0);
    }

    #[test]
    fn test_diffusion_idempotent_at_zero() {
        let table = MaterialTable::new();
        let mut rock = entity(1, EntityKind::ROCK, 1.0, 0.0);

        passive_diffusion(&mut rock, &table, 0.1, 0.001);
        assert_eq!(rock.thermal.temperature(), 0.0);
    }
}
