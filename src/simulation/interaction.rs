//! Player heating interaction
//!
//! The privileged heat source can hold still and pour heat into whatever it
//! is grasping: fuel targets roast and are eventually consumed for warmth,
//! anything else is rapidly equalized toward the player's own temperature.
//! A separate branch lets a fully submerged, empty-handed player
//! deliberately douse itself out - a terminal, irreversible act.
//!
//! Both branches reset their progress the moment the hold gesture breaks;
//! nothing is remembered across interruptions.

use glam::Vec2;
use rand::Rng;

use crate::simulation::config::ThermalConfig;
use crate::simulation::heat_exchange::exchange;
use crate::simulation::materials::MaterialTable;
use crate::simulation::thresholds::ReactionTable;
use crate::simulation::{burst_into_flame, chance, lerp, random_unit_circle, HeatSourceFn};
use crate::world::{Room, RoomObject, SmokeEmitter, SoundId};

/// Advance the heating/douse interaction for the player entity at `index`.
#[allow(clippy::too_many_arguments)]
pub fn player_step(
    room: &mut Room,
    index: usize,
    materials: &MaterialTable,
    thresholds: &ReactionTable,
    cfg: &ThermalConfig,
    rng: &mut impl Rng,
    source: HeatSourceFn,
) {
    {
        let entity = &room.entities()[index];
        if entity.player.is_none() || entity.is_doomed() {
            return;
        }
    }

    // The interaction belongs to the privileged role, checked fresh every
    // tick; a de-assigned player keeps no progress.
    if !source(&room.entities()[index]) {
        let player = room.entities_mut()[index].player.as_mut().unwrap();
        player.reset_heat();
        player.reset_douse();
        return;
    }

    // While overheated, bleed back down toward 1 quickly.
    {
        let entity = &mut room.entities_mut()[index];
        let temperature = entity.thermal.temperature();
        if temperature > 1.0 {
            entity
                .thermal
                .set_temperature((temperature * cfg.overheat_decay).max(1.0));
        }
    }

    let input = room.entities()[index].player.as_ref().unwrap().input;
    let gesture = input.neutral_hold();
    let submersion = room.entities()[index].submersion();
    let player_id = room.entities()[index].id;
    let held = room.grasped_by(player_id);

    // -- Heating branch: dry, holding still, something in hand --
    let mut heating = false;
    if gesture && submersion <= 0.0 {
        for (slot, target_id) in held.iter().enumerate() {
            let Some(target) = room.index_of(*target_id) else {
                continue;
            };
            if can_heat(room, index, target, materials, thresholds, cfg) {
                heat_update(room, index, target, slot, materials, thresholds, cfg, rng, source);
                heating = true;
                break;
            }
        }
    }
    if !heating {
        room.entities_mut()[index]
            .player
            .as_mut()
            .unwrap()
            .reset_heat();
    }

    // -- Douse branch: underwater, holding still, hands empty --
    // Disjoint from heating by construction: one needs zero submersion,
    // the other full.
    let submerged = room.entities()[index].fully_submerged();
    if gesture && submerged && held.is_empty() && !room.entities()[index].is_dead() {
        douse_update(room, index, cfg, rng);
    } else {
        room.entities_mut()[index]
            .player
            .as_mut()
            .unwrap()
            .reset_douse();
    }
}

/// Whether `target` is a valid heating target for `player` this tick.
///
/// Fuel is always heatable; anything else must be measurably cooler than
/// the player - warming something hotter than yourself is the exchange
/// rule's job, not this interaction's.
fn can_heat(
    room: &Room,
    player: usize,
    target: usize,
    materials: &MaterialTable,
    thresholds: &ReactionTable,
    cfg: &ThermalConfig,
) -> bool {
    let player = &room.entities()[player];
    let target = &room.entities()[target];
    if target.is_doomed() {
        return false;
    }
    let profile = materials.get(target.kind);
    if !profile.is_fuel()
        && target.thermal.temperature() - player.thermal.temperature() > -cfg.heat_epsilon
    {
        return false;
    }
    thresholds.heating_eligible(target.kind, target.thermal.temperature())
}

#[allow(clippy::too_many_arguments)]
fn heat_update(
    room: &mut Room,
    player: usize,
    target: usize,
    slot: usize,
    materials: &MaterialTable,
    thresholds: &ReactionTable,
    cfg: &ThermalConfig,
    rng: &mut impl Rng,
    source: HeatSourceFn,
) {
    let progress = room.entities()[player]
        .player
        .as_ref()
        .unwrap()
        .heat_progress();
    let is_fuel = materials.get(room.entities()[target].kind).is_fuel();

    if progress >= 1.0 && is_fuel {
        consume_fuel(room, player, target, cfg, rng);
        return;
    }

    if progress > cfg.feedback_threshold {
        // Visible roasting: embers around the target, smoke off the hand.
        let (target_pos, target_radius) = {
            let main = room.entities()[target].main();
            (main.pos, main.radius)
        };
        let particles = (rng.random::<f32>() * progress * 10.0) as u32;
        for _ in 0..particles {
            let pos = target_pos + random_unit_circle(rng) * target_radius * 0.5;
            let life = 40 + (progress * 40.0) as u32;
            room.spawn_fire_sprite(pos, chance(rng, 0.5), life);
        }
        refresh_hand_smoke(room, player, slot, target_pos);

        if is_fuel {
            // Roasting kills a living snack before it is consumed.
            room.entities_mut()[target].kill();
        } else {
            // Rapid heating by holding: exchange at a progress-scaled rate.
            let (p, t) = room.pair_mut(player, target);
            exchange(p, t, materials, progress * cfg.held_exchange_scale, false, source);
        }
    }

    if can_heat(room, player, target, materials, thresholds, cfg) {
        let time = if is_fuel {
            let mass = room.entities()[target].total_mass();
            let eat_speed = materials.get(room.entities()[target].kind)
                .fuel
                .map(|fuel| fuel.eat_speed)
                .unwrap_or(1.0);
            (cfg.fuel_hold_base + cfg.fuel_hold_mass_scale * mass) / eat_speed
        } else {
            cfg.hold_ticks
        };
        room.entities_mut()[player]
            .player
            .as_mut()
            .unwrap()
            .advance_heat(1.0 / time);
    } else {
        room.entities_mut()[player]
            .player
            .as_mut()
            .unwrap()
            .reset_heat();
    }
}

/// One-shot consume of a fully roasted fuel target: destroy it, bank its
/// fuel value into the pending-heat buffer (with diminishing returns the
/// hotter the player already is) and start over.
fn consume_fuel(room: &mut Room, player: usize, target: usize, cfg: &ThermalConfig, rng: &mut impl Rng) {
    room.entities_mut()[player]
        .player
        .as_mut()
        .unwrap()
        .reset_heat();

    let fuel_value = room.entities()[target].total_mass() + cfg.fuel_bonus;
    let warmth = room.entities()[player].thermal.temperature().clamp(0.0, 1.0);
    let payoff = fuel_value * lerp(cfg.payoff_cold, cfg.payoff_hot, warmth);

    burst_into_flame(room, target, rng, 1.0);
    let target_id = room.entities()[target].id;
    room.entities_mut()[target].doom();
    room.entities_mut()[player].thermal.deposit(payoff);

    log::debug!("consumed {target_id} for {payoff:.3} heat");
}

fn douse_update(room: &mut Room, index: usize, cfg: &ThermalConfig, rng: &mut impl Rng) {
    room.entities_mut()[index]
        .player
        .as_mut()
        .unwrap()
        .advance_douse(1.0 / cfg.douse_ticks);
    let progress = room.entities()[index]
        .player
        .as_ref()
        .unwrap()
        .douse_progress();

    if progress > 1.0 {
        // The point of no return: all heat gone for good.
        let id = room.entities()[index].id;
        let pos = room.entities()[index].main().pos;
        {
            let entity = &mut room.entities_mut()[index];
            entity.thermal.set_temperature(0.0);
            entity.thermal.quench();
            entity.kill();
        }
        for _ in 0..12 {
            let vel = Vec2::new(0.0, 2.0) + random_unit_circle(rng) * 3.0;
            room.spawn_steam(pos + random_unit_circle(rng) * 8.0, vel, 1.0);
        }
        room.push_sound(SoundId::DouseRumble, pos, 1.0, 0.8);
        log::info!("{id} doused itself out");
        return;
    }

    if progress > cfg.douse_feedback_threshold {
        // Escalating shudder and steam the closer the end gets.
        let intensity = (progress - cfg.douse_feedback_threshold)
            / (1.0 - cfg.douse_feedback_threshold);
        let pos = room.entities()[index].main().pos;
        room.spawn_steam(
            pos + random_unit_circle(rng) * 6.0,
            Vec2::new(0.0, 3.0) + random_unit_circle(rng) * 2.0,
            intensity,
        );
        room.push_sound(SoundId::DouseRumble, pos, 0.2 + 0.6 * intensity, 1.0);
    }
}

/// Keep a wispy smoke emitter attached to the grasping hand, reallocating
/// the per-contact handle when the old emitter expired.
fn refresh_hand_smoke(room: &mut Room, player: usize, slot: usize, target_pos: Vec2) {
    let hand_pos = room.entities()[player].main().pos.lerp(target_pos, 0.6);
    let handle = room.entities()[player].thermal.smoke_handle(slot);
    let live = handle
        .and_then(|id| matches!(room.object(id), Some(RoomObject::Smoke(_))).then_some(id));
    match live {
        Some(id) => {
            if let Some(RoomObject::Smoke(smoke)) = room.object_mut(id) {
                smoke.pos = hand_pos;
                smoke.life = 20;
            }
        }
        None => {
            let id = room.add_object(RoomObject::Smoke(SmokeEmitter {
                pos: hand_pos,
                vel: Vec2::new(0.0, 0.5),
                life: 20,
            }));
            room.entities_mut()[player]
                .thermal
                .set_smoke_handle(slot, Some(id));
        }
    }
}
