//! Combustion model for composite (segmented) entities
//!
//! A lit segment burns monotonically to completion, radiating most heat
//! mid-burn. Burning segments feed the bulk temperature, the bulk
//! temperature radiates into nearby bodies and randomly lights further
//! segments, and fire spreads preferentially to the nearest unlit neighbor.
//! The privileged heat source can also feed a pod by hand, a direct deposit
//! that deliberately avoids the exchange rule so no heat is conjured.

use glam::Vec2;
use rand::Rng;

use crate::entity::{SeedBurnState, SegmentAnchor};
use crate::simulation::config::ThermalConfig;
use crate::simulation::heat_exchange::exchange;
use crate::simulation::materials::MaterialTable;
use crate::simulation::{chance, closest_point_on_segment, inverse_lerp, random_unit_circle};
use crate::simulation::HeatSourceFn;
use crate::world::{Room, RoomObject, SmokeEmitter};

/// Advance combustion for the composite entity at `index`.
pub fn combustion_step(
    room: &mut Room,
    index: usize,
    materials: &MaterialTable,
    cfg: &ThermalConfig,
    rng: &mut impl Rng,
    source: HeatSourceFn,
) {
    let (root, tip, dead, segments) = {
        let entity = &room.entities()[index];
        if entity.is_doomed() || !entity.is_composite() || entity.chunks.len() < 2 {
            return;
        }
        (
            entity.chunks[0].pos,
            entity.chunks[1].pos,
            entity.is_dead(),
            entity.segments.clone(),
        )
    };
    let count = segments.len();
    room.entities_mut()[index].burn.ensure_len(count);

    let lit = room.entities()[index].burn.any_lit();
    let temperature = room.entities()[index].thermal.temperature();

    // Smoky while hot.
    if temperature > 0.1 {
        refresh_smoke(room, index, (root + tip) * 0.5);
    }

    // Heat up nearby bodies while hot and burning.
    if lit && temperature > 0.1 {
        radiate(room, index, root, tip, materials, cfg, source);
    }

    // Randomly light an unlit segment while hot.
    // TODO: fire crackle cues when segments ignite
    let temperature = room.entities()[index].thermal.temperature();
    if chance(
        rng,
        (temperature - cfg.ignition_threshold) * cfg.ignition_chance,
    ) {
        let unlit: Vec<usize> = room.entities()[index].burn.unlit().collect();
        if !unlit.is_empty() {
            let pick = unlit[rng.random_range(0..unlit.len())];
            let id = room.entities()[index].id;
            room.entities_mut()[index].burn.ignite(pick);
            log::debug!("{id}: segment {pick} ignited at temperature {temperature:.2}");
        }
    }

    // Burn lit segments.
    let rate = if dead {
        cfg.seed_burn_rate_dead
    } else {
        cfg.seed_burn_rate
    };
    for i in 0..count {
        let burn = room.entities()[index].burn.get(i);
        if burn <= 0.0 || burn >= 1.0 {
            continue;
        }

        if room.entities_mut()[index].burn.advance(i, rate) {
            // Fully consumed: a one-time kick to the pod's endpoints.
            kick_endpoints(room, index, segments[i], rng, cfg.seed_kick);
        }

        let heat = SeedBurnState::segment_heat(room.entities()[index].burn.get(i));

        // Feed the bulk temperature, split across segments.
        room.entities_mut()[index]
            .thermal
            .add_temperature(heat / cfg.bulk_heat_divisor / count as f32);

        // Spread toward the nearest unlit neighbor, most likely mid-burn.
        if chance(rng, heat * heat * cfg.spread_chance) {
            let seed_pos = segment_world_pos(root, tip, segments[i]);
            let nearest = room.entities()[index]
                .burn
                .unlit()
                .map(|j| {
                    let pos = segment_world_pos(root, tip, segments[j]);
                    (j, pos.distance_squared(seed_pos))
                })
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(j, _)| j);
            if let Some(j) = nearest {
                room.entities_mut()[index].burn.ignite(j);
            }
        }

        // Embers.
        if chance(rng, heat * cfg.ember_chance) {
            let pos = segment_world_pos(root, tip, segments[i]) + random_unit_circle(rng) * 2.0;
            room.spawn_fire_sprite(pos, true, 40);
        }
    }

    feed(room, index, root, tip, dead, cfg, source);
}

/// Radiatively heat every other body in the room from the extent
/// `root..tip`, with speed falling off with squared distance and zero
/// beyond the outer radius.
pub fn radiate(
    room: &mut Room,
    emitter: usize,
    root: Vec2,
    tip: Vec2,
    materials: &MaterialTable,
    cfg: &ThermalConfig,
    source: HeatSourceFn,
) {
    let outer_sq = cfg.radiant_outer * cfg.radiant_outer;
    let inner_sq = cfg.radiant_inner * cfg.radiant_inner;

    for j in 0..room.entity_count() {
        if j == emitter || room.entities()[j].is_doomed() {
            continue;
        }
        for c in 0..room.entities()[j].chunks.len() {
            let speed = {
                let chunk_pos = room.entities()[j].chunks[c].pos;
                let closest = closest_point_on_segment(root, tip, chunk_pos);
                let sq_dist = chunk_pos.distance_squared(closest);
                cfg.radiant_speed * inverse_lerp(outer_sq, inner_sq, sq_dist)
            };
            if speed > 0.0 {
                let (a, b) = room.pair_mut(emitter, j);
                exchange(a, b, materials, speed, false, source);
            }
        }
    }
}

/// Deliberate feeding: a live heat source with a free hand close to the
/// extent warms the bulk temperature directly, never through the exchange
/// rule, while the pod is unlit and below the feeding cap.
fn feed(
    room: &mut Room,
    index: usize,
    root: Vec2,
    tip: Vec2,
    dead: bool,
    cfg: &ThermalConfig,
    source: HeatSourceFn,
) {
    {
        let entity = &room.entities()[index];
        if entity.burn.any_lit() || entity.thermal.temperature() >= cfg.feed_max_temperature {
            return;
        }
    }

    let reach_sq = cfg.feed_reach * cfg.feed_reach;
    for p in 0..room.entity_count() {
        if p == index {
            continue;
        }
        let feeding = {
            let player = &room.entities()[p];
            source(player) && !player.is_doomed() && !player.is_dead()
        };
        if !feeding {
            continue;
        }
        let player_id = room.entities()[p].id;
        if room.grasped_by(player_id).len() >= 2 {
            // Both hands full.
            continue;
        }
        let within = {
            let hand = room.entities()[p].main().pos;
            closest_point_on_segment(root, tip, hand).distance_squared(hand) <= reach_sq
        };
        if within {
            let ticks = if dead { cfg.feed_ticks_dead } else { cfg.feed_ticks };
            room.entities_mut()[index]
                .thermal
                .add_temperature(1.0 / ticks);
        }
    }
}

/// World position of a segment anchored on the tip-to-root axis.
pub(crate) fn segment_world_pos(root: Vec2, tip: Vec2, anchor: SegmentAnchor) -> Vec2 {
    let to_root = (root - tip).normalize_or_zero();
    let perp = to_root.perp();
    let length = (root.distance(tip) - 10.0).max(0.0);
    tip + to_root * anchor.along * length + perp * anchor.lateral * 3.0
}

fn kick_endpoints(
    room: &mut Room,
    index: usize,
    anchor: SegmentAnchor,
    rng: &mut impl Rng,
    strength: f32,
) {
    let entity = &mut room.entities_mut()[index];
    let axis = (entity.chunks[1].pos - entity.chunks[0].pos).normalize_or_zero();
    let dir = (axis.perp() * anchor.lateral + random_unit_circle(rng)).normalize_or_zero();
    let kick = dir * strength;

    entity.chunks[0].vel += kick * anchor.along;
    entity.chunks[0].pos += kick * anchor.along;
    entity.chunks[1].vel += kick * (1.0 - anchor.along);
    entity.chunks[1].pos += kick * (1.0 - anchor.along);
}

/// Keep the composite's smoke emitter alive at `pos`, reallocating the
/// per-entity smoke handle when the old object has expired.
fn refresh_smoke(room: &mut Room, index: usize, pos: Vec2) {
    let handle = room.entities()[index].thermal.smoke_handle(0);
    let live = handle.and_then(|id| {
        matches!(room.object(id), Some(RoomObject::Smoke(_))).then_some(id)
    });
    match live {
        Some(id) => {
            if let Some(RoomObject::Smoke(smoke)) = room.object_mut(id) {
                smoke.pos = pos;
                smoke.life = 20;
            }
        }
        None => {
            let id = room.add_object(RoomObject::Smoke(SmokeEmitter {
                pos,
                vel: Vec2::new(0.0, 1.0),
                life: 20,
            }));
            room.entities_mut()[index]
                .thermal
                .set_smoke_handle(0, Some(id));
        }
    }
}
