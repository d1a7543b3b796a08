//! Enemy spawning
//!
//! Timed waves arrive on a fixed cadence from one of the four compass
//! directions around the player. Every kill also queues an immediate
//! replacement burst. Both paths share the population cap and go quiet while
//! a boss is alive.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::progression::StatScale;
use super::state::{Enemy, EnemyKind, GameState};
use crate::consts::*;

/// Base stats for an enemy type at round 1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub speed: f32,
    pub health: f32,
    pub radius: f32,
    pub damage: f32,
    pub gold: u64,
    pub score: u64,
}

impl EnemyKind {
    pub fn base_stats(self) -> EnemyStats {
        match self {
            EnemyKind::Normal => EnemyStats {
                speed: 2.0,
                health: 10.0,
                radius: 15.0,
                damage: 10.0,
                gold: 1,
                score: 10,
            },
            EnemyKind::Fast => EnemyStats {
                speed: 3.5,
                health: 5.0,
                radius: 10.0,
                damage: 5.0,
                gold: 2,
                score: 15,
            },
            EnemyKind::Big => EnemyStats {
                speed: 1.0,
                health: 30.0,
                radius: 25.0,
                damage: 20.0,
                gold: 5,
                score: 30,
            },
        }
    }

    /// Chance that a kill of this type drops a power-up
    pub fn drop_chance(self) -> f32 {
        match self {
            EnemyKind::Normal => 0.05,
            EnemyKind::Fast => 0.08,
            EnemyKind::Big => 0.15,
        }
    }

    /// Draw a type: Normal 60%, Fast 25%, Big 15%
    pub fn roll(rng: &mut Pcg32) -> Self {
        let roll: f32 = rng.random();
        if roll < 0.60 {
            EnemyKind::Normal
        } else if roll < 0.85 {
            EnemyKind::Fast
        } else {
            EnemyKind::Big
        }
    }
}

/// Base stats scaled for `round`
pub fn scaled_stats(kind: EnemyKind, round: u32) -> EnemyStats {
    let base = kind.base_stats();
    let scale = StatScale::for_round(round);
    EnemyStats {
        speed: base.speed * scale.speed,
        health: base.health * scale.health,
        radius: base.radius * scale.size,
        damage: base.damage * scale.damage,
        gold: base.gold,
        score: base.score,
    }
}

/// Pick a compass edge (N/E/S/W) and return a point `SPAWN_DISTANCE` away
/// from `center` within that edge's quarter.
///
/// Edges whose point would leave the arena are skipped clockwise from the
/// rolled one. If all four miss, the rolled point is returned as is and
/// `spawn_enemy` pulls it back inside.
pub fn edge_position(rng: &mut Pcg32, center: Vec2) -> Vec2 {
    use std::f32::consts::FRAC_PI_2;
    use std::f32::consts::FRAC_PI_4;

    let edge = rng.random_range(0..4u32);
    let jitter = rng.random_range(-FRAC_PI_4..FRAC_PI_4);
    let at_edge = |e: u32| crate::polar_offset(center, SPAWN_DISTANCE, e as f32 * FRAC_PI_2 + jitter);

    (0..4)
        .map(|step| at_edge((edge + step) % 4))
        .find(|&pos| crate::clamp_to_world(pos, SPAWN_EDGE_MARGIN) == pos)
        .unwrap_or_else(|| at_edge(edge))
}

/// Insert one enemy of `kind` at `pos`. Returns false at the population cap.
pub fn spawn_enemy(state: &mut GameState, kind: EnemyKind, pos: Vec2) -> bool {
    if state.enemies.len() >= MAX_ENEMIES {
        return false;
    }
    let stats = scaled_stats(kind, state.progression.round);
    let id = state.next_entity_id();
    state.enemies.push(Enemy {
        id,
        kind,
        pos: crate::clamp_to_world(pos, stats.radius),
        radius: stats.radius,
        speed: stats.speed,
        health: stats.health,
        max_health: stats.health,
        damage: stats.damage,
        gold: stats.gold,
        score: stats.score,
        hit_flash_ms: 0.0,
    });
    true
}

/// Enemies per timed wave for `round`
pub fn wave_size(round: u32) -> usize {
    (1 + (round.saturating_sub(1) / 2) as usize).min(5)
}

/// Spawn `count` randomly typed enemies on the compass ring; returns how many fit
fn spawn_batch(state: &mut GameState, count: usize) -> usize {
    let mut spawned = 0;
    for _ in 0..count {
        let kind = EnemyKind::roll(&mut state.rng);
        let pos = edge_position(&mut state.rng, state.player.pos);
        if !spawn_enemy(state, kind, pos) {
            break;
        }
        spawned += 1;
    }
    spawned
}

/// Timed wave spawning; called every tick
pub fn try_spawn_wave(state: &mut GameState, delta_ms: f32) {
    if state.boss.is_some() {
        return;
    }
    state.spawn_timer_ms += delta_ms;
    if state.spawn_timer_ms < SPAWN_INTERVAL_MS {
        return;
    }
    state.spawn_timer_ms = 0.0;

    let wanted = wave_size(state.progression.round);
    let spawned = spawn_batch(state, wanted);
    if spawned > 0 {
        log::debug!(
            "Wave: {} enemies (round {}, population {})",
            spawned,
            state.progression.round,
            state.enemies.len()
        );
    }
}

/// Replacement burst after `kills` kills: 1.5× rounded up for each kill
pub fn spawn_replacements(state: &mut GameState, kills: u32) -> usize {
    if kills == 0 || state.boss.is_some() {
        return 0;
    }
    let wanted = kills as usize * REPLACEMENT_FACTOR.ceil() as usize;
    spawn_batch(state, wanted)
}

/// Boss minions: Normal/Fast enemies on a ring around `center`
pub fn spawn_minions(state: &mut GameState, center: Vec2, ring_radius: f32, count: usize) -> usize {
    let mut spawned = 0;
    for i in 0..count {
        let kind = if state.rng.random_bool(0.5) {
            EnemyKind::Normal
        } else {
            EnemyKind::Fast
        };
        let angle = std::f32::consts::TAU * (i as f32 / count.max(1) as f32);
        let pos = crate::polar_offset(center, ring_radius, angle);
        if !spawn_enemy(state, kind, pos) {
            break;
        }
        spawned += 1;
    }
    spawned
}
