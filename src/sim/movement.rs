//! Player and enemy movement
//!
//! Enemies seek the player and push away from neighbours using positions
//! captured at the start of the pass, so the result does not depend on the
//! order enemies are visited in.

use glam::Vec2;

use super::collision::{Contact, circle_contact, circles_overlap, direction_to};
use super::combat::damage_player;
use super::state::{DashState, GameState};
use super::tick::TickInput;
use crate::consts::*;

/// Effective player speed: dash and speed buff never stack
pub fn effective_speed(state: &GameState) -> f32 {
    let player = &state.player;
    if player.is_dashing() {
        player.base_speed * DASH_MULTIPLIER
    } else {
        player.base_speed * state.effects.speed_multiplier()
    }
}

/// Normalize a movement intent so diagonals are not faster than cardinals
pub fn normalize_intent(intent: Vec2) -> Vec2 {
    if intent.is_finite() {
        intent.normalize_or_zero()
    } else {
        Vec2::ZERO
    }
}

/// Project a screen-space pointer into world space around the player
pub fn pointer_to_world(player_pos: Vec2, pointer: Vec2, viewport: Vec2, zoom: f32) -> Vec2 {
    let zoom = if zoom.is_finite() && zoom > 0.0 { zoom } else { CAMERA_ZOOM };
    player_pos + (pointer - viewport * 0.5) / zoom
}

fn advance_dash(dash: DashState, delta_ms: f32, wants_dash: bool, moving: bool) -> DashState {
    match dash {
        DashState::Idle if wants_dash && moving => DashState::Dashing {
            remaining_ms: DASH_DURATION_MS,
        },
        DashState::Idle => DashState::Idle,
        DashState::Dashing { remaining_ms } => {
            let remaining_ms = remaining_ms - delta_ms;
            if remaining_ms > 0.0 {
                DashState::Dashing { remaining_ms }
            } else {
                DashState::Cooldown {
                    remaining_ms: DASH_COOLDOWN_MS,
                }
            }
        }
        DashState::Cooldown { remaining_ms } => {
            let remaining_ms = remaining_ms - delta_ms;
            if remaining_ms > 0.0 {
                DashState::Cooldown { remaining_ms }
            } else {
                DashState::Idle
            }
        }
    }
}

/// Integrate player input: dash, movement, bounds and aim
pub fn update_player(state: &mut GameState, input: &TickInput, delta_ms: f32, f: f32) {
    let dir = normalize_intent(input.move_dir);
    let moving = dir != Vec2::ZERO;

    let was_idle = state.player.dash == DashState::Idle;
    state.player.dash = advance_dash(state.player.dash, delta_ms, input.dash, moving);
    if was_idle && state.player.is_dashing() {
        log::debug!("Dash started");
    }

    let speed = effective_speed(state);
    let player = &mut state.player;
    player.vel = dir * speed;
    player.pos = crate::clamp_to_world(player.pos + player.vel * f, player.radius);

    if let Some(pointer) = input.pointer {
        let target = pointer_to_world(player.pos, pointer, input.viewport, input.zoom);
        let aim = target - player.pos;
        if aim.length_squared() > f32::EPSILON {
            player.rotation = crate::normalize_angle(aim.y.atan2(aim.x));
        }
    }
}

/// Seek the player with overlap-proportional separation from neighbours
pub fn update_enemies(state: &mut GameState, f: f32) {
    let target = state.player.pos;
    let snapshot: Vec<(Vec2, f32)> = state.enemies.iter().map(|e| (e.pos, e.radius)).collect();

    for (i, enemy) in state.enemies.iter_mut().enumerate() {
        let seek = direction_to(enemy.pos, target) * enemy.speed;

        let range = enemy.radius * SEPARATION_RANGE_FACTOR;
        let mut push = Vec2::ZERO;
        for (j, &(other_pos, _)) in snapshot.iter().enumerate() {
            if i == j {
                continue;
            }
            // Exactly stacked pairs split by index so they cannot move in lockstep
            let contact = if snapshot[i].0.distance_squared(other_pos) <= f32::EPSILON {
                let normal = if i < j { Vec2::NEG_X } else { Vec2::X };
                Some(Contact {
                    normal,
                    penetration: range,
                })
            } else {
                circle_contact(snapshot[i].0, range, other_pos, 0.0)
            };
            if let Some(contact) = contact {
                push += contact.normal * contact.penetration * SEPARATION_STRENGTH;
            }
        }

        enemy.pos = crate::clamp_to_world(enemy.pos + (seek + push) * f, enemy.radius);
        enemy.hit_flash_ms = (enemy.hit_flash_ms - f * FRAME_MS).max(0.0);
    }
}

/// Enemies touching the player are destroyed and deal contact damage.
///
/// A dashing player takes no damage, but the enemy is still removed.
pub fn resolve_player_contacts(state: &mut GameState) -> usize {
    let player_pos = state.player.pos;
    let player_radius = state.player.radius;
    let mut touched = 0;

    for i in (0..state.enemies.len()).rev() {
        let enemy = &state.enemies[i];
        if !circles_overlap(enemy.pos, enemy.radius, player_pos, player_radius) {
            continue;
        }
        let enemy = state.enemies.remove(i);
        damage_player(state, enemy.damage);
        state.burst(enemy.pos, 6, super::state::ParticleKind::Death, 3.0);
        touched += 1;
    }
    touched
}
