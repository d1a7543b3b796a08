//! Variable timestep simulation tick
//!
//! Advances the session by one host frame. Movement is scaled by the frame
//! factor `delta / 16.67`; timers consume raw milliseconds.

use glam::Vec2;

use super::state::{GamePhase, GameState};
use super::{boss, combat, effects, movement, spawn, weapon};
use crate::config::EngineConfig;
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone)]
pub struct TickInput {
    /// Movement intent; normalized before use
    pub move_dir: Vec2,
    /// Pointer position in screen space, if the host has one
    pub pointer: Option<Vec2>,
    /// Viewport size in screen pixels
    pub viewport: Vec2,
    /// Camera zoom used to project the pointer into the world
    pub zoom: f32,
    /// Trigger held
    pub firing: bool,
    /// Dash requested this frame
    pub dash: bool,
}

impl Default for TickInput {
    fn default() -> Self {
        Self {
            move_dir: Vec2::ZERO,
            pointer: None,
            viewport: Vec2::ZERO,
            zoom: CAMERA_ZOOM,
            firing: false,
            dash: false,
        }
    }
}

/// Advance the game state by `delta_ms` of host time.
///
/// Does nothing unless the session is `Playing`. Once the player dies in a
/// tick, the remaining stages are skipped.
pub fn tick(state: &mut GameState, config: &EngineConfig, input: &TickInput, delta_ms: f32) {
    if state.phase != GamePhase::Playing {
        return;
    }
    let delta_ms = crate::sanitize_delta(delta_ms);
    let f = crate::frame_scale(delta_ms);

    state.ticks += 1;
    state.elapsed_ms += delta_ms as f64;

    movement::update_player(state, input, delta_ms, f);
    weapon::update(state, config, input, delta_ms);
    movement::update_enemies(state, f);
    movement::resolve_player_contacts(state);
    if combat::check_player_death(state) {
        return;
    }

    boss::try_spawn_boss(state);
    spawn::try_spawn_wave(state, delta_ms);
    boss::update(state, delta_ms, f);

    combat::resolve(state, config, delta_ms, f);
    if state.phase == GamePhase::Dead {
        return;
    }

    effects::update(state, config, delta_ms, f);
    state.progression.advance(delta_ms);
}
