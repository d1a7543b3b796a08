//! Arena Siege - simulation core for a top-down arena shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, movement, combat, bosses, effects)
//! - `engine`: Host-facing facade (lifecycle, config setters, HUD getters, events)
//! - `config`: Runtime-tunable weapon/player values
//! - `loadout`: Persisted upgrade levels mapped onto config

pub mod config;
pub mod engine;
pub mod loadout;
pub mod sim;

pub use config::EngineConfig;
pub use engine::{ActiveEffectsView, Engine, GameObserver};
pub use loadout::{Loadout, LoadoutError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Reference frame length. Velocities are expressed per reference frame.
    pub const FRAME_MS: f32 = 16.67;
    /// Longest frame the simulation will integrate in one tick
    pub const MAX_FRAME_MS: f32 = 100.0;

    /// World bounds (square arena, origin at top-left)
    pub const WORLD_SIZE: f32 = 3000.0;
    /// Default camera zoom used to project the pointer into world space
    pub const CAMERA_ZOOM: f32 = 1.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 20.0;
    pub const PLAYER_MAX_HEALTH: f32 = 100.0;
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const DASH_MULTIPLIER: f32 = 3.0;
    pub const DASH_DURATION_MS: f32 = 200.0;
    pub const DASH_COOLDOWN_MS: f32 = 1000.0;

    /// Bullets
    pub const BULLET_SPEED: f32 = 15.0;
    pub const BULLET_RADIUS: f32 = 5.0;
    pub const BULLET_RANGE: f32 = 1200.0;

    /// Spawning
    pub const SPAWN_INTERVAL_MS: f32 = 1000.0;
    pub const MAX_ENEMIES: usize = 100;
    pub const SPAWN_DISTANCE: f32 = 600.0;
    /// Replacement enemies per kill (rounded up)
    pub const REPLACEMENT_FACTOR: f32 = 1.5;
    /// Spawn points stay at least this far from the arena walls when an edge allows it
    pub const SPAWN_EDGE_MARGIN: f32 = 60.0;
    /// Kills in a round before the boss appears
    pub const BOSS_KILL_THRESHOLD: u32 = 100;

    /// Enemy separation
    pub const SEPARATION_RANGE_FACTOR: f32 = 4.0;
    pub const SEPARATION_STRENGTH: f32 = 0.02;
    pub const HIT_FLASH_MS: f32 = 100.0;

    /// Combo
    pub const COMBO_WINDOW_MS: f32 = 2000.0;

    /// Effects
    pub const BUFF_DURATION_MS: f32 = 5000.0;
    pub const BUFF_MAX_DURATION_MS: f32 = 15000.0;
    pub const GOLD_MULTIPLIER_DURATION_MS: f32 = 10000.0;
    pub const GOLD_MULTIPLIER_MAX_MS: f32 = 30000.0;
    pub const SPEED_BUFF: f32 = 1.5;
    pub const DAMAGE_BUFF: f32 = 2.0;
    pub const FIRE_RATE_BUFF: f32 = 2.0;
    pub const SHIELD_FACTOR: f32 = 0.5;
    pub const HEALTH_PICKUP_FRACTION: f32 = 0.25;

    /// Pickups
    pub const PICKUP_RANGE: f32 = 100.0;
    pub const PICKUP_RADIUS: f32 = 8.0;
    pub const MAGNET_SPEED_FACTOR: f32 = 1.5;
    pub const GOLD_TTL_MS: f32 = 15000.0;
    pub const POWER_UP_TTL_MS: f32 = 10000.0;
    pub const LOW_HEALTH_FRACTION: f32 = 0.3;

    /// Boss
    pub const BOSS_RADIUS: f32 = 60.0;
    pub const BOSS_BASE_HEALTH: f32 = 500.0;
    pub const BOSS_SPAWN_DISTANCE: f32 = 400.0;
    pub const BOSS_CONTACT_DAMAGE: f32 = 1.0;
    pub const BOSS_BASE_COOLDOWN_MS: f32 = 2000.0;
    pub const BOSS_MIN_COOLDOWN_MS: f32 = 800.0;
    pub const BOSS_MINION_COOLDOWN_MS: f32 = 5000.0;
    pub const BOSS_MINION_ROUND: u32 = 4;
    pub const BOSS_PROJECTILE_SPEED: f32 = 5.0;
    pub const BOSS_PROJECTILE_RADIUS: f32 = 8.0;
    pub const BOSS_PROJECTILE_DAMAGE: f32 = 10.0;
    /// Boss projectiles farther than this from the player are discarded
    pub const PROJECTILE_DESPAWN_RANGE: f32 = 2000.0;
    pub const BOSS_SCORE: u64 = 1000;

    /// Particles
    pub const MAX_PARTICLES: usize = 256;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) around `center` to cartesian
#[inline]
pub fn polar_offset(center: Vec2, r: f32, theta: f32) -> Vec2 {
    center + Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Scale factor from wall-clock milliseconds to reference frames.
///
/// Non-finite and negative inputs collapse to 0, long stalls are capped so a
/// single tick never integrates more than `MAX_FRAME_MS`.
#[inline]
pub fn frame_scale(delta_ms: f32) -> f32 {
    sanitize_delta(delta_ms) / consts::FRAME_MS
}

/// Clamp a raw frame delta to `[0, MAX_FRAME_MS]`
#[inline]
pub fn sanitize_delta(delta_ms: f32) -> f32 {
    if delta_ms.is_finite() {
        delta_ms.clamp(0.0, consts::MAX_FRAME_MS)
    } else {
        0.0
    }
}

/// Clamp a position to the world bounds, keeping a circle of `radius` inside
#[inline]
pub fn clamp_to_world(pos: Vec2, radius: f32) -> Vec2 {
    let lo = Vec2::splat(radius);
    let hi = Vec2::splat(consts::WORLD_SIZE - radius);
    pos.clamp(lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_scale_is_one_at_reference_frame() {
        assert!((frame_scale(consts::FRAME_MS) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn frame_scale_rejects_garbage() {
        assert_eq!(frame_scale(f32::NAN), 0.0);
        assert_eq!(frame_scale(-5.0), 0.0);
        assert!((frame_scale(10_000.0) - consts::MAX_FRAME_MS / consts::FRAME_MS).abs() < 1e-6);
    }

    #[test]
    fn normalize_angle_wraps() {
        use std::f32::consts::PI;
        assert!((normalize_angle(2.5 * PI) - 0.5 * PI).abs() < 1e-5);
        assert!((normalize_angle(-2.5 * PI) + 0.5 * PI).abs() < 1e-5);
        assert!((normalize_angle(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn clamp_keeps_circle_inside() {
        let p = clamp_to_world(Vec2::new(-50.0, consts::WORLD_SIZE + 10.0), 20.0);
        assert_eq!(p, Vec2::new(20.0, consts::WORLD_SIZE - 20.0));
    }
}
