//! Player weapon and character classes

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Bullet, GameState};
use super::tick::TickInput;
use crate::config::EngineConfig;
use crate::consts::*;

/// Character class: sets base damage, fire-rate curve and shot pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CharacterClass {
    /// Single accurate shot
    #[default]
    Gunner,
    /// Spread of pellets
    Shotgunner,
    /// Slow piercing shot
    Sniper,
}

impl CharacterClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            CharacterClass::Gunner => "Gunner",
            CharacterClass::Shotgunner => "Shotgunner",
            CharacterClass::Sniper => "Sniper",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "gunner" | "default" => Some(CharacterClass::Gunner),
            "shotgunner" | "shotgun" => Some(CharacterClass::Shotgunner),
            "sniper" => Some(CharacterClass::Sniper),
            _ => None,
        }
    }

    /// Damage per projectile at upgrade level 1
    pub fn base_damage(&self) -> f32 {
        match self {
            CharacterClass::Gunner => 10.0,
            CharacterClass::Shotgunner => 6.0,
            CharacterClass::Sniper => 25.0,
        }
    }

    /// Shots per second at a given fire-rate upgrade level (level 1 = base)
    pub fn fire_rate_for_level(&self, level: u32) -> f32 {
        let steps = level.saturating_sub(1) as f32;
        match self {
            CharacterClass::Gunner => (4.0 + 0.5 * steps).min(12.0),
            CharacterClass::Shotgunner => (1.5 + 0.2 * steps).min(5.0),
            CharacterClass::Sniper => (1.0 + 0.15 * steps).min(3.5),
        }
    }

    /// Extra enemies each bullet may pass through
    pub fn pierce(&self) -> u32 {
        match self {
            CharacterClass::Sniper => 2,
            _ => 0,
        }
    }

    /// Projectiles per trigger pull
    pub fn pellets(&self) -> u32 {
        match self {
            CharacterClass::Shotgunner => 5,
            _ => 1,
        }
    }

    /// Total cone width (radians) the pellets are spread over
    pub fn spread(&self) -> f32 {
        match self {
            CharacterClass::Shotgunner => 30_f32.to_radians(),
            _ => 0.0,
        }
    }
}

/// Milliseconds between shots for a fire rate in shots per second
pub fn fire_interval_ms(shots_per_second: f32, buff_multiplier: f32) -> f32 {
    1000.0 / (shots_per_second * buff_multiplier).max(0.01)
}

/// Emit one trigger pull in the player's aim direction
pub fn fire(state: &mut GameState, config: &EngineConfig) -> usize {
    let class = config.class;
    let pellets = class.pellets();
    let spread = class.spread();
    let damage = config.weapon_damage * state.effects.damage_multiplier();
    let origin = state.player.pos;
    let aim = state.player.rotation;
    let muzzle = state.player.radius;

    for i in 0..pellets {
        let offset = if pellets > 1 {
            -spread / 2.0 + spread * i as f32 / (pellets - 1) as f32
        } else {
            0.0
        };
        let dir = Vec2::from_angle(aim + offset);
        let id = state.next_entity_id();
        state.bullets.push(Bullet {
            id,
            pos: origin + dir * muzzle,
            vel: dir * BULLET_SPEED,
            radius: BULLET_RADIUS,
            damage,
            pierce: class.pierce(),
            traveled: 0.0,
            hit_ids: Vec::new(),
        });
    }
    pellets as usize
}

/// Count down the cooldown and fire while the trigger is held
pub fn update(state: &mut GameState, config: &EngineConfig, input: &TickInput, delta_ms: f32) {
    state.player.fire_cooldown_ms = (state.player.fire_cooldown_ms - delta_ms).max(0.0);
    if !input.firing || state.player.fire_cooldown_ms > 0.0 {
        return;
    }
    fire(state, config);
    state.player.fire_cooldown_ms =
        fire_interval_ms(config.weapon_fire_rate, state.effects.fire_rate_multiplier());
}
