//! Runtime-tunable weapon and player values
//!
//! Held by the engine outside of [`GameState`](crate::sim::GameState) so a
//! host can change them between ticks. Every setter rejects non-finite or
//! out-of-range input, keeping the previous value and logging a warning.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::CharacterClass;

/// Live configuration for one engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub class: CharacterClass,
    /// Damage per projectile before buffs
    pub weapon_damage: f32,
    /// Shots per second before buffs
    pub weapon_fire_rate: f32,
    pub player_max_health: f32,
    /// Base movement per reference frame
    pub player_speed: f32,
    /// Added to every enemy's drop chance, in `[0, 1]`
    pub power_up_spawn_rate_bonus: f32,
    /// Magnet radius for pickups
    pub pickup_range: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::for_class(CharacterClass::default())
    }
}

fn positive(name: &str, value: f32, current: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        log::warn!("Ignoring invalid {}: {} (keeping {})", name, value, current);
        current
    }
}

impl EngineConfig {
    /// Level-1 values for a class
    pub fn for_class(class: CharacterClass) -> Self {
        Self {
            class,
            weapon_damage: class.base_damage(),
            weapon_fire_rate: class.fire_rate_for_level(1),
            player_max_health: PLAYER_MAX_HEALTH,
            player_speed: PLAYER_SPEED,
            power_up_spawn_rate_bonus: 0.0,
            pickup_range: PICKUP_RANGE,
        }
    }

    pub fn set_weapon_damage(&mut self, damage: f32) {
        self.weapon_damage = positive("weapon damage", damage, self.weapon_damage);
    }

    pub fn set_weapon_fire_rate(&mut self, rate: f32) {
        self.weapon_fire_rate = positive("fire rate", rate, self.weapon_fire_rate);
    }

    pub fn set_player_max_health(&mut self, health: f32) {
        self.player_max_health = positive("player health", health, self.player_max_health);
    }

    pub fn set_player_speed(&mut self, speed: f32) {
        self.player_speed = positive("player speed", speed, self.player_speed);
    }

    /// Bonus drop chance; negative input is rejected, values above 1 clamp
    pub fn set_power_up_spawn_rate_bonus(&mut self, bonus: f32) {
        if bonus.is_finite() && bonus >= 0.0 {
            self.power_up_spawn_rate_bonus = bonus.min(1.0);
        } else {
            log::warn!(
                "Ignoring invalid power-up bonus: {} (keeping {})",
                bonus,
                self.power_up_spawn_rate_bonus
            );
        }
    }

    pub fn set_pickup_range(&mut self, range: f32) {
        self.pickup_range = positive("pickup range", range, self.pickup_range);
    }
}
