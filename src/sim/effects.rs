//! Timed buffs, pickup magnetism and collection
//!
//! Picking up a buff that is already running never raises its multiplier; it
//! only lengthens the longest-lived timer of that type, up to
//! `BUFF_MAX_DURATION_MS`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{circles_overlap, direction_to, within_radius};
use super::state::{GameEvent, GameState, PowerUpKind};
use crate::config::EngineConfig;
use crate::consts::*;

/// Timed buff categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuffKind {
    Speed,
    Damage,
    FireRate,
    Shield,
}

impl BuffKind {
    pub const ALL: [BuffKind; 4] = [
        BuffKind::Speed,
        BuffKind::Damage,
        BuffKind::FireRate,
        BuffKind::Shield,
    ];

    /// Buff granted by a power-up, `None` for instant or non-buff pickups
    pub fn from_power_up(kind: PowerUpKind) -> Option<Self> {
        match kind {
            PowerUpKind::Speed => Some(BuffKind::Speed),
            PowerUpKind::Damage => Some(BuffKind::Damage),
            PowerUpKind::FireRate => Some(BuffKind::FireRate),
            PowerUpKind::Shield => Some(BuffKind::Shield),
            PowerUpKind::Health | PowerUpKind::GoldMultiplier => None,
        }
    }
}

/// Active power-up effects
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffects {
    speed: Vec<f32>,
    damage: Vec<f32>,
    fire_rate: Vec<f32>,
    shield: Vec<f32>,
    /// Single running timer; pickups add to it
    pub gold_multiplier_ms: f32,
}

impl ActiveEffects {
    fn timers(&self, kind: BuffKind) -> &Vec<f32> {
        match kind {
            BuffKind::Speed => &self.speed,
            BuffKind::Damage => &self.damage,
            BuffKind::FireRate => &self.fire_rate,
            BuffKind::Shield => &self.shield,
        }
    }

    fn timers_mut(&mut self, kind: BuffKind) -> &mut Vec<f32> {
        match kind {
            BuffKind::Speed => &mut self.speed,
            BuffKind::Damage => &mut self.damage,
            BuffKind::FireRate => &mut self.fire_rate,
            BuffKind::Shield => &mut self.shield,
        }
    }

    /// Start a buff, or extend the longest-lived timer if one is running
    pub fn apply_buff(&mut self, kind: BuffKind) {
        let timers = self.timers_mut(kind);
        match timers.iter_mut().max_by(|a, b| a.total_cmp(b)) {
            Some(longest) => {
                *longest = (*longest + BUFF_DURATION_MS).min(BUFF_MAX_DURATION_MS);
            }
            None => timers.push(BUFF_DURATION_MS),
        }
    }

    pub fn add_gold_multiplier(&mut self) {
        self.gold_multiplier_ms =
            (self.gold_multiplier_ms + GOLD_MULTIPLIER_DURATION_MS).min(GOLD_MULTIPLIER_MAX_MS);
    }

    /// Remaining time on the longest timer of `kind` (0 when inactive)
    pub fn remaining_ms(&self, kind: BuffKind) -> f32 {
        self.timers(kind).iter().copied().fold(0.0, f32::max)
    }

    /// Number of independent timers running for `kind`
    pub fn timer_count(&self, kind: BuffKind) -> usize {
        self.timers(kind).len()
    }

    #[inline]
    pub fn is_active(&self, kind: BuffKind) -> bool {
        !self.timers(kind).is_empty()
    }

    pub fn speed_multiplier(&self) -> f32 {
        if self.is_active(BuffKind::Speed) { SPEED_BUFF } else { 1.0 }
    }

    pub fn damage_multiplier(&self) -> f32 {
        if self.is_active(BuffKind::Damage) { DAMAGE_BUFF } else { 1.0 }
    }

    pub fn fire_rate_multiplier(&self) -> f32 {
        if self.is_active(BuffKind::FireRate) { FIRE_RATE_BUFF } else { 1.0 }
    }

    #[inline]
    pub fn shield_active(&self) -> bool {
        self.is_active(BuffKind::Shield)
    }

    #[inline]
    pub fn gold_multiplier_active(&self) -> bool {
        self.gold_multiplier_ms > 0.0
    }

    /// Count every timer down and drop the ones that ran out
    pub fn advance(&mut self, delta_ms: f32) {
        for kind in BuffKind::ALL {
            let timers = self.timers_mut(kind);
            for t in timers.iter_mut() {
                *t -= delta_ms;
            }
            timers.retain(|t| *t > 0.0);
        }
        self.gold_multiplier_ms = (self.gold_multiplier_ms - delta_ms).max(0.0);
    }
}

/// Pull a pickup toward the player once it is inside the magnet radius
fn pull(pos: &mut Vec2, magnet_active: &mut bool, target: Vec2, range: f32, step: f32) {
    if !*magnet_active && within_radius(*pos, target, range) {
        *magnet_active = true;
    }
    if *magnet_active {
        let to_target = target - *pos;
        let dist = to_target.length();
        if dist <= step {
            *pos = target;
        } else {
            *pos += direction_to(*pos, target) * step;
        }
    }
}

/// Apply a collected power-up to the player
pub fn apply_power_up(state: &mut GameState, kind: PowerUpKind) {
    match kind {
        PowerUpKind::Health => {
            let amount = state.player.max_health * HEALTH_PICKUP_FRACTION;
            state.player.heal(amount);
        }
        PowerUpKind::GoldMultiplier => state.effects.add_gold_multiplier(),
        other => {
            if let Some(buff) = BuffKind::from_power_up(other) {
                state.effects.apply_buff(buff);
            }
        }
    }
    state.emit(GameEvent::PowerUpCollected { kind });
}

/// Per-tick effects stage: timers, magnetism, collection, expiry, particles
pub fn update(state: &mut GameState, config: &EngineConfig, delta_ms: f32, f: f32) {
    state.effects.advance(delta_ms);

    let player_pos = state.player.pos;
    let reach = state.player.radius + PICKUP_RADIUS;
    let step = state.player.base_speed * state.effects.speed_multiplier() * MAGNET_SPEED_FACTOR * f;
    let range = config.pickup_range;

    // Gold
    let mut collected_gold = 0u64;
    for i in (0..state.gold_pickups.len()).rev() {
        let coin = &mut state.gold_pickups[i];
        pull(&mut coin.pos, &mut coin.magnet_active, player_pos, range, step);
        coin.ttl_ms -= delta_ms;
        if circles_overlap(coin.pos, PICKUP_RADIUS, player_pos, state.player.radius) {
            collected_gold += coin.value;
            state.gold_pickups.remove(i);
        } else if coin.ttl_ms <= 0.0 {
            state.gold_pickups.remove(i);
        }
    }
    if collected_gold > 0 {
        state.gold_collected += collected_gold;
        state.emit(GameEvent::GoldCollected {
            amount: collected_gold,
        });
    }

    // Power-ups
    let mut collected = Vec::new();
    for i in (0..state.power_ups.len()).rev() {
        let power_up = &mut state.power_ups[i];
        pull(&mut power_up.pos, &mut power_up.magnet_active, player_pos, range, step);
        power_up.ttl_ms -= delta_ms;
        if power_up.pos.distance_squared(player_pos) < reach * reach {
            collected.push(state.power_ups.remove(i).kind);
        } else if power_up.ttl_ms <= 0.0 {
            state.power_ups.remove(i);
        }
    }
    for kind in collected {
        log::debug!("Collected power-up {:?}", kind);
        apply_power_up(state, kind);
    }

    // Particles
    for particle in state.particles.iter_mut() {
        particle.pos += particle.vel * f;
        particle.vel *= 0.95_f32.powf(f);
        particle.life -= 0.03 * f;
    }
    state.particles.retain(|p| p.life > 0.0);
}
