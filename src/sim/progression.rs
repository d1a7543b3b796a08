//! Round difficulty and combo tracking
//!
//! `D(round)` is piecewise exponential: ×1.3 per round through round 5, ×1.25
//! through round 10, ×1.2 afterwards. Each segment starts from the previous
//! segment's endpoint so the curve has no jumps.

use serde::{Deserialize, Serialize};

use crate::consts::{BOSS_KILL_THRESHOLD, COMBO_WINDOW_MS};

/// Round-difficulty multiplier `D(round)`. Round 0 is treated as round 1.
pub fn difficulty_multiplier(round: u32) -> f32 {
    let r = round.max(1) as i32;
    if r <= 5 {
        1.3_f32.powi(r - 1)
    } else if r <= 10 {
        difficulty_multiplier(5) * 1.25_f32.powi(r - 5)
    } else {
        difficulty_multiplier(10) * 1.2_f32.powi(r - 10)
    }
}

/// Per-stat scale factors derived from `D(round)`.
///
/// Health takes the full multiplier; the rest are softened so late rounds do
/// not produce screen-filling enemies that cross the arena in one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatScale {
    pub health: f32,
    pub damage: f32,
    pub size: f32,
    pub speed: f32,
}

impl StatScale {
    pub fn for_round(round: u32) -> Self {
        let d = difficulty_multiplier(round);
        Self {
            health: d,
            damage: 1.0 + (d - 1.0) * 0.7,
            size: 1.0 + (d - 1.0) * 0.3,
            speed: 1.0 + (d - 1.0) * 0.2,
        }
    }
}

/// Combo tier multiplier
pub fn combo_multiplier(combo: u32) -> u32 {
    match combo {
        20.. => 5,
        10..=19 => 3,
        5..=9 => 2,
        _ => 1,
    }
}

/// Round number, kill counter and combo streak
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progression {
    pub round: u32,
    /// Kills this round (resets when the boss dies)
    pub kills: u32,
    /// Kills this session
    pub total_kills: u32,
    pub combo: u32,
    /// Milliseconds since the last kill
    pub since_last_kill_ms: f32,
    /// Set once this round's boss has been spawned
    pub boss_spawned: bool,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            round: 1,
            kills: 0,
            total_kills: 0,
            combo: 0,
            since_last_kill_ms: 0.0,
            boss_spawned: false,
        }
    }
}

impl Progression {
    /// Record a kill and return the combo multiplier it earned
    pub fn register_kill(&mut self) -> u32 {
        self.kills += 1;
        self.total_kills += 1;
        self.combo = if self.combo > 0 && self.since_last_kill_ms <= COMBO_WINDOW_MS {
            self.combo + 1
        } else {
            1
        };
        self.since_last_kill_ms = 0.0;
        combo_multiplier(self.combo)
    }

    /// Advance the decay timer; called once per tick
    pub fn advance(&mut self, delta_ms: f32) {
        self.since_last_kill_ms += delta_ms;
        if self.combo > 0 && self.since_last_kill_ms > COMBO_WINDOW_MS {
            log::debug!("Combo of {} expired", self.combo);
            self.combo = 0;
        }
    }

    pub fn reset_combo(&mut self) {
        self.combo = 0;
    }

    #[inline]
    pub fn multiplier(&self) -> u32 {
        combo_multiplier(self.combo)
    }

    /// True when the kill threshold is met and no boss has appeared yet
    pub fn boss_due(&self) -> bool {
        !self.boss_spawned && self.kills >= BOSS_KILL_THRESHOLD
    }

    /// Boss defeated: next round, fresh kill counter
    pub fn advance_round(&mut self) {
        self.round += 1;
        self.kills = 0;
        self.boss_spawned = false;
        self.combo = 0;
    }

    #[inline]
    pub fn difficulty(&self) -> f32 {
        difficulty_multiplier(self.round)
    }
}
