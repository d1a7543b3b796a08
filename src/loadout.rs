//! Upgrade loadout
//!
//! The persistence layer stores purchased upgrade levels as a small JSON
//! document. Parsing is lenient per field: a level that is missing, not a
//! number, or below 1 is read as level 1. Only a document that is not JSON at
//! all, or not an object, is an error.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::config::EngineConfig;
use crate::consts::*;
use crate::sim::CharacterClass;

/// Highest level any upgrade can reach
pub const MAX_LEVEL: u32 = 50;

#[derive(Debug, Error)]
pub enum LoadoutError {
    #[error("failed to read loadout: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed loadout JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("loadout must be a JSON object, got {0}")]
    NotAnObject(String),
}

/// Purchased upgrade levels (1 = not upgraded)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Loadout {
    #[serde(deserialize_with = "lenient_level")]
    pub damage: u32,
    #[serde(alias = "fireRate", deserialize_with = "lenient_level")]
    pub fire_rate: u32,
    #[serde(deserialize_with = "lenient_level")]
    pub health: u32,
    #[serde(deserialize_with = "lenient_level")]
    pub speed: u32,
    #[serde(alias = "powerUpRate", deserialize_with = "lenient_level")]
    pub power_up_rate: u32,
    #[serde(alias = "pickupRange", deserialize_with = "lenient_level")]
    pub pickup_range: u32,
}

impl Default for Loadout {
    fn default() -> Self {
        Self {
            damage: 1,
            fire_rate: 1,
            health: 1,
            speed: 1,
            power_up_rate: 1,
            pickup_range: 1,
        }
    }
}

/// Accept numbers or numeric strings; anything else is level 1
fn lenient_level<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let raw = match &value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(match raw {
        Some(level) if level.is_finite() && level >= 1.0 => (level.floor() as u32).min(MAX_LEVEL),
        _ => 1,
    })
}

fn json_type(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

impl Loadout {
    pub fn from_json(json: &str) -> Result<Self, LoadoutError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if !value.is_object() {
            return Err(LoadoutError::NotAnObject(json_type(&value).to_string()));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Parse, falling back to all level 1 on a bad document
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(loadout) => loadout,
            Err(e) => {
                log::warn!("Using default loadout: {}", e);
                Self::default()
            }
        }
    }

    /// Read a loadout file
    pub fn load(path: &Path) -> Result<Self, LoadoutError> {
        let json = std::fs::read_to_string(path)?;
        let loadout = Self::from_json(&json)?;
        log::info!("Loaded loadout from {}", path.display());
        Ok(loadout)
    }

    pub fn to_json(&self) -> Result<String, LoadoutError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Map upgrade levels onto runtime values for `class`
    pub fn to_config(&self, class: CharacterClass) -> EngineConfig {
        let steps = |level: u32| level.clamp(1, MAX_LEVEL).saturating_sub(1) as f32;
        EngineConfig {
            class,
            weapon_damage: class.base_damage() * (1.0 + 0.15 * steps(self.damage)),
            weapon_fire_rate: class.fire_rate_for_level(self.fire_rate.clamp(1, MAX_LEVEL)),
            player_max_health: PLAYER_MAX_HEALTH + 20.0 * steps(self.health),
            player_speed: PLAYER_SPEED * (1.0 + 0.05 * steps(self.speed)),
            power_up_spawn_rate_bonus: (0.01 * steps(self.power_up_rate)).min(0.25),
            pickup_range: PICKUP_RANGE + 20.0 * steps(self.pickup_range),
        }
    }
}
