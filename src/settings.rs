//! Arena tuning
//!
//! Loaded from a JSON document by the launcher; every field falls back to the
//! compile-time default in `consts`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::consts::*;
use crate::error::SimError;

/// Arena configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Arena extent `[width, height]`
    pub arena_size: [f32; 2],
    /// Number of asteroids the field spawner aims for (not enforced on registration)
    pub asteroid_quota: u32,

    // === Ship ===
    pub ship_size: f32,
    pub ship_acceleration: f32,
    /// Turn rate magnitude (radians/sec)
    pub ship_angular_speed: f32,

    // === Projectiles ===
    pub projectile_speed: f32,
    pub projectile_size: f32,

    // === Asteroid field ===
    pub asteroid_size: f32,
    /// Spawn speed range `[min, max]`
    pub asteroid_speed: [f32; 2],
    /// Maximum spin magnitude at spawn (radians/sec)
    pub asteroid_max_spin: f32,
    pub spawn_clearance: f32,

    /// Run collision resolution at the end of every `tick`
    pub auto_resolve_collisions: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arena_size: [ARENA_WIDTH, ARENA_HEIGHT],
            asteroid_quota: ASTEROID_QUOTA,

            ship_size: SHIP_SIZE,
            ship_acceleration: SHIP_ACCELERATION,
            ship_angular_speed: SHIP_ANGULAR_SPEED,

            projectile_speed: PROJECTILE_SPEED,
            projectile_size: PROJECTILE_SIZE,

            asteroid_size: ASTEROID_SIZE,
            asteroid_speed: [ASTEROID_MIN_SPEED, ASTEROID_MAX_SPEED],
            asteroid_max_spin: ASTEROID_MAX_SPIN,
            spawn_clearance: SPAWN_CLEARANCE,

            auto_resolve_collisions: false,
        }
    }
}

impl Settings {
    /// Parse settings from JSON, rejecting malformed arena size or quota
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let value: Value = serde_json::from_str(json)?;

        if let Some(size) = value.get("arena_size") {
            let ok = size
                .as_array()
                .is_some_and(|dims| dims.len() == 2 && dims.iter().all(Value::is_number));
            if !ok {
                return Err(SimError::InvalidArenaSize(size.to_string()));
            }
        }
        if let Some(quota) = value.get("asteroid_quota") {
            if quota.as_u64().is_none_or(|q| q > u64::from(u32::MAX)) {
                return Err(SimError::InvalidAsteroidQuota(quota.to_string()));
            }
        }

        let settings: Settings = serde_json::from_value(value)?;
        settings.validate()?;
        log::info!("Loaded settings: arena {:?}", settings.arena_size);
        Ok(settings)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the values a loaded document cannot enforce by type
    pub fn validate(&self) -> Result<(), SimError> {
        validate_arena_size(self.arena_size)?;
        let [min, max] = self.asteroid_speed;
        if !(min.is_finite() && max.is_finite() && 0.0 <= min && min <= max) {
            return Err(SimError::Settings(format!(
                "asteroid_speed must be 0 <= min <= max, got {:?}",
                self.asteroid_speed
            )));
        }
        if !self.asteroid_max_spin.is_finite() {
            return Err(SimError::Settings(format!(
                "asteroid_max_spin must be finite, got {}",
                self.asteroid_max_spin
            )));
        }
        Ok(())
    }
}

/// Both dimensions must be positive and finite
pub fn validate_arena_size(size: [f32; 2]) -> Result<(), SimError> {
    if size.iter().all(|d| d.is_finite() && *d > 0.0) {
        Ok(())
    } else {
        Err(SimError::InvalidArenaSize(format!("{size:?}")))
    }
}
