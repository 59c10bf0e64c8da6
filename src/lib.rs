//! Asteroid Field - a wrap-around arena with a ship, asteroids and projectiles
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, convex hulls, arena loop)
//! - `settings`: Data-driven arena tuning
//! - `error`: Error taxonomy for rejected calls

pub mod error;
pub mod settings;
pub mod sim;

pub use error::SimError;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the demo launcher
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;
    pub const ASTEROID_QUOTA: u32 = 8;

    /// Ship defaults
    pub const SHIP_SIZE: f32 = 20.0;
    pub const SHIP_ACCELERATION: f32 = 1.5;
    pub const SHIP_ANGULAR_SPEED: f32 = 0.1 * std::f32::consts::PI;

    /// Projectile defaults
    pub const PROJECTILE_SPEED: f32 = 10.0;
    pub const PROJECTILE_SIZE: f32 = 10.0;

    /// Asteroid defaults
    pub const ASTEROID_SIZE: f32 = 40.0;
    pub const ASTEROID_MIN_SPEED: f32 = 5.0;
    pub const ASTEROID_MAX_SPEED: f32 = 30.0;
    /// Spin magnitude upper bound (radians/sec)
    pub const ASTEROID_MAX_SPIN: f32 = 1.0;
    /// Asteroids never spawn closer than this to the ship
    pub const SPAWN_CLEARANCE: f32 = 100.0;
}

/// Normalize a heading into [0, 2π)
#[inline]
pub fn normalize_heading(angle: f32) -> f32 {
    use std::f32::consts::TAU;
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Unit vector pointing along `heading`
#[inline]
pub fn heading_vector(heading: f32) -> Vec2 {
    Vec2::new(heading.cos(), heading.sin())
}

/// Toroidal wrap of one coordinate (floored modulo, result in [0, size))
#[inline]
pub fn wrap_coordinate(value: f32, size: f32) -> f32 {
    value.rem_euclid(size)
}
