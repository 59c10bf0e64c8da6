//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order of entities)
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod entity;
pub mod hull;
pub mod spawn;
pub mod state;
pub mod tick;

pub use body::{KinematicBody, Pose, Thrust, Turn};
pub use collision::{CollisionReport, shapes_collide};
pub use entity::{Asteroid, AsteroidShape, Entity, EntityKind, Mobile, Projectile, Shape, Ship};
pub use hull::ConvexHull;
pub use state::{Arena, EntityId, EntitySnapshot, GamePhase, Snapshot};
pub use tick::{TickInput, tick};
