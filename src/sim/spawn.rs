//! Seeded asteroid field population
//!
//! Same seed, same settings and same ship position always give the same field.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::body::Pose;
use super::entity::{Asteroid, AsteroidShape, Mobile};
use super::state::{Arena, EntityId};
use crate::error::SimError;
use crate::heading_vector;

/// Placement attempts before accepting a spot inside the ship clearance
const MAX_PLACEMENT_ATTEMPTS: u32 = 32;

impl Arena {
    /// Add asteroids until the quota is reached, returning the new ids
    ///
    /// Positions are uniform over the arena and kept at least
    /// `spawn_clearance` away from the ship when one is registered.
    pub fn spawn_field(&mut self, seed: u64) -> Result<Vec<EntityId>, SimError> {
        let mut rng = Pcg32::seed_from_u64(seed);
        let missing = (self.asteroid_quota as usize).saturating_sub(self.asteroids.len());
        let ship_pos = self.ship().map(|ship| ship.pose().position());

        let settings = self.settings.clone();
        let [min_speed, max_speed] = settings.asteroid_speed;
        let max_spin = settings.asteroid_max_spin.abs();

        let mut spawned = Vec::with_capacity(missing);
        for _ in 0..missing {
            let position = self.pick_position(&mut rng, ship_pos, settings.spawn_clearance);
            let heading = rng.random_range(0.0..std::f32::consts::TAU);
            let direction = rng.random_range(0.0..std::f32::consts::TAU);
            let speed = rng.random_range(min_speed..=max_speed);
            let spin = rng.random_range(-max_spin..=max_spin);
            let shape = AsteroidShape::ALL[rng.random_range(0..AsteroidShape::ALL.len())];

            let asteroid = Asteroid::new(
                shape,
                settings.asteroid_size,
                Pose::new(position.x, position.y, heading),
                heading_vector(direction) * speed,
                spin,
            )?;
            let id = self.add_asteroid(asteroid)?;
            log::debug!("Asteroid {id}: {shape} at ({:.1}, {:.1})", position.x, position.y);
            spawned.push(id);
        }

        log::info!("Spawned {} asteroids (seed {seed})", spawned.len());
        Ok(spawned)
    }

    fn pick_position(&self, rng: &mut Pcg32, ship: Option<Vec2>, clearance: f32) -> Vec2 {
        let mut candidate = Vec2::ZERO;
        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            candidate = Vec2::new(
                rng.random_range(0.0..self.width),
                rng.random_range(0.0..self.height),
            );
            match ship {
                Some(ship) if candidate.distance(ship) < clearance => continue,
                _ => return candidate,
            }
        }
        log::warn!("No clear spawn spot found; placing asteroid near the ship");
        candidate
    }
}
