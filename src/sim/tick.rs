//! Per-frame simulation step
//!
//! Frame order: drop detached entities, apply intents, advance every body,
//! wrap asteroids, drop projectiles that left the arena, wrap the ship, then
//! (optionally) resolve collisions and drop the pairs they detached.

use super::body::Turn;
use super::collision::CollisionReport;
use super::entity::{Entity, Mobile};
use super::state::{Arena, EntityId};
use crate::error::SimError;
use crate::wrap_coordinate;

/// Controller commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Turn intent for the ship
    pub turn: Turn,
    /// Main engine on/off
    pub thrust: bool,
    /// Fire one projectile this frame
    pub fire: bool,
}

/// Run one full frame: intents, `step(dt)`, then collision resolution when enabled
///
/// Intents are skipped when no ship is registered; firing without a ship is
/// an error. Returns an empty report when resolution is not run. Entities
/// left detached by collision resolution never survive into the next frame.
pub fn tick(arena: &mut Arena, input: &TickInput, dt: f32) -> Result<CollisionReport, SimError> {
    if arena.is_game_over() {
        return Err(SimError::GameOver);
    }

    // Pairs detached by a caller-driven `resolve_collisions`
    arena.purge_detached();

    if let Some(ship) = arena.ship_mut() {
        ship.body.set_turn(input.turn);
    }
    if arena.ship_id().is_some() {
        arena.set_ship_thrust(input.thrust)?;
    }
    if input.fire {
        arena.fire_ship()?;
    }

    arena.step(dt);

    if arena.settings().auto_resolve_collisions {
        let report = arena.resolve_collisions();
        arena.purge_detached();
        Ok(report)
    } else {
        Ok(CollisionReport::default())
    }
}

impl Arena {
    /// Advance all bodies by `dt`, then apply the boundary rules
    ///
    /// Does nothing once the game is over. Collision resolution is a separate
    /// call (`resolve_collisions`) unless `tick` runs it.
    pub fn step(&mut self, dt: f32) {
        if self.is_game_over() {
            log::debug!("step ignored: game over");
            return;
        }

        for entity in self.moving_objects.values_mut() {
            entity.step(dt);
        }

        self.wrap_asteroids();
        self.clip_projectiles();
        self.wrap_ship();
    }

    fn out_of_bounds(&self, x: f32, y: f32) -> bool {
        x < 0.0 || x > self.width || y < 0.0 || y > self.height
    }

    /// Toroidal wrap of one entity, leaving heading untouched
    fn wrap_entity(&mut self, id: EntityId) {
        let (width, height) = (self.width, self.height);
        let Some(entity) = self.moving_objects.get(&id) else {
            return;
        };
        let pose = entity.pose();
        if !self.out_of_bounds(pose.x, pose.y) {
            return;
        }
        if let Some(entity) = self.moving_objects.get_mut(&id) {
            entity
                .body_mut()
                .set_position(wrap_coordinate(pose.x, width), wrap_coordinate(pose.y, height));
        }
    }

    pub(super) fn wrap_asteroids(&mut self) {
        for i in 0..self.asteroids.len() {
            let id = self.asteroids[i];
            self.wrap_entity(id);
        }
    }

    pub(super) fn wrap_ship(&mut self) {
        if let Some(id) = self.ship {
            self.wrap_entity(id);
        }
    }

    /// Remove every projectile outside the arena from both collections
    pub(super) fn clip_projectiles(&mut self) {
        let mut kept = Vec::with_capacity(self.projectiles.len());
        for &id in &self.projectiles {
            let outside = match self.moving_objects.get(&id) {
                Some(Entity::Projectile(p)) => {
                    let pose = p.pose();
                    self.out_of_bounds(pose.x, pose.y)
                }
                _ => false,
            };
            if outside {
                self.moving_objects.shift_remove(&id);
                log::debug!("Projectile {id} left the arena");
            } else {
                kept.push(id);
            }
        }
        self.projectiles = kept;
    }
}
