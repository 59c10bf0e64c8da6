//! Collision resolution between ship, asteroids and projectiles
//!
//! Shapes are compared in world space. A projectile is a point, so it hits an
//! asteroid only when it lies strictly inside the asteroid hull.

use serde::{Deserialize, Serialize};

use super::entity::{Mobile, Shape};
use super::state::{Arena, EntityId, GamePhase};

/// Outcome of one `resolve_collisions` call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionReport {
    /// The ship hit an asteroid and the game ended
    pub ship_destroyed: bool,
    /// The asteroid that hit the ship (first hit in collection order)
    pub ship_hit_by: Option<EntityId>,
    /// `(asteroid, projectile)` pairs destroyed together
    pub destroyed: Vec<(EntityId, EntityId)>,
}

impl CollisionReport {
    pub fn is_empty(&self) -> bool {
        !self.ship_destroyed && self.destroyed.is_empty()
    }
}

/// Overlap test between two placed shapes
pub fn shapes_collide(a: &Shape, b: &Shape) -> bool {
    match (a, b) {
        (Shape::Polygon(a), Shape::Polygon(b)) => a.collides(b),
        (Shape::Polygon(hull), Shape::Point(point)) | (Shape::Point(point), Shape::Polygon(hull)) => {
            hull.contains_point(*point)
        }
        (Shape::Point(_), Shape::Point(_)) => false,
    }
}

impl Arena {
    fn world_shape_of(&self, id: EntityId) -> Option<Shape> {
        self.moving_objects.get(&id).map(|entity| entity.world_shape())
    }

    /// Resolve ship-vs-asteroid, then asteroid-vs-projectile collisions
    ///
    /// The first asteroid touching the ship ends the game. Asteroids are then
    /// scanned last to first, each against the projectiles last to first; the
    /// first pair found is removed from both typed collections (the unified
    /// collection keeps them) and the scan moves to the next asteroid.
    pub fn resolve_collisions(&mut self) -> CollisionReport {
        let mut report = CollisionReport::default();
        if self.is_game_over() {
            return report;
        }

        if let Some(ship_shape) = self.ship.and_then(|id| self.world_shape_of(id)) {
            let hit = self.asteroids.iter().copied().find(|&id| {
                self.world_shape_of(id)
                    .is_some_and(|shape| shapes_collide(&ship_shape, &shape))
            });
            if let Some(asteroid) = hit {
                self.phase = GamePhase::GameOver;
                report.ship_destroyed = true;
                report.ship_hit_by = Some(asteroid);
                log::info!("Game over: ship hit by asteroid {asteroid}");
            }
        }

        for i in (0..self.asteroids.len()).rev() {
            let asteroid = self.asteroids[i];
            let Some(asteroid_shape) = self.world_shape_of(asteroid) else {
                continue;
            };
            let hit = (0..self.projectiles.len()).rev().find(|&j| {
                self.world_shape_of(self.projectiles[j])
                    .is_some_and(|shape| shapes_collide(&asteroid_shape, &shape))
            });
            if let Some(j) = hit {
                let projectile = self.projectiles.remove(j);
                self.asteroids.remove(i);
                report.destroyed.push((asteroid, projectile));
                log::debug!("Asteroid {asteroid} destroyed by projectile {projectile}");
            }
        }

        report
    }
}
