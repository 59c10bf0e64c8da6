//! Ship, asteroid and projectile entities
//!
//! Each entity owns a kinematic body and a local-space shape. World-space
//! shapes are produced on demand by rotating the hull by the body heading and
//! moving it to the body position.

use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{KinematicBody, Pose, Turn};
use super::hull::ConvexHull;
use crate::error::SimError;

/// Half-width of the ship hull relative to its size (tan 15°)
const SHIP_HALF_WIDTH: f32 = 0.267_949_2;

/// Unit outline of the rocky asteroid, counter-clockwise
const ROCKY_OUTLINE: [(f32, f32); 7] = [
    (0.2, 0.4),
    (-0.08, 0.5),
    (-0.5, -0.04),
    (-0.4, -0.4),
    (-0.2, -0.4),
    (0.3, -0.3),
    (0.5, 0.1),
];

/// Which typed collection an entity belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Ship,
    Asteroid,
    Projectile,
}

/// Collision geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Polygon(ConvexHull),
    /// Degenerate shape located at the body position
    Point(Vec2),
}

/// Shared capability of every entity: a body that steps and a placed shape
pub trait Mobile {
    fn body(&self) -> &KinematicBody;
    fn body_mut(&mut self) -> &mut KinematicBody;

    /// Shape in world space at the current pose
    fn world_shape(&self) -> Shape;

    fn pose(&self) -> Pose {
        self.body().pose()
    }

    fn step(&mut self, dt: f32) {
        self.body_mut().step(dt);
    }
}

/// The player ship: a narrow triangle whose nose points along the heading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub body: KinematicBody,
    pub size: f32,
    hull: ConvexHull,
}

impl Ship {
    pub fn new(
        size: f32,
        pose: Pose,
        acceleration: f32,
        angular_speed: f32,
    ) -> Result<Self, SimError> {
        let hull = ConvexHull::new(vec![
            Vec2::new(2.0 / 3.0 * size, 0.0),
            Vec2::new(-1.0 / 3.0 * size, SHIP_HALF_WIDTH * size),
            Vec2::new(-1.0 / 3.0 * size, -SHIP_HALF_WIDTH * size),
        ])?;
        Ok(Self {
            body: KinematicBody::new(pose, Vec2::ZERO, acceleration, angular_speed),
            size,
            hull,
        })
    }

    /// Muzzle point two thirds of the size ahead of the center, heading unchanged
    pub fn gun_position(&self) -> Pose {
        let pose = self.body.pose();
        let muzzle = pose.position() + self.body.forward() * (2.0 / 3.0 * self.size);
        Pose {
            x: muzzle.x,
            y: muzzle.y,
            heading: pose.heading,
        }
    }

    pub fn hull(&self) -> &ConvexHull {
        &self.hull
    }
}

impl Mobile for Ship {
    fn body(&self) -> &KinematicBody {
        &self.body
    }

    fn body_mut(&mut self) -> &mut KinematicBody {
        &mut self.body
    }

    fn world_shape(&self) -> Shape {
        let pose = self.body.pose();
        Shape::Polygon(self.hull.placed(pose, pose.heading))
    }
}

/// Concrete asteroid outlines; an asteroid is always one of these
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AsteroidShape {
    #[default]
    Rocky,
}

impl AsteroidShape {
    pub const ALL: [AsteroidShape; 1] = [AsteroidShape::Rocky];

    /// Outline scaled to `size`
    pub fn outline(self, size: f32) -> Vec<Vec2> {
        let unit: &[(f32, f32)] = match self {
            AsteroidShape::Rocky => &ROCKY_OUTLINE,
        };
        unit.iter().map(|&(x, y)| Vec2::new(x, y) * size).collect()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AsteroidShape::Rocky => "rocky",
        }
    }
}

impl fmt::Display for AsteroidShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AsteroidShape {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rocky" => Ok(AsteroidShape::Rocky),
            other => Err(SimError::InvalidConstruction(format!(
                "no asteroid shape named '{other}'"
            ))),
        }
    }
}

/// A drifting, spinning asteroid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asteroid {
    pub body: KinematicBody,
    pub size: f32,
    pub shape: AsteroidShape,
    hull: ConvexHull,
}

impl Asteroid {
    /// The sign of `angular_velocity` picks the spin direction, its magnitude the rate
    pub fn new(
        shape: AsteroidShape,
        size: f32,
        pose: Pose,
        start_velocity: Vec2,
        angular_velocity: f32,
    ) -> Result<Self, SimError> {
        let hull = ConvexHull::new(shape.outline(size))?;
        let mut body = KinematicBody::new(pose, start_velocity, 0.0, angular_velocity.abs());
        body.set_turn(if angular_velocity > 0.0 {
            Turn::Right
        } else if angular_velocity < 0.0 {
            Turn::Left
        } else {
            Turn::Straight
        });
        Ok(Self {
            body,
            size,
            shape,
            hull,
        })
    }

    pub fn hull(&self) -> &ConvexHull {
        &self.hull
    }
}

impl Mobile for Asteroid {
    fn body(&self) -> &KinematicBody {
        &self.body
    }

    fn body_mut(&mut self) -> &mut KinematicBody {
        &mut self.body
    }

    fn world_shape(&self) -> Shape {
        let pose = self.body.pose();
        Shape::Polygon(self.hull.placed(pose, pose.heading))
    }
}

/// A shot travelling in a straight line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub body: KinematicBody,
    /// Bookkeeping only; collisions treat the projectile as a point
    pub size: f32,
}

impl Projectile {
    pub fn new(size: f32, pose: Pose, velocity: Vec2) -> Self {
        Self {
            body: KinematicBody::new(pose, velocity, 0.0, 0.0),
            size,
        }
    }
}

impl Mobile for Projectile {
    fn body(&self) -> &KinematicBody {
        &self.body
    }

    fn body_mut(&mut self) -> &mut KinematicBody {
        &mut self.body
    }

    fn world_shape(&self) -> Shape {
        Shape::Point(self.body.pose().position())
    }
}

/// Any live object in the arena
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Entity {
    Ship(Ship),
    Asteroid(Asteroid),
    Projectile(Projectile),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Ship(_) => EntityKind::Ship,
            Entity::Asteroid(_) => EntityKind::Asteroid,
            Entity::Projectile(_) => EntityKind::Projectile,
        }
    }

    fn as_mobile(&self) -> &dyn Mobile {
        match self {
            Entity::Ship(ship) => ship,
            Entity::Asteroid(asteroid) => asteroid,
            Entity::Projectile(projectile) => projectile,
        }
    }

    fn as_mobile_mut(&mut self) -> &mut dyn Mobile {
        match self {
            Entity::Ship(ship) => ship,
            Entity::Asteroid(asteroid) => asteroid,
            Entity::Projectile(projectile) => projectile,
        }
    }
}

impl Mobile for Entity {
    fn body(&self) -> &KinematicBody {
        self.as_mobile().body()
    }

    fn body_mut(&mut self) -> &mut KinematicBody {
        self.as_mobile_mut().body_mut()
    }

    fn world_shape(&self) -> Shape {
        self.as_mobile().world_shape()
    }
}

impl From<Ship> for Entity {
    fn from(ship: Ship) -> Self {
        Entity::Ship(ship)
    }
}

impl From<Asteroid> for Entity {
    fn from(asteroid: Asteroid) -> Self {
        Entity::Asteroid(asteroid)
    }
}

impl From<Projectile> for Entity {
    fn from(projectile: Projectile) -> Self {
        Entity::Projectile(projectile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_ship_size() {
        let ship = Ship::new(2.4, Pose::default(), 1.5, 0.1 * PI).unwrap();
        assert!((ship.size - 2.4).abs() < EPS);
        assert_eq!(ship.hull().len(), 3);
    }

    #[test]
    fn test_gun_position_at_origin() {
        let ship = Ship::new(10.0, Pose::new(0.0, 0.0, 0.0), 1.5, 0.1 * PI).unwrap();
        let gun = ship.gun_position();
        assert!((gun.x - 20.0 / 3.0).abs() < EPS);
        assert!(gun.y.abs() < EPS);
        assert!(gun.heading.abs() < EPS);
    }

    #[test]
    fn test_gun_position_follows_heading() {
        let ship = Ship::new(3.0, Pose::new(5.0, 5.0, PI / 2.0), 1.5, 0.1 * PI).unwrap();
        let gun = ship.gun_position();
        assert!((gun.x - 5.0).abs() < EPS);
        assert!((gun.y - 7.0).abs() < EPS);
        assert!((gun.heading - PI / 2.0).abs() < EPS);
    }

    #[test]
    fn test_ship_nose_matches_gun() {
        let ship = Ship::new(9.0, Pose::new(1.0, 1.0, 1.2), 1.5, 0.1 * PI).unwrap();
        let Shape::Polygon(world) = ship.world_shape() else {
            panic!("ship must have a polygon shape");
        };
        let gun = ship.gun_position();
        assert!((world.vertices()[0] - Vec2::new(gun.x, gun.y)).length() < EPS);
    }

    #[test]
    fn test_asteroid_spin_from_signed_velocity() {
        let asteroid = Asteroid::new(
            AsteroidShape::Rocky,
            3.6,
            Pose::default(),
            Vec2::new(1.2, 2.1),
            10.0,
        )
        .unwrap();
        assert!((asteroid.size - 3.6).abs() < EPS);
        assert_eq!(asteroid.body.velocity, Vec2::new(1.2, 2.1));
        assert_eq!(asteroid.body.angular_speed, 10.0);
        assert_eq!(asteroid.body.turn(), Turn::Right);

        let ccw = Asteroid::new(AsteroidShape::Rocky, 1.0, Pose::default(), Vec2::ZERO, -2.0)
            .unwrap();
        assert_eq!(ccw.body.turn(), Turn::Left);
        assert_eq!(ccw.body.angular_speed, 2.0);

        let still = Asteroid::new(AsteroidShape::Rocky, 1.0, Pose::default(), Vec2::ZERO, 0.0)
            .unwrap();
        assert_eq!(still.body.turn(), Turn::Straight);
    }

    #[test]
    fn test_asteroid_shape_names() {
        assert_eq!("Rocky".parse::<AsteroidShape>().unwrap(), AsteroidShape::Rocky);
        let err = "base".parse::<AsteroidShape>().unwrap_err();
        assert!(matches!(err, SimError::InvalidConstruction(_)));
    }

    #[test]
    fn test_zero_size_asteroid_rejected() {
        let err = Asteroid::new(AsteroidShape::Rocky, 0.0, Pose::default(), Vec2::ZERO, 0.0)
            .unwrap_err();
        assert!(matches!(err, SimError::InvalidConstruction(_)));
    }

    #[test]
    fn test_projectile_moves_straight() {
        let mut projectile = Projectile::new(1.0, Pose::new(2.0, 3.0, 4.0), Vec2::new(4.2, 5.3));
        assert!((projectile.size + projectile.pose().y + projectile.body.velocity.y - 9.3).abs() < EPS);
        projectile.step(1.0);
        assert!((projectile.pose().x - 6.2).abs() < EPS);
        assert!((projectile.pose().y - 8.3).abs() < EPS);
        assert!(matches!(projectile.world_shape(), Shape::Point(_)));
    }

    #[test]
    fn test_entity_kind() {
        let entity: Entity = Projectile::new(1.0, Pose::default(), Vec2::X).into();
        assert_eq!(entity.kind(), EntityKind::Projectile);
    }
}
