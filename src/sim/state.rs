//! Arena state and controller-facing operations
//!
//! Every live entity sits in one insertion-ordered store (the unified
//! moving-objects collection). The typed collections hold ids into that
//! store. Removing an id from a typed collection normally removes the entity
//! from the store as well; the asteroid-vs-projectile path is the exception
//! and leaves the entities detached until `purge_detached`.

use glam::Vec2;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::body::{Pose, Thrust, Turn};
use super::entity::{Asteroid, Entity, EntityKind, Mobile, Projectile, Shape, Ship};
use crate::error::SimError;
use crate::heading_vector;
use crate::settings::Settings;

/// Stable handle of an entity within one arena
pub type EntityId = u32;

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Active,
    /// Terminal until `reset`
    GameOver,
}

/// The wrap-around playing field and everything in it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    pub(super) width: f32,
    pub(super) height: f32,
    /// Informational only; registration never checks it
    pub asteroid_quota: u32,
    pub(super) phase: GamePhase,
    pub(super) settings: Settings,
    pub(super) moving_objects: IndexMap<EntityId, Entity>,
    pub(super) ship: Option<EntityId>,
    pub(super) asteroids: Vec<EntityId>,
    pub(super) projectiles: Vec<EntityId>,
    next_id: EntityId,
}

impl Arena {
    /// Create an empty arena of `[width, height]` with default tuning
    pub fn new(size: [f32; 2], asteroid_quota: u32) -> Result<Self, SimError> {
        let settings = Settings {
            arena_size: size,
            asteroid_quota,
            ..Settings::default()
        };
        Self::from_settings(settings)
    }

    /// Create an empty arena, rejecting settings that fail `Settings::validate`
    pub fn from_settings(settings: Settings) -> Result<Self, SimError> {
        settings.validate()?;
        let [width, height] = settings.arena_size;
        Ok(Self {
            width,
            height,
            asteroid_quota: settings.asteroid_quota,
            phase: GamePhase::Active,
            settings,
            moving_objects: IndexMap::new(),
            ship: None,
            asteroids: Vec::new(),
            projectiles: Vec::new(),
            next_id: 1,
        })
    }

    /// `(width, height)`
    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Clear every entity and start over in the `Active` phase
    pub fn reset(&mut self) {
        self.moving_objects.clear();
        self.ship = None;
        self.asteroids.clear();
        self.projectiles.clear();
        self.phase = GamePhase::Active;
        log::info!("Arena reset");
    }

    fn ensure_active(&self) -> Result<(), SimError> {
        if self.is_game_over() {
            log::warn!("Rejected gameplay call after game over");
            return Err(SimError::GameOver);
        }
        Ok(())
    }

    fn insert(&mut self, entity: Entity) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        self.moving_objects.insert(id, entity);
        id
    }

    fn expect_kind(entity: &Entity, expected: EntityKind) -> Result<(), SimError> {
        let found = entity.kind();
        if found == expected {
            Ok(())
        } else {
            Err(SimError::WrongEntityKind { expected, found })
        }
    }

    // === Registration ===

    /// Register the single ship
    pub fn add_ship(&mut self, entity: impl Into<Entity>) -> Result<EntityId, SimError> {
        self.ensure_active()?;
        let entity = entity.into();
        Self::expect_kind(&entity, EntityKind::Ship)?;
        if self.ship.is_some() {
            return Err(SimError::DuplicateShip);
        }
        let id = self.insert(entity);
        self.ship = Some(id);
        Ok(id)
    }

    pub fn add_asteroid(&mut self, entity: impl Into<Entity>) -> Result<EntityId, SimError> {
        self.ensure_active()?;
        let entity = entity.into();
        Self::expect_kind(&entity, EntityKind::Asteroid)?;
        let id = self.insert(entity);
        self.asteroids.push(id);
        Ok(id)
    }

    pub fn add_projectile(&mut self, entity: impl Into<Entity>) -> Result<EntityId, SimError> {
        self.ensure_active()?;
        let entity = entity.into();
        Self::expect_kind(&entity, EntityKind::Projectile)?;
        let id = self.insert(entity);
        self.projectiles.push(id);
        Ok(id)
    }

    // === Lookup ===

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.moving_objects.get(&id)
    }

    /// Ids in the unified collection, in insertion order
    pub fn moving_object_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.moving_objects.keys().copied()
    }

    pub fn ship_id(&self) -> Option<EntityId> {
        self.ship
    }

    pub fn asteroid_ids(&self) -> &[EntityId] {
        &self.asteroids
    }

    pub fn projectile_ids(&self) -> &[EntityId] {
        &self.projectiles
    }

    pub fn ship(&self) -> Option<&Ship> {
        match self.moving_objects.get(&self.ship?) {
            Some(Entity::Ship(ship)) => Some(ship),
            _ => None,
        }
    }

    pub(super) fn ship_mut(&mut self) -> Option<&mut Ship> {
        match self.moving_objects.get_mut(&self.ship?) {
            Some(Entity::Ship(ship)) => Some(ship),
            _ => None,
        }
    }

    pub fn asteroids(&self) -> impl Iterator<Item = (EntityId, &Asteroid)> + '_ {
        self.asteroids
            .iter()
            .filter_map(|id| match self.moving_objects.get(id) {
                Some(Entity::Asteroid(asteroid)) => Some((*id, asteroid)),
                _ => None,
            })
    }

    pub fn projectiles(&self) -> impl Iterator<Item = (EntityId, &Projectile)> + '_ {
        self.projectiles
            .iter()
            .filter_map(|id| match self.moving_objects.get(id) {
                Some(Entity::Projectile(projectile)) => Some((*id, projectile)),
                _ => None,
            })
    }

    /// True when a typed collection still references `id`
    pub fn is_attached(&self, id: EntityId) -> bool {
        self.ship == Some(id) || self.asteroids.contains(&id) || self.projectiles.contains(&id)
    }

    /// Drop unified entries no typed collection references; returns how many
    pub fn purge_detached(&mut self) -> usize {
        let before = self.moving_objects.len();
        let ship = self.ship;
        let asteroids = &self.asteroids;
        let projectiles = &self.projectiles;
        self.moving_objects.retain(|id, _| {
            ship == Some(*id) || asteroids.contains(id) || projectiles.contains(id)
        });
        let purged = before - self.moving_objects.len();
        if purged > 0 {
            log::debug!("Purged {purged} detached entities");
        }
        purged
    }

    // === Ship controls ===

    /// Set the ship turn intent from a raw -1/0/1 direction
    pub fn turn_ship(&mut self, direction: i32) -> Result<(), SimError> {
        self.ensure_active()?;
        let turn = Turn::try_from(direction)?;
        let ship = self.ship_mut().ok_or(SimError::NoShip)?;
        ship.body.set_turn(turn);
        Ok(())
    }

    pub fn set_ship_thrust(&mut self, on: bool) -> Result<(), SimError> {
        self.ensure_active()?;
        let ship = self.ship_mut().ok_or(SimError::NoShip)?;
        ship.body.set_thrust(if on { Thrust::Forward } else { Thrust::Off });
        Ok(())
    }

    /// Spawn a projectile at the gun, moving along the gun heading
    pub fn fire_ship(&mut self) -> Result<EntityId, SimError> {
        self.ensure_active()?;
        let gun = self.ship().ok_or(SimError::NoShip)?.gun_position();
        let velocity = heading_vector(gun.heading) * self.settings.projectile_speed;
        let projectile = Projectile::new(self.settings.projectile_size, gun, velocity);
        let id = self.insert(projectile.into());
        self.projectiles.push(id);
        log::debug!("Fired projectile {id} from ({:.1}, {:.1})", gun.x, gun.y);
        Ok(id)
    }

    // === Presentation ===

    /// Read-only view of every attached entity, in insertion order
    pub fn snapshot(&self) -> Snapshot {
        let entities = self
            .moving_objects
            .iter()
            .filter(|(id, _)| self.is_attached(**id))
            .map(|(id, entity)| EntitySnapshot {
                id: *id,
                kind: entity.kind(),
                pose: entity.pose(),
                vertices: match entity.world_shape() {
                    Shape::Polygon(hull) => hull.vertices().to_vec(),
                    Shape::Point(point) => vec![point],
                },
            })
            .collect();
        Snapshot {
            width: self.width,
            height: self.height,
            game_over: self.is_game_over(),
            entities,
        }
    }
}

/// One entity as the presentation layer sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pose: Pose,
    /// World-space outline (a single point for projectiles)
    pub vertices: Vec<Vec2>,
}

/// Frame snapshot for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub width: f32,
    pub height: f32,
    pub game_over: bool,
    pub entities: Vec<EntitySnapshot>,
}
