//! Physics collaborators consumed by force movement.
//!
//! Movement controllers never move entities on their own. They describe the
//! entity through [`MovableEntity`] and ask a [`PhysicsEngine`] to perform an
//! incremental move along an angle. The engine decides whether the move is
//! possible; a refusal is a signal (usually an obstruction), not an error.
//!
//! [`ObstaclePhysics`] is the engine installed by default: it refuses any move
//! that would make the entity's collision box overlap a registered obstacle.

use bevy_ecs::prelude::Resource;
use glam::Vec2;

use crate::geometry::{Aabb, project};

/// Geometry and placement of an entity that can be moved by forces.
pub trait MovableEntity {
    /// Top-left corner of the entity in world space.
    fn location(&self) -> Vec2;
    fn set_location(&mut self, location: Vec2);
    fn width(&self) -> f32;
    fn height(&self) -> f32;
    /// Collision box in world space at the current location.
    fn collision_box(&self) -> Aabb;

    fn collision_box_center(&self) -> Vec2 {
        self.collision_box().center()
    }
}

/// Low-level move primitive.
pub trait PhysicsEngine: Send + Sync {
    /// Move `entity` by `distance` along `angle_degrees`.
    ///
    /// Returns `false` when the move was obstructed.
    fn move_entity(
        &mut self,
        entity: &mut dyn MovableEntity,
        angle_degrees: f32,
        distance: f32,
    ) -> bool;
}

/// ECS resource holding the active physics engine.
#[derive(Resource)]
pub struct PhysicsWorld {
    pub engine: Box<dyn PhysicsEngine>,
}

impl PhysicsWorld {
    pub fn new(engine: impl PhysicsEngine + 'static) -> Self {
        Self {
            engine: Box::new(engine),
        }
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(ObstaclePhysics::default())
    }
}

/// Physics engine that blocks moves into static obstacles.
///
/// A blocked move leaves the entity where it was; there is no sliding along
/// the obstacle.
#[derive(Debug, Default, Clone)]
pub struct ObstaclePhysics {
    obstacles: Vec<Aabb>,
}

impl ObstaclePhysics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_obstacle(mut self, obstacle: Aabb) -> Self {
        self.obstacles.push(obstacle);
        self
    }
}

impl PhysicsEngine for ObstaclePhysics {
    fn move_entity(
        &mut self,
        entity: &mut dyn MovableEntity,
        angle_degrees: f32,
        distance: f32,
    ) -> bool {
        let delta = project(angle_degrees, distance);
        let moved = entity.collision_box().translated(delta);
        if self.obstacles.iter().any(|o| moved.overlaps(o)) {
            return false;
        }
        let location = entity.location();
        entity.set_location(location + delta);
        true
    }
}
