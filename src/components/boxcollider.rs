use bevy_ecs::prelude::Component;
use glam::Vec2;

use crate::geometry::Aabb;

/// Rectangular collision box placed relative to an entity's [`MapPosition`].
///
/// [`MapPosition`]: super::mapposition::MapPosition
#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct BoxCollider {
    pub size: Vec2,
    pub offset: Vec2,
}

impl BoxCollider {
    /// Create a BoxCollider with given size and no offset.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            offset: Vec2::ZERO,
        }
    }

    /// Modify BoxCollider with given offset.
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// Collider placed at the horizontal center and bottom edge of an entity
    /// of `entity_width` x `entity_height`, the usual "feet" box of a walker.
    pub fn feet(entity_width: f32, entity_height: f32, width: f32, height: f32) -> Self {
        Self::new(width, height).with_offset(Vec2::new(
            (entity_width - width) / 2.0,
            entity_height - height,
        ))
    }

    /// World-space box of the collider for a given entity position.
    pub fn aabb(&self, position: Vec2) -> Aabb {
        Aabb::from_origin_size(position + self.offset, self.size)
    }
}
