//! Force movement system.
//!
//! Each frame, [`force_movement_system`] ticks every
//! [`MovementController`] whose movement checks pass, moving its entity
//! through the [`PhysicsWorld`] engine. Entities need a [`MapPosition`],
//! [`BoxCollider`] and [`EntitySize`] next to the controller.

use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::components::boxcollider::BoxCollider;
use crate::components::entitysize::EntitySize;
use crate::components::mapposition::MapPosition;
use crate::components::movementcontroller::MovementController;
use crate::geometry::Aabb;
use crate::resources::physics::{MovableEntity, PhysicsWorld};
use crate::resources::worldtime::WorldTime;

/// [`MovableEntity`] view over an entity's ECS components.
pub struct MovableView<'a> {
    pub position: &'a mut MapPosition,
    pub collider: &'a BoxCollider,
    pub size: &'a EntitySize,
}

impl MovableEntity for MovableView<'_> {
    fn location(&self) -> Vec2 {
        self.position.pos
    }

    fn set_location(&mut self, location: Vec2) {
        self.position.pos = location;
    }

    fn width(&self) -> f32 {
        self.size.width
    }

    fn height(&self) -> f32 {
        self.size.height
    }

    fn collision_box(&self) -> Aabb {
        self.collider.aabb(self.position.pos)
    }
}

pub fn force_movement_system(
    time: Res<WorldTime>,
    mut physics: ResMut<PhysicsWorld>,
    mut query: Query<(
        &mut MovementController,
        &mut MapPosition,
        &BoxCollider,
        &EntitySize,
    )>,
) {
    for (mut controller, mut position, collider, size) in query.iter_mut() {
        if !controller.is_movement_allowed() {
            continue;
        }
        let mut view = MovableView {
            position: &mut position,
            collider,
            size,
        };
        controller.update(&time, &mut view, physics.engine.as_mut());
    }
}
