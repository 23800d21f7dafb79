//! World-space location of an entity.
//!
//! The location is the entity's top-left corner; its sprite and collider are
//! laid out relative to it. Force movement reads and writes this component.

use bevy_ecs::prelude::Component;
use glam::Vec2;

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct MapPosition {
    pub pos: Vec2,
}

impl MapPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
        }
    }
}
