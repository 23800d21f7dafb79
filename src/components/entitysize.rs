use bevy_ecs::prelude::Component;

/// Overall width and height of an entity, independent of its collider.
///
/// Used when an entity must be placed so that a point lines up with its
/// bottom-center, e.g. when a force snaps it onto its target.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct EntitySize {
    pub width: f32,
    pub height: f32,
}

impl EntitySize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}
