//! Per-entity force integration.
//!
//! A [`MovementController`] owns the active [`Force`]s of one movable entity
//! and integrates them once per tick through a
//! [`PhysicsEngine`](crate::resources::physics::PhysicsEngine). It is an ECS
//! component, driven each frame by
//! [`force_movement_system`](crate::systems::forces::force_movement_system),
//! but [`MovementController::update`] can be called directly as well.
//!
//! # Tick
//!
//! 1. Forces received through [`ForceSender`] handles are merged in.
//! 2. Ended forces are removed.
//! 3. Each remaining force, in insertion order:
//!    - ends if it cancels on reach and the collision box center is within
//!      the reach tolerance of its target;
//!    - otherwise, if the center is within tolerance anyway, the entity is
//!      snapped so that its bottom-center sits on the target;
//!    - otherwise the physics engine moves the entity towards the target by
//!      `delta * strength`; a refused move ends forces that cancel on
//!      collision.
//!
//! Forces are applied one after another, not summed. A force that ends during
//! a tick is still listed by [`MovementController::active_forces`] until the
//! next tick.
//!
//! # Movement checks
//!
//! Predicates registered with [`MovementController::on_movement_check`] are
//! combined by [`MovementController::is_movement_allowed`]. The controller
//! does not consult them itself; the embedding system does.

use std::sync::Arc;

use bevy_ecs::prelude::Component;
use crossbeam_channel::{Receiver, Sender, unbounded};
use glam::Vec2;
use smallvec::SmallVec;

use crate::components::force::Force;
use crate::geometry::bearing_degrees;
use crate::resources::physics::{MovableEntity, PhysicsEngine};
use crate::resources::worldtime::WorldTime;

/// Distance under which an entity counts as having reached a force target.
pub const DEFAULT_REACH_TOLERANCE: f32 = 5.0;

/// Gate consulted by [`MovementController::is_movement_allowed`].
///
/// Predicates are deduplicated by `Arc` identity, so keep the `Arc` around if
/// the same predicate may be registered twice.
pub type MovementPredicate = Arc<dyn Fn(&MovementController) -> bool + Send + Sync>;

/// Thread-safe handle that applies forces to a controller from anywhere.
///
/// Forces sent through it are merged on the controller's next tick, with the
/// same deduplication as [`MovementController::apply`].
#[derive(Clone, Debug)]
pub struct ForceSender {
    tx: Sender<Force>,
}

impl ForceSender {
    /// Queue `force` for the controller. Returns `false` if the controller is gone.
    pub fn apply(&self, force: Force) -> bool {
        self.tx.send(force).is_ok()
    }
}

#[derive(Component)]
pub struct MovementController {
    active_forces: SmallVec<[Force; 4]>,
    predicates: Vec<MovementPredicate>,
    reach_tolerance: f32,
    inbox_tx: Sender<Force>,
    inbox_rx: Receiver<Force>,
}

impl Default for MovementController {
    fn default() -> Self {
        Self::new()
    }
}

impl MovementController {
    pub fn new() -> Self {
        let (inbox_tx, inbox_rx) = unbounded();
        Self {
            active_forces: SmallVec::new(),
            predicates: Vec::new(),
            reach_tolerance: DEFAULT_REACH_TOLERANCE,
            inbox_tx,
            inbox_rx,
        }
    }

    pub fn with_reach_tolerance(mut self, tolerance: f32) -> Self {
        self.reach_tolerance = tolerance;
        self
    }

    pub fn reach_tolerance(&self) -> f32 {
        self.reach_tolerance
    }

    /// Add `force` unless this very force is already active.
    pub fn apply(&mut self, force: Force) {
        if !self.active_forces.contains(&force) {
            self.active_forces.push(force);
        }
    }

    /// Forces currently held, in insertion order. May include forces that
    /// ended since the last tick.
    pub fn active_forces(&self) -> &[Force] {
        &self.active_forces
    }

    /// Handle for applying forces from other threads.
    pub fn sender(&self) -> ForceSender {
        ForceSender {
            tx: self.inbox_tx.clone(),
        }
    }

    /// End and drop every force.
    pub fn clear(&mut self) {
        for force in self.active_forces.drain(..) {
            force.end();
        }
    }

    /// Register a movement gate unless the same predicate is already present.
    pub fn on_movement_check(&mut self, predicate: MovementPredicate) {
        let known = self
            .predicates
            .iter()
            .any(|p| std::ptr::addr_eq(Arc::as_ptr(p), Arc::as_ptr(&predicate)));
        if !known {
            self.predicates.push(predicate);
        }
    }

    /// True when every registered predicate accepts this controller.
    pub fn is_movement_allowed(&self) -> bool {
        self.predicates.iter().all(|p| p(self))
    }

    /// Advance all forces by one tick.
    pub fn update(
        &mut self,
        time: &WorldTime,
        entity: &mut dyn MovableEntity,
        physics: &mut dyn PhysicsEngine,
    ) {
        while let Ok(force) = self.inbox_rx.try_recv() {
            self.apply(force);
        }

        self.active_forces.retain(|f| !f.has_ended());

        for force in self.active_forces.iter() {
            let center = entity.collision_box_center();
            let reached = force.has_reached(center, self.reach_tolerance);

            if reached && force.cancel_on_reached() {
                force.end();
                continue;
            }

            if reached {
                let collision_height = entity.collision_box().height();
                let y_delta = entity.height() - collision_height + collision_height / 2.0;
                let target = force.location();
                let snapped = Vec2::new(target.x - entity.width() / 2.0, target.y - y_delta);
                entity.set_location(snapped);
                continue;
            }

            let angle = bearing_degrees(center, force.location());
            let distance = time.delta * force.strength();
            let moved = physics.move_entity(entity, angle, distance);
            if !moved && force.cancel_on_collision() {
                force.end();
            }
        }
    }
}
