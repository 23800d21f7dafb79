//! Directional pull applied to a movable entity over successive ticks.
//!
//! A [`Force`] drags its entity towards a target location at a fixed
//! strength (distance units per second). It is handed to a
//! [`MovementController`](super::movementcontroller::MovementController),
//! which integrates it once per tick until it ends.
//!
//! # Lifecycle
//!
//! A force is either alive or ended. It ends when:
//! - `cancel_on_reached` is set and the entity's collision box center gets
//!   within the controller's reach tolerance of the target,
//! - `cancel_on_collision` is set and the physics engine refuses a move,
//! - any code holding a handle calls [`Force::end`].
//!
//! Ending is terminal. The controller drops ended forces on its next tick.
//!
//! # Identity
//!
//! Cloning a `Force` yields another handle to the *same* force: all clones
//! share the ended flag and compare equal. Two forces built separately are
//! distinct even if every attribute matches.
//!
//! ```ignore
//! let push = Force::new(Vec2::new(100.0, 40.0), 60.0).with_cancel_on_reached(true);
//! controller.apply(push.clone());
//! // later, from anywhere
//! push.end();
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use glam::Vec2;

#[derive(Clone, Debug)]
pub struct Force {
    location: Vec2,
    strength: f32,
    cancel_on_reached: bool,
    cancel_on_collision: bool,
    ended: Arc<AtomicBool>,
}

impl Force {
    /// Create a live force pulling towards `location`.
    ///
    /// Negative or NaN strengths are clamped to zero.
    pub fn new(location: Vec2, strength: f32) -> Self {
        Self {
            location,
            strength: if strength > 0.0 { strength } else { 0.0 },
            cancel_on_reached: false,
            cancel_on_collision: false,
            ended: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_cancel_on_reached(mut self, cancel: bool) -> Self {
        self.cancel_on_reached = cancel;
        self
    }

    pub fn with_cancel_on_collision(mut self, cancel: bool) -> Self {
        self.cancel_on_collision = cancel;
        self
    }

    /// Target location the force pulls towards.
    pub fn location(&self) -> Vec2 {
        self.location
    }

    /// Distance units per second.
    pub fn strength(&self) -> f32 {
        self.strength
    }

    pub fn cancel_on_reached(&self) -> bool {
        self.cancel_on_reached
    }

    pub fn cancel_on_collision(&self) -> bool {
        self.cancel_on_collision
    }

    /// Whether `point` is strictly closer than `tolerance` to the target.
    pub fn has_reached(&self, point: Vec2, tolerance: f32) -> bool {
        point.distance(self.location) < tolerance
    }

    /// End the force. Idempotent; visible to every clone.
    pub fn end(&self) {
        self.ended.store(true, Ordering::Release);
    }

    pub fn has_ended(&self) -> bool {
        self.ended.load(Ordering::Acquire)
    }
}

impl PartialEq for Force {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.ended, &other.ended)
    }
}

impl Eq for Force {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_force_is_alive_with_no_cancel_policy() {
        let force = Force::new(Vec2::new(10.0, 20.0), 30.0);
        assert!(!force.has_ended());
        assert!(!force.cancel_on_reached());
        assert!(!force.cancel_on_collision());
        assert_eq!(force.location(), Vec2::new(10.0, 20.0));
        assert_eq!(force.strength(), 30.0);
    }

    #[test]
    fn strength_is_never_negative() {
        assert_eq!(Force::new(Vec2::ZERO, -5.0).strength(), 0.0);
        assert_eq!(Force::new(Vec2::ZERO, f32::NAN).strength(), 0.0);
    }

    #[test]
    fn clones_share_identity_and_ended_flag() {
        let force = Force::new(Vec2::ZERO, 1.0);
        let handle = force.clone();
        assert_eq!(force, handle);
        handle.end();
        assert!(force.has_ended());
    }

    #[test]
    fn equal_attributes_are_not_the_same_force() {
        let a = Force::new(Vec2::ONE, 1.0);
        let b = Force::new(Vec2::ONE, 1.0);
        assert_ne!(a, b);
        a.end();
        assert!(!b.has_ended());
    }

    #[test]
    fn end_is_idempotent() {
        let force = Force::new(Vec2::ZERO, 1.0);
        force.end();
        force.end();
        assert!(force.has_ended());
    }

    #[test]
    fn has_reached_is_strict() {
        let force = Force::new(Vec2::new(10.0, 0.0), 1.0);
        assert!(force.has_reached(Vec2::new(6.0, 0.0), 5.0));
        assert!(!force.has_reached(Vec2::new(5.0, 0.0), 5.0));
    }
}
