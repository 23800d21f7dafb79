//! Monotonic millisecond tick counter shared across threads.
//!
//! The game loop advances the clock once per frame (see
//! [`update_world_time`](crate::systems::time::update_world_time)); anything
//! that needs to measure game time off the main thread, such as the sound
//! dispatch worker, holds a clone. All clones observe the same counter.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use bevy_ecs::prelude::Resource;

#[derive(Resource, Clone, Debug, Default)]
pub struct TickClock {
    ticks: Arc<AtomicU64>,
}

impl TickClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock already at `ticks`.
    pub fn starting_at(ticks: u64) -> Self {
        Self {
            ticks: Arc::new(AtomicU64::new(ticks)),
        }
    }

    /// Current tick.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Acquire)
    }

    /// Ticks elapsed since `past`. Zero if `past` lies in the future.
    pub fn since(&self, past: u64) -> u64 {
        self.ticks().saturating_sub(past)
    }

    /// Move the clock forward to `ticks`. Never moves it backwards.
    pub fn advance_to(&self, ticks: u64) {
        self.ticks.fetch_max(ticks, Ordering::AcqRel);
    }

    /// Move the clock forward by `delta` ticks.
    pub fn advance(&self, delta: u64) {
        self.ticks.fetch_add(delta, Ordering::AcqRel);
    }
}
