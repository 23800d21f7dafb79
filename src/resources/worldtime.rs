use bevy_ecs::prelude::Resource;

/// Simulation time of the current frame.
///
/// `delta` and `elapsed` are in seconds and already scaled by `time_scale`.
/// See [`TickClock`](super::tickclock::TickClock) for the millisecond tick
/// counter shared with other threads.
#[derive(Resource, Clone, Copy, Debug)]
pub struct WorldTime {
    pub elapsed: f32,
    pub delta: f32,
    pub time_scale: f32,
    pub frame_count: u64,
    /// Fraction of a millisecond not yet handed to the tick clock.
    pub tick_carry: f64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            frame_count: 0,
            tick_carry: 0.0,
        }
    }
}

impl WorldTime {
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }
}
