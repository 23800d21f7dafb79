//! Time update system.
//!
//! Updates the shared [`WorldTime`](crate::resources::worldtime::WorldTime)
//! resource once per frame, applying `time_scale` to the provided delta, and
//! advances the [`TickClock`](crate::resources::tickclock::TickClock) by the
//! same scaled delta in milliseconds.
//!
//! The clock is advanced by increments rather than derived from the `f32`
//! `elapsed`, which stops growing once a frame delta falls below its
//! precision. Sub-millisecond remainders are carried to the next frame.
use bevy_ecs::prelude::*;

use crate::resources::tickclock::TickClock;
use crate::resources::worldtime::WorldTime;

/// Update elapsed and delta seconds on the `WorldTime` resource.
///
/// `dt` is expected to be the unscaled frame delta in seconds. The system
/// applies the current `time_scale` and writes both `elapsed` and `delta`.
pub fn update_world_time(world: &mut World, dt: f32) {
    let whole_ms = {
        let mut wt = world.resource_mut::<WorldTime>();
        let scaled_dt = dt * wt.time_scale;
        wt.elapsed += scaled_dt;
        wt.delta = scaled_dt;
        wt.frame_count += 1;

        let ms = wt.tick_carry + f64::from(scaled_dt.max(0.0)) * 1000.0;
        let whole = ms.floor();
        wt.tick_carry = ms - whole;
        whole as u64
    };

    if let Some(clock) = world.get_resource::<TickClock>() {
        clock.advance(whole_ms);
    }
}
