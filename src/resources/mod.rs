//! ECS resources made available to systems.
//!
//! Overview
//! - `gameconfig` – INI-backed simulation settings
//! - `physics` – physics engine seam and the default obstacle physics
//! - `soundcontroller` – rate-limited facade over the sound dispatch queue
//! - `sounddispatch` – background worker serializing work into the sound backend
//! - `soundengine` – playback vocabulary and a logging backend
//! - `tickclock` – millisecond tick counter shared across threads
//! - `worldtime` – simulation time and delta
pub mod gameconfig;
pub mod physics;
pub mod soundcontroller;
pub mod sounddispatch;
pub mod soundengine;
pub mod tickclock;
pub mod worldtime;
