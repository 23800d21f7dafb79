//! forceplay library.
//!
//! Force-driven entity movement and a debounced background sound dispatcher
//! for a `bevy_ecs` game runtime. This module exposes the components,
//! resources, systems, and events for use in integration tests and as a
//! reusable library.

pub mod components;
pub mod events;
pub mod game;
pub mod geometry;
pub mod resources;
pub mod systems;
