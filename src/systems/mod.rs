//! Engine systems.
//!
//! Submodules overview
//! - [`forces`] – tick movement controllers against the physics engine
//! - [`sound`] – forward sound requests to the sound controller
//! - [`time`] – update simulation time, delta and the shared tick clock

pub mod forces;
pub mod sound;
pub mod time;
