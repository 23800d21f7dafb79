//! ECS components for entities.
//!
//! Submodules overview:
//! - [`boxcollider`] – axis-aligned rectangular collider placed relative to the entity
//! - [`entitysize`] – overall width and height of an entity
//! - [`force`] – directional pull towards a target, with its cancellation policy
//! - [`mapposition`] – world-space location (top-left corner) of an entity
//! - [`movementcontroller`] – active forces of one entity and their per-tick integration

pub mod boxcollider;
pub mod entitysize;
pub mod force;
pub mod mapposition;
pub mod movementcontroller;
