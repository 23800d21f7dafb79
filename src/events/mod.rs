//! Message types exchanged across systems.
//!
//! Submodules:
//! - [`sound`] – sound requests forwarded to the background sound worker
pub mod sound;
