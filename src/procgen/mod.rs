//! Procedural generation of the drive: road path and obstacles.
//!
//! Generation is pure and driven by an injected random source; the simulation
//! state decides when to regenerate.

pub mod obstacles;
pub mod road_generator;
