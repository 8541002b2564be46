//! Flight logic for individual delivery drones.
//!
//! Implements the per-drone phase state machine, restricted-zone routing,
//! collision detection with avoidance planning, and recharge allocation.
//! No ECS dependency: everything operates on plain data, and a drone only
//! ever mutates itself.

pub mod agent;
pub mod airspace;
pub mod avoidance;
pub mod recharge;

pub use agent::{Drone, FlightContext};
pub use uatm_core as core;

#[cfg(test)]
mod tests;
