//! Fleet simulation engine for UATM.
//!
//! Owns the hecs ECS world, advances every drone once per tick,
//! and produces `FleetSnapshot`s for whatever renders or records them.

pub mod engine;
pub mod stats;
pub mod systems;
pub mod telemetry;
pub mod world_setup;

pub use engine::{FleetEngine, SimConfig};
pub use uatm_core as core;
