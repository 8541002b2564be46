//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are free functions over `&mut World` (or `&World` for read-only).
//! They own no state; everything lives in components.

pub mod flight;
pub mod snapshot;
