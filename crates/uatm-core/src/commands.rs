//! Commands sent from the presentation layer to the fleet.
//!
//! Commands are queued and applied at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::types::Position;

/// All possible operator actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FleetCommand {
    // --- Fleet lifecycle ---
    /// Rebuild the fleet with `drone_count` drones and fresh task points.
    InitializeFleet { drone_count: usize },
    /// Dispatch every idle drone to its index-paired task and start ticking.
    Start,
    /// Stop ticking. Drones keep their state.
    Stop,
    /// Suspend ticking while running.
    Pause,
    /// Resume ticking after a pause.
    Resume,
    /// Return every drone to the launch pad, idle and fully charged.
    Reset,

    // --- Tasking ---
    /// Assign a task to one drone. Ignored unless the drone is idle and charged.
    SetTarget {
        drone_id: u32,
        pickup: Position,
        delivery: Position,
    },
    /// Append a pickup point to the task list.
    AddPickupPoint { position: Position },
    /// Append a delivery point to the task list.
    AddDeliveryPoint { position: Position },

    // --- Pacing ---
    /// Set real-time pacing (1.0 = normal, 2.0 = double).
    SetTimeScale { scale: f64 },
}
