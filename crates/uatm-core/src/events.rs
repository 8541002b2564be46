//! Events emitted by the simulation for UI feedback and logging.

use serde::{Deserialize, Serialize};

use crate::types::Position;

/// Something notable that happened to a drone during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FleetEvent {
    /// Drone accepted a task and left the pad.
    TakeOff { drone_id: u32 },
    /// Package attached at the pickup point.
    PackagePickedUp { drone_id: u32 },
    /// Package released at the delivery point.
    PackageDelivered { drone_id: u32 },
    /// Drone touched down at base and is idle again.
    Landed { drone_id: u32 },
    /// Battery crossed the low threshold; drone diverts to a station.
    LowBattery {
        drone_id: u32,
        battery: f64,
        station: Position,
    },
    /// Battery full again; drone resumes its task.
    RechargeComplete { drone_id: u32 },
    /// Another drone came within the avoidance radius.
    ConflictDetected {
        drone_id: u32,
        other_id: u32,
        distance: f64,
    },
    /// Avoidance waypoints were planned against `other_id`.
    AvoidanceManeuver {
        drone_id: u32,
        other_id: u32,
        altitude_change: f64,
    },
    /// Leg rerouted around the restricted zone.
    RestrictedZoneDetour { drone_id: u32, waypoints: usize },
}

impl FleetEvent {
    /// Drone the event is about.
    pub fn drone_id(&self) -> u32 {
        match self {
            FleetEvent::TakeOff { drone_id }
            | FleetEvent::PackagePickedUp { drone_id }
            | FleetEvent::PackageDelivered { drone_id }
            | FleetEvent::Landed { drone_id }
            | FleetEvent::LowBattery { drone_id, .. }
            | FleetEvent::RechargeComplete { drone_id }
            | FleetEvent::ConflictDetected { drone_id, .. }
            | FleetEvent::AvoidanceManeuver { drone_id, .. }
            | FleetEvent::RestrictedZoneDetour { drone_id, .. } => *drone_id,
        }
    }
}
