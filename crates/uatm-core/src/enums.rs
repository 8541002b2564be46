//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Flight phase of a single drone.
///
/// The delivery pipeline runs top to bottom and loops back to `Idle`.
/// `MovingToRecharge` and `Recharging` are injected by the low-battery sub-flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FlightPhase {
    /// Parked on the launch pad, waiting for a task.
    #[default]
    Idle,
    TakingOff,
    MovingToPickup,
    DescendingToPickup,
    /// Timed hold while the package is attached.
    PickingUp,
    AscendingFromPickup,
    MovingToDelivery,
    DescendingToDelivery,
    /// Timed hold while the package is released.
    Dropping,
    AscendingFromDelivery,
    ReturningToBase,
    DescendingToBase,
    MovingToRecharge,
    Recharging,
}

impl FlightPhase {
    /// Every phase, in pipeline order.
    pub const ALL: [FlightPhase; 14] = [
        FlightPhase::Idle,
        FlightPhase::TakingOff,
        FlightPhase::MovingToPickup,
        FlightPhase::DescendingToPickup,
        FlightPhase::PickingUp,
        FlightPhase::AscendingFromPickup,
        FlightPhase::MovingToDelivery,
        FlightPhase::DescendingToDelivery,
        FlightPhase::Dropping,
        FlightPhase::AscendingFromDelivery,
        FlightPhase::ReturningToBase,
        FlightPhase::DescendingToBase,
        FlightPhase::MovingToRecharge,
        FlightPhase::Recharging,
    ];

    /// Phase name as shown to the presentation layer (`"takingOff"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            FlightPhase::Idle => "idle",
            FlightPhase::TakingOff => "takingOff",
            FlightPhase::MovingToPickup => "movingToPickup",
            FlightPhase::DescendingToPickup => "descendingToPickup",
            FlightPhase::PickingUp => "pickingUp",
            FlightPhase::AscendingFromPickup => "ascendingFromPickup",
            FlightPhase::MovingToDelivery => "movingToDelivery",
            FlightPhase::DescendingToDelivery => "descendingToDelivery",
            FlightPhase::Dropping => "dropping",
            FlightPhase::AscendingFromDelivery => "ascendingFromDelivery",
            FlightPhase::ReturningToBase => "returningToBase",
            FlightPhase::DescendingToBase => "descendingToBase",
            FlightPhase::MovingToRecharge => "movingToRecharge",
            FlightPhase::Recharging => "recharging",
        }
    }

    /// Climb phases.
    pub fn is_ascending(&self) -> bool {
        matches!(
            self,
            FlightPhase::TakingOff
                | FlightPhase::AscendingFromPickup
                | FlightPhase::AscendingFromDelivery
        )
    }

    /// Descent phases.
    pub fn is_descending(&self) -> bool {
        matches!(
            self,
            FlightPhase::DescendingToPickup
                | FlightPhase::DescendingToDelivery
                | FlightPhase::DescendingToBase
        )
    }

    /// Phases that move on the ground plane at a held altitude.
    pub fn is_horizontal(&self) -> bool {
        matches!(
            self,
            FlightPhase::MovingToPickup
                | FlightPhase::MovingToDelivery
                | FlightPhase::ReturningToBase
                | FlightPhase::MovingToRecharge
        )
    }

    /// Timed pickup/drop holds.
    pub fn is_hold(&self) -> bool {
        matches!(self, FlightPhase::PickingUp | FlightPhase::Dropping)
    }

    /// Whether the drone is out on a task (anything but parked).
    pub fn is_active(&self) -> bool {
        *self != FlightPhase::Idle
    }
}

impl std::fmt::Display for FlightPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fleet-level run state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FleetStatus {
    /// Fleet initialized (or stopped), not ticking.
    #[default]
    Idle,
    /// Agents receive one update per tick.
    Running,
    /// Ticking suspended, agents frozen mid-flight.
    Paused,
}

impl FleetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FleetStatus::Idle => "idle",
            FleetStatus::Running => "running",
            FleetStatus::Paused => "paused",
        }
    }
}

/// How a horizontal leg is tested against the restricted zone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RouteCheck {
    /// Only the leg's start and end points are tested.
    #[default]
    Endpoints,
    /// The straight planar segment between them is tested as well.
    Segment,
}
