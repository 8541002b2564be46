//! Fleet state snapshot: the complete visible state handed to the renderer each tick.

use serde::{Deserialize, Serialize};

use crate::enums::{FleetStatus, FlightPhase};
use crate::events::FleetEvent;
use crate::types::{Position, RestrictedZone, SimTime};

/// Complete fleet state published after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FleetSnapshot {
    pub time: SimTime,
    pub status: FleetStatus,
    pub drones: Vec<DroneView>,
    pub stats: FleetStatsView,
    pub pickup_points: Vec<Position>,
    pub delivery_points: Vec<Position>,
    pub recharge_stations: Vec<Position>,
    pub restricted_zone: RestrictedZone,
    /// Events raised during this tick.
    pub events: Vec<FleetEvent>,
}

/// One drone as seen by the renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DroneView {
    pub id: u32,
    pub position: Position,
    /// Yaw in radians, 0 faces +z.
    pub heading: f64,
    pub phase: FlightPhase,
    /// Overlay text, e.g. `"MOVINGTOPICKUP"` or `"CHARGING"`.
    pub status_label: String,
    /// Body color as 0xRRGGBB.
    pub status_color: u32,
    /// Charge level, 0-100.
    pub battery: f64,
    pub has_package: bool,
    pub collisions_avoided: u32,
    /// Following detour or avoidance waypoints.
    pub rerouting: bool,
    pub pickup_point: Option<Position>,
    pub delivery_point: Option<Position>,
    /// Trail positions (newest first).
    pub trail: Vec<Position>,
}

/// Fleet aggregates for the dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FleetStatsView {
    /// Drones not idle.
    pub active_count: u32,
    pub total_count: u32,
    /// Sum of every drone's avoided conflicts.
    pub collisions_avoided: u32,
    pub deliveries_completed: u32,
    pub charging_count: u32,
    /// Mean battery level across the fleet, 0 when empty.
    pub average_battery: f64,
}

impl FleetSnapshot {
    /// Find a drone view by id.
    pub fn drone(&self, id: u32) -> Option<&DroneView> {
        self.drones.iter().find(|d| d.id == id)
    }
}
