//! Telemetry wire messages for remote dashboards.
//!
//! Local coordinates are meters with x east and z north of the base; on the
//! wire they become longitude/latitude around the base coordinate using an
//! equirectangular approximation.

use serde::{Deserialize, Serialize};

use uatm_core::constants::{BASE_LATITUDE, BASE_LONGITUDE, METERS_PER_DEG_LAT, TICK_RATE};
use uatm_core::enums::FlightPhase;
use uatm_core::settings::DroneParams;
use uatm_core::state::FleetSnapshot;
use uatm_core::types::Position;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum TelemetryMessage {
    DronePositions(Vec<DronePositionRecord>),
    FleetStatus(FleetStatusRecord),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DronePositionRecord {
    pub drone_id: u32,
    pub location: GeoLocation,
    pub status: String,
    pub battery_level: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub lon: f64,
    pub lat: f64,
    pub altitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetStatusRecord {
    pub status: String,
    pub active_drones: u32,
    pub total_drones: u32,
    /// Mean battery percentage.
    pub battery_level: f64,
    /// Battery percent drained per second across the fleet.
    pub energy_consumption: f64,
}

fn meters_per_deg_lon() -> f64 {
    METERS_PER_DEG_LAT * BASE_LATITUDE.to_radians().cos()
}

/// Local position to geographic coordinates. Altitude passes through.
pub fn to_geo(position: &Position) -> GeoLocation {
    GeoLocation {
        lon: BASE_LONGITUDE + position.x / meters_per_deg_lon(),
        lat: BASE_LATITUDE + position.z / METERS_PER_DEG_LAT,
        altitude: position.y,
    }
}

/// Geographic coordinates back to a local position.
pub fn from_geo(location: &GeoLocation) -> Position {
    Position::new(
        (location.lon - BASE_LONGITUDE) * meters_per_deg_lon(),
        location.altitude,
        (location.lat - BASE_LATITUDE) * METERS_PER_DEG_LAT,
    )
}

pub fn drone_positions(snapshot: &FleetSnapshot) -> TelemetryMessage {
    TelemetryMessage::DronePositions(
        snapshot
            .drones
            .iter()
            .map(|d| DronePositionRecord {
                drone_id: d.id,
                location: to_geo(&d.position),
                status: d.phase.as_str().to_string(),
                battery_level: d.battery,
            })
            .collect(),
    )
}

pub fn fleet_status(snapshot: &FleetSnapshot, params: &DroneParams) -> TelemetryMessage {
    let draining = snapshot
        .drones
        .iter()
        .filter(|d| !matches!(d.phase, FlightPhase::Idle | FlightPhase::Recharging))
        .count();
    TelemetryMessage::FleetStatus(FleetStatusRecord {
        status: snapshot.status.as_str().to_string(),
        active_drones: snapshot.stats.active_count,
        total_drones: snapshot.stats.total_count,
        battery_level: snapshot.stats.average_battery,
        energy_consumption: draining as f64 * params.battery_drain_per_tick * TICK_RATE as f64,
    })
}

/// Drone ids and local positions carried by a `drone_positions` message.
/// Other message kinds yield nothing.
pub fn positions_from_message(message: &TelemetryMessage) -> Vec<(u32, Position)> {
    match message {
        TelemetryMessage::DronePositions(records) => records
            .iter()
            .map(|r| (r.drone_id, from_geo(&r.location)))
            .collect(),
        TelemetryMessage::FleetStatus(_) => Vec::new(),
    }
}
