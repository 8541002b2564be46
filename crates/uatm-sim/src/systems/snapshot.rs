//! Snapshot system: reads the ECS world and builds a complete FleetSnapshot.
//!
//! Read-only; never modifies the world. Also hosts the presentation
//! mapping from flight phase to status label and body color.

use hecs::{Entity, World};

use uatm_core::components::PositionHistory;
use uatm_core::enums::{FleetStatus, FlightPhase};
use uatm_core::events::FleetEvent;
use uatm_core::state::{DroneView, FleetSnapshot, FleetStatsView};
use uatm_core::types::{Position, RestrictedZone, SimTime};
use uatm_flight::Drone;

use super::flight::station_positions;

pub const COLOR_IDLE: u32 = 0x00ff00;
pub const COLOR_CLIMBING: u32 = 0xffff00;
pub const COLOR_CRUISING: u32 = 0x0000ff;
pub const COLOR_REROUTING: u32 = 0xffa500;
pub const COLOR_DESCENDING: u32 = 0xff0000;
pub const COLOR_HOLD: u32 = 0xff00ff;

/// Everything besides the world that goes into a snapshot.
pub struct SnapshotInputs<'a> {
    pub time: SimTime,
    pub status: FleetStatus,
    pub stats: FleetStatsView,
    pub pickup_points: &'a [Position],
    pub delivery_points: &'a [Position],
    pub restricted_zone: RestrictedZone,
    pub events: Vec<FleetEvent>,
}

/// Build a complete FleetSnapshot from the current world state.
pub fn build_snapshot(world: &World, order: &[Entity], inputs: SnapshotInputs<'_>) -> FleetSnapshot {
    FleetSnapshot {
        time: inputs.time,
        status: inputs.status,
        drones: build_drones(world, order),
        stats: inputs.stats,
        pickup_points: inputs.pickup_points.to_vec(),
        delivery_points: inputs.delivery_points.to_vec(),
        recharge_stations: station_positions(world),
        restricted_zone: inputs.restricted_zone,
        events: inputs.events,
    }
}

fn build_drones(world: &World, order: &[Entity]) -> Vec<DroneView> {
    order
        .iter()
        .filter_map(|&entity| {
            let drone = world.get::<&Drone>(entity).ok()?;
            let trail = world
                .get::<&PositionHistory>(entity)
                .map(|h| h.positions.clone())
                .unwrap_or_default();
            Some(drone_view(&drone, trail))
        })
        .collect()
}

pub fn drone_view(drone: &Drone, trail: Vec<Position>) -> DroneView {
    let rerouting = drone.is_rerouting();
    DroneView {
        id: drone.id,
        position: drone.position,
        heading: drone.heading,
        phase: drone.phase,
        status_label: status_label(drone.phase),
        status_color: status_color(drone.phase, rerouting),
        battery: drone.battery,
        has_package: drone.has_package,
        collisions_avoided: drone.collisions_avoided(),
        rerouting,
        pickup_point: drone.pickup_point,
        delivery_point: drone.delivery_point,
        trail,
    }
}

/// Text shown over a drone.
pub fn status_label(phase: FlightPhase) -> String {
    match phase {
        FlightPhase::Recharging => "CHARGING".to_string(),
        other => other.as_str().to_uppercase(),
    }
}

/// Body color (0xRRGGBB) for a drone in `phase`.
pub fn status_color(phase: FlightPhase, rerouting: bool) -> u32 {
    use FlightPhase::*;
    match phase {
        Idle => COLOR_IDLE,
        Recharging | TakingOff | AscendingFromPickup | AscendingFromDelivery => COLOR_CLIMBING,
        MovingToPickup | MovingToDelivery | ReturningToBase | MovingToRecharge => {
            if rerouting {
                COLOR_REROUTING
            } else {
                COLOR_CRUISING
            }
        }
        DescendingToPickup | DescendingToDelivery | DescendingToBase => COLOR_DESCENDING,
        PickingUp | Dropping => COLOR_HOLD,
    }
}
