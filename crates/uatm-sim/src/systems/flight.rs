//! Flight system: advances every drone by one tick.
//!
//! Positions are snapshotted before any drone moves, so every collision
//! scan in a tick sees the same picture regardless of update order.

use hecs::{Entity, World};

use uatm_core::components::{PositionHistory, RechargeStation};
use uatm_core::constants::{HISTORY_DOT_INTERVAL, MAX_HISTORY_DOTS};
use uatm_core::enums::FlightPhase;
use uatm_core::events::FleetEvent;
use uatm_core::types::{Position, RestrictedZone};
use uatm_flight::avoidance::NeighborSnapshot;
use uatm_flight::{Drone, FlightContext};

/// Update all drones in `order` (ascending id).
pub fn run(
    world: &mut World,
    order: &[Entity],
    zone: &RestrictedZone,
    now_secs: f64,
    events: &mut Vec<FleetEvent>,
) {
    let neighbors = neighbor_snapshot(world, order);
    let stations = station_positions(world);
    let ctx = FlightContext {
        now_secs,
        neighbors: &neighbors,
        stations: &stations,
        zone,
    };

    for &entity in order {
        if let Ok(mut drone) = world.get::<&mut Drone>(entity) {
            drone.update(&ctx, events);
        }
    }
}

/// Start-of-tick `(id, position)` of every drone, idle ones included.
pub fn neighbor_snapshot(world: &World, order: &[Entity]) -> Vec<NeighborSnapshot> {
    order
        .iter()
        .filter_map(|&entity| {
            let drone = world.get::<&Drone>(entity).ok()?;
            Some(NeighborSnapshot {
                id: drone.id,
                position: drone.position,
            })
        })
        .collect()
}

/// Charging pad locations in configuration order.
pub fn station_positions(world: &World) -> Vec<Position> {
    let mut stations: Vec<(usize, Position)> = world
        .query::<(&RechargeStation, &Position)>()
        .iter()
        .map(|(_, (station, pos))| (station.index, *pos))
        .collect();
    stations.sort_by_key(|(index, _)| *index);
    stations.into_iter().map(|(_, pos)| pos).collect()
}

/// Record trail dots for airborne drones every HISTORY_DOT_INTERVAL ticks.
pub fn update_history(world: &mut World, current_tick: u64) {
    if current_tick == 0 || current_tick % HISTORY_DOT_INTERVAL as u64 != 0 {
        return;
    }

    for (_entity, (drone, history)) in world.query_mut::<(&Drone, &mut PositionHistory)>() {
        if drone.phase == FlightPhase::Idle {
            continue;
        }
        history.positions.insert(0, drone.position);
        history.positions.truncate(MAX_HISTORY_DOTS);
    }
}

/// Drop every recorded trail.
pub fn clear_history(world: &mut World) {
    for (_entity, history) in world.query_mut::<&mut PositionHistory>() {
        history.positions.clear();
    }
}
