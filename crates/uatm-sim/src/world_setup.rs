//! Entity spawn factories and task point generation.

use std::f64::consts::{PI, TAU};

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use uatm_core::components::{PositionHistory, RechargeStation};
use uatm_core::constants::DELIVERY_PLACEMENT_ATTEMPTS;
use uatm_core::settings::FleetSettings;
use uatm_core::types::Position;
use uatm_flight::Drone;

/// Spawn `count` drones parked on the shared base, with ids `0..count`.
/// Returns their entities in id order.
pub fn spawn_fleet(world: &mut World, settings: &FleetSettings, count: usize) -> Vec<Entity> {
    (0..count)
        .map(|i| {
            let drone = Drone::new(i as u32, settings.base_position, settings.drone);
            world.spawn((drone, PositionHistory::default()))
        })
        .collect()
}

/// Spawn one entity per configured charging pad.
pub fn spawn_recharge_stations(world: &mut World, settings: &FleetSettings) {
    for (index, position) in settings.recharge_stations.iter().enumerate() {
        world.spawn((RechargeStation { index }, *position));
    }
}

/// Generate one pickup and one delivery point per drone.
///
/// Pickup `i` sits at angle `2πi/N` around the base; its delivery point sits
/// on the opposite side, further out.
pub fn generate_task_points(
    rng: &mut ChaCha8Rng,
    settings: &FleetSettings,
    count: usize,
) -> (Vec<Position>, Vec<Position>) {
    let mut pickups = Vec::with_capacity(count);
    let mut deliveries = Vec::with_capacity(count);

    for i in 0..count {
        let angle = TAU * i as f64 / count as f64;
        let (lo, hi) = settings.pickup_radius_range;
        let radius = rng.gen_range(lo..hi);
        pickups.push(polar(settings.base_position, angle, radius));
        deliveries.push(place_delivery(rng, settings, angle + PI));
    }

    (pickups, deliveries)
}

/// Draw a delivery point at `angle`, keeping clear of the restricted zone.
fn place_delivery(rng: &mut ChaCha8Rng, settings: &FleetSettings, angle: f64) -> Position {
    let zone = &settings.restricted_zone;
    let min_clearance = zone.guarded_radius() + settings.delivery_zone_clearance;
    let (lo, hi) = settings.delivery_radius_range;

    let mut candidate = Position::ZERO;
    for _ in 0..DELIVERY_PLACEMENT_ATTEMPTS {
        candidate = polar(settings.base_position, angle, rng.gen_range(lo..hi));
        if candidate.planar_distance_to(&zone.center) >= min_clearance {
            return candidate;
        }
    }

    // Still too close: push it straight out from the zone center.
    let bearing = if candidate.planar_distance_to(&zone.center) > 0.0 {
        candidate.planar_angle_from(&zone.center)
    } else {
        angle
    };
    polar(zone.center, bearing, min_clearance)
}

fn polar(origin: Position, angle: f64, radius: f64) -> Position {
    Position::new(
        origin.x + angle.cos() * radius,
        0.0,
        origin.z + angle.sin() * radius,
    )
}
