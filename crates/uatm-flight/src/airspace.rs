//! Restricted-zone router.
//!
//! The zone is a vertical cylinder; all tests work on the ground plane.
//! Detours follow an arc of radius `radius + safety_margin` around the center.

use std::f64::consts::{PI, TAU};

use uatm_core::constants::{DETOUR_WAYPOINT_SPACING, MIN_DETOUR_STEPS};
use uatm_core::enums::RouteCheck;
use uatm_core::types::{Position, RestrictedZone};

/// True if `point` lies inside the guarded radius (planar distance).
pub fn intrudes(zone: &RestrictedZone, point: &Position) -> bool {
    point.planar_distance_to(&zone.center) < zone.guarded_radius()
}

/// True if the straight planar segment `start → end` passes inside the guarded radius.
pub fn segment_intrudes(zone: &RestrictedZone, start: &Position, end: &Position) -> bool {
    let (sx, sz) = (start.x - zone.center.x, start.z - zone.center.z);
    let (dx, dz) = (end.x - start.x, end.z - start.z);
    let len_sq = dx * dx + dz * dz;

    // Parameter of the closest point to the center, clamped onto the segment.
    let t = if len_sq > 0.0 {
        (-(sx * dx + sz * dz) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (cx, cz) = (sx + dx * t, sz + dz * t);
    (cx * cx + cz * cz).sqrt() < zone.guarded_radius()
}

/// Whether a leg from `start` to `end` must be flown as a detour.
///
/// With `RouteCheck::Endpoints` a path that cuts through the zone without
/// either endpoint inside it is flown straight.
pub fn needs_detour(zone: &RestrictedZone, start: &Position, end: &Position, mode: RouteCheck) -> bool {
    if intrudes(zone, start) || intrudes(zone, end) {
        return true;
    }
    match mode {
        RouteCheck::Endpoints => false,
        RouteCheck::Segment => segment_intrudes(zone, start, end),
    }
}

/// Arc of waypoints around the zone from the bearing of `start` to the bearing of `end`.
///
/// Takes the shorter way round. Uses `max(3, floor(distance / 20))` angular
/// steps and emits one point per step boundary, both ends included, all at
/// `altitude`. Every point lies exactly on the guarded radius.
pub fn route_around(
    zone: &RestrictedZone,
    start: &Position,
    end: &Position,
    altitude: f64,
) -> Vec<Position> {
    let center = zone.center;
    let radius = zone.guarded_radius();

    let start_angle = start.planar_angle_from(&center);
    let end_angle = end.planar_angle_from(&center);
    let sweep = normalize_angle(end_angle - start_angle);

    let steps = ((start.distance_to(end) / DETOUR_WAYPOINT_SPACING).floor() as usize)
        .max(MIN_DETOUR_STEPS);
    let step = sweep / steps as f64;

    (0..=steps)
        .map(|i| {
            let angle = start_angle + step * i as f64;
            Position::new(
                center.x + angle.cos() * radius,
                altitude,
                center.z + angle.sin() * radius,
            )
        })
        .collect()
}

/// Wrap an angle into (-PI, PI].
fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}
