//! Runtime configuration for a fleet run.
//!
//! Every field defaults to the value in `constants`, so a partial JSON
//! document only overrides what it names.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::RouteCheck;
use crate::types::{Position, RestrictedZone};

/// Per-drone flight and energy tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DroneParams {
    pub speed: f64,
    pub vertical_speed: f64,
    pub cruise_altitude: f64,
    pub landing_altitude: f64,
    pub pickup_height: f64,
    pub delivery_height: f64,
    pub arrival_epsilon: f64,
    pub hold_duration_secs: f64,
    pub max_battery: f64,
    pub battery_drain_per_tick: f64,
    pub charge_rate_per_tick: f64,
    pub low_battery_threshold: f64,
    pub min_dispatch_battery: f64,
    pub avoidance_radius: f64,
    pub collision_check_interval_secs: f64,
    pub avoidance_lateral_factor: f64,
    pub avoidance_altitude_offset: f64,
    pub route_check: RouteCheck,
}

impl Default for DroneParams {
    fn default() -> Self {
        Self {
            speed: DRONE_SPEED,
            vertical_speed: VERTICAL_SPEED,
            cruise_altitude: CRUISE_ALTITUDE,
            landing_altitude: LANDING_ALTITUDE,
            pickup_height: PICKUP_HEIGHT,
            delivery_height: DELIVERY_HEIGHT,
            arrival_epsilon: ARRIVAL_EPSILON,
            hold_duration_secs: HOLD_DURATION_SECS,
            max_battery: MAX_BATTERY,
            battery_drain_per_tick: BATTERY_DRAIN_PER_TICK,
            charge_rate_per_tick: CHARGE_RATE_PER_TICK,
            low_battery_threshold: LOW_BATTERY_THRESHOLD,
            min_dispatch_battery: MIN_DISPATCH_BATTERY,
            avoidance_radius: AVOIDANCE_RADIUS,
            collision_check_interval_secs: COLLISION_CHECK_INTERVAL_SECS,
            avoidance_lateral_factor: AVOIDANCE_LATERAL_FACTOR,
            avoidance_altitude_offset: AVOIDANCE_ALTITUDE_OFFSET,
            route_check: RouteCheck::default(),
        }
    }
}

/// Fleet-wide configuration: size, airspace layout, and task placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetSettings {
    pub drone_count: usize,
    /// Shared launch pad on the ground plane (y is ignored).
    pub base_position: Position,
    pub drone: DroneParams,
    pub restricted_zone: RestrictedZone,
    /// Charging pad locations. May be empty, in which case low-battery
    /// drones keep flying their task.
    pub recharge_stations: Vec<Position>,
    pub pickup_radius_range: (f64, f64),
    pub delivery_radius_range: (f64, f64),
    pub delivery_zone_clearance: f64,
}

impl Default for FleetSettings {
    fn default() -> Self {
        Self {
            drone_count: DEFAULT_DRONE_COUNT,
            base_position: Position::new(BASE_POSITION.0, 0.0, BASE_POSITION.1),
            drone: DroneParams::default(),
            restricted_zone: RestrictedZone::default(),
            recharge_stations: RECHARGE_STATIONS
                .iter()
                .map(|&(x, z)| Position::new(x, 0.0, z))
                .collect(),
            pickup_radius_range: PICKUP_RADIUS_RANGE,
            delivery_radius_range: DELIVERY_RADIUS_RANGE,
            delivery_zone_clearance: DELIVERY_ZONE_CLEARANCE,
        }
    }
}

impl FleetSettings {
    /// Check the settings for values the simulation cannot run with.
    /// Returns one message per problem; empty means valid.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let d = &self.drone;

        let positive = [
            ("drone.speed", d.speed),
            ("drone.vertical_speed", d.vertical_speed),
            ("drone.cruise_altitude", d.cruise_altitude),
            ("drone.arrival_epsilon", d.arrival_epsilon),
            ("drone.max_battery", d.max_battery),
            ("drone.charge_rate_per_tick", d.charge_rate_per_tick),
            ("drone.avoidance_radius", d.avoidance_radius),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                problems.push(format!("{name} must be positive, got {value}"));
            }
        }

        let non_negative = [
            ("drone.landing_altitude", d.landing_altitude),
            ("drone.pickup_height", d.pickup_height),
            ("drone.delivery_height", d.delivery_height),
            ("drone.hold_duration_secs", d.hold_duration_secs),
            ("drone.battery_drain_per_tick", d.battery_drain_per_tick),
            ("drone.collision_check_interval_secs", d.collision_check_interval_secs),
            ("restricted_zone.radius", self.restricted_zone.radius),
            ("restricted_zone.safety_margin", self.restricted_zone.safety_margin),
            ("delivery_zone_clearance", self.delivery_zone_clearance),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                problems.push(format!("{name} must be non-negative, got {value}"));
            }
        }

        if self.drone_count == 0 {
            problems.push("drone_count must be at least 1".to_string());
        }
        if d.landing_altitude > d.cruise_altitude {
            problems.push(format!(
                "drone.landing_altitude ({}) is above cruise_altitude ({})",
                d.landing_altitude, d.cruise_altitude
            ));
        }
        if !(0.0..=d.max_battery).contains(&d.low_battery_threshold) {
            problems.push(format!(
                "drone.low_battery_threshold must lie in [0, {}], got {}",
                d.max_battery, d.low_battery_threshold
            ));
        }
        for (name, (lo, hi)) in [
            ("pickup_radius_range", self.pickup_radius_range),
            ("delivery_radius_range", self.delivery_radius_range),
        ] {
            if !(lo.is_finite() && hi.is_finite() && 0.0 <= lo && lo < hi) {
                problems.push(format!("{name} must satisfy 0 <= min < max, got ({lo}, {hi})"));
            }
        }

        problems
    }
}
