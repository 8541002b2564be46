//! Fundamental geometric and simulation types.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// 3D position in simulation space (meters, Cartesian).
/// x = East, y = Up (altitude), z = North. The ground plane is (x, z).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

/// A circular no-fly area on the ground plane, unbounded vertically.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RestrictedZone {
    /// Zone center. Only x and z are meaningful.
    pub center: Position,
    /// Zone radius in meters.
    pub radius: f64,
    /// Extra clearance added to the radius when testing for intrusion.
    pub safety_margin: f64,
}

impl Position {
    pub const ZERO: Position = Position::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Same planar location with a different altitude.
    pub fn with_altitude(&self, altitude: f64) -> Self {
        Self::new(self.x, altitude, self.z)
    }

    /// 3D distance to another position.
    pub fn distance_to(&self, other: &Position) -> f64 {
        self.as_dvec3().distance(other.as_dvec3())
    }

    /// Horizontal distance (ignoring altitude).
    pub fn planar_distance_to(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dz = other.z - self.z;
        (dx * dx + dz * dz).sqrt()
    }

    /// Yaw from this position toward another, radians about the vertical axis.
    /// 0 faces +z (North), PI/2 faces +x (East).
    pub fn heading_to(&self, other: &Position) -> f64 {
        (other.x - self.x).atan2(other.z - self.z)
    }

    /// Bearing of this position as seen from `center` on the ground plane,
    /// measured counter-clockwise from +x (the convention of `atan2(z, x)`).
    pub fn planar_angle_from(&self, center: &Position) -> f64 {
        (self.z - center.z).atan2(self.x - center.x)
    }

    pub fn as_dvec3(&self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<DVec3> for Position {
    fn from(v: DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Position> for DVec3 {
    fn from(p: Position) -> Self {
        p.as_dvec3()
    }
}

impl SimTime {
    /// Seconds per tick at the default tick rate.
    pub fn dt(&self) -> f64 {
        crate::constants::DT
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs = self.tick as f64 * self.dt();
    }
}

impl RestrictedZone {
    /// Radius used for intrusion tests: zone radius plus safety margin.
    pub fn guarded_radius(&self) -> f64 {
        self.radius + self.safety_margin
    }
}

impl Default for RestrictedZone {
    fn default() -> Self {
        use crate::constants::*;
        Self {
            center: Position::new(RESTRICTED_ZONE_CENTER.0, 0.0, RESTRICTED_ZONE_CENTER.1),
            radius: RESTRICTED_ZONE_RADIUS,
            safety_margin: RESTRICTED_ZONE_SAFETY_MARGIN,
        }
    }
}
