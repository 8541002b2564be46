//! Simulation constants and tuning parameters.
//!
//! Distances are in meters (one scene unit), speeds in meters per tick.

/// Simulation tick rate (Hz). One tick per rendered frame.
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Fleet ---

/// Default number of drones in a fleet.
pub const DEFAULT_DRONE_COUNT: usize = 5;

/// Shared launch pad for all drones (x, z).
pub const BASE_POSITION: (f64, f64) = (0.0, 0.0);

// --- Flight envelope ---

/// Horizontal speed (m/tick).
pub const DRONE_SPEED: f64 = 5.0;

/// Climb/descent rate (m/tick).
pub const VERTICAL_SPEED: f64 = 2.0;

/// Altitude held between ascent and descent.
pub const CRUISE_ALTITUDE: f64 = 50.0;

/// Resting altitude on the launch pad.
pub const LANDING_ALTITUDE: f64 = 2.0;

/// Hover altitude while collecting a package.
pub const PICKUP_HEIGHT: f64 = 2.0;

/// Hover altitude while dropping a package.
pub const DELIVERY_HEIGHT: f64 = 2.0;

/// Planar distance under which a horizontal target counts as reached.
pub const ARRIVAL_EPSILON: f64 = 0.1;

/// Duration of the pickup and drop holds (seconds).
pub const HOLD_DURATION_SECS: f64 = 2.0;

// --- Battery ---

/// Full charge.
pub const MAX_BATTERY: f64 = 100.0;

/// Battery consumed per tick while flying.
pub const BATTERY_DRAIN_PER_TICK: f64 = 0.05;

/// Battery restored per tick while recharging.
pub const CHARGE_RATE_PER_TICK: f64 = 2.0;

/// At or below this level a flying drone diverts to a recharge station.
pub const LOW_BATTERY_THRESHOLD: f64 = 20.0;

/// A drone must hold more than this to accept a new task.
pub const MIN_DISPATCH_BATTERY: f64 = 20.0;

// --- Collision avoidance ---

/// Separation below which two drones are in conflict.
pub const AVOIDANCE_RADIUS: f64 = 20.0;

/// Minimum simulated time between two collision scans of one drone (seconds).
pub const COLLISION_CHECK_INTERVAL_SECS: f64 = 1.0;

/// Lateral escape distance as a multiple of the avoidance radius.
pub const AVOIDANCE_LATERAL_FACTOR: f64 = 1.5;

/// Vertical separation applied by an avoidance maneuver.
pub const AVOIDANCE_ALTITUDE_OFFSET: f64 = 25.0;

/// Number of conflict records kept per drone.
pub const MAX_CONFLICT_LOG: usize = 32;

// --- Restricted airspace ---

/// No-fly zone center (x, z).
pub const RESTRICTED_ZONE_CENTER: (f64, f64) = (150.0, 150.0);

/// No-fly zone radius.
pub const RESTRICTED_ZONE_RADIUS: f64 = 30.0;

/// Clearance added to the radius for intrusion tests.
pub const RESTRICTED_ZONE_SAFETY_MARGIN: f64 = 10.0;

/// One detour step per this many meters of straight-line distance.
pub const DETOUR_WAYPOINT_SPACING: f64 = 20.0;

/// Minimum number of angular steps in a detour.
pub const MIN_DETOUR_STEPS: usize = 3;

// --- Recharge stations ---

/// Charging pads at the four corners of the operating area (x, z).
pub const RECHARGE_STATIONS: [(f64, f64); 4] = [
    (-100.0, -100.0),
    (-100.0, 100.0),
    (100.0, -100.0),
    (100.0, 100.0),
];

// --- Task points ---

/// Pickup points are placed on a ring with radius in this range.
pub const PICKUP_RADIUS_RANGE: (f64, f64) = (100.0, 150.0);

/// Delivery points are placed opposite their pickup, radius in this range.
pub const DELIVERY_RADIUS_RANGE: (f64, f64) = (200.0, 250.0);

/// Extra distance a delivery point keeps beyond the zone's guarded radius.
pub const DELIVERY_ZONE_CLEARANCE: f64 = 5.0;

/// Redraws allowed before a delivery point is pushed out of the zone.
pub const DELIVERY_PLACEMENT_ATTEMPTS: u32 = 16;

// --- Display ---

/// Maximum number of trail points per drone.
pub const MAX_HISTORY_DOTS: usize = 12;

/// Trail point interval in ticks (one point every N ticks).
pub const HISTORY_DOT_INTERVAL: u32 = 15;

/// Upper bound for the real-time pacing multiplier.
pub const MAX_TIME_SCALE: f64 = 4.0;

// --- Geodesy (telemetry mapping) ---

/// Latitude of the launch pad.
pub const BASE_LATITUDE: f64 = 28.6139;

/// Longitude of the launch pad.
pub const BASE_LONGITUDE: f64 = 77.209;

/// Meters per degree of latitude.
pub const METERS_PER_DEG_LAT: f64 = 111_320.0;
