//! Proximity conflict detection and avoidance planning.
//!
//! Scans are rate-limited on the simulation clock. A scan compares the
//! drone's own position against a snapshot of every other drone taken at
//! the start of the tick.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use uatm_core::constants::MAX_CONFLICT_LOG;
use uatm_core::geometry::{add, planar_perpendicular, scale, subtract};
use uatm_core::settings::DroneParams;
use uatm_core::types::Position;

/// Position of another drone as seen at the start of the tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborSnapshot {
    pub id: u32,
    pub position: Position,
}

/// Diagnostic entry for a detected conflict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictRecord {
    pub time_secs: f64,
    pub other_id: u32,
    pub distance: f64,
}

/// A neighbor found inside the avoidance radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conflict {
    pub other: NeighborSnapshot,
    pub distance: f64,
}

/// Three-waypoint escape maneuver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AvoidancePlan {
    /// Lateral offset, vertical offset, rejoin.
    pub waypoints: [Position; 3],
    /// Effective altitude change after clamping to the ground.
    pub altitude_change: f64,
}

/// Per-drone collision bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct CollisionMonitor {
    last_check_secs: f64,
    collisions_avoided: u32,
    log: VecDeque<ConflictRecord>,
}

impl CollisionMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of conflicts detected so far. Never decreases.
    pub fn collisions_avoided(&self) -> u32 {
        self.collisions_avoided
    }

    /// Most recent conflicts, oldest first.
    pub fn log(&self) -> impl Iterator<Item = &ConflictRecord> {
        self.log.iter()
    }

    pub fn should_check(&self, now_secs: f64, interval_secs: f64) -> bool {
        now_secs - self.last_check_secs >= interval_secs
    }

    /// Rate-limited scan. Returns the first conflict in neighbor order, if any.
    pub fn scan(
        &mut self,
        self_id: u32,
        position: &Position,
        neighbors: &[NeighborSnapshot],
        params: &DroneParams,
        now_secs: f64,
    ) -> Option<Conflict> {
        if !self.should_check(now_secs, params.collision_check_interval_secs) {
            return None;
        }
        self.last_check_secs = now_secs;

        let conflict = find_conflict(self_id, position, neighbors, params.avoidance_radius)?;
        self.collisions_avoided += 1;
        if self.log.len() == MAX_CONFLICT_LOG {
            self.log.pop_front();
        }
        self.log.push_back(ConflictRecord {
            time_secs: now_secs,
            other_id: conflict.other.id,
            distance: conflict.distance,
        });
        Some(conflict)
    }
}

/// First neighbor (other than `self_id`) strictly inside `radius`.
pub fn find_conflict(
    self_id: u32,
    position: &Position,
    neighbors: &[NeighborSnapshot],
    radius: f64,
) -> Option<Conflict> {
    neighbors
        .iter()
        .filter(|n| n.id != self_id)
        .map(|n| Conflict {
            other: *n,
            distance: position.distance_to(&n.position),
        })
        .find(|c| c.distance < radius)
}

/// Plan an escape from `other`.
///
/// The lower id climbs and the higher id descends, so the two drones of a
/// pair always separate vertically. When both occupy the same planar spot the
/// lateral direction falls back to ±x by the same id rule. The escape altitude
/// never goes below the ground, so an airborne descending drone always loses
/// height.
///
/// The second waypoint stays over the lateral point instead of returning to
/// the starting position before the final leg.
pub fn plan_avoidance(
    self_id: u32,
    position: &Position,
    target: &Position,
    other: &NeighborSnapshot,
    params: &DroneParams,
) -> AvoidancePlan {
    let yields_upward = self_id < other.id;

    let mut lateral_dir = planar_perpendicular(&subtract(&other.position, position));
    if lateral_dir == Position::ZERO {
        lateral_dir = Position::new(if yields_upward { 1.0 } else { -1.0 }, 0.0, 0.0);
    }
    let lateral_distance = params.avoidance_radius * params.avoidance_lateral_factor;
    let lateral = add(position, &scale(&lateral_dir, lateral_distance)).with_altitude(position.y);

    let offset = if yields_upward {
        params.avoidance_altitude_offset
    } else {
        -params.avoidance_altitude_offset
    };
    let escape_altitude = (position.y + offset).max(0.0);

    AvoidancePlan {
        waypoints: [
            lateral,
            lateral.with_altitude(escape_altitude),
            target.with_altitude(escape_altitude),
        ],
        altitude_change: escape_altitude - position.y,
    }
}
