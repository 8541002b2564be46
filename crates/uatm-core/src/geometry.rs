//! Pure vector helpers over `Position`.
//!
//! None of these can fail: degenerate inputs (zero-length vectors, zero
//! distances) produce zero vectors instead of NaN.

use glam::DVec3;

use crate::types::Position;

/// Euclidean distance between two points.
pub fn distance(a: &Position, b: &Position) -> f64 {
    a.distance_to(b)
}

/// Component-wise `a - b`.
pub fn subtract(a: &Position, b: &Position) -> Position {
    (a.as_dvec3() - b.as_dvec3()).into()
}

/// Component-wise `a + b`.
pub fn add(a: &Position, b: &Position) -> Position {
    (a.as_dvec3() + b.as_dvec3()).into()
}

/// Unit vector in the direction of `v`, or the zero vector when `v` has no length.
pub fn normalize(v: &Position) -> Position {
    v.as_dvec3().normalize_or_zero().into()
}

/// `v * factor`.
pub fn scale(v: &Position, factor: f64) -> Position {
    (v.as_dvec3() * factor).into()
}

/// Linear interpolation, `t = 0` gives `a`, `t = 1` gives `b`. `t` is not clamped.
pub fn lerp(a: &Position, b: &Position, t: f64) -> Position {
    a.as_dvec3().lerp(b.as_dvec3(), t).into()
}

/// Horizontal perpendicular of `v` (rotated 90° about the vertical axis),
/// normalized. Zero when `v` has no planar component.
pub fn planar_perpendicular(v: &Position) -> Position {
    DVec3::new(-v.z, 0.0, v.x).normalize_or_zero().into()
}

/// Move from `from` toward `to` by at most `step` in 3D.
///
/// Lands exactly on `to` when the remaining distance fits in one step, so
/// repeated calls never overshoot and settle on the exact target.
pub fn move_towards(from: &Position, to: &Position, step: f64) -> Position {
    let delta = to.as_dvec3() - from.as_dvec3();
    let dist = delta.length();
    if dist <= step || dist == 0.0 {
        return *to;
    }
    (from.as_dvec3() + delta / dist * step).into()
}

/// Move on the ground plane from `from` toward `to` by at most `step`,
/// keeping `from`'s altitude. Snaps to the target's (x, z) when in reach.
pub fn move_towards_planar(from: &Position, to: &Position, step: f64) -> Position {
    let target = to.with_altitude(from.y);
    move_towards(from, &target, step)
}
