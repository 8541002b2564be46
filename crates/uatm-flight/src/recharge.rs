//! Recharge station allocation.

use uatm_core::enums::FlightPhase;
use uatm_core::types::Position;

/// Closest station by straight-line distance. Ties go to the earlier entry.
pub fn nearest_station(position: &Position, stations: &[Position]) -> Option<Position> {
    stations
        .iter()
        .copied()
        .fold(None, |best: Option<(Position, f64)>, station| {
            let d = position.distance_to(&station);
            match best {
                Some((_, best_d)) if best_d <= d => best,
                _ => Some((station, d)),
            }
        })
        .map(|(station, _)| station)
}

/// Phase to resume once a diverted drone is fully charged.
pub fn resume_phase(interrupted: FlightPhase, has_package: bool) -> FlightPhase {
    use FlightPhase::*;
    if has_package {
        return MovingToDelivery;
    }
    match interrupted {
        TakingOff | MovingToPickup | DescendingToPickup | PickingUp => MovingToPickup,
        _ => ReturningToBase,
    }
}
