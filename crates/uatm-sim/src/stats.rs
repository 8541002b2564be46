//! Fleet-level statistics.

use hecs::{Entity, World};

use uatm_core::enums::FlightPhase;
use uatm_core::events::FleetEvent;
use uatm_core::state::FleetStatsView;
use uatm_flight::Drone;

/// Counters that outlive individual ticks.
#[derive(Debug, Clone, Default)]
pub struct FleetStats {
    pub deliveries_completed: u32,
}

impl FleetStats {
    /// Fold one tick's events into the counters.
    pub fn observe(&mut self, events: &[FleetEvent]) {
        self.deliveries_completed += events
            .iter()
            .filter(|e| matches!(e, FleetEvent::PackageDelivered { .. }))
            .count() as u32;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Aggregate the current drone states together with the counters.
    pub fn view(&self, world: &World, order: &[Entity]) -> FleetStatsView {
        let mut view = FleetStatsView {
            deliveries_completed: self.deliveries_completed,
            ..Default::default()
        };
        let mut battery_sum = 0.0;

        for &entity in order {
            let Ok(drone) = world.get::<&Drone>(entity) else {
                continue;
            };
            view.total_count += 1;
            if drone.phase != FlightPhase::Idle {
                view.active_count += 1;
            }
            if drone.phase == FlightPhase::Recharging {
                view.charging_count += 1;
            }
            view.collisions_avoided += drone.collisions_avoided();
            battery_sum += drone.battery;
        }

        if view.total_count > 0 {
            view.average_battery = battery_sum / view.total_count as f64;
        }
        view
    }
}
