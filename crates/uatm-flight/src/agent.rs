//! Delivery drone state machine.
//!
//! One call to [`Drone::update`] advances a drone by one simulation tick:
//! low-battery preemption, battery drain, collision scan, reroute following,
//! then the phase logic. Vertical phases only touch altitude, horizontal
//! phases only touch the ground-plane coordinates, and every transition
//! takes effect on the following tick.

use std::collections::VecDeque;

use tracing::debug;
use uatm_core::enums::FlightPhase;
use uatm_core::events::FleetEvent;
use uatm_core::geometry::{move_towards, move_towards_planar};
use uatm_core::settings::DroneParams;
use uatm_core::types::{Position, RestrictedZone};

use crate::airspace::{needs_detour, route_around};
use crate::avoidance::{plan_avoidance, CollisionMonitor, NeighborSnapshot};
use crate::recharge::{nearest_station, resume_phase};

/// Shared, read-only world view for one tick.
#[derive(Debug, Clone, Copy)]
pub struct FlightContext<'a> {
    pub now_secs: f64,
    /// Start-of-tick positions of every drone, including idle ones.
    pub neighbors: &'a [NeighborSnapshot],
    pub stations: &'a [Position],
    pub zone: &'a RestrictedZone,
}

#[derive(Debug, Clone)]
pub struct Drone {
    pub id: u32,
    pub position: Position,
    /// Landing spot; stored at landing altitude.
    pub base_position: Position,
    /// Radians, `atan2(dx, dz)` of the last horizontal move.
    pub heading: f64,
    pub pickup_point: Option<Position>,
    pub delivery_point: Option<Position>,
    pub battery: f64,
    pub phase: FlightPhase,
    pub has_package: bool,
    /// Altitude held during horizontal flight.
    pub current_altitude: f64,
    pub params: DroneParams,
    reroute: VecDeque<Position>,
    monitor: CollisionMonitor,
    hold_until_secs: Option<f64>,
    recharge_target: Option<Position>,
    resume_after_recharge: Option<FlightPhase>,
    leg_checked: bool,
}

impl Drone {
    pub fn new(id: u32, base: Position, params: DroneParams) -> Self {
        let base_position = base.with_altitude(params.landing_altitude);
        Self {
            id,
            position: base_position,
            base_position,
            heading: 0.0,
            pickup_point: None,
            delivery_point: None,
            battery: params.max_battery,
            phase: FlightPhase::Idle,
            has_package: false,
            current_altitude: params.landing_altitude,
            params,
            reroute: VecDeque::new(),
            monitor: CollisionMonitor::new(),
            hold_until_secs: None,
            recharge_target: None,
            resume_after_recharge: None,
            leg_checked: false,
        }
    }

    /// Assign a pickup/delivery task and take off.
    ///
    /// Ignored unless the drone is idle with battery above the dispatch
    /// minimum. Returns whether the task was accepted.
    pub fn set_target(&mut self, pickup: Position, delivery: Position) -> bool {
        if self.phase != FlightPhase::Idle || self.battery <= self.params.min_dispatch_battery {
            return false;
        }
        self.pickup_point = Some(pickup);
        self.delivery_point = Some(delivery);
        self.has_package = false;
        self.enter(FlightPhase::TakingOff);
        true
    }

    /// Put the drone back on its base, idle and fully charged.
    ///
    /// The collision counter and its log survive a reset.
    pub fn reset(&mut self) {
        self.position = self.base_position;
        self.heading = 0.0;
        self.pickup_point = None;
        self.delivery_point = None;
        self.battery = self.params.max_battery;
        self.has_package = false;
        self.current_altitude = self.params.landing_altitude;
        self.reroute.clear();
        self.recharge_target = None;
        self.resume_after_recharge = None;
        self.enter(FlightPhase::Idle);
    }

    pub fn is_rerouting(&self) -> bool {
        !self.reroute.is_empty()
    }

    pub fn reroute_waypoints(&self) -> impl Iterator<Item = &Position> {
        self.reroute.iter()
    }

    pub fn monitor(&self) -> &CollisionMonitor {
        &self.monitor
    }

    pub fn collisions_avoided(&self) -> u32 {
        self.monitor.collisions_avoided()
    }

    pub fn recharge_target(&self) -> Option<Position> {
        self.recharge_target
    }

    /// Where the current horizontal leg is heading. Vertical and hold phases
    /// report the drone's own position.
    pub fn current_target(&self) -> Position {
        let target = match self.phase {
            FlightPhase::MovingToPickup => self.pickup_point,
            FlightPhase::MovingToDelivery => self.delivery_point,
            FlightPhase::ReturningToBase => Some(self.base_position),
            FlightPhase::MovingToRecharge => self.recharge_target,
            _ => None,
        };
        target.unwrap_or(self.position)
    }

    pub fn update(&mut self, ctx: &FlightContext<'_>, events: &mut Vec<FleetEvent>) {
        if self.phase == FlightPhase::Idle {
            return;
        }

        if self.battery <= self.params.low_battery_threshold
            && !matches!(
                self.phase,
                FlightPhase::MovingToRecharge | FlightPhase::Recharging
            )
        {
            self.divert_to_recharge(ctx, events);
        }

        if self.phase != FlightPhase::Recharging {
            self.battery = (self.battery - self.params.battery_drain_per_tick).max(0.0);
        }

        self.check_conflicts(ctx, events);

        if self.follow_reroute() {
            return;
        }

        self.step_phase(ctx, events);
    }

    fn enter(&mut self, phase: FlightPhase) {
        self.phase = phase;
        self.hold_until_secs = None;
        self.leg_checked = false;
    }

    fn divert_to_recharge(&mut self, ctx: &FlightContext<'_>, events: &mut Vec<FleetEvent>) {
        let Some(station) = nearest_station(&self.position, ctx.stations) else {
            return;
        };
        debug!(
            drone = self.id,
            battery = self.battery,
            phase = %self.phase,
            "low battery, diverting to station"
        );
        self.resume_after_recharge = Some(resume_phase(self.phase, self.has_package));
        self.recharge_target = Some(station);
        self.reroute.clear();
        self.enter(FlightPhase::MovingToRecharge);
        events.push(FleetEvent::LowBattery {
            drone_id: self.id,
            battery: self.battery,
            station,
        });
    }

    fn check_conflicts(&mut self, ctx: &FlightContext<'_>, events: &mut Vec<FleetEvent>) {
        let Some(conflict) =
            self.monitor
                .scan(self.id, &self.position, ctx.neighbors, &self.params, ctx.now_secs)
        else {
            return;
        };
        debug!(
            drone = self.id,
            other = conflict.other.id,
            distance = conflict.distance,
            "conflict detected"
        );
        events.push(FleetEvent::ConflictDetected {
            drone_id: self.id,
            other_id: conflict.other.id,
            distance: conflict.distance,
        });

        // Parked drones and drones already on a reroute keep their course.
        if self.is_rerouting() || self.phase.is_hold() || self.phase == FlightPhase::Recharging {
            return;
        }
        let target = self.current_target();
        let plan = plan_avoidance(self.id, &self.position, &target, &conflict.other, &self.params);
        self.reroute.extend(plan.waypoints);
        events.push(FleetEvent::AvoidanceManeuver {
            drone_id: self.id,
            other_id: conflict.other.id,
            altitude_change: plan.altitude_change,
        });
    }

    /// Fly one step along the reroute queue. Returns false once the queue is empty.
    fn follow_reroute(&mut self) -> bool {
        let eps = self.params.arrival_epsilon;
        while let Some(next) = self.reroute.front().copied() {
            if self.position.distance_to(&next) < eps {
                self.reroute.pop_front();
                continue;
            }
            self.face(&next);
            self.position = move_towards(&self.position, &next, self.params.speed);
            self.current_altitude = self.position.y;
            if self.position.distance_to(&next) < eps {
                self.reroute.pop_front();
            }
            return true;
        }
        false
    }

    fn step_phase(&mut self, ctx: &FlightContext<'_>, events: &mut Vec<FleetEvent>) {
        use FlightPhase::*;
        let p = self.params;
        match self.phase {
            Idle => {}
            TakingOff => {
                if self.climb_to(p.cruise_altitude) {
                    self.enter(MovingToPickup);
                }
            }
            MovingToPickup => match self.pickup_point {
                Some(pickup) => {
                    if self.fly_leg(pickup, ctx, events) {
                        self.enter(DescendingToPickup);
                    }
                }
                None => self.enter(ReturningToBase),
            },
            DescendingToPickup => {
                if self.descend_to(p.pickup_height) {
                    self.start_hold(PickingUp, ctx.now_secs);
                }
            }
            PickingUp => {
                if self.hold_elapsed(ctx.now_secs) {
                    self.has_package = true;
                    events.push(FleetEvent::PackagePickedUp { drone_id: self.id });
                    self.enter(AscendingFromPickup);
                }
            }
            AscendingFromPickup => {
                if self.climb_to(p.cruise_altitude) {
                    self.enter(MovingToDelivery);
                }
            }
            MovingToDelivery => match self.delivery_point {
                Some(delivery) => {
                    if self.fly_leg(delivery, ctx, events) {
                        self.enter(DescendingToDelivery);
                    }
                }
                None => self.enter(ReturningToBase),
            },
            DescendingToDelivery => {
                if self.descend_to(p.delivery_height) {
                    // The package leaves the drone as the drop hold begins.
                    self.has_package = false;
                    self.start_hold(Dropping, ctx.now_secs);
                }
            }
            Dropping => {
                if self.hold_elapsed(ctx.now_secs) {
                    events.push(FleetEvent::PackageDelivered { drone_id: self.id });
                    self.enter(AscendingFromDelivery);
                }
            }
            AscendingFromDelivery => {
                if self.climb_to(p.cruise_altitude) {
                    self.enter(ReturningToBase);
                }
            }
            ReturningToBase => {
                let base = self.base_position;
                if self.fly_leg(base, ctx, events) {
                    self.enter(DescendingToBase);
                }
            }
            DescendingToBase => {
                if self.descend_to(p.landing_altitude) {
                    self.position = self.base_position;
                    self.battery = p.max_battery;
                    self.enter(Idle);
                    events.push(FleetEvent::Landed { drone_id: self.id });
                }
            }
            MovingToRecharge => match self.recharge_target {
                Some(station) => {
                    if self.fly_leg(station, ctx, events) {
                        self.enter(Recharging);
                    }
                }
                None => self.finish_recharge(events),
            },
            Recharging => {
                self.battery = (self.battery + p.charge_rate_per_tick).min(p.max_battery);
                if self.battery >= p.max_battery {
                    self.finish_recharge(events);
                }
            }
        }
    }

    fn finish_recharge(&mut self, events: &mut Vec<FleetEvent>) {
        debug!(drone = self.id, "recharge complete");
        self.recharge_target = None;
        let next = self
            .resume_after_recharge
            .take()
            .unwrap_or(FlightPhase::ReturningToBase);
        self.enter(next);
        events.push(FleetEvent::RechargeComplete { drone_id: self.id });
    }

    /// Climb one step. Returns true when already at or above `altitude`.
    fn climb_to(&mut self, altitude: f64) -> bool {
        if self.current_altitude >= altitude {
            return true;
        }
        self.current_altitude = (self.current_altitude + self.params.vertical_speed).min(altitude);
        self.position.y = self.current_altitude;
        false
    }

    /// Descend one step. Returns true when already at or below `altitude`.
    fn descend_to(&mut self, altitude: f64) -> bool {
        if self.current_altitude <= altitude {
            return true;
        }
        self.current_altitude = (self.current_altitude - self.params.vertical_speed).max(altitude);
        self.position.y = self.current_altitude;
        false
    }

    fn start_hold(&mut self, phase: FlightPhase, now_secs: f64) {
        self.enter(phase);
        self.hold_until_secs = Some(now_secs + self.params.hold_duration_secs);
    }

    fn hold_elapsed(&self, now_secs: f64) -> bool {
        self.hold_until_secs.map_or(true, |until| now_secs >= until)
    }

    /// One horizontal step towards `target` at the held altitude.
    ///
    /// The first step of each leg checks the restricted zone and, when a
    /// detour is needed, queues it and starts flying it. Returns true once the
    /// drone already sits over `target`.
    fn fly_leg(
        &mut self,
        target: Position,
        ctx: &FlightContext<'_>,
        events: &mut Vec<FleetEvent>,
    ) -> bool {
        if !self.leg_checked {
            self.leg_checked = true;
            if needs_detour(ctx.zone, &self.position, &target, self.params.route_check) {
                let arc = route_around(ctx.zone, &self.position, &target, self.params.cruise_altitude);
                debug!(drone = self.id, waypoints = arc.len(), "detouring around restricted zone");
                events.push(FleetEvent::RestrictedZoneDetour {
                    drone_id: self.id,
                    waypoints: arc.len(),
                });
                self.reroute.extend(arc);
                if self.follow_reroute() {
                    return false;
                }
            }
        }

        if self.position.planar_distance_to(&target) < self.params.arrival_epsilon {
            self.position.x = target.x;
            self.position.z = target.z;
            return true;
        }
        self.position.y = self.current_altitude;
        self.face(&target);
        self.position = move_towards_planar(&self.position, &target, self.params.speed);
        false
    }

    fn face(&mut self, target: &Position) {
        if self.position.planar_distance_to(target) > 0.0 {
            self.heading = self.position.heading_to(target);
        }
    }
}
