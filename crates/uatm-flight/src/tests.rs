#[cfg(test)]
mod tests {
    use uatm_core::constants::*;
    use uatm_core::enums::{FlightPhase, RouteCheck};
    use uatm_core::events::FleetEvent;
    use uatm_core::settings::{DroneParams, FleetSettings};
    use uatm_core::types::{Position, RestrictedZone};

    use crate::agent::{Drone, FlightContext};
    use crate::airspace::{intrudes, needs_detour, route_around};
    use crate::avoidance::{find_conflict, plan_avoidance, CollisionMonitor, NeighborSnapshot};
    use crate::recharge::{nearest_station, resume_phase};

    fn stations() -> Vec<Position> {
        FleetSettings::default().recharge_stations
    }

    fn make_drone(id: u32) -> Drone {
        Drone::new(id, Position::ZERO, DroneParams::default())
    }

    /// Advance one drone by one tick with no neighbors.
    fn step(drone: &mut Drone, tick: u64, stations: &[Position]) -> Vec<FleetEvent> {
        let zone = RestrictedZone::default();
        let ctx = FlightContext {
            now_secs: tick as f64 * DT,
            neighbors: &[],
            stations,
            zone: &zone,
        };
        let mut events = Vec::new();
        drone.update(&ctx, &mut events);
        events
    }

    /// Run until the drone is idle again. Returns every event and the tick count.
    fn run_mission(drone: &mut Drone) -> (Vec<FleetEvent>, u64) {
        let stations = stations();
        let mut events = Vec::new();
        let mut tick = 0;
        while drone.phase != FlightPhase::Idle {
            tick += 1;
            assert!(tick < 20_000, "mission did not finish, stuck in {}", drone.phase);
            events.extend(step(drone, tick, &stations));
        }
        (events, tick)
    }

    fn cruising(id: u32, position: Position) -> Drone {
        let mut drone = make_drone(id);
        assert!(drone.set_target(Position::new(0.0, 0.0, 400.0), Position::new(0.0, 0.0, -400.0)));
        drone.phase = FlightPhase::MovingToPickup;
        drone.position = position;
        drone.current_altitude = position.y;
        drone
    }

    #[test]
    fn test_new_drone_parked_on_base() {
        let drone = Drone::new(3, Position::new(10.0, 0.0, -5.0), DroneParams::default());
        assert_eq!(drone.phase, FlightPhase::Idle);
        assert_eq!(drone.position, Position::new(10.0, LANDING_ALTITUDE, -5.0));
        assert_eq!(drone.base_position, drone.position);
        assert_eq!(drone.battery, MAX_BATTERY);
        assert!(!drone.has_package);
        assert!(!drone.is_rerouting());
    }

    #[test]
    fn test_idle_update_is_noop() {
        let mut drone = make_drone(0);
        let before = drone.clone();
        let events = step(&mut drone, 1, &stations());
        assert!(events.is_empty());
        assert_eq!(drone.position, before.position);
        assert_eq!(drone.battery, before.battery);
        assert_eq!(drone.phase, FlightPhase::Idle);
    }

    #[test]
    fn test_set_target_starts_takeoff() {
        let mut drone = make_drone(0);
        let pickup = Position::new(50.0, 0.0, 0.0);
        let delivery = Position::new(-50.0, 0.0, 0.0);
        assert!(drone.set_target(pickup, delivery));
        assert_eq!(drone.phase, FlightPhase::TakingOff);
        assert_eq!(drone.pickup_point, Some(pickup));
        assert_eq!(drone.delivery_point, Some(delivery));
    }

    #[test]
    fn test_set_target_rejected_when_busy_or_low() {
        let mut busy = make_drone(0);
        assert!(busy.set_target(Position::new(50.0, 0.0, 0.0), Position::new(-50.0, 0.0, 0.0)));
        step(&mut busy, 1, &stations());
        let before = busy.clone();
        assert!(!busy.set_target(Position::new(1.0, 0.0, 1.0), Position::new(2.0, 0.0, 2.0)));
        assert_eq!(busy.phase, before.phase);
        assert_eq!(busy.position, before.position);
        assert_eq!(busy.battery, before.battery);
        assert_eq!(busy.pickup_point, before.pickup_point);
        assert_eq!(busy.delivery_point, before.delivery_point);

        let mut low = make_drone(1);
        low.battery = MIN_DISPATCH_BATTERY;
        assert!(!low.set_target(Position::new(1.0, 0.0, 1.0), Position::new(2.0, 0.0, 2.0)));
        assert_eq!(low.phase, FlightPhase::Idle);
        assert_eq!(low.battery, MIN_DISPATCH_BATTERY);
        assert_eq!(low.pickup_point, None);
        assert_eq!(low.delivery_point, None);
    }

    #[test]
    fn test_takeoff_is_purely_vertical() {
        let mut drone = make_drone(0);
        drone.set_target(Position::new(120.0, 0.0, 0.0), Position::new(-210.0, 0.0, 0.0));
        let stations = stations();
        let mut tick = 0;
        while drone.phase == FlightPhase::TakingOff {
            tick += 1;
            let before = drone.position;
            step(&mut drone, tick, &stations);
            assert_eq!(drone.position.x, before.x);
            assert_eq!(drone.position.z, before.z);
            assert!(drone.position.y - before.y <= VERTICAL_SPEED + 1e-9);
            assert!(drone.position.y <= CRUISE_ALTITUDE);
        }
        assert_eq!(drone.phase, FlightPhase::MovingToPickup);
        assert_eq!(drone.position.y, CRUISE_ALTITUDE);
        // 24 climbing ticks plus the transition tick.
        assert_eq!(tick, 25);
    }

    #[test]
    fn test_cruise_holds_altitude() {
        let mut drone = make_drone(0);
        drone.set_target(Position::new(120.0, 0.0, 0.0), Position::new(-210.0, 0.0, 0.0));
        let stations = stations();
        let mut tick = 0;
        while drone.phase != FlightPhase::DescendingToPickup {
            tick += 1;
            let was = drone.phase;
            step(&mut drone, tick, &stations);
            if was == FlightPhase::MovingToPickup {
                assert_eq!(drone.position.y, CRUISE_ALTITUDE);
            }
        }
        assert_eq!(drone.position.x, 120.0);
        assert_eq!(drone.position.z, 0.0);
        assert!((drone.heading - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn test_full_mission_returns_to_base() {
        let mut drone = make_drone(0);
        drone.set_target(Position::new(120.0, 0.0, 0.0), Position::new(-210.0, 0.0, 0.0));
        let (events, _) = run_mission(&mut drone);

        let picked = events
            .iter()
            .position(|e| matches!(e, FleetEvent::PackagePickedUp { .. }))
            .expect("picked up");
        let delivered = events
            .iter()
            .position(|e| matches!(e, FleetEvent::PackageDelivered { .. }))
            .expect("delivered");
        let landed = events
            .iter()
            .position(|e| matches!(e, FleetEvent::Landed { .. }))
            .expect("landed");
        assert!(picked < delivered && delivered < landed);

        assert_eq!(drone.position, drone.base_position);
        assert_eq!(drone.battery, MAX_BATTERY);
        assert!(!drone.has_package);
        assert_eq!(drone.collisions_avoided(), 0);
    }

    #[test]
    fn test_phase_pipeline_order_and_package_window() {
        let mut drone = make_drone(0);
        drone.set_target(Position::new(0.0, 0.0, 130.0), Position::new(0.0, 0.0, -230.0));
        let stations = stations();
        let mut visited = vec![drone.phase];
        let mut tick = 0;
        while drone.phase != FlightPhase::Idle {
            tick += 1;
            step(&mut drone, tick, &stations);
            if visited.last() != Some(&drone.phase) {
                visited.push(drone.phase);
            }
            if drone.has_package {
                assert!(matches!(
                    drone.phase,
                    FlightPhase::AscendingFromPickup
                        | FlightPhase::MovingToDelivery
                        | FlightPhase::DescendingToDelivery
                ));
            }
        }
        use FlightPhase::*;
        assert_eq!(
            visited,
            vec![
                TakingOff,
                MovingToPickup,
                DescendingToPickup,
                PickingUp,
                AscendingFromPickup,
                MovingToDelivery,
                DescendingToDelivery,
                Dropping,
                AscendingFromDelivery,
                ReturningToBase,
                DescendingToBase,
                Idle,
            ]
        );
    }

    #[test]
    fn test_package_released_when_drop_hold_starts() {
        let mut drone = make_drone(0);
        drone.set_target(Position::new(50.0, 0.0, 0.0), Position::new(-50.0, 0.0, 0.0));
        let stations = stations();
        let mut tick = 0;
        let mut drop_ticks = 0;
        while drone.phase != FlightPhase::Idle {
            tick += 1;
            assert!(tick < 20_000);
            step(&mut drone, tick, &stations);
            if drone.phase == FlightPhase::Dropping {
                drop_ticks += 1;
                assert!(!drone.has_package, "still carrying at tick {tick}");
            }
        }
        assert!(drop_ticks > 0);
    }

    #[test]
    fn test_low_battery_during_drop_returns_to_base() {
        let mut drone = make_drone(0);
        drone.set_target(Position::new(50.0, 0.0, 0.0), Position::new(-50.0, 0.0, 0.0));
        let stations = stations();
        let mut tick = 0;
        while drone.phase != FlightPhase::Dropping {
            tick += 1;
            assert!(tick < 20_000);
            step(&mut drone, tick, &stations);
        }
        drone.battery = LOW_BATTERY_THRESHOLD;
        tick += 1;
        step(&mut drone, tick, &stations);
        assert_eq!(drone.phase, FlightPhase::MovingToRecharge);

        let mut resumed = None;
        while resumed.is_none() {
            tick += 1;
            assert!(tick < 20_000, "recharge never finished");
            let events = step(&mut drone, tick, &stations);
            if events
                .iter()
                .any(|e| matches!(e, FleetEvent::RechargeComplete { .. }))
            {
                resumed = Some(drone.phase);
            }
        }
        assert_eq!(resumed, Some(FlightPhase::ReturningToBase));
        assert!(!drone.has_package);
    }

    #[test]
    fn test_hold_lasts_hold_duration() {
        let mut drone = make_drone(0);
        drone.set_target(Position::new(50.0, 0.0, 0.0), Position::new(-50.0, 0.0, 0.0));
        let stations = stations();
        let mut tick = 0;
        let mut hold_ticks = 0;
        while drone.phase != FlightPhase::AscendingFromPickup {
            tick += 1;
            step(&mut drone, tick, &stations);
            if drone.phase == FlightPhase::PickingUp {
                hold_ticks += 1;
                assert_eq!(drone.position.y, PICKUP_HEIGHT);
            }
        }
        let expected = (HOLD_DURATION_SECS * TICK_RATE as f64) as i64;
        assert!((hold_ticks as i64 - expected).abs() <= 1, "held {hold_ticks} ticks");
        assert!(drone.has_package);
    }

    #[test]
    fn test_battery_drains_every_active_tick() {
        let mut drone = make_drone(0);
        drone.set_target(Position::new(120.0, 0.0, 0.0), Position::new(-210.0, 0.0, 0.0));
        let stations = stations();
        let mut tick = 0;
        while drone.phase != FlightPhase::Idle {
            tick += 1;
            let (phase_before, battery_before) = (drone.phase, drone.battery);
            step(&mut drone, tick, &stations);
            assert!((0.0..=MAX_BATTERY).contains(&drone.battery));
            let active = |p: FlightPhase| !matches!(p, FlightPhase::Idle | FlightPhase::Recharging);
            if active(phase_before) && active(drone.phase) {
                assert!(drone.battery < battery_before, "no drain at tick {tick}");
            }
        }
    }

    #[test]
    fn test_low_battery_diverts_and_resumes_delivery() {
        let stations = stations();
        let mut drone = make_drone(0);
        drone.set_target(Position::new(120.0, 0.0, 0.0), Position::new(-210.0, 0.0, 0.0));
        drone.phase = FlightPhase::MovingToDelivery;
        drone.has_package = true;
        drone.position = Position::new(60.0, CRUISE_ALTITUDE, 40.0);
        drone.current_altitude = CRUISE_ALTITUDE;
        drone.battery = LOW_BATTERY_THRESHOLD;

        let mut tick = 30;
        let events = step(&mut drone, tick, &stations);
        assert_eq!(drone.phase, FlightPhase::MovingToRecharge);
        assert_eq!(drone.recharge_target(), Some(Position::new(100.0, 0.0, 100.0)));
        assert!(events
            .iter()
            .any(|e| matches!(e, FleetEvent::LowBattery { drone_id: 0, .. })));

        let mut completed = false;
        while !completed {
            tick += 1;
            assert!(tick < 1_000, "recharge never finished");
            let (phase_before, battery_before) = (drone.phase, drone.battery);
            let events = step(&mut drone, tick, &stations);
            if phase_before == FlightPhase::Recharging && drone.phase == FlightPhase::Recharging {
                assert!(drone.battery > battery_before);
                assert_eq!(drone.position.x, 100.0);
                assert_eq!(drone.position.z, 100.0);
            }
            completed = events
                .iter()
                .any(|e| matches!(e, FleetEvent::RechargeComplete { .. }));
        }
        assert_eq!(drone.battery, MAX_BATTERY);
        assert_eq!(drone.phase, FlightPhase::MovingToDelivery);
        assert!(drone.has_package);
        assert_eq!(drone.recharge_target(), None);
    }

    #[test]
    fn test_low_battery_without_stations_keeps_flying() {
        let mut drone = make_drone(0);
        drone.set_target(Position::new(120.0, 0.0, 0.0), Position::new(-210.0, 0.0, 0.0));
        drone.phase = FlightPhase::MovingToPickup;
        drone.position = Position::new(10.0, CRUISE_ALTITUDE, 0.0);
        drone.current_altitude = CRUISE_ALTITUDE;
        drone.battery = 5.0;
        let events = step(&mut drone, 1, &[]);
        assert!(events.is_empty());
        assert_eq!(drone.phase, FlightPhase::MovingToPickup);
        assert_eq!(drone.position.x, 15.0);
        assert!(drone.battery < 5.0);
    }

    fn assert_parked(drone: &Drone) {
        let reference = make_drone(drone.id);
        assert_eq!(drone.position, reference.position);
        assert_eq!(drone.position, drone.base_position);
        assert_eq!(drone.phase, FlightPhase::Idle);
        assert_eq!(drone.battery, MAX_BATTERY);
        assert_eq!(drone.pickup_point, None);
        assert_eq!(drone.delivery_point, None);
        assert!(!drone.has_package);
        assert!(!drone.is_rerouting());
        assert_eq!(drone.recharge_target(), None);
        assert_eq!(drone.current_altitude, reference.current_altitude);
        assert_eq!(drone.heading, reference.heading);
    }

    #[test]
    fn test_reset_from_any_phase_is_identical() {
        for stop_at in [0_u64, 10, 40, 90, 200, 400, 600] {
            let mut drone = make_drone(0);
            drone.set_target(Position::new(120.0, 0.0, 0.0), Position::new(-210.0, 0.0, 0.0));
            let stations = stations();
            for tick in 1..=stop_at {
                step(&mut drone, tick, &stations);
            }
            drone.reset();
            assert_parked(&drone);
        }
    }

    #[test]
    fn test_reset_during_hold_clears_deadline() {
        let mut drone = make_drone(0);
        drone.set_target(Position::new(50.0, 0.0, 0.0), Position::new(-50.0, 0.0, 0.0));
        let stations = stations();
        let mut tick = 0;
        while drone.phase != FlightPhase::PickingUp {
            tick += 1;
            assert!(tick < 1_000);
            step(&mut drone, tick, &stations);
        }
        drone.reset();
        assert_parked(&drone);

        // A fresh task starts from take-off and holds for the full duration again.
        assert!(drone.set_target(Position::new(50.0, 0.0, 0.0), Position::new(-50.0, 0.0, 0.0)));
        assert_eq!(drone.phase, FlightPhase::TakingOff);
        let (events, _) = run_mission(&mut drone);
        assert!(events
            .iter()
            .any(|e| matches!(e, FleetEvent::PackageDelivered { drone_id: 0 })));
    }

    #[test]
    fn test_reset_while_recharging_or_heading_to_station() {
        let stations = stations();
        for target_phase in [FlightPhase::MovingToRecharge, FlightPhase::Recharging] {
            let mut drone = make_drone(0);
            drone.set_target(Position::new(120.0, 0.0, 0.0), Position::new(-210.0, 0.0, 0.0));
            drone.phase = FlightPhase::MovingToDelivery;
            drone.has_package = true;
            drone.position = Position::new(60.0, CRUISE_ALTITUDE, 40.0);
            drone.current_altitude = CRUISE_ALTITUDE;
            drone.battery = LOW_BATTERY_THRESHOLD;

            let mut tick = 0;
            while drone.phase != target_phase {
                tick += 1;
                assert!(tick < 1_000, "never reached {target_phase}");
                step(&mut drone, tick, &stations);
            }
            assert!(drone.recharge_target().is_some());
            drone.reset();
            assert_parked(&drone);

            // Nothing of the interrupted recharge survives into the next task.
            assert!(drone.set_target(Position::new(50.0, 0.0, 0.0), Position::new(-50.0, 0.0, 0.0)));
            let (events, _) = run_mission(&mut drone);
            assert!(!events
                .iter()
                .any(|e| matches!(e, FleetEvent::RechargeComplete { .. })));
        }
    }

    #[test]
    fn test_reset_drops_pending_avoidance() {
        let mut drone = cruising(0, Position::new(0.0, 50.0, 0.0));
        let snapshot = [NeighborSnapshot {
            id: 1,
            position: Position::new(5.0, 50.0, 0.0),
        }];
        let zone = RestrictedZone::default();
        let ctx = FlightContext {
            now_secs: 1.0,
            neighbors: &snapshot,
            stations: &[],
            zone: &zone,
        };
        let mut events = Vec::new();
        drone.update(&ctx, &mut events);
        assert!(drone.is_rerouting());

        drone.reset();
        assert_parked(&drone);
        assert_eq!(drone.reroute_waypoints().count(), 0);
        assert_eq!(drone.collisions_avoided(), 1);
    }

    #[test]
    fn test_drone_can_fly_again_after_reset() {
        let mut drone = make_drone(0);
        drone.set_target(Position::new(50.0, 0.0, 0.0), Position::new(-50.0, 0.0, 0.0));
        let stations = stations();
        for tick in 1..=50 {
            step(&mut drone, tick, &stations);
        }
        drone.reset();
        assert!(drone.set_target(Position::new(0.0, 0.0, 50.0), Position::new(0.0, 0.0, -50.0)));
        run_mission(&mut drone);
        assert_eq!(drone.position, drone.base_position);
    }

    // --- Restricted zone ---

    #[test]
    fn test_route_around_stays_outside_guarded_radius() {
        let zone = RestrictedZone::default();
        let start = Position::new(0.0, CRUISE_ALTITUDE, 0.0);
        let end = Position::new(150.0, 0.0, 150.0);
        assert!(needs_detour(&zone, &start, &end, RouteCheck::Endpoints));

        let arc = route_around(&zone, &start, &end, CRUISE_ALTITUDE);
        assert!(arc.len() >= MIN_DETOUR_STEPS + 1);
        let expected_steps = ((start.distance_to(&end) / DETOUR_WAYPOINT_SPACING).floor() as usize)
            .max(MIN_DETOUR_STEPS);
        assert_eq!(arc.len(), expected_steps + 1);
        for p in &arc {
            assert!(p.planar_distance_to(&zone.center) >= zone.guarded_radius() - 1e-6);
            assert_eq!(p.y, CRUISE_ALTITUDE);
        }
    }

    #[test]
    fn test_route_around_short_hop_uses_minimum_steps() {
        let zone = RestrictedZone::default();
        let start = Position::new(150.0, 50.0, 120.0);
        let end = Position::new(150.0, 50.0, 175.0);
        let arc = route_around(&zone, &start, &end, 50.0);
        assert_eq!(arc.len(), MIN_DETOUR_STEPS + 1);
    }

    #[test]
    fn test_route_around_takes_shorter_way() {
        let zone = RestrictedZone::default();
        // Just either side of the -x axis through the center.
        let start = Position::new(100.0, 50.0, 155.0);
        let end = Position::new(100.0, 50.0, 145.0);
        let arc = route_around(&zone, &start, &end, 50.0);
        for p in &arc {
            assert!(p.x < zone.center.x, "arc swung round the far side: {p:?}");
        }
    }

    #[test]
    fn test_intrudes_uses_guarded_radius() {
        let zone = RestrictedZone::default();
        assert!(intrudes(&zone, &Position::new(150.0, 0.0, 185.0)));
        assert!(!intrudes(&zone, &Position::new(150.0, 0.0, 195.0)));
    }

    #[test]
    fn test_leg_into_zone_detours_once() {
        let mut drone = make_drone(0);
        drone.set_target(Position::new(150.0, 0.0, 150.0), Position::new(-210.0, 0.0, 0.0));
        drone.phase = FlightPhase::MovingToPickup;
        drone.position = Position::new(0.0, CRUISE_ALTITUDE, 0.0);
        drone.current_altitude = CRUISE_ALTITUDE;

        let stations = stations();
        let zone = RestrictedZone::default();
        let mut detours = 0;
        let mut tick = 0;
        while drone.phase == FlightPhase::MovingToPickup {
            tick += 1;
            assert!(tick < 2_000);
            let events = step(&mut drone, tick, &stations);
            detours += events
                .iter()
                .filter(|e| matches!(e, FleetEvent::RestrictedZoneDetour { .. }))
                .count();
            if tick == 1 {
                assert!(drone.is_rerouting());
                for p in drone.reroute_waypoints() {
                    assert!(p.planar_distance_to(&zone.center) >= zone.guarded_radius() - 1e-6);
                }
            }
        }
        assert_eq!(detours, 1);
        assert_eq!(drone.phase, FlightPhase::DescendingToPickup);
        assert_eq!(drone.position.x, 150.0);
        assert_eq!(drone.position.z, 150.0);
    }

    #[test]
    fn test_segment_mode_detours_crossing_leg() {
        let mut params = DroneParams::default();
        params.route_check = RouteCheck::Segment;
        let mut drone = Drone::new(0, Position::ZERO, params);
        drone.set_target(Position::new(200.0, 0.0, 200.0), Position::new(-210.0, 0.0, 0.0));
        drone.phase = FlightPhase::MovingToPickup;
        drone.position = Position::new(100.0, CRUISE_ALTITUDE, 100.0);
        drone.current_altitude = CRUISE_ALTITUDE;

        let events = step(&mut drone, 1, &stations());
        assert!(events
            .iter()
            .any(|e| matches!(e, FleetEvent::RestrictedZoneDetour { .. })));
        assert!(drone.is_rerouting());
    }

    // --- Collision avoidance ---

    #[test]
    fn test_pair_in_conflict_plans_opposite_maneuvers() {
        let mut low = cruising(0, Position::new(0.0, 50.0, 0.0));
        let mut high = cruising(1, Position::new(10.0, 50.0, 0.0));
        let snapshot = [
            NeighborSnapshot { id: 0, position: low.position },
            NeighborSnapshot { id: 1, position: high.position },
        ];
        let zone = RestrictedZone::default();
        let stations = stations();
        let ctx = FlightContext {
            now_secs: 1.0,
            neighbors: &snapshot,
            stations: &stations,
            zone: &zone,
        };

        let mut events = Vec::new();
        low.update(&ctx, &mut events);
        high.update(&ctx, &mut events);

        for (drone, other) in [(&low, snapshot[1]), (&high, snapshot[0])] {
            assert_eq!(drone.collisions_avoided(), 1);
            let waypoints: Vec<Position> = drone.reroute_waypoints().copied().collect();
            assert_eq!(waypoints.len(), 3);
            assert!(waypoints[0].distance_to(&other.position) > AVOIDANCE_RADIUS);
        }
        let low_wp: Vec<Position> = low.reroute_waypoints().copied().collect();
        let high_wp: Vec<Position> = high.reroute_waypoints().copied().collect();
        assert_eq!(low_wp[1].y, 50.0 + AVOIDANCE_ALTITUDE_OFFSET);
        assert_eq!(high_wp[1].y, 50.0 - AVOIDANCE_ALTITUDE_OFFSET);

        let changes: Vec<f64> = events
            .iter()
            .filter_map(|e| match e {
                FleetEvent::AvoidanceManeuver { altitude_change, .. } => Some(*altitude_change),
                _ => None,
            })
            .collect();
        assert_eq!(changes, vec![AVOIDANCE_ALTITUDE_OFFSET, -AVOIDANCE_ALTITUDE_OFFSET]);
    }

    #[test]
    fn test_conflict_scan_is_rate_limited() {
        let mut drone = cruising(0, Position::new(0.0, 50.0, 0.0));
        let zone = RestrictedZone::default();
        let mut events = Vec::new();
        // The intruder shadows the drone so every scan would find it.
        for now in [1.0, 1.2, 1.5, 1.9, 2.0] {
            let snapshot = [NeighborSnapshot {
                id: 1,
                position: Position::new(drone.position.x + 5.0, 50.0, drone.position.z),
            }];
            let ctx = FlightContext {
                now_secs: now,
                neighbors: &snapshot,
                stations: &[],
                zone: &zone,
            };
            drone.update(&ctx, &mut events);
            if now < 2.0 {
                assert_eq!(drone.collisions_avoided(), 1);
            }
        }
        assert_eq!(drone.collisions_avoided(), 2);
        // Second conflict arrives while still rerouting: counted, not replanned.
        let maneuvers = events
            .iter()
            .filter(|e| matches!(e, FleetEvent::AvoidanceManeuver { .. }))
            .count();
        assert_eq!(maneuvers, 1);
    }

    #[test]
    fn test_find_conflict_skips_self_and_far_drones() {
        let me = Position::new(0.0, 50.0, 0.0);
        let neighbors = [
            NeighborSnapshot { id: 0, position: me },
            NeighborSnapshot { id: 1, position: Position::new(30.0, 50.0, 0.0) },
            NeighborSnapshot { id: 2, position: Position::new(0.0, 50.0, 19.0) },
            NeighborSnapshot { id: 3, position: Position::new(0.0, 50.0, 5.0) },
        ];
        let conflict = find_conflict(0, &me, &neighbors, AVOIDANCE_RADIUS).expect("conflict");
        assert_eq!(conflict.other.id, 2);
        assert!((conflict.distance - 19.0).abs() < 1e-12);
        assert!(find_conflict(0, &me, &neighbors[..2], AVOIDANCE_RADIUS).is_none());
    }

    #[test]
    fn test_coincident_drones_split_along_x() {
        let params = DroneParams::default();
        let here = Position::new(0.0, 50.0, 0.0);
        let target = Position::new(100.0, 0.0, 0.0);
        let a = plan_avoidance(0, &here, &target, &NeighborSnapshot { id: 1, position: here }, &params);
        let b = plan_avoidance(1, &here, &target, &NeighborSnapshot { id: 0, position: here }, &params);
        let lateral = AVOIDANCE_RADIUS * AVOIDANCE_LATERAL_FACTOR;
        assert_eq!(a.waypoints[0], Position::new(lateral, 50.0, 0.0));
        assert_eq!(b.waypoints[0], Position::new(-lateral, 50.0, 0.0));
        assert_eq!(a.waypoints[2], Position::new(100.0, 75.0, 0.0));
        assert_eq!(b.waypoints[2], Position::new(100.0, 25.0, 0.0));
    }

    #[test]
    fn test_descending_escape_clamped_to_ground() {
        let params = DroneParams::default();
        let here = Position::new(0.0, 10.0, 0.0);
        let other = NeighborSnapshot {
            id: 0,
            position: Position::new(0.0, 10.0, 5.0),
        };
        let plan = plan_avoidance(4, &here, &here, &other, &params);
        assert_eq!(plan.waypoints[1].y, 0.0);
        assert_eq!(plan.altitude_change, -10.0);
    }

    #[test]
    fn test_pair_near_ground_still_splits_vertically() {
        let params = DroneParams::default();
        let a = Position::new(0.0, LANDING_ALTITUDE, 0.0);
        let b = Position::new(5.0, LANDING_ALTITUDE, 0.0);
        let target = Position::new(100.0, 0.0, 0.0);
        let low = plan_avoidance(0, &a, &target, &NeighborSnapshot { id: 1, position: b }, &params);
        let high = plan_avoidance(1, &b, &target, &NeighborSnapshot { id: 0, position: a }, &params);
        assert!(low.altitude_change > 0.0);
        assert!(high.altitude_change < 0.0);
        assert_eq!(low.altitude_change, AVOIDANCE_ALTITUDE_OFFSET);
        assert_eq!(high.altitude_change, -LANDING_ALTITUDE);
        assert!(high.waypoints.iter().all(|w| w.y >= 0.0));
    }

    #[test]
    fn test_conflict_log_is_bounded() {
        let params = DroneParams::default();
        let me = Position::ZERO;
        let neighbors = [NeighborSnapshot {
            id: 7,
            position: Position::new(1.0, 0.0, 0.0),
        }];
        let mut monitor = CollisionMonitor::new();
        for i in 1..=40 {
            assert!(monitor.scan(0, &me, &neighbors, &params, i as f64).is_some());
        }
        assert_eq!(monitor.collisions_avoided(), 40);
        let log: Vec<_> = monitor.log().collect();
        assert_eq!(log.len(), MAX_CONFLICT_LOG);
        assert_eq!(log[0].time_secs, (40 - MAX_CONFLICT_LOG + 1) as f64);
        assert_eq!(log[0].other_id, 7);
    }

    // --- Recharge ---

    #[test]
    fn test_nearest_station() {
        let stations = stations();
        assert_eq!(
            nearest_station(&Position::new(-80.0, 50.0, 90.0), &stations),
            Some(Position::new(-100.0, 0.0, 100.0))
        );
        let tied = [Position::new(10.0, 0.0, 0.0), Position::new(-10.0, 0.0, 0.0)];
        assert_eq!(nearest_station(&Position::ZERO, &tied), Some(tied[0]));
        assert_eq!(nearest_station(&Position::ZERO, &[]), None);
    }

    #[test]
    fn test_resume_phase_after_recharge() {
        use FlightPhase::*;
        assert_eq!(resume_phase(TakingOff, false), MovingToPickup);
        assert_eq!(resume_phase(PickingUp, false), MovingToPickup);
        assert_eq!(resume_phase(MovingToDelivery, true), MovingToDelivery);
        assert_eq!(resume_phase(Dropping, false), ReturningToBase);
        assert_eq!(resume_phase(AscendingFromDelivery, false), ReturningToBase);
        assert_eq!(resume_phase(DescendingToBase, false), ReturningToBase);
    }
}
