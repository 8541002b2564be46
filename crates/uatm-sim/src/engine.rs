//! Fleet engine: the core of the simulation.
//!
//! `FleetEngine` owns the hecs ECS world, processes operator commands,
//! runs the systems and produces `FleetSnapshot`s. Completely headless,
//! so whole missions can be tested deterministically.

use std::collections::VecDeque;

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use uatm_core::commands::FleetCommand;
use uatm_core::constants::MAX_TIME_SCALE;
use uatm_core::enums::FleetStatus;
use uatm_core::events::FleetEvent;
use uatm_core::settings::FleetSettings;
use uatm_core::state::{FleetSnapshot, FleetStatsView};
use uatm_core::types::{Position, SimTime};
use uatm_flight::Drone;

use crate::stats::FleetStats;
use crate::systems;
use crate::systems::snapshot::SnapshotInputs;
use crate::world_setup;

/// Configuration for a new engine.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for task point placement. Same seed = same simulation.
    pub seed: u64,
    /// Initial time scale (1.0 = real time).
    pub time_scale: f64,
    pub settings: FleetSettings,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            time_scale: 1.0,
            settings: FleetSettings::default(),
        }
    }
}

/// The simulation engine. Owns the ECS world and all fleet state.
pub struct FleetEngine {
    world: World,
    time: SimTime,
    status: FleetStatus,
    time_scale: f64,
    rng: ChaCha8Rng,
    settings: FleetSettings,
    /// Drone entities in id order.
    drones: Vec<Entity>,
    pickup_points: Vec<Position>,
    delivery_points: Vec<Position>,
    command_queue: VecDeque<FleetCommand>,
    events: Vec<FleetEvent>,
    stats: FleetStats,
}

impl FleetEngine {
    /// Create an engine with a fleet of `settings.drone_count` drones parked on base.
    pub fn new(config: SimConfig) -> Self {
        let mut world = World::new();
        world_setup::spawn_recharge_stations(&mut world, &config.settings);

        let mut engine = Self {
            world,
            time: SimTime::default(),
            status: FleetStatus::Idle,
            time_scale: config.time_scale.clamp(0.0, MAX_TIME_SCALE),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            drones: Vec::new(),
            pickup_points: Vec::new(),
            delivery_points: Vec::new(),
            command_queue: VecDeque::new(),
            events: Vec::new(),
            stats: FleetStats::default(),
            settings: config.settings,
        };
        engine.initialize_fleet(engine.settings.drone_count);
        engine
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: FleetCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = FleetCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> FleetSnapshot {
        self.process_commands();

        if self.status == FleetStatus::Running {
            self.run_systems();
            self.time.advance();
        }

        let events = std::mem::take(&mut self.events);
        self.stats.observe(&events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.drones,
            SnapshotInputs {
                time: self.time,
                status: self.status,
                stats: self.stats.view(&self.world, &self.drones),
                pickup_points: &self.pickup_points,
                delivery_points: &self.delivery_points,
                restricted_zone: self.settings.restricted_zone,
                events,
            },
        )
    }

    // --- Commands ---

    /// Replace the fleet with `drone_count` fresh drones and regenerate task points.
    pub fn initialize_fleet(&mut self, drone_count: usize) {
        if drone_count == 0 {
            warn!("ignoring fleet initialization with zero drones");
            return;
        }
        for entity in self.drones.drain(..) {
            let _ = self.world.despawn(entity);
        }
        self.drones = world_setup::spawn_fleet(&mut self.world, &self.settings, drone_count);
        let (pickups, deliveries) =
            world_setup::generate_task_points(&mut self.rng, &self.settings, drone_count);
        self.pickup_points = pickups;
        self.delivery_points = deliveries;
        self.stats.reset();
        self.status = FleetStatus::Idle;
        info!(drones = drone_count, "fleet initialized");
    }

    /// Dispatch every idle, charged drone to its index-paired task and start ticking.
    pub fn start(&mut self) {
        let mut dispatched = 0;
        for (index, &entity) in self.drones.iter().enumerate() {
            let (Some(&pickup), Some(&delivery)) =
                (self.pickup_points.get(index), self.delivery_points.get(index))
            else {
                warn!(drone = index, "no task points for drone, leaving it parked");
                continue;
            };
            if let Ok(mut drone) = self.world.get::<&mut Drone>(entity) {
                if drone.set_target(pickup, delivery) {
                    dispatched += 1;
                    self.events.push(FleetEvent::TakeOff { drone_id: drone.id });
                }
            }
        }
        self.status = FleetStatus::Running;
        info!(dispatched, total = self.drones.len(), "fleet started");
    }

    /// Stop ticking. Drones keep whatever state they are in.
    pub fn stop(&mut self) {
        self.status = FleetStatus::Idle;
        info!(tick = self.time.tick, "fleet stopped");
    }

    pub fn pause(&mut self) {
        if self.status == FleetStatus::Running {
            self.status = FleetStatus::Paused;
            info!(tick = self.time.tick, "fleet paused");
        }
    }

    pub fn resume(&mut self) {
        if self.status == FleetStatus::Paused {
            self.status = FleetStatus::Running;
            info!(tick = self.time.tick, "fleet resumed");
        }
    }

    /// Return every drone to base, idle and fully charged.
    pub fn reset(&mut self) {
        for (_entity, drone) in self.world.query_mut::<&mut Drone>() {
            drone.reset();
        }
        systems::flight::clear_history(&mut self.world);
        self.stats.reset();
        self.status = FleetStatus::Idle;
        info!("fleet reset");
    }

    /// Assign a task to one drone. Returns whether the drone accepted it.
    pub fn set_target(&mut self, drone_id: u32, pickup: Position, delivery: Position) -> bool {
        let Some(&entity) = self.drones.get(drone_id as usize) else {
            warn!(drone = drone_id, "set_target for unknown drone");
            return false;
        };
        let Ok(mut drone) = self.world.get::<&mut Drone>(entity) else {
            return false;
        };
        if !drone.set_target(pickup, delivery) {
            warn!(
                drone = drone_id,
                phase = %drone.phase,
                battery = drone.battery,
                "drone not available for tasking"
            );
            return false;
        }
        self.events.push(FleetEvent::TakeOff { drone_id });
        true
    }

    pub fn add_pickup_point(&mut self, position: Position) {
        if position.is_finite() {
            self.pickup_points.push(position);
        } else {
            warn!(?position, "ignoring non-finite pickup point");
        }
    }

    pub fn add_delivery_point(&mut self, position: Position) {
        if position.is_finite() {
            self.delivery_points.push(position);
        } else {
            warn!(?position, "ignoring non-finite delivery point");
        }
    }

    /// Replace both task point lists.
    pub fn set_task_points(&mut self, pickups: Vec<Position>, deliveries: Vec<Position>) {
        if pickups.len() != deliveries.len() {
            warn!(
                pickups = pickups.len(),
                deliveries = deliveries.len(),
                "task point lists differ in length"
            );
        }
        self.pickup_points = pickups;
        self.delivery_points = deliveries;
    }

    pub fn set_time_scale(&mut self, scale: f64) {
        if scale.is_finite() {
            self.time_scale = scale.clamp(0.0, MAX_TIME_SCALE);
        } else {
            warn!(scale, "ignoring non-finite time scale");
        }
    }

    // --- Queries ---

    pub fn status(&self) -> FleetStatus {
        self.status
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn settings(&self) -> &FleetSettings {
        &self.settings
    }

    pub fn drone_count(&self) -> usize {
        self.drones.len()
    }

    /// Copy of one drone's state.
    pub fn drone(&self, drone_id: u32) -> Option<Drone> {
        let entity = *self.drones.get(drone_id as usize)?;
        self.world.get::<&Drone>(entity).ok().map(|d| Drone::clone(&d))
    }

    pub fn pickup_points(&self) -> &[Position] {
        &self.pickup_points
    }

    pub fn delivery_points(&self) -> &[Position] {
        &self.delivery_points
    }

    pub fn stats(&self) -> FleetStatsView {
        self.stats.view(&self.world, &self.drones)
    }

    /// True when no drone is out on a task.
    pub fn all_idle(&self) -> bool {
        self.stats().active_count == 0
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: FleetCommand) {
        match command {
            FleetCommand::InitializeFleet { drone_count } => self.initialize_fleet(drone_count),
            FleetCommand::Start => self.start(),
            FleetCommand::Stop => self.stop(),
            FleetCommand::Pause => self.pause(),
            FleetCommand::Resume => self.resume(),
            FleetCommand::Reset => self.reset(),
            FleetCommand::SetTarget {
                drone_id,
                pickup,
                delivery,
            } => {
                self.set_target(drone_id, pickup, delivery);
            }
            FleetCommand::AddPickupPoint { position } => self.add_pickup_point(position),
            FleetCommand::AddDeliveryPoint { position } => self.add_delivery_point(position),
            FleetCommand::SetTimeScale { scale } => self.set_time_scale(scale),
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        // 1. Flight (snapshot neighbors, then update in id order)
        systems::flight::run(
            &mut self.world,
            &self.drones,
            &self.settings.restricted_zone,
            self.time.elapsed_secs,
            &mut self.events,
        );
        // 2. Trails
        systems::flight::update_history(&mut self.world, self.time.tick);
    }
}
