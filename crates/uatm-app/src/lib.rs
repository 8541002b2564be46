//! UATM headless runner.
//!
//! Wires the simulation crates together behind a CLI: loads settings, runs
//! the engine on a game-loop thread, and streams snapshots or telemetry as
//! JSON lines.

pub mod cli;
pub mod config;
pub mod error;
pub mod game_loop;
pub mod output;
pub mod state;

pub use error::AppError;
pub use uatm_core as core;

use std::io::{self, BufWriter};

use tracing::info;
use uatm_core::commands::FleetCommand;
use uatm_sim::engine::SimConfig;

use crate::cli::Cli;
use crate::game_loop::LoopOptions;
use crate::output::{JsonLinesSink, RunSummary};
use crate::state::AppState;

/// Run one simulation as described by the command line, streaming to stdout.
///
/// Without `--ticks` the run ends once the fleet is parked again.
pub fn run(cli: &Cli) -> Result<RunSummary, AppError> {
    let settings = config::load(cli)?;
    let drone_count = settings.drone_count;
    let sink = JsonLinesSink::new(
        BufWriter::new(io::stdout()),
        cli.format,
        cli.every,
        settings.drone,
    );
    let sim = SimConfig {
        seed: cli.seed,
        time_scale: cli.time_scale,
        settings,
    };
    let options = LoopOptions {
        max_ticks: cli.ticks,
        until_idle: cli.until_idle || cli.ticks.is_none(),
        realtime: cli.realtime,
    };
    info!(drones = drone_count, seed = cli.seed, "starting fleet run");

    let state = AppState::new();
    state.start_simulation(
        sim,
        options,
        vec![
            FleetCommand::InitializeFleet { drone_count },
            FleetCommand::Start,
        ],
        Box::new(sink),
    )?;
    state.wait()
}
