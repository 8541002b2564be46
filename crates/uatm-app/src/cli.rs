//! Command-line interface.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// What gets written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One full fleet snapshot per line.
    #[default]
    Snapshot,
    /// `drone_positions` and `fleet_status` telemetry messages.
    Telemetry,
    /// Only the end-of-run summary.
    Summary,
}

/// Headless urban air traffic fleet simulator
#[derive(Parser, Debug, Clone)]
#[command(name = "uatm", version, about)]
pub struct Cli {
    /// Fleet settings file (JSON). Missing fields use defaults.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of drones, overriding the settings file
    #[arg(long)]
    pub drones: Option<usize>,

    /// RNG seed for task point placement
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Stop after this many ticks
    #[arg(long)]
    pub ticks: Option<u64>,

    /// Pacing multiplier for --realtime (clamped to 0..=4)
    #[arg(long, default_value_t = 1.0)]
    pub time_scale: f64,

    /// Stop once every drone is parked again
    #[arg(long)]
    pub until_idle: bool,

    /// Pace ticks at 60 Hz divided by the time scale instead of running flat out
    #[arg(long)]
    pub realtime: bool,

    /// Also reroute legs whose straight path crosses the restricted zone
    #[arg(long)]
    pub segment_check: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Snapshot)]
    pub format: OutputFormat,

    /// Write every Nth tick only
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    pub every: u64,
}
