//! Snapshot sinks: where the game loop sends each tick's state.

use std::io::Write;

use serde::Serialize;

use uatm_core::settings::DroneParams;
use uatm_core::state::FleetSnapshot;
use uatm_sim::telemetry;

use crate::cli::OutputFormat;
use crate::error::AppError;

/// End-of-run totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub ticks: u64,
    pub sim_time_secs: f64,
    pub total_drones: u32,
    pub active_drones: u32,
    pub deliveries_completed: u32,
    pub collisions_avoided: u32,
    pub average_battery: f64,
}

impl RunSummary {
    pub fn from_snapshot(ticks: u64, snapshot: &FleetSnapshot) -> Self {
        Self {
            ticks,
            sim_time_secs: snapshot.time.elapsed_secs,
            total_drones: snapshot.stats.total_count,
            active_drones: snapshot.stats.active_count,
            deliveries_completed: snapshot.stats.deliveries_completed,
            collisions_avoided: snapshot.stats.collisions_avoided,
            average_battery: snapshot.stats.average_battery,
        }
    }
}

/// Consumer of per-tick snapshots, driven from the game-loop thread.
pub trait SnapshotSink: Send {
    fn emit(&mut self, snapshot: &FleetSnapshot) -> Result<(), AppError>;

    fn finish(&mut self, _summary: &RunSummary) -> Result<(), AppError> {
        Ok(())
    }
}

/// Writes one JSON document per line.
pub struct JsonLinesSink<W: Write + Send> {
    writer: W,
    format: OutputFormat,
    every: u64,
    params: DroneParams,
    seen: u64,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W, format: OutputFormat, every: u64, params: DroneParams) -> Self {
        Self {
            writer,
            format,
            every: every.max(1),
            params,
            seen: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_line<T: Serialize>(&mut self, value: &T) -> Result<(), AppError> {
        serde_json::to_writer(&mut self.writer, value)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}

impl<W: Write + Send> SnapshotSink for JsonLinesSink<W> {
    fn emit(&mut self, snapshot: &FleetSnapshot) -> Result<(), AppError> {
        self.seen += 1;
        if (self.seen - 1) % self.every != 0 {
            return Ok(());
        }
        match self.format {
            OutputFormat::Snapshot => self.write_line(snapshot)?,
            OutputFormat::Telemetry => {
                self.write_line(&telemetry::drone_positions(snapshot))?;
                let status = telemetry::fleet_status(snapshot, &self.params);
                self.write_line(&status)?;
            }
            OutputFormat::Summary => return Ok(()),
        }
        self.writer.flush()?;
        Ok(())
    }

    fn finish(&mut self, summary: &RunSummary) -> Result<(), AppError> {
        if self.format == OutputFormat::Summary {
            self.write_line(summary)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
