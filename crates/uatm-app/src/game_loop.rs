//! Game loop thread: ticks the fleet engine and feeds snapshots to a sink.
//!
//! The engine is created inside the thread so it never crosses threads.
//! Commands arrive via an `mpsc` channel. The latest snapshot is also kept in
//! shared state for synchronous polling.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use uatm_core::commands::FleetCommand;
use uatm_core::constants::TICK_RATE;
use uatm_core::enums::FleetStatus;
use uatm_core::state::FleetSnapshot;
use uatm_sim::engine::{FleetEngine, SimConfig};

use crate::error::AppError;
use crate::output::{RunSummary, SnapshotSink};
use crate::state::LoopCommand;

/// Nominal duration of one tick at 1x speed.
const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// When the loop ends on its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoopOptions {
    /// Hard cap on ticks (counted whether or not the fleet is running).
    pub max_ticks: Option<u64>,
    /// End once the fleet is running and every drone is parked.
    pub until_idle: bool,
    /// Sleep between ticks instead of running flat out.
    pub realtime: bool,
}

impl LoopOptions {
    fn finished(&self, ticks: u64, snapshot: &FleetSnapshot) -> bool {
        if self.max_ticks.is_some_and(|max| ticks >= max) {
            return true;
        }
        self.until_idle
            && snapshot.status == FleetStatus::Running
            && snapshot.stats.active_count == 0
    }
}

/// Spawns the game loop in a new thread.
///
/// `initial_commands` are queued on the engine before the first tick.
/// Returns the command sender and the thread handle, which yields the run
/// summary.
pub fn spawn_game_loop(
    config: SimConfig,
    options: LoopOptions,
    initial_commands: Vec<FleetCommand>,
    sink: Box<dyn SnapshotSink>,
    latest_snapshot: Arc<Mutex<Option<FleetSnapshot>>>,
) -> Result<
    (
        mpsc::Sender<LoopCommand>,
        JoinHandle<Result<RunSummary, AppError>>,
    ),
    AppError,
> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<LoopCommand>();

    let handle = std::thread::Builder::new()
        .name("uatm-game-loop".into())
        .spawn(move || {
            let mut engine = FleetEngine::new(config);
            engine.queue_commands(initial_commands);
            run_game_loop(engine, options, cmd_rx, sink, &latest_snapshot)
        })
        .map_err(AppError::Spawn)?;

    Ok((cmd_tx, handle))
}

/// The game loop. Runs until the options say stop, a Shutdown command, or
/// channel disconnect.
fn run_game_loop(
    mut engine: FleetEngine,
    options: LoopOptions,
    cmd_rx: mpsc::Receiver<LoopCommand>,
    mut sink: Box<dyn SnapshotSink>,
    latest_snapshot: &Mutex<Option<FleetSnapshot>>,
) -> Result<RunSummary, AppError> {
    let mut next_tick_time = Instant::now();
    let mut ticks = 0u64;
    let mut summary = RunSummary::default();

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(LoopCommand::Fleet(cmd)) => engine.queue_command(cmd),
                Ok(LoopCommand::Shutdown) => {
                    debug!(ticks, "game loop shutdown requested");
                    return close(sink, summary);
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return close(sink, summary),
            }
        }

        // 2. Advance one tick (engine handles pause semantics internally)
        let snapshot = engine.tick();
        ticks += 1;

        // 3. Hand the snapshot to the sink
        sink.emit(&snapshot)?;
        summary = RunSummary::from_snapshot(ticks, &snapshot);
        let done = options.finished(ticks, &snapshot);

        // 4. Store latest snapshot for synchronous polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        if done {
            info!(
                ticks,
                deliveries = summary.deliveries_completed,
                "game loop finished"
            );
            return close(sink, summary);
        }

        if !options.realtime {
            continue;
        }

        // 5. Sleep until next tick, adjusting for time_scale
        let time_scale = engine.time_scale();
        let effective_tick_duration = if time_scale > 0.001 {
            TICK_DURATION.div_f64(time_scale)
        } else {
            TICK_DURATION
        };

        next_tick_time += effective_tick_duration;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > effective_tick_duration * 2 {
            // Too far behind, reset to avoid a catch-up spiral
            next_tick_time = now;
        }
    }
}

fn close(mut sink: Box<dyn SnapshotSink>, summary: RunSummary) -> Result<RunSummary, AppError> {
    sink.finish(&summary)?;
    Ok(summary)
}
