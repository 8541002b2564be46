//! Application state shared between the caller and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use uatm_core::commands::FleetCommand;
use uatm_core::state::FleetSnapshot;
use uatm_sim::engine::SimConfig;

use crate::error::AppError;
use crate::game_loop::{self, LoopOptions};
use crate::output::{RunSummary, SnapshotSink};

/// Commands sent to the game loop thread.
#[derive(Debug)]
pub enum LoopCommand {
    /// Forward to the fleet engine.
    Fleet(FleetCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Handle to a running simulation.
///
/// `mpsc::Sender` is wrapped in a `Mutex` so the state can be shared across
/// threads; the latest snapshot sits behind `Arc<Mutex<..>>` because the game
/// loop writes it after every tick.
pub struct AppState {
    /// `None` before `start_simulation`.
    pub command_tx: Mutex<Option<mpsc::Sender<LoopCommand>>>,
    pub latest_snapshot: Arc<Mutex<Option<FleetSnapshot>>>,
    pub running: Mutex<bool>,
    handle: Mutex<Option<JoinHandle<Result<RunSummary, AppError>>>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
            running: Mutex::new(false),
            handle: Mutex::new(None),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn the game loop. Fails if one is already running.
    pub fn start_simulation(
        &self,
        config: SimConfig,
        options: LoopOptions,
        initial_commands: Vec<FleetCommand>,
        sink: Box<dyn SnapshotSink>,
    ) -> Result<(), AppError> {
        let mut running = self.running.lock().map_err(|_| AppError::LockPoisoned)?;
        if *running {
            return Err(AppError::AlreadyRunning);
        }

        let (cmd_tx, handle) = game_loop::spawn_game_loop(
            config,
            options,
            initial_commands,
            sink,
            self.latest_snapshot.clone(),
        )?;

        *self.command_tx.lock().map_err(|_| AppError::LockPoisoned)? = Some(cmd_tx);
        *self.handle.lock().map_err(|_| AppError::LockPoisoned)? = Some(handle);
        *running = true;
        Ok(())
    }

    pub fn send_command(&self, command: FleetCommand) -> Result<(), AppError> {
        let tx_lock = self.command_tx.lock().map_err(|_| AppError::LockPoisoned)?;
        match tx_lock.as_ref() {
            Some(tx) => tx
                .send(LoopCommand::Fleet(command))
                .map_err(|_| AppError::LoopClosed),
            None => Err(AppError::NotStarted),
        }
    }

    /// Latest snapshot, if the loop has ticked at least once.
    pub fn snapshot(&self) -> Result<Option<FleetSnapshot>, AppError> {
        let lock = self.latest_snapshot.lock().map_err(|_| AppError::LockPoisoned)?;
        Ok(lock.clone())
    }

    /// Block until the loop ends on its own.
    pub fn wait(&self) -> Result<RunSummary, AppError> {
        let handle = self
            .handle
            .lock()
            .map_err(|_| AppError::LockPoisoned)?
            .take()
            .ok_or(AppError::NotStarted)?;
        let result = handle.join().map_err(|_| AppError::LoopPanicked)?;
        *self.running.lock().map_err(|_| AppError::LockPoisoned)? = false;
        *self.command_tx.lock().map_err(|_| AppError::LockPoisoned)? = None;
        result
    }

    /// Ask the loop to stop, then wait for it.
    pub fn shutdown(&self) -> Result<RunSummary, AppError> {
        if let Some(tx) = self
            .command_tx
            .lock()
            .map_err(|_| AppError::LockPoisoned)?
            .as_ref()
        {
            // A closed channel means the loop already ended.
            let _ = tx.send(LoopCommand::Shutdown);
        }
        self.wait()
    }
}
