use std::path::PathBuf;

/// Errors surfaced by the runner.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("failed to read config {path}: {source}")]
    ReadConfig {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    ParseConfig {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid settings: {}", .0.join("; "))]
    InvalidSettings(Vec<String>),

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to spawn game loop: {0}")]
    Spawn(std::io::Error),

    #[error("simulation not started")]
    NotStarted,

    #[error("simulation already running")]
    AlreadyRunning,

    #[error("game loop is gone")]
    LoopClosed,

    #[error("game loop panicked")]
    LoopPanicked,

    #[error("shared state lock poisoned")]
    LockPoisoned,
}
