//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Drone behavior lives in `uatm-flight`, not here.

use serde::{Deserialize, Serialize};

use crate::types::Position;

/// Marks an entity as a charging pad. Its location is the entity's `Position`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RechargeStation {
    /// Stable index in the configured station list.
    pub index: usize,
}

/// History of positions for trail rendering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PositionHistory {
    /// Recent positions (newest first), up to MAX_HISTORY_DOTS.
    pub positions: Vec<Position>,
}
