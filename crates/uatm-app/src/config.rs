//! Settings loading: JSON file, CLI overrides, validation.

use std::path::Path;

use tracing::{debug, info};
use uatm_core::enums::RouteCheck;
use uatm_core::settings::FleetSettings;

use crate::cli::Cli;
use crate::error::AppError;

/// Settings for this run: file (or defaults), then CLI overrides, then validation.
pub fn load(cli: &Cli) -> Result<FleetSettings, AppError> {
    let mut settings = match cli.config.as_deref() {
        Some(path) => read_settings(path)?,
        None => FleetSettings::default(),
    };
    apply_overrides(&mut settings, cli);
    validate(settings)
}

pub fn read_settings(path: &Path) -> Result<FleetSettings, AppError> {
    let text = std::fs::read_to_string(path).map_err(|source| AppError::ReadConfig {
        path: path.to_path_buf(),
        source,
    })?;
    let settings = serde_json::from_str(&text).map_err(|source| AppError::ParseConfig {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "loaded fleet settings");
    Ok(settings)
}

pub fn apply_overrides(settings: &mut FleetSettings, cli: &Cli) {
    if let Some(drones) = cli.drones {
        debug!(drones, "drone count overridden");
        settings.drone_count = drones;
    }
    if cli.segment_check {
        settings.drone.route_check = RouteCheck::Segment;
    }
}

pub fn validate(settings: FleetSettings) -> Result<FleetSettings, AppError> {
    let problems = settings.validate();
    if problems.is_empty() {
        Ok(settings)
    } else {
        Err(AppError::InvalidSettings(problems))
    }
}
