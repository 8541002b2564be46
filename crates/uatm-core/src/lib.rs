//! Core types and definitions for the urban air traffic simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! geometry, flight phases, settings, commands, events, state snapshots,
//! and constants. It has no dependency on any runtime or rendering framework.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod events;
pub mod geometry;
pub mod settings;
pub mod state;
pub mod types;
