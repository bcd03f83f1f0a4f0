//! Core types and definitions for the NIGHTWATCH threat simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! rooms, enemy kinds, player intents, events, state snapshots, session
//! config and tuning constants. It owns no random source and no engine.

pub mod commands;
pub mod config;
pub mod constants;
pub mod enums;
pub mod events;
pub mod rooms;
pub mod select;
pub mod state;
pub mod types;
