//! Simulation engine for NIGHTWATCH.
//!
//! Owns one night: the enemy units, the apparatus, the metal pool and the
//! player's evasion state. Runs the systems per tick and produces
//! `GameStateSnapshot`s for the presentation layer.

pub mod engine;
pub mod systems;

pub use engine::SimulationEngine;
pub use nightwatch_core as core;
pub use nightwatch_threat_ai as threat_ai;

#[cfg(test)]
mod tests;
