//! Threat AI for NIGHTWATCH.
//!
//! One state machine per enemy kind, driven by integer millisecond timers
//! and an injected random source. Units never see each other; the engine
//! hands them a [`UnitContext`] each tick and applies the [`UnitSignal`]s
//! they return.

pub mod context;
pub mod demoman;
pub mod dice;
pub mod medic;
pub mod profiles;
pub mod pyro;
pub mod roamer;
pub mod scout;
pub mod soldier;
pub mod spy;
pub mod unit;

pub use context::{UnitContext, UnitSignal};
pub use nightwatch_core as core;
pub use spy::SapperPress;
pub use unit::{Behavior, EnemyUnit, HitOutcome, Presence, UnitCore};
