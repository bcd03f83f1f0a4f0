//! Systems run by the engine each tick.
//!
//! Systems are free functions over the state the engine hands them. They
//! never own state beyond the small structs defined alongside them.

pub mod apparatus;
pub mod evasion;
pub mod lure;
pub mod resolution;
pub mod snapshot;
pub mod surveillance;
