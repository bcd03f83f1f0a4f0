//! Fundamental simulation types.

use serde::{Deserialize, Serialize};

use crate::constants::{HOUR_MS, NIGHT_HOURS, NIGHT_LENGTH_MS};

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimTime {
    /// Number of ticks processed so far.
    pub tick: u64,
    /// Elapsed simulation time in milliseconds.
    pub elapsed_ms: u64,
}

impl SimTime {
    /// Advance by one tick of `delta_ms`.
    pub fn advance(&mut self, delta_ms: u32) {
        self.tick = self.tick.saturating_add(1);
        self.elapsed_ms = self.elapsed_ms.saturating_add(u64::from(delta_ms));
    }

    /// In-game hour, 0 = 12 AM. Capped at 6 AM.
    pub fn hour(&self) -> u8 {
        let hour = self.elapsed_ms / u64::from(HOUR_MS);
        hour.min(u64::from(NIGHT_HOURS)) as u8
    }

    /// The night is over.
    pub fn night_complete(&self) -> bool {
        self.elapsed_ms >= NIGHT_LENGTH_MS
    }

    /// Clock-face label for an hour index, e.g. `0 -> "12 AM"`.
    pub fn hour_label(hour: u8) -> String {
        match hour {
            0 => "12 AM".to_string(),
            h => format!("{h} AM"),
        }
    }
}
