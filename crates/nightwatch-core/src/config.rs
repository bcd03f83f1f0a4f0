//! Session configuration: which night is played and with which enemy AI levels.
//!
//! Nights 1-6 use fixed presets that ramp up at 2, 3 and 4 AM. Night 7 is the
//! custom night: levels come straight from the config and never ramp, and any
//! enemy can be switched off for the whole session.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{AI_RAMP_HOURS, CUSTOM_NIGHT, MAX_AI_LEVEL, METAL_MAX, METAL_START};
use crate::enums::EnemyKind;

/// Errors that can occur when loading or validating a session config.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the config file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse JSON content.
    #[error("failed to parse config JSON: {source}")]
    Json { source: serde_json::Error },

    #[error("night {night} does not exist (expected 1-7)")]
    InvalidNight { night: u8 },

    #[error("AI level {level} for {enemy} is out of range (0-20)")]
    AiLevelOutOfRange { enemy: EnemyKind, level: u8 },

    #[error("starting metal {metal} exceeds the cap of 200")]
    StartingMetal { metal: u32 },
}

impl From<serde_json::Error> for ConfigError {
    fn from(source: serde_json::Error) -> Self {
        Self::Json { source }
    }
}

/// Per-enemy AI levels, indexed by [`EnemyKind::index`].
pub type AiLevels = [u8; 8];

/// Base AI levels of the preset nights, in [`EnemyKind::ALL`] order.
const NIGHT_PRESETS: [AiLevels; 6] = [
    [4, 2, 0, 0, 0, 0, 0, 0],
    [6, 4, 3, 2, 0, 0, 0, 0],
    [8, 6, 5, 4, 3, 3, 0, 0],
    [10, 8, 7, 6, 5, 5, 4, 3],
    [12, 10, 9, 8, 7, 7, 6, 5],
    [15, 13, 12, 11, 10, 10, 9, 8],
];

/// Everything needed to start a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Seed for the session's random source.
    #[serde(default)]
    pub seed: u64,

    /// Night number, 1-6 for presets, 7 for the custom night.
    #[serde(default = "default_night")]
    pub night: u8,

    /// Custom night levels. Enemies not listed play at level 0.
    #[serde(default)]
    pub ai_levels: BTreeMap<EnemyKind, u8>,

    /// Enemies permanently inert for this session (custom night only).
    #[serde(default)]
    pub force_despawn: Vec<EnemyKind>,

    #[serde(default = "default_starting_metal")]
    pub starting_metal: u32,
}

fn default_night() -> u8 {
    1
}

fn default_starting_metal() -> u32 {
    METAL_START
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::night(1)
    }
}

impl SessionConfig {
    /// A preset night.
    pub fn night(night: u8) -> Self {
        Self {
            seed: 0,
            night,
            ai_levels: BTreeMap::new(),
            force_despawn: Vec::new(),
            starting_metal: METAL_START,
        }
    }

    /// A custom night with explicit levels. Unlisted enemies stay at 0.
    pub fn custom(levels: impl IntoIterator<Item = (EnemyKind, u8)>) -> Self {
        Self {
            night: CUSTOM_NIGHT,
            ai_levels: levels.into_iter().collect(),
            ..Self::night(CUSTOM_NIGHT)
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_force_despawn(mut self, kind: EnemyKind) -> Self {
        if !self.force_despawn.contains(&kind) {
            self.force_despawn.push(kind);
        }
        self
    }

    pub fn with_starting_metal(mut self, metal: u32) -> Self {
        self.starting_metal = metal;
        self
    }

    pub fn is_custom(&self) -> bool {
        self.night == CUSTOM_NIGHT
    }

    /// Levels at 12 AM, before any ramp.
    pub fn base_levels(&self) -> AiLevels {
        if self.is_custom() {
            let mut levels = [0; 8];
            for (kind, level) in &self.ai_levels {
                levels[kind.index()] = (*level).min(MAX_AI_LEVEL);
            }
            return levels;
        }
        let preset = usize::from(self.night.clamp(1, 6)) - 1;
        NIGHT_PRESETS[preset]
    }

    /// Level of `kind` at `hour`, with the hourly ramp applied on preset nights.
    pub fn ai_level(&self, kind: EnemyKind, hour: u8) -> u8 {
        let base = self.base_levels()[kind.index()];
        if self.is_custom() || base == 0 {
            return base;
        }
        let ramp = AI_RAMP_HOURS.iter().filter(|h| **h <= hour).count() as u8;
        base.saturating_add(ramp).min(MAX_AI_LEVEL)
    }

    /// Force-despawn only applies on the custom night.
    pub fn is_force_despawned(&self, kind: EnemyKind) -> bool {
        self.is_custom() && self.force_despawn.contains(&kind)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.night == 0 || self.night > CUSTOM_NIGHT {
            return Err(ConfigError::InvalidNight { night: self.night });
        }
        if let Some((enemy, level)) = self.ai_levels.iter().find(|(_, l)| **l > MAX_AI_LEVEL) {
            return Err(ConfigError::AiLevelOutOfRange {
                enemy: *enemy,
                level: *level,
            });
        }
        if self.starting_metal > METAL_MAX {
            return Err(ConfigError::StartingMetal {
                metal: self.starting_metal,
            });
        }
        Ok(())
    }

    /// Parse and validate a config from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] on malformed JSON, or a validation
    /// variant when a value is out of range.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}
