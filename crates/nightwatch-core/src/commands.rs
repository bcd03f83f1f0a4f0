//! Player intents fed to the simulation once per tick.
//!
//! Device input (keyboard, touch) is resolved upstream into these logical
//! intents. Continuous intents (aim, camera, flashlight) describe what the
//! player is holding this tick; `action` carries at most one discrete
//! action, validated in full before any state changes.

use serde::{Deserialize, Serialize};

use crate::enums::DoorSide;
use crate::rooms::RoomNode;

/// One discrete player action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerAction {
    // --- Apparatus ---
    /// Build a level 1 apparatus.
    Build,
    /// Restore HP, up to the per-action ceiling.
    Repair,
    /// Raise the apparatus one level.
    Upgrade,
    /// Fire at the manually aimed doorway.
    Fire,

    // --- Evasion ---
    /// Start a teleport transit. Repeating it during transit cancels.
    Teleport { room: RoomNode },
    /// Cancel an in-progress transit.
    CancelTeleport,
    /// Return to the protected room.
    ReturnToPost,

    // --- Distraction ---
    /// Place the single lure.
    PlaceLure { room: RoomNode },
    /// Start playing the placed lure.
    PlayLure,

    // --- Sabotage ---
    /// One press of the sapper-removal sequence.
    PressSapper,
}

/// Everything the player intends this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerIntents {
    /// Manual aim held.
    #[serde(default)]
    pub manual_aim: bool,
    /// Doorway the manual aim points at. Ignored unless `manual_aim`.
    #[serde(default)]
    pub aim: Option<DoorSide>,
    /// Camera currently open on the surveillance panel.
    #[serde(default)]
    pub camera: Option<RoomNode>,
    /// Doorway the flashlight is shining on.
    #[serde(default)]
    pub flashlight: Option<DoorSide>,
    /// At most one discrete action.
    #[serde(default)]
    pub action: Option<PlayerAction>,
}

/// Input for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Elapsed time since the previous tick.
    pub delta_ms: u32,
    #[serde(default)]
    pub intents: PlayerIntents,
}

impl TickInput {
    /// A tick with no player input.
    pub fn idle(delta_ms: u32) -> Self {
        Self {
            delta_ms,
            intents: PlayerIntents::default(),
        }
    }

    /// A tick carrying a single action and nothing else.
    pub fn action(delta_ms: u32, action: PlayerAction) -> Self {
        Self {
            delta_ms,
            intents: PlayerIntents {
                action: Some(action),
                ..PlayerIntents::default()
            },
        }
    }
}

/// Why an action was rejected. Rejections never change state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum Denial {
    #[error("the session is over")]
    SessionOver,
    #[error("the apparatus has not been built")]
    ApparatusAbsent,
    #[error("the apparatus already exists")]
    ApparatusPresent,
    #[error("the apparatus is not manually aimed at a doorway")]
    NotAimed,
    #[error("not enough metal (need {needed}, have {available})")]
    InsufficientMetal { needed: u32, available: u32 },
    #[error("the apparatus is still cooling down ({remaining_ms} ms)")]
    Cooldown { remaining_ms: u32 },
    #[error("the apparatus is already at full health")]
    FullHealth,
    #[error("the apparatus must be at full health to upgrade")]
    NotFullHealth,
    #[error("the apparatus is already at maximum level")]
    MaxLevel,
    #[error("the player is away from the protected room")]
    PlayerAway,
    #[error("the player is already at the protected room")]
    AlreadyAtPost,
    #[error("cannot teleport into the protected room")]
    ProtectedRoom,
    #[error("already in that room")]
    SameRoom,
    #[error("a teleport is in progress")]
    InTransit,
    #[error("no teleport is in progress")]
    NoTransit,
    #[error("a lure already exists")]
    LureExists,
    #[error("no lure has been placed")]
    NoLure,
    #[error("the lure is already playing")]
    LurePlaying,
    #[error("no sapper is attached")]
    NoSapper,
}
