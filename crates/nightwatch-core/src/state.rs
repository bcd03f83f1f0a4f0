//! Game state snapshot: the complete visible state handed to the caller
//! after each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::SimEvent;
use crate::rooms::RoomNode;
use crate::types::SimTime;

/// Complete result of one tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    /// In-game hour, 0 = 12 AM.
    pub hour: u8,
    pub phase: SessionPhase,
    /// Events raised during this tick, in the order they happened.
    pub events: Vec<SimEvent>,
    pub game_over: Option<GameOver>,
    pub victory: bool,
    /// Net metal change over this tick.
    pub metal_delta: i64,
    pub resources: ResourceView,
    pub apparatus: ApparatusView,
    pub enemies: Vec<EnemyView>,
    pub cameras: Vec<CameraView>,
    pub lure: Option<LureView>,
    pub player: PlayerView,
}

/// Terminal loss description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOver {
    pub enemy: EnemyKind,
    pub cause: LossCause,
    /// Human-readable cause naming the enemy.
    pub reason: String,
}

impl GameOver {
    pub fn new(enemy: EnemyKind, cause: LossCause) -> Self {
        let reason = match cause {
            LossCause::Attack => format!("the {enemy} broke into the intel room"),
            LossCause::Caught => format!("the {enemy} was waiting in that room"),
            LossCause::Overheard => format!("the {enemy} heard you and closed in"),
            LossCause::Burned => format!("the {enemy} set the intel room ablaze"),
        };
        Self {
            enemy,
            cause,
            reason,
        }
    }
}

/// Metal pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceView {
    pub metal: u32,
    pub max_metal: u32,
    /// False while regeneration is suppressed.
    pub regenerating: bool,
}

/// Defense apparatus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApparatusView {
    pub exists: bool,
    pub level: u8,
    pub hp: u32,
    pub max_hp: u32,
    pub manual_aim: bool,
    pub aim: Option<DoorSide>,
    pub cooldown_ms: u32,
    pub sapped: bool,
}

/// One enemy unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyView {
    pub kind: EnemyKind,
    pub status: EnemyStatus,
    pub active: bool,
    pub ai_level: u8,
    /// Current location, `None` while despawned or inert.
    pub room: Option<RoomNode>,
    /// Doorway occupied, if any.
    pub doorway: Option<DoorSide>,
    /// Shows on a camera watching `room`.
    pub visible_on_cameras: bool,
    /// What the cameras show, for disguised units.
    pub appears_as: Option<EnemyKind>,
    /// Under a Medic grant.
    pub invulnerable: bool,
    /// Camera-break progress, 0-1000.
    pub watch_progress: u32,
    /// Demoman only: where the head sits.
    pub head_room: Option<RoomNode>,
}

/// One surveillance point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraView {
    pub camera: RoomNode,
    pub destroyed: bool,
    pub destroyed_until_ms: Option<u64>,
    pub destroyed_by: Option<EnemyKind>,
    /// The player has this camera open.
    pub watched: bool,
}

/// The single lure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LureView {
    pub room: RoomNode,
    pub playing: bool,
    pub remaining_ms: u32,
}

/// Player location and evasion state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub teleported: bool,
    pub room: RoomNode,
    pub transit_target: Option<RoomNode>,
    pub transit_remaining_ms: u32,
    pub escape_source: Option<EnemyKind>,
    pub escape_remaining_ms: u32,
}

/// Final per-session result handed to the progression collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub night: u8,
    pub victory: bool,
    pub game_over: Option<GameOver>,
    /// Highest apparatus level reached during the session (0 if never built).
    pub apparatus_max_level: u8,
    pub elapsed_ms: u64,
}
