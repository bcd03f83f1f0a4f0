//! Events emitted by the simulation for the presentation layer.
//!
//! The engine appends these to a per-tick queue; the caller renders, plays
//! sound, and shows feedback from them. Nothing in the core depends on how
//! they are consumed.

use serde::{Deserialize, Serialize};

use crate::commands::{Denial, PlayerAction};
use crate::enums::*;
use crate::rooms::RoomNode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    // --- Clock ---
    /// The in-game hour changed.
    HourChanged { hour: u8 },

    // --- Player actions ---
    /// An action was rejected; no state changed.
    ActionDenied { action: PlayerAction, reason: Denial },

    // --- Apparatus ---
    ApparatusBuilt,
    ApparatusRepaired { hp: u32, cost: u32 },
    ApparatusUpgraded { level: u8 },
    ApparatusDamaged { source: EnemyKind, amount: u32, hp: u32 },
    ApparatusDestroyed { cause: DestroyCause, by: Option<EnemyKind> },
    /// A manual shot went off at `side`.
    ShotFired { side: DoorSide, result: ShotResult },
    /// The unaimed apparatus sacrificed itself to repel an attacker.
    AutoDefenseTriggered { enemy: EnemyKind },
    /// Metal awarded on top of regeneration.
    MetalBonus { amount: u32, from: EnemyKind },

    // --- Enemies ---
    EnemyMoved { enemy: EnemyKind, from: RoomNode, to: RoomNode },
    EnemyAtDoorway { enemy: EnemyKind, side: DoorSide },
    /// An enemy started its attack on the protected room.
    EnemyAttacking { enemy: EnemyKind },
    EnemyRepelled { enemy: EnemyKind },
    EnemyRespawned { enemy: EnemyKind },
    /// An attacker is waiting at a doorway for the player to come back.
    EnemyWaiting { enemy: EnemyKind },
    ModeChanged { enemy: EnemyKind, mode: EnemyMode },
    /// The Medic picked a new target.
    TargetAcquired { target: EnemyKind },
    /// The Medic's grant ended.
    InvulnerabilityCleared { target: EnemyKind },
    ChargeReady { enemy: EnemyKind, side: DoorSide },
    /// The Soldier lost its apparatus target and is breaching.
    BreachStarted { enemy: EnemyKind },
    /// The Pyro appeared in the protected room.
    MatchLit,
    /// Audible cue of the hidden Pyro moving.
    Crackle { room: RoomNode },
    SapperAttached,
    SapperPress { presses: u8, required: u8 },
    SapperRemoved { apparatus_destroyed: bool },
    EnemyLured { enemy: EnemyKind },
    EnemyReleased { enemy: EnemyKind },

    // --- Surveillance ---
    CameraDestroyed { camera: RoomNode, by: EnemyKind },
    CameraRestored { camera: RoomNode },

    // --- Evasion ---
    TeleportStarted { room: RoomNode },
    TeleportCancelled { room: RoomNode },
    TeleportCompleted { room: RoomNode },
    ReturnedToPost,
    /// A listener is adjacent; leave before the countdown runs out.
    EscapeCountdownStarted { enemy: EnemyKind, remaining_ms: u32 },
    EscapeCountdownCleared,

    // --- Distraction ---
    LurePlaced { room: RoomNode },
    LurePlaying { room: RoomNode },
    LureConsumed { room: RoomNode },
}
