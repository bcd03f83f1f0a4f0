//! The unit contract: what a unit sees each tick and what it reports back.

use serde::{Deserialize, Serialize};

use nightwatch_core::enums::{DoorSide, EnemyKind, EnemyMode};
use nightwatch_core::rooms::RoomNode;

/// Read-only view of the world shared by every unit for one tick.
///
/// Built once by the engine before any unit advances, so every unit reacts
/// to the state as it was at tick start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitContext {
    /// Room whose camera the player is watching (at post, camera intact).
    pub watched_room: Option<RoomNode>,
    /// The surveillance panel is up.
    pub camera_open: bool,
    /// The player has teleported away from the protected room.
    pub player_away: bool,
    /// A teleport transit is in progress.
    pub in_transit: bool,
    /// Room of the lure while it is playing.
    pub lure: Option<RoomNode>,
    pub apparatus_present: bool,
    /// Doorway lit by the flashlight.
    pub flashlight: Option<DoorSide>,
    /// Both camera breakers stand in the watched room.
    pub shared_watch: bool,
    /// Kinds the Medic may target right now.
    pub heal_candidates: Vec<EnemyKind>,
    /// The Medic's current target is mid-attack.
    pub heal_target_busy: bool,
}

/// Something a unit did while advancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitSignal {
    Moved { from: RoomNode, to: RoomNode },
    ArrivedAtDoorway { side: DoorSide },
    /// The unit is attacking the protected room and must be answered.
    ReachedTarget { side: DoorSide },
    /// Siege rocket hitting the apparatus.
    Projectile { damage: u32 },
    /// Sapper tick on the apparatus.
    SapDamage { damage: u32 },
    CameraDestroyed { camera: RoomNode },
    ChargeReady { side: DoorSide },
    MatchLit,
    Burned,
    ModeChanged { mode: EnemyMode },
    TargetAcquired { target: EnemyKind },
    Respawned,
    Lured,
    Released,
    /// Left on its own accord (evaded burn, flashlight), awarding `bonus`.
    Repelled { bonus: u32 },
    Crackle { room: RoomNode },
    BreachStarted,
}
