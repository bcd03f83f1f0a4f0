//! Enumeration types used throughout the simulation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Antagonist type. Declaration order is the fixed evaluation order used
/// for apparatus-destruction and lethality checks within a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Fast linear attacker.
    Scout,
    /// Siege attacker.
    Soldier,
    /// Head/body dual entity.
    Demoman,
    /// Free-roaming tank, immune to the apparatus.
    Heavy,
    /// Long-range charger.
    Sniper,
    /// Disguise/sabotage unit.
    Spy,
    /// Mode-alternating ambush unit.
    Pyro,
    /// Support unit granting invulnerability.
    Medic,
}

impl EnemyKind {
    /// Every kind, in evaluation order.
    pub const ALL: [EnemyKind; 8] = [
        EnemyKind::Scout,
        EnemyKind::Soldier,
        EnemyKind::Demoman,
        EnemyKind::Heavy,
        EnemyKind::Sniper,
        EnemyKind::Spy,
        EnemyKind::Pyro,
        EnemyKind::Medic,
    ];

    /// Kinds the Medic may pick as its target.
    pub const HEALABLE: [EnemyKind; 3] = [EnemyKind::Scout, EnemyKind::Soldier, EnemyKind::Demoman];

    /// Kinds the Spy may show up as on cameras.
    pub const DISGUISES: [EnemyKind; 5] = [
        EnemyKind::Scout,
        EnemyKind::Soldier,
        EnemyKind::Demoman,
        EnemyKind::Heavy,
        EnemyKind::Sniper,
    ];

    /// Position in [`EnemyKind::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            EnemyKind::Scout => "scout",
            EnemyKind::Soldier => "soldier",
            EnemyKind::Demoman => "demoman",
            EnemyKind::Heavy => "heavy",
            EnemyKind::Sniper => "sniper",
            EnemyKind::Spy => "spy",
            EnemyKind::Pyro => "pyro",
            EnemyKind::Medic => "medic",
        }
    }

    /// Hears a teleported player in an adjacent room.
    pub fn listens_for_player(self) -> bool {
        matches!(self, EnemyKind::Heavy | EnemyKind::Sniper)
    }

    /// Smashes a camera that watches it for too long.
    pub fn breaks_cameras(self) -> bool {
        matches!(self, EnemyKind::Heavy | EnemyKind::Sniper)
    }

    /// Can be redirected by a playing lure.
    pub fn follows_lures(self) -> bool {
        matches!(self, EnemyKind::Heavy | EnemyKind::Sniper)
    }

    /// Teleport hops are held while the player is in teleport transit.
    pub fn holds_teleports_in_transit(self) -> bool {
        matches!(self, EnemyKind::Heavy | EnemyKind::Sniper | EnemyKind::Pyro)
    }

    /// Shots from the apparatus have no effect.
    pub fn immune_to_apparatus(self) -> bool {
        matches!(self, EnemyKind::Heavy)
    }

    /// Eligible as a Medic target.
    pub fn healable(self) -> bool {
        Self::HEALABLE.contains(&self)
    }
}

impl fmt::Display for EnemyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which of the two doorways.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DoorSide {
    Left,
    Right,
}

impl DoorSide {
    pub const ALL: [DoorSide; 2] = [DoorSide::Left, DoorSide::Right];

    pub fn opposite(self) -> DoorSide {
        match self {
            DoorSide::Left => DoorSide::Right,
            DoorSide::Right => DoorSide::Left,
        }
    }
}

/// Session-level state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    #[default]
    Active,
    Victory,
    Defeat,
}

/// Alternating behaviour modes reported through `ModeChanged`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyMode {
    /// Spy: harmless, shows up as another kind.
    Disguised,
    /// Spy: will sap the apparatus when the player leaves.
    Armed,
    /// Pyro: teleports among rooms, hidden from cameras.
    RoomMode,
    /// Pyro: may appear in the protected room.
    AmbushMode,
}

/// Coarse per-enemy status for the presentation layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyStatus {
    /// Force-despawned for the rest of the session.
    Inert,
    /// Driven away, waiting to respawn.
    Despawned,
    #[default]
    Approaching,
    AtDoorway,
    Attacking,
    Sieging,
    Breaching,
    Dormant,
    Warning,
    Charging,
    Patrolling,
    Lured,
    Perched,
    Disguised,
    Armed,
    Sapping,
    Retreating,
    Roaming,
    Lurking,
    Burning,
    Idle,
    Healing,
}

/// How the player lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossCause {
    /// An attack on the protected room went unanswered.
    Attack,
    /// The player teleported into (or was found in) an occupied room.
    Caught,
    /// The escape countdown ran out.
    Overheard,
    /// The Pyro's ambush countdown ran out.
    Burned,
}

/// Why the apparatus was destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DestroyCause {
    /// HP drained by siege rockets.
    Siege,
    /// HP drained by a sapper.
    Sapper,
    /// Sacrificed to repel an attacker while unaimed.
    AutoDefense,
    /// A shot reflected back by a doorway Pyro.
    Reflected,
    /// Wrecked by an invulnerable attacker while the player was away.
    Overpowered,
}

/// Result of a manual shot at the aimed doorway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ShotResult {
    /// The occupant was driven off. `bonus` metal was awarded.
    Repelled { enemy: EnemyKind, bonus: u32 },
    /// The occupant took a hit but holds its ground.
    PartialHit { enemy: EnemyKind, hits: u8, required: u8 },
    /// The occupant reflected the attack and destroyed the apparatus.
    Reflected { enemy: EnemyKind },
    /// The occupant shrugged the shot off.
    Immune { enemy: EnemyKind },
    /// The occupant is under a Medic grant.
    Invulnerable { enemy: EnemyKind },
    /// Nobody was in the doorway.
    Missed,
}
