//! Per-kind movement parameters: paths, cadences and respawn delays.

use nightwatch_core::constants::*;
use nightwatch_core::enums::{DoorSide, EnemyKind};
use nightwatch_core::rooms::RoomNode;

/// Scout route from spawn to its doorway.
pub const SCOUT_PATH: [RoomNode; 5] = [
    RoomNode::Spawn,
    RoomNode::Courtyard,
    RoomNode::Cafeteria,
    RoomNode::Lobby,
    RoomNode::LeftHall,
];

/// Soldier route from spawn to its doorway.
pub const SOLDIER_PATH: [RoomNode; 4] = [
    RoomNode::Spawn,
    RoomNode::Sewer,
    RoomNode::Utility,
    RoomNode::RightHall,
];

/// Demoman charge route for the given side. The last node is the doorway.
pub fn demo_charge_path(side: DoorSide) -> [RoomNode; 3] {
    match side {
        DoorSide::Left => [RoomNode::Courtyard, RoomNode::Lobby, RoomNode::LeftHall],
        DoorSide::Right => [RoomNode::Bridge, RoomNode::Balcony, RoomNode::RightHall],
    }
}

/// Interval between movement opportunities.
pub fn move_interval_ms(kind: EnemyKind) -> u32 {
    match kind {
        EnemyKind::Scout => SCOUT_MOVE_INTERVAL_MS,
        EnemyKind::Soldier => SOLDIER_MOVE_INTERVAL_MS,
        EnemyKind::Demoman => DEMO_CHARGE_STEP_MS,
        EnemyKind::Heavy => HEAVY_MOVE_INTERVAL_MS,
        EnemyKind::Sniper => SNIPER_MOVE_INTERVAL_MS,
        EnemyKind::Spy => SPY_MOVE_INTERVAL_MS,
        EnemyKind::Pyro => PYRO_HOP_INTERVAL_MS,
        EnemyKind::Medic => MEDIC_RESELECT_MS,
    }
}

/// Time a repelled unit stays gone. `None` for kinds that never despawn.
pub fn respawn_delay_ms(kind: EnemyKind) -> Option<u32> {
    match kind {
        EnemyKind::Scout => Some(SCOUT_RESPAWN_MS),
        EnemyKind::Soldier => Some(SOLDIER_RESPAWN_MS),
        EnemyKind::Sniper => Some(SNIPER_RESPAWN_MS),
        _ => None,
    }
}

/// Dormant time of the Demoman head at `ai_level`.
pub fn demo_dormant_ms(ai_level: u8) -> u32 {
    DEMO_DORMANT_BASE_MS
        .saturating_sub(DEMO_DORMANT_PER_LEVEL_MS * u32::from(ai_level))
        .max(DEMO_DORMANT_MIN_MS)
}

/// Sniper hits needed for a full repel at the given apparatus level.
pub fn sniper_hits_required(apparatus_level: u8) -> u8 {
    if apparatus_level >= 2 {
        1
    } else {
        SNIPER_HITS_REQUIRED
    }
}
