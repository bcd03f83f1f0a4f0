//! Scripted player used by the headless runner.
//!
//! Reads only what the snapshot exposes, the same information a human sees
//! on the panel, and answers with one tick worth of intents.

use nightwatch_core::commands::{PlayerAction, PlayerIntents};
use nightwatch_core::constants::{
    APPARATUS_BUILD_COST, APPARATUS_FIRE_COST, APPARATUS_REPAIR_CEILING, TELEPORT_COST,
};
use nightwatch_core::enums::{EnemyKind, EnemyStatus};
use nightwatch_core::rooms::RoomNode;
use nightwatch_core::state::{EnemyView, GameStateSnapshot};

/// Picks the intents for the next tick from the last snapshot.
pub fn decide(snapshot: &GameStateSnapshot) -> PlayerIntents {
    let player = &snapshot.player;
    if player.transit_target.is_some() {
        return PlayerIntents::default();
    }
    if player.teleported {
        return away(snapshot);
    }
    at_post(snapshot)
}

fn at_post(snapshot: &GameStateSnapshot) -> PlayerIntents {
    let metal = snapshot.resources.metal;
    let apparatus = &snapshot.apparatus;
    let mut intents = PlayerIntents::default();

    if snapshot
        .enemies
        .iter()
        .any(|e| e.kind == EnemyKind::Pyro && e.status == EnemyStatus::Burning)
    {
        if let Some(room) = safe_room(snapshot) {
            if metal >= TELEPORT_COST {
                intents.action = Some(PlayerAction::Teleport { room });
                return intents;
            }
        }
    }

    // A Pyro standing in a doorway goes away under the flashlight.
    intents.flashlight = snapshot
        .enemies
        .iter()
        .find(|e| e.kind == EnemyKind::Pyro && e.status == EnemyStatus::Roaming)
        .and_then(|e| e.doorway);

    if apparatus.sapped {
        intents.action = Some(PlayerAction::PressSapper);
        return intents;
    }
    if !apparatus.exists {
        if metal >= APPARATUS_BUILD_COST {
            intents.action = Some(PlayerAction::Build);
        }
        return intents;
    }

    if let Some(target) = snapshot.enemies.iter().find(|e| worth_a_shot(e)) {
        if apparatus.cooldown_ms == 0 && metal >= APPARATUS_FIRE_COST {
            intents.manual_aim = true;
            intents.aim = target.doorway;
            intents.action = Some(PlayerAction::Fire);
            return intents;
        }
    }

    let missing = apparatus.max_hp.saturating_sub(apparatus.hp);
    if missing > 0 && metal >= missing.min(APPARATUS_REPAIR_CEILING) + APPARATUS_FIRE_COST {
        intents.action = Some(PlayerAction::Repair);
    }
    intents
}

fn away(snapshot: &GameStateSnapshot) -> PlayerIntents {
    let burning = snapshot
        .enemies
        .iter()
        .any(|e| e.kind == EnemyKind::Pyro && e.status == EnemyStatus::Burning);
    if burning {
        return PlayerIntents::default();
    }
    PlayerIntents {
        action: Some(PlayerAction::ReturnToPost),
        ..PlayerIntents::default()
    }
}

/// Doorway attackers the apparatus can repel with a shot.
fn worth_a_shot(enemy: &EnemyView) -> bool {
    if enemy.doorway.is_none() || enemy.invulnerable {
        return false;
    }
    !matches!(enemy.kind, EnemyKind::Heavy | EnemyKind::Pyro)
}

/// First patrol room no known enemy stands in.
fn safe_room(snapshot: &GameStateSnapshot) -> Option<RoomNode> {
    RoomNode::PATROL_ROOMS.iter().copied().find(|&room| {
        room != snapshot.player.room && !snapshot.enemies.iter().any(|e| e.room == Some(room))
    })
}
