//! Resolution system: turns unit signals into world changes and settles
//! attacks on the protected room.
//!
//! Units are visited in [`EnemyKind::ALL`] order, so when several attacks
//! land on the same tick the earlier kind decides the outcome.

use rand::Rng;
use tracing::{debug, info, warn};

use nightwatch_core::enums::{DestroyCause, DoorSide, EnemyKind, LossCause, ShotResult};
use nightwatch_core::events::SimEvent;
use nightwatch_core::rooms::RoomNode;

use nightwatch_threat_ai::{EnemyUnit, HitOutcome, UnitSignal};

use super::apparatus::{Apparatus, ResourcePool};

/// Kind currently holding a Medic grant.
pub fn grant_holder(units: &[EnemyUnit]) -> Option<EnemyKind> {
    units.iter().find_map(EnemyUnit::heal_target)
}

fn clear_grant(units: &mut [EnemyUnit], target: EnemyKind, events: &mut Vec<SimEvent>) {
    for unit in units.iter_mut().filter(|u| u.heal_target() == Some(target)) {
        unit.clear_target();
    }
    debug!(%target, "invulnerability cleared");
    events.push(SimEvent::InvulnerabilityCleared { target });
}

/// Removes the apparatus and lets every unit react to its loss.
pub fn destroy_apparatus(
    apparatus: &mut Apparatus,
    units: &mut [EnemyUnit],
    cause: DestroyCause,
    by: Option<EnemyKind>,
    events: &mut Vec<SimEvent>,
) {
    apparatus.destroy();
    warn!(?cause, ?by, "apparatus destroyed");
    events.push(SimEvent::ApparatusDestroyed { cause, by });
    for unit in units.iter_mut() {
        if unit.sapper_attached() {
            events.push(SimEvent::SapperRemoved {
                apparatus_destroyed: true,
            });
        }
        if let Some(UnitSignal::BreachStarted) = unit.on_apparatus_lost() {
            events.push(SimEvent::BreachStarted { enemy: unit.kind() });
        }
    }
}

fn damage_apparatus(
    apparatus: &mut Apparatus,
    units: &mut [EnemyUnit],
    source: EnemyKind,
    amount: u32,
    cause: DestroyCause,
    events: &mut Vec<SimEvent>,
) {
    if !apparatus.exists() {
        return;
    }
    let destroyed = apparatus.damage(amount);
    events.push(SimEvent::ApparatusDamaged {
        source,
        amount,
        hp: apparatus.hp(),
    });
    if destroyed {
        destroy_apparatus(apparatus, units, cause, Some(source), events);
    }
}

fn award(resources: &mut ResourcePool, amount: u32, from: EnemyKind, events: &mut Vec<SimEvent>) {
    if amount == 0 {
        return;
    }
    resources.add(amount);
    events.push(SimEvent::MetalBonus { amount, from });
}

/// Applies what `kind` reported while advancing, except apparatus damage.
pub fn apply_signals(
    kind: EnemyKind,
    signals: &[UnitSignal],
    resources: &mut ResourcePool,
    camera_breaks: &mut Vec<(RoomNode, EnemyKind)>,
    events: &mut Vec<SimEvent>,
) {
    for signal in signals {
        match *signal {
            UnitSignal::Moved { from, to } => events.push(SimEvent::EnemyMoved { enemy: kind, from, to }),
            UnitSignal::ArrivedAtDoorway { side } => {
                events.push(SimEvent::EnemyAtDoorway { enemy: kind, side })
            }
            UnitSignal::ReachedTarget { .. } => events.push(SimEvent::EnemyAttacking { enemy: kind }),
            UnitSignal::CameraDestroyed { camera } => camera_breaks.push((camera, kind)),
            UnitSignal::ChargeReady { side } => events.push(SimEvent::ChargeReady { enemy: kind, side }),
            UnitSignal::MatchLit => events.push(SimEvent::MatchLit),
            // Settled with the attacks.
            UnitSignal::Burned => {}
            // Applied after the attacks, see `apply_damage`.
            UnitSignal::Projectile { .. } | UnitSignal::SapDamage { .. } => {}
            UnitSignal::ModeChanged { mode } => events.push(SimEvent::ModeChanged { enemy: kind, mode }),
            UnitSignal::TargetAcquired { target } => events.push(SimEvent::TargetAcquired { target }),
            UnitSignal::Respawned => events.push(SimEvent::EnemyRespawned { enemy: kind }),
            UnitSignal::Lured => events.push(SimEvent::EnemyLured { enemy: kind }),
            UnitSignal::Released => events.push(SimEvent::EnemyReleased { enemy: kind }),
            UnitSignal::Repelled { bonus } => {
                events.push(SimEvent::EnemyRepelled { enemy: kind });
                award(resources, bonus, kind, events);
            }
            UnitSignal::Crackle { room } => events.push(SimEvent::Crackle { room }),
            UnitSignal::BreachStarted => events.push(SimEvent::BreachStarted { enemy: kind }),
        }
    }
}

/// Rockets and sapper ticks reported by `kind`. Runs after the attacks so
/// arrivals are judged against the apparatus as the tick found it.
pub fn apply_damage(
    kind: EnemyKind,
    signals: &[UnitSignal],
    units: &mut [EnemyUnit],
    apparatus: &mut Apparatus,
    events: &mut Vec<SimEvent>,
) {
    for signal in signals {
        match *signal {
            UnitSignal::Projectile { damage } => {
                damage_apparatus(apparatus, units, kind, damage, DestroyCause::Siege, events)
            }
            UnitSignal::SapDamage { damage } => {
                damage_apparatus(apparatus, units, kind, damage, DestroyCause::Sapper, events)
            }
            _ => {}
        }
    }
}

/// Settles every pending attack. Returns the loss if one goes unanswered.
///
/// Per attacker, in order: a burning Pyro, a granted or immune attacker,
/// a missing apparatus, an aimed apparatus whose shot did not come in time
/// and finally an unaimed apparatus (auto-defense).
pub fn resolve_attacks<R: Rng + ?Sized>(
    units: &mut [EnemyUnit],
    apparatus: &mut Apparatus,
    player_away: bool,
    arrived: &[EnemyKind],
    rng: &mut R,
    events: &mut Vec<SimEvent>,
) -> Option<(EnemyKind, LossCause)> {
    for index in 0..units.len() {
        if !units[index].attack_pending() {
            continue;
        }
        let kind = units[index].kind();

        if kind == EnemyKind::Pyro {
            if !player_away {
                return Some((kind, LossCause::Burned));
            }
            units[index].drive_off(rng);
            events.push(SimEvent::EnemyRepelled { enemy: kind });
            continue;
        }

        let granted = grant_holder(units) == Some(kind);
        if granted || kind.immune_to_apparatus() {
            if !player_away {
                return Some((kind, LossCause::Attack));
            }
            if granted {
                if apparatus.exists() {
                    destroy_apparatus(apparatus, units, DestroyCause::Overpowered, Some(kind), events);
                }
                clear_grant(units, kind, events);
            }
            info!(enemy = %kind, "attack evaded");
            units[index].drive_off(rng);
            events.push(SimEvent::EnemyRepelled { enemy: kind });
            continue;
        }

        if !apparatus.exists() {
            if !player_away {
                return Some((kind, LossCause::Attack));
            }
            if arrived.contains(&kind) {
                debug!(enemy = %kind, "waiting for the player");
                events.push(SimEvent::EnemyWaiting { enemy: kind });
            }
            continue;
        }

        if apparatus.manual_aim() {
            return Some((kind, LossCause::Attack));
        }

        info!(enemy = %kind, "auto-defense triggered");
        events.push(SimEvent::AutoDefenseTriggered { enemy: kind });
        // The Sniper counts it as one hit and may hold its perch.
        let repelled = if kind == EnemyKind::Sniper {
            !matches!(
                units[index].take_hit(apparatus.level(), rng),
                HitOutcome::PartialHit { .. }
            )
        } else {
            units[index].drive_off(rng);
            true
        };
        destroy_apparatus(apparatus, units, DestroyCause::AutoDefense, Some(kind), events);
        if repelled {
            events.push(SimEvent::EnemyRepelled { enemy: kind });
        }
    }
    None
}

/// One manual shot at `side`. Pushes `ShotFired` followed by its effects.
pub fn fire<R: Rng + ?Sized>(
    side: DoorSide,
    units: &mut [EnemyUnit],
    apparatus: &mut Apparatus,
    resources: &mut ResourcePool,
    rng: &mut R,
    events: &mut Vec<SimEvent>,
) -> ShotResult {
    let Some(index) = units.iter().position(|u| u.doorway() == Some(side)) else {
        events.push(SimEvent::ShotFired {
            side,
            result: ShotResult::Missed,
        });
        return ShotResult::Missed;
    };
    let enemy = units[index].kind();

    let result = if grant_holder(units) == Some(enemy) {
        ShotResult::Invulnerable { enemy }
    } else {
        match units[index].take_hit(apparatus.level(), rng) {
            HitOutcome::Repelled { bonus } => ShotResult::Repelled { enemy, bonus },
            HitOutcome::PartialHit { hits, required } => ShotResult::PartialHit { enemy, hits, required },
            HitOutcome::Reflected => ShotResult::Reflected { enemy },
            HitOutcome::Immune => ShotResult::Immune { enemy },
        }
    };
    debug!(?side, ?result, "shot fired");
    events.push(SimEvent::ShotFired { side, result });

    match result {
        ShotResult::Repelled { enemy, bonus } => {
            events.push(SimEvent::EnemyRepelled { enemy });
            award(resources, bonus, enemy, events);
        }
        ShotResult::Reflected { enemy } => {
            destroy_apparatus(apparatus, units, DestroyCause::Reflected, Some(enemy), events);
        }
        _ => {}
    }
    result
}
