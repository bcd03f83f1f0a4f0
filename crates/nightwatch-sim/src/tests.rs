//! Tests for the simulation engine: tick order, attack resolution, evasion,
//! the apparatus economy and determinism.

use proptest::prelude::*;

use nightwatch_core::commands::{Denial, PlayerAction, PlayerIntents, TickInput};
use nightwatch_core::config::SessionConfig;
use nightwatch_core::constants::*;
use nightwatch_core::enums::*;
use nightwatch_core::events::SimEvent;
use nightwatch_core::rooms::RoomNode;
use nightwatch_core::state::GameStateSnapshot;

use nightwatch_threat_ai::demoman::{DemoPhase, DemoState};
use nightwatch_threat_ai::medic::MedicState;
use nightwatch_threat_ai::pyro::{PyroMode, PyroState};
use nightwatch_threat_ai::roamer::{RoamMode, RoamerState};
use nightwatch_threat_ai::scout::LinearState;
use nightwatch_threat_ai::soldier::SiegeState;
use nightwatch_threat_ai::spy::{Sapper, SpyMode, SpyState};
use nightwatch_threat_ai::{Behavior, EnemyUnit};

use crate::engine::SimulationEngine;

// ---- Helpers ----

/// Custom night at level 0 with every kind not in `active` force-despawned.
fn quiet(active: &[EnemyKind]) -> SimulationEngine {
    let mut config = SessionConfig::custom(EnemyKind::ALL.iter().map(|&kind| (kind, 0)));
    for kind in EnemyKind::ALL {
        if !active.contains(&kind) {
            config = config.with_force_despawn(kind);
        }
    }
    SimulationEngine::new(config)
}

fn aimed(delta_ms: u32, side: DoorSide, action: Option<PlayerAction>) -> TickInput {
    TickInput {
        delta_ms,
        intents: PlayerIntents {
            manual_aim: true,
            aim: Some(side),
            action,
            ..PlayerIntents::default()
        },
    }
}

fn scout_at_door(remaining_ms: u32) -> EnemyUnit {
    EnemyUnit::with_behavior(
        EnemyKind::Scout,
        0,
        RoomNode::LeftHall,
        Behavior::Scout(LinearState::AtDoor { remaining_ms }),
    )
}

fn medic_on(target: EnemyKind) -> EnemyUnit {
    EnemyUnit::with_behavior(
        EnemyKind::Medic,
        0,
        RoomNode::Spawn,
        Behavior::Medic(MedicState {
            reselect_in_ms: HOUR_MS,
            target: Some(target),
        }),
    )
}

fn roamer(kind: EnemyKind, room: RoomNode, mode: RoamMode) -> EnemyUnit {
    let state = RoamerState { mode, watch: 0 };
    let behavior = match kind {
        EnemyKind::Heavy => Behavior::Heavy(state),
        _ => Behavior::Sniper(state),
    };
    EnemyUnit::with_behavior(kind, 0, room, behavior)
}

/// Starts a teleport to `room` and runs the transit out.
fn teleport_to(engine: &mut SimulationEngine, room: RoomNode) -> GameStateSnapshot {
    let started = engine.tick(&TickInput::action(0, PlayerAction::Teleport { room }));
    assert!(started.events.contains(&SimEvent::TeleportStarted { room }));
    engine.tick(&TickInput::idle(TELEPORT_TRANSIT_MS))
}

fn enemy_status(snapshot: &GameStateSnapshot, kind: EnemyKind) -> EnemyStatus {
    snapshot.enemies[kind.index()].status
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let config = SessionConfig::night(4).with_seed(12345);
    let mut engine_a = SimulationEngine::new(config.clone());
    let mut engine_b = SimulationEngine::new(config);

    for i in 0..600u32 {
        let input = TickInput {
            delta_ms: 250,
            intents: PlayerIntents {
                camera: Some(RoomNode::CAMERA_ROOMS[(i / 20) as usize % 11]),
                ..PlayerIntents::default()
            },
        };
        let json_a = serde_json::to_string(&engine_a.tick(&input)).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick(&input)).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
    assert_eq!(engine_a.outcome(), engine_b.outcome());
}

#[test]
fn test_snapshot_lists_every_enemy_and_camera() {
    let mut engine = SimulationEngine::new(SessionConfig::night(1));
    let snapshot = engine.tick(&TickInput::idle(0));
    assert_eq!(snapshot.enemies.len(), 8);
    for (view, kind) in snapshot.enemies.iter().zip(EnemyKind::ALL) {
        assert_eq!(view.kind, kind);
    }
    assert_eq!(snapshot.cameras.len(), RoomNode::CAMERA_ROOMS.len());
    assert_eq!(snapshot.resources.metal, METAL_START);
    assert!(!snapshot.apparatus.exists);
    assert_eq!(snapshot.phase, SessionPhase::Active);
}

// ---- Clock ----

#[test]
fn test_victory_at_night_length() {
    let mut engine = quiet(&[]);
    for hour in 1..=NIGHT_HOURS as u8 {
        let snapshot = engine.tick(&TickInput::idle(HOUR_MS));
        assert!(snapshot.events.contains(&SimEvent::HourChanged { hour }));
        assert_eq!(snapshot.hour, hour);
        assert_eq!(snapshot.victory, hour == NIGHT_HOURS as u8);
    }
    assert_eq!(engine.phase(), SessionPhase::Victory);

    let outcome = engine.outcome();
    assert!(outcome.victory);
    assert_eq!(outcome.night, CUSTOM_NIGHT);
    assert_eq!(outcome.elapsed_ms, NIGHT_LENGTH_MS);

    // Nothing moves once the night is over.
    let after = engine.tick(&TickInput::action(1_000, PlayerAction::Build));
    assert_eq!(after.time.elapsed_ms, NIGHT_LENGTH_MS);
    assert!(after.events.contains(&SimEvent::ActionDenied {
        action: PlayerAction::Build,
        reason: Denial::SessionOver,
    }));
}

#[test]
fn test_hour_ramp_raises_ai_levels() {
    let mut engine = SimulationEngine::new(SessionConfig::night(3));
    let before = engine.tick(&TickInput::idle(0));
    let scout_level = before.enemies[EnemyKind::Scout.index()].ai_level;

    let snapshot = engine.tick(&TickInput::idle(2 * HOUR_MS));
    assert!(snapshot.events.contains(&SimEvent::HourChanged { hour: 1 }));
    assert!(snapshot.events.contains(&SimEvent::HourChanged { hour: 2 }));
    if scout_level > 0 {
        assert_eq!(snapshot.enemies[EnemyKind::Scout.index()].ai_level, scout_level + 1);
    }
}

// ---- Resources ----

#[test]
fn test_metal_regenerates_and_manual_aim_suppresses() {
    let mut engine = quiet(&[]);
    engine.resources_mut().set_metal(100);
    let snapshot = engine.tick(&TickInput::idle(1_000));
    assert_eq!(snapshot.resources.metal, 104);
    assert_eq!(snapshot.metal_delta, 4);

    engine.apparatus_mut().build();
    let snapshot = engine.tick(&aimed(1_000, DoorSide::Left, None));
    assert_eq!(snapshot.resources.metal, 104);
    assert!(!snapshot.resources.regenerating);
}

#[test]
fn test_denied_action_changes_nothing() {
    let mut engine = quiet(&[]);
    engine.resources_mut().set_metal(100);
    let snapshot = engine.tick(&TickInput::action(0, PlayerAction::Build));
    assert!(snapshot.events.contains(&SimEvent::ActionDenied {
        action: PlayerAction::Build,
        reason: Denial::InsufficientMetal {
            needed: APPARATUS_BUILD_COST,
            available: 100,
        },
    }));
    assert!(!snapshot.apparatus.exists);
    assert_eq!(snapshot.resources.metal, 100);

    let snapshot = engine.tick(&TickInput::action(0, PlayerAction::Fire));
    assert!(snapshot.events.contains(&SimEvent::ActionDenied {
        action: PlayerAction::Fire,
        reason: Denial::ApparatusAbsent,
    }));
}

#[test]
fn test_build_repair_upgrade_costs() {
    let mut engine = quiet(&[]);
    let snapshot = engine.tick(&TickInput::action(0, PlayerAction::Build));
    assert!(snapshot.events.contains(&SimEvent::ApparatusBuilt));
    assert_eq!(snapshot.resources.metal, METAL_START - APPARATUS_BUILD_COST);
    assert_eq!(snapshot.apparatus.max_hp, 150);

    engine.resources_mut().set_metal(METAL_MAX);
    engine.apparatus_mut().set_hp(50);
    let snapshot = engine.tick(&TickInput::action(0, PlayerAction::Repair));
    assert!(snapshot.events.contains(&SimEvent::ApparatusRepaired { hp: 110, cost: 60 }));
    assert_eq!(snapshot.metal_delta, -60);

    let snapshot = engine.tick(&TickInput::action(0, PlayerAction::Upgrade));
    assert!(snapshot.events.contains(&SimEvent::ActionDenied {
        action: PlayerAction::Upgrade,
        reason: Denial::NotFullHealth,
    }));

    engine.apparatus_mut().set_hp(150);
    engine.resources_mut().set_metal(METAL_MAX);
    let snapshot = engine.tick(&TickInput::action(0, PlayerAction::Upgrade));
    assert!(snapshot.events.contains(&SimEvent::ApparatusUpgraded { level: 2 }));
    assert_eq!(snapshot.apparatus.hp, 180);
    assert_eq!(snapshot.resources.metal, 0);
    assert_eq!(engine.outcome().apparatus_max_level, 2);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_metal_and_hp_stay_in_bounds(
        seed in any::<u64>(),
        night in 1u8..=6,
        steps in proptest::collection::vec((0u32..3_000, 0usize..14, any::<bool>()), 1..120),
    ) {
        let mut engine = SimulationEngine::new(SessionConfig::night(night).with_seed(seed));
        for (delta_ms, choice, aim) in steps {
            let action = match choice {
                0 => Some(PlayerAction::Build),
                1 => Some(PlayerAction::Repair),
                2 => Some(PlayerAction::Upgrade),
                3 => Some(PlayerAction::Fire),
                4 => Some(PlayerAction::Teleport { room: RoomNode::Storage }),
                5 => Some(PlayerAction::Teleport { room: RoomNode::Bridge }),
                6 => Some(PlayerAction::CancelTeleport),
                7 => Some(PlayerAction::ReturnToPost),
                8 => Some(PlayerAction::PlaceLure { room: RoomNode::Courtyard }),
                9 => Some(PlayerAction::PlayLure),
                10 => Some(PlayerAction::PressSapper),
                _ => None,
            };
            let input = TickInput {
                delta_ms,
                intents: PlayerIntents {
                    manual_aim: aim,
                    aim: aim.then_some(DoorSide::Left),
                    action,
                    ..PlayerIntents::default()
                },
            };
            let snapshot = engine.tick(&input);
            prop_assert!(snapshot.resources.metal <= METAL_MAX);
            prop_assert!(snapshot.apparatus.hp <= snapshot.apparatus.max_hp);
            prop_assert_eq!(snapshot.apparatus.exists, snapshot.apparatus.hp > 0);
            if snapshot.phase == SessionPhase::Defeat {
                prop_assert!(snapshot.game_over.is_some());
                break;
            }
        }
    }
}

// ---- Attack resolution ----

#[test]
fn test_unanswered_attack_is_lethal() {
    let mut engine = quiet(&[]);
    engine.stage_unit(scout_at_door(100));
    let snapshot = engine.tick(&TickInput::idle(100));
    assert_eq!(snapshot.phase, SessionPhase::Defeat);
    let game_over = snapshot.game_over.expect("scout attack ends the night");
    assert_eq!(game_over.enemy, EnemyKind::Scout);
    assert_eq!(game_over.cause, LossCause::Attack);
    assert!(game_over.reason.contains("scout"));
}

#[test]
fn test_earlier_kind_wins_simultaneous_attacks() {
    let mut engine = quiet(&[]);
    engine.stage_unit(scout_at_door(100));
    engine.stage_unit(EnemyUnit::with_behavior(
        EnemyKind::Soldier,
        0,
        RoomNode::RightHall,
        Behavior::Soldier(SiegeState::Breaching { remaining_ms: 100 }),
    ));
    let snapshot = engine.tick(&TickInput::idle(100));
    assert_eq!(snapshot.game_over.map(|g| g.enemy), Some(EnemyKind::Scout));
}

#[test]
fn test_auto_defense_sacrifices_apparatus() {
    let mut engine = quiet(&[]);
    engine.apparatus_mut().build();
    engine.stage_unit(scout_at_door(100));
    let snapshot = engine.tick(&TickInput::idle(100));

    assert_eq!(snapshot.phase, SessionPhase::Active);
    assert!(snapshot.events.contains(&SimEvent::AutoDefenseTriggered {
        enemy: EnemyKind::Scout
    }));
    assert!(snapshot.events.contains(&SimEvent::ApparatusDestroyed {
        cause: DestroyCause::AutoDefense,
        by: Some(EnemyKind::Scout),
    }));
    assert!(!snapshot.apparatus.exists);
    assert_eq!(enemy_status(&snapshot, EnemyKind::Scout), EnemyStatus::Despawned);
}

#[test]
fn test_same_tick_rocket_does_not_disarm_auto_defense() {
    let mut engine = quiet(&[]);
    engine.apparatus_mut().build();
    engine.apparatus_mut().set_hp(SOLDIER_ROCKET_DAMAGE);
    engine.stage_unit(scout_at_door(100));
    engine.stage_unit(EnemyUnit::with_behavior(
        EnemyKind::Soldier,
        0,
        RoomNode::RightHall,
        Behavior::Soldier(SiegeState::Sieging { rocket_in_ms: 100 }),
    ));
    let snapshot = engine.tick(&TickInput::idle(100));

    assert_eq!(snapshot.phase, SessionPhase::Active);
    assert!(snapshot.events.contains(&SimEvent::AutoDefenseTriggered {
        enemy: EnemyKind::Scout
    }));
    assert!(snapshot.events.contains(&SimEvent::ApparatusDestroyed {
        cause: DestroyCause::AutoDefense,
        by: Some(EnemyKind::Scout),
    }));
    assert!(!snapshot
        .events
        .iter()
        .any(|e| matches!(e, SimEvent::ApparatusDamaged { .. })));
    assert_eq!(enemy_status(&snapshot, EnemyKind::Scout), EnemyStatus::Despawned);
    assert_eq!(enemy_status(&snapshot, EnemyKind::Soldier), EnemyStatus::Breaching);
}

#[test]
fn test_aimed_apparatus_without_shot_is_lethal() {
    let mut engine = quiet(&[]);
    engine.apparatus_mut().build();
    engine.stage_unit(scout_at_door(100));
    let snapshot = engine.tick(&aimed(100, DoorSide::Left, None));
    assert_eq!(snapshot.game_over.map(|g| g.cause), Some(LossCause::Attack));
}

#[test]
fn test_attacker_waits_for_absent_player() {
    let mut engine = quiet(&[]);
    engine.stage_unit(scout_at_door(4_000));
    teleport_to(&mut engine, RoomNode::Storage);
    assert!(engine.evasion().is_away());

    let snapshot = engine.tick(&TickInput::idle(3_000));
    assert_eq!(snapshot.phase, SessionPhase::Active);
    assert!(snapshot.events.contains(&SimEvent::EnemyAttacking {
        enemy: EnemyKind::Scout
    }));
    assert!(snapshot.events.contains(&SimEvent::EnemyWaiting {
        enemy: EnemyKind::Scout
    }));

    // Still waiting later on, without repeating the event.
    let snapshot = engine.tick(&TickInput::idle(5_000));
    assert_eq!(snapshot.phase, SessionPhase::Active);
    assert!(snapshot.events.is_empty());

    let snapshot = engine.tick(&TickInput::action(0, PlayerAction::ReturnToPost));
    assert!(snapshot.events.contains(&SimEvent::ReturnedToPost));
    let game_over = snapshot.game_over.expect("waiting scout strikes on return");
    assert_eq!(game_over.enemy, EnemyKind::Scout);
    assert_eq!(game_over.cause, LossCause::Attack);
}

#[test]
fn test_soldier_siege_breach_and_rebuild() {
    let mut engine = quiet(&[]);
    engine.apparatus_mut().build();
    engine.stage_unit(EnemyUnit::with_behavior(
        EnemyKind::Soldier,
        0,
        RoomNode::RightHall,
        Behavior::Soldier(SiegeState::Sieging {
            rocket_in_ms: SOLDIER_ROCKET_INTERVAL_MS,
        }),
    ));

    let snapshot = engine.tick(&TickInput::idle(SOLDIER_ROCKET_INTERVAL_MS));
    assert!(snapshot.events.contains(&SimEvent::ApparatusDamaged {
        source: EnemyKind::Soldier,
        amount: SOLDIER_ROCKET_DAMAGE,
        hp: 110,
    }));

    engine.apparatus_mut().set_hp(SOLDIER_ROCKET_DAMAGE);
    let snapshot = engine.tick(&TickInput::idle(SOLDIER_ROCKET_INTERVAL_MS));
    assert!(snapshot.events.contains(&SimEvent::ApparatusDestroyed {
        cause: DestroyCause::Siege,
        by: Some(EnemyKind::Soldier),
    }));
    assert!(snapshot.events.contains(&SimEvent::BreachStarted {
        enemy: EnemyKind::Soldier
    }));
    assert_eq!(enemy_status(&snapshot, EnemyKind::Soldier), EnemyStatus::Breaching);

    engine.tick(&TickInput::idle(2_000));
    engine.resources_mut().set_metal(METAL_MAX);
    let snapshot = engine.tick(&TickInput::action(0, PlayerAction::Build));
    assert!(snapshot.apparatus.exists);
    assert_eq!(enemy_status(&snapshot, EnemyKind::Soldier), EnemyStatus::Sieging);

    let snapshot = engine.tick(&TickInput::idle(SOLDIER_BREACH_MS));
    assert_eq!(snapshot.phase, SessionPhase::Active);
}

#[test]
fn test_soldier_breach_completes() {
    let mut engine = quiet(&[]);
    engine.stage_unit(EnemyUnit::with_behavior(
        EnemyKind::Soldier,
        0,
        RoomNode::RightHall,
        Behavior::Soldier(SiegeState::Breaching { remaining_ms: 500 }),
    ));
    let snapshot = engine.tick(&TickInput::idle(500));
    assert_eq!(snapshot.game_over.map(|g| g.enemy), Some(EnemyKind::Soldier));
}

// ---- Manual fire ----

fn demo_at_door(remaining_ms: u32) -> EnemyUnit {
    EnemyUnit::with_behavior(
        EnemyKind::Demoman,
        0,
        RoomNode::LeftHall,
        Behavior::Demoman(DemoState {
            head: RoomNode::Spawn,
            phase: DemoPhase::AtDoor {
                side: DoorSide::Left,
                remaining_ms,
            },
        }),
    )
}

#[test]
fn test_demo_late_repel_pays_bonus() {
    let mut engine = quiet(&[]);
    engine.apparatus_mut().build();
    engine.resources_mut().set_metal(100);
    engine.stage_unit(demo_at_door(DEMO_BONUS_WINDOW_MS));

    let snapshot = engine.tick(&aimed(0, DoorSide::Left, Some(PlayerAction::Fire)));
    assert!(snapshot.events.contains(&SimEvent::ShotFired {
        side: DoorSide::Left,
        result: ShotResult::Repelled {
            enemy: EnemyKind::Demoman,
            bonus: DEMO_BONUS_METAL,
        },
    }));
    assert!(snapshot.events.contains(&SimEvent::MetalBonus {
        amount: DEMO_BONUS_METAL,
        from: EnemyKind::Demoman,
    }));
    assert_eq!(snapshot.resources.metal, 140);
    assert_eq!(snapshot.metal_delta, 40);
    assert_eq!(enemy_status(&snapshot, EnemyKind::Demoman), EnemyStatus::Dormant);
}

#[test]
fn test_demo_early_repel_pays_nothing() {
    let mut engine = quiet(&[]);
    engine.apparatus_mut().build();
    engine.resources_mut().set_metal(100);
    engine.stage_unit(demo_at_door(DEMO_DOOR_WAIT_MS));

    let snapshot = engine.tick(&aimed(0, DoorSide::Left, Some(PlayerAction::Fire)));
    assert!(snapshot.events.contains(&SimEvent::ShotFired {
        side: DoorSide::Left,
        result: ShotResult::Repelled {
            enemy: EnemyKind::Demoman,
            bonus: 0,
        },
    }));
    assert_eq!(snapshot.metal_delta, -(APPARATUS_FIRE_COST as i64));
}

#[test]
fn test_fire_at_empty_doorway_misses_and_cools_down() {
    let mut engine = quiet(&[]);
    engine.apparatus_mut().build();
    let snapshot = engine.tick(&aimed(0, DoorSide::Right, Some(PlayerAction::Fire)));
    assert!(snapshot.events.contains(&SimEvent::ShotFired {
        side: DoorSide::Right,
        result: ShotResult::Missed,
    }));
    assert_eq!(snapshot.apparatus.cooldown_ms, APPARATUS_FIRE_COOLDOWN_MS);

    let snapshot = engine.tick(&aimed(0, DoorSide::Right, Some(PlayerAction::Fire)));
    assert!(snapshot.events.contains(&SimEvent::ActionDenied {
        action: PlayerAction::Fire,
        reason: Denial::Cooldown {
            remaining_ms: APPARATUS_FIRE_COOLDOWN_MS
        },
    }));
}

#[test]
fn test_sniper_needs_two_hits_at_level_one() {
    let mut engine = quiet(&[]);
    engine.apparatus_mut().build();
    engine.resources_mut().set_metal(100);
    engine.stage_unit(roamer(
        EnemyKind::Sniper,
        RoomNode::RightHall,
        RoamMode::Perched {
            side: DoorSide::Right,
            charge_in_ms: SNIPER_CHARGE_MS,
            hits: 0,
            retaliation_in_ms: None,
        },
    ));

    let snapshot = engine.tick(&aimed(0, DoorSide::Right, Some(PlayerAction::Fire)));
    assert!(snapshot.events.contains(&SimEvent::ShotFired {
        side: DoorSide::Right,
        result: ShotResult::PartialHit {
            enemy: EnemyKind::Sniper,
            hits: 1,
            required: SNIPER_HITS_REQUIRED,
        },
    }));

    engine.tick(&aimed(APPARATUS_FIRE_COOLDOWN_MS, DoorSide::Right, None));
    let snapshot = engine.tick(&aimed(0, DoorSide::Right, Some(PlayerAction::Fire)));
    assert!(snapshot.events.contains(&SimEvent::ShotFired {
        side: DoorSide::Right,
        result: ShotResult::Repelled {
            enemy: EnemyKind::Sniper,
            bonus: 0,
        },
    }));
    assert_eq!(enemy_status(&snapshot, EnemyKind::Sniper), EnemyStatus::Despawned);
}

#[test]
fn test_auto_defense_only_wounds_sniper_at_level_one() {
    let mut engine = quiet(&[]);
    engine.apparatus_mut().build();
    engine.stage_unit(roamer(
        EnemyKind::Sniper,
        RoomNode::RightHall,
        RoamMode::Perched {
            side: DoorSide::Right,
            charge_in_ms: 100,
            hits: 0,
            retaliation_in_ms: None,
        },
    ));
    let snapshot = engine.tick(&TickInput::idle(100));

    assert_eq!(snapshot.phase, SessionPhase::Active);
    assert!(snapshot.events.contains(&SimEvent::AutoDefenseTriggered {
        enemy: EnemyKind::Sniper
    }));
    assert!(!snapshot.apparatus.exists);
    assert!(!snapshot.events.contains(&SimEvent::EnemyRepelled {
        enemy: EnemyKind::Sniper
    }));
    assert_eq!(enemy_status(&snapshot, EnemyKind::Sniper), EnemyStatus::Perched);
    assert_eq!(engine.unit(EnemyKind::Sniper).room(), Some(RoomNode::RightHall));
    assert!(!engine.unit(EnemyKind::Sniper).attack_pending());
}

#[test]
fn test_auto_defense_repels_sniper_at_level_two() {
    let mut engine = quiet(&[]);
    engine.apparatus_mut().build();
    engine.apparatus_mut().upgrade();
    engine.stage_unit(roamer(
        EnemyKind::Sniper,
        RoomNode::LeftHall,
        RoamMode::Perched {
            side: DoorSide::Left,
            charge_in_ms: 100,
            hits: 0,
            retaliation_in_ms: None,
        },
    ));
    let snapshot = engine.tick(&TickInput::idle(100));

    assert!(!snapshot.apparatus.exists);
    assert!(snapshot.events.contains(&SimEvent::EnemyRepelled {
        enemy: EnemyKind::Sniper
    }));
    assert_eq!(enemy_status(&snapshot, EnemyKind::Sniper), EnemyStatus::Despawned);
}

#[test]
fn test_pyro_reflects_shot_and_wrecks_apparatus() {
    let mut engine = quiet(&[]);
    engine.apparatus_mut().build();
    engine.stage_unit(EnemyUnit::with_behavior(
        EnemyKind::Pyro,
        0,
        RoomNode::LeftHall,
        Behavior::Pyro(PyroState::fresh()),
    ));
    let snapshot = engine.tick(&aimed(0, DoorSide::Left, Some(PlayerAction::Fire)));
    assert!(snapshot.events.contains(&SimEvent::ShotFired {
        side: DoorSide::Left,
        result: ShotResult::Reflected {
            enemy: EnemyKind::Pyro
        },
    }));
    assert!(snapshot.events.contains(&SimEvent::ApparatusDestroyed {
        cause: DestroyCause::Reflected,
        by: Some(EnemyKind::Pyro),
    }));
    assert!(!snapshot.apparatus.exists);
}

#[test]
fn test_heavy_shrugs_off_shots() {
    let mut engine = quiet(&[]);
    engine.apparatus_mut().build();
    engine.stage_unit(roamer(
        EnemyKind::Heavy,
        RoomNode::LeftHall,
        RoamMode::AtDoor {
            side: DoorSide::Left,
            remaining_ms: HEAVY_DOOR_WAIT_MS,
        },
    ));
    let snapshot = engine.tick(&aimed(0, DoorSide::Left, Some(PlayerAction::Fire)));
    assert!(snapshot.events.contains(&SimEvent::ShotFired {
        side: DoorSide::Left,
        result: ShotResult::Immune {
            enemy: EnemyKind::Heavy
        },
    }));
    assert!(snapshot.apparatus.exists);
}

// ---- Medic ----

#[test]
fn test_granted_target_ignores_shots() {
    let mut engine = quiet(&[]);
    engine.apparatus_mut().build();
    engine.stage_unit(scout_at_door(4_000));
    engine.stage_unit(medic_on(EnemyKind::Scout));

    let snapshot = engine.tick(&aimed(0, DoorSide::Left, Some(PlayerAction::Fire)));
    assert!(snapshot.events.contains(&SimEvent::ShotFired {
        side: DoorSide::Left,
        result: ShotResult::Invulnerable {
            enemy: EnemyKind::Scout
        },
    }));
    assert!(snapshot.enemies[EnemyKind::Scout.index()].invulnerable);
}

#[test]
fn test_evading_granted_attack_costs_apparatus() {
    let mut engine = quiet(&[]);
    engine.apparatus_mut().build();
    engine.stage_unit(scout_at_door(4_000));
    engine.stage_unit(medic_on(EnemyKind::Scout));

    teleport_to(&mut engine, RoomNode::Storage);
    let snapshot = engine.tick(&TickInput::idle(3_000));

    assert_eq!(snapshot.phase, SessionPhase::Active);
    assert!(snapshot.events.contains(&SimEvent::ApparatusDestroyed {
        cause: DestroyCause::Overpowered,
        by: Some(EnemyKind::Scout),
    }));
    assert!(snapshot.events.contains(&SimEvent::InvulnerabilityCleared {
        target: EnemyKind::Scout
    }));
    assert_eq!(enemy_status(&snapshot, EnemyKind::Scout), EnemyStatus::Despawned);
    assert_eq!(engine.unit(EnemyKind::Medic).heal_target(), None);
    assert!(!snapshot.enemies[EnemyKind::Scout.index()].invulnerable);
}

// ---- Evasion ----

#[test]
fn test_teleport_charges_on_completion() {
    let mut engine = quiet(&[]);
    engine.resources_mut().set_metal(100);
    let started = engine.tick(&TickInput::action(0, PlayerAction::Teleport { room: RoomNode::Storage }));
    assert_eq!(started.resources.metal, 100);
    assert_eq!(started.player.transit_target, Some(RoomNode::Storage));

    let arrived = engine.tick(&TickInput::idle(TELEPORT_TRANSIT_MS));
    assert!(arrived.events.contains(&SimEvent::TeleportCompleted {
        room: RoomNode::Storage
    }));
    assert_eq!(arrived.resources.metal, 100 + 6 - TELEPORT_COST);
    assert!(arrived.player.teleported);

    // No regeneration while away.
    let away = engine.tick(&TickInput::idle(1_000));
    assert_eq!(away.metal_delta, 0);
}

#[test]
fn test_cancelled_transit_has_no_effect() {
    let mut engine = quiet(&[]);
    let room = RoomNode::Bridge;
    engine.tick(&TickInput::action(0, PlayerAction::Teleport { room }));
    let snapshot = engine.tick(&TickInput::action(0, PlayerAction::CancelTeleport));
    assert!(snapshot.events.contains(&SimEvent::TeleportCancelled { room }));
    assert_eq!(snapshot.resources.metal, METAL_START);
    assert_eq!(snapshot.player.room, RoomNode::Intel);
    assert_eq!(snapshot.player.transit_target, None);

    // Repeating the request also cancels.
    engine.tick(&TickInput::action(0, PlayerAction::Teleport { room }));
    let snapshot = engine.tick(&TickInput::action(0, PlayerAction::Teleport { room }));
    assert!(snapshot.events.contains(&SimEvent::TeleportCancelled { room }));

    let snapshot = engine.tick(&TickInput::idle(TELEPORT_TRANSIT_MS));
    assert!(!snapshot.player.teleported);
}

#[test]
fn test_teleport_into_occupied_room_is_caught() {
    let mut engine = quiet(&[EnemyKind::Scout]);
    let snapshot = teleport_to(&mut engine, RoomNode::Spawn);
    let game_over = snapshot.game_over.expect("scout waits at spawn");
    assert_eq!(game_over.enemy, EnemyKind::Scout);
    assert_eq!(game_over.cause, LossCause::Caught);
}

#[test]
fn test_teleport_rejections() {
    let mut engine = quiet(&[]);
    let snapshot = engine.tick(&TickInput::action(0, PlayerAction::Teleport { room: RoomNode::Intel }));
    assert!(snapshot.events.contains(&SimEvent::ActionDenied {
        action: PlayerAction::Teleport { room: RoomNode::Intel },
        reason: Denial::ProtectedRoom,
    }));
    let snapshot = engine.tick(&TickInput::action(0, PlayerAction::ReturnToPost));
    assert!(snapshot.events.contains(&SimEvent::ActionDenied {
        action: PlayerAction::ReturnToPost,
        reason: Denial::AlreadyAtPost,
    }));

    teleport_to(&mut engine, RoomNode::Storage);
    let snapshot = engine.tick(&TickInput::action(0, PlayerAction::Build));
    assert!(snapshot.events.contains(&SimEvent::ActionDenied {
        action: PlayerAction::Build,
        reason: Denial::PlayerAway,
    }));
}

#[test]
fn test_listener_overhears_adjacent_player() {
    let mut engine = quiet(&[]);
    engine.stage_unit(roamer(
        EnemyKind::Heavy,
        RoomNode::Storage,
        RoamMode::Patrol {
            move_in_ms: HEAVY_MOVE_INTERVAL_MS,
        },
    ));
    let arrived = teleport_to(&mut engine, RoomNode::Sewer);
    assert!(arrived.events.contains(&SimEvent::EscapeCountdownStarted {
        enemy: EnemyKind::Heavy,
        remaining_ms: ESCAPE_COUNTDOWN_MS,
    }));

    let snapshot = engine.tick(&TickInput::idle(ESCAPE_COUNTDOWN_MS - 1));
    assert_eq!(snapshot.phase, SessionPhase::Active);
    assert_eq!(snapshot.player.escape_remaining_ms, 1);

    let snapshot = engine.tick(&TickInput::idle(1));
    let game_over = snapshot.game_over.expect("heavy closes in");
    assert_eq!(game_over.enemy, EnemyKind::Heavy);
    assert_eq!(game_over.cause, LossCause::Overheard);
}

#[test]
fn test_return_to_post_clears_escape_countdown() {
    let mut engine = quiet(&[]);
    engine.stage_unit(roamer(
        EnemyKind::Sniper,
        RoomNode::Storage,
        RoamMode::Patrol {
            move_in_ms: SNIPER_MOVE_INTERVAL_MS,
        },
    ));
    teleport_to(&mut engine, RoomNode::Sewer);
    let snapshot = engine.tick(&TickInput::action(1_000, PlayerAction::ReturnToPost));
    assert!(snapshot.events.contains(&SimEvent::EscapeCountdownCleared));
    assert_eq!(snapshot.player.escape_source, None);

    let snapshot = engine.tick(&TickInput::idle(ESCAPE_COUNTDOWN_MS));
    assert_eq!(snapshot.phase, SessionPhase::Active);
}

// ---- Pyro ----

fn burning_pyro() -> EnemyUnit {
    EnemyUnit::with_behavior(
        EnemyKind::Pyro,
        0,
        RoomNode::Intel,
        Behavior::Pyro(PyroState {
            mode: PyroMode::Burning {
                remaining_ms: PYRO_BURN_MS,
            },
            mode_in_ms: PYRO_MODE_INTERVAL_MS,
            lit_ms: 0,
        }),
    )
}

#[test]
fn test_pyro_burns_a_player_who_stays() {
    let mut engine = quiet(&[]);
    engine.apparatus_mut().build();
    engine.stage_unit(burning_pyro());
    let snapshot = engine.tick(&TickInput::idle(PYRO_BURN_MS));
    let game_over = snapshot.game_over.expect("pyro ignites the room");
    assert_eq!(game_over.enemy, EnemyKind::Pyro);
    assert_eq!(game_over.cause, LossCause::Burned);
}

#[test]
fn test_pyro_burn_is_evaded_by_teleport() {
    let mut engine = quiet(&[]);
    engine.stage_unit(burning_pyro());
    teleport_to(&mut engine, RoomNode::Storage);
    let snapshot = engine.tick(&TickInput::idle(100));
    assert_eq!(snapshot.phase, SessionPhase::Active);
    assert!(snapshot.events.contains(&SimEvent::EnemyRepelled {
        enemy: EnemyKind::Pyro
    }));
    assert_ne!(engine.unit(EnemyKind::Pyro).room(), Some(RoomNode::Intel));

    // Coming back is safe.
    let snapshot = engine.tick(&TickInput::action(PYRO_BURN_MS, PlayerAction::ReturnToPost));
    assert_eq!(snapshot.phase, SessionPhase::Active);
}

#[test]
fn test_cancelled_teleports_do_not_stall_the_burn() {
    let mut engine = quiet(&[]);
    engine.stage_unit(burning_pyro());
    let storage = PlayerAction::Teleport {
        room: RoomNode::Storage,
    };

    let mut defeat = None;
    for _ in 0..5 {
        engine.tick(&TickInput::action(0, storage));
        let snapshot = engine.tick(&TickInput::idle(1_400));
        if snapshot.phase != SessionPhase::Active {
            defeat = Some(snapshot);
            break;
        }
        engine.tick(&TickInput::action(10, PlayerAction::CancelTeleport));
    }

    let snapshot = defeat.expect("the burn runs out mid-transit");
    let game_over = snapshot.game_over.expect("pyro ignites the room");
    assert_eq!(game_over.enemy, EnemyKind::Pyro);
    assert_eq!(game_over.cause, LossCause::Burned);
    assert!(!engine.evasion().is_away());
}

#[test]
fn test_flashlight_drives_off_doorway_pyro() {
    let mut engine = quiet(&[]);
    engine.resources_mut().set_metal(100);
    engine.stage_unit(EnemyUnit::with_behavior(
        EnemyKind::Pyro,
        0,
        RoomNode::LeftHall,
        Behavior::Pyro(PyroState::fresh()),
    ));
    let input = TickInput {
        delta_ms: PYRO_EXPOSURE_MS,
        intents: PlayerIntents {
            flashlight: Some(DoorSide::Left),
            ..PlayerIntents::default()
        },
    };
    let snapshot = engine.tick(&input);
    assert!(snapshot.events.contains(&SimEvent::EnemyRepelled {
        enemy: EnemyKind::Pyro
    }));
    assert!(snapshot.events.contains(&SimEvent::MetalBonus {
        amount: PYRO_REPEL_BONUS,
        from: EnemyKind::Pyro,
    }));
    assert_eq!(snapshot.resources.metal, 100 + 10 + PYRO_REPEL_BONUS);
}

// ---- Spy ----

fn armed_spy(sapper: Option<Sapper>) -> EnemyUnit {
    EnemyUnit::with_behavior(
        EnemyKind::Spy,
        20,
        RoomNode::Bridge,
        Behavior::Spy(SpyState {
            mode: SpyMode::Armed,
            mode_in_ms: HOUR_MS,
            move_in_ms: HOUR_MS,
            disguise: EnemyKind::Scout,
            retreating: false,
            sapper,
        }),
    )
}

#[test]
fn test_spy_saps_after_teleport_and_is_pressed_off() {
    let mut engine = quiet(&[]);
    engine.apparatus_mut().build();
    engine.stage_unit(armed_spy(None));

    let arrived = teleport_to(&mut engine, RoomNode::Storage);
    assert!(arrived.events.contains(&SimEvent::SapperAttached));
    assert!(arrived.apparatus.sapped);

    engine.tick(&TickInput::action(0, PlayerAction::ReturnToPost));
    let snapshot = engine.tick(&TickInput::idle(SPY_SAP_INTERVAL_MS));
    assert!(snapshot.events.contains(&SimEvent::ApparatusDamaged {
        source: EnemyKind::Spy,
        amount: SPY_SAP_DAMAGE,
        hp: 150 - SPY_SAP_DAMAGE,
    }));

    for presses in 1..SAPPER_REMOVE_PRESSES {
        let snapshot = engine.tick(&TickInput::action(0, PlayerAction::PressSapper));
        assert!(snapshot.events.contains(&SimEvent::SapperPress {
            presses,
            required: SAPPER_REMOVE_PRESSES,
        }));
    }
    let snapshot = engine.tick(&TickInput::action(0, PlayerAction::PressSapper));
    assert!(snapshot.events.contains(&SimEvent::SapperRemoved {
        apparatus_destroyed: false
    }));
    assert!(!snapshot.apparatus.sapped);

    let snapshot = engine.tick(&TickInput::action(0, PlayerAction::PressSapper));
    assert!(snapshot.events.contains(&SimEvent::ActionDenied {
        action: PlayerAction::PressSapper,
        reason: Denial::NoSapper,
    }));
}

#[test]
fn test_sapper_falls_off_with_the_apparatus() {
    let mut engine = quiet(&[]);
    engine.apparatus_mut().build();
    engine.apparatus_mut().set_hp(SPY_SAP_DAMAGE);
    engine.stage_unit(armed_spy(Some(Sapper {
        sap_in_ms: SPY_SAP_INTERVAL_MS,
        presses: 0,
        press_window_ms: None,
    })));
    let snapshot = engine.tick(&TickInput::idle(SPY_SAP_INTERVAL_MS));
    assert!(snapshot.events.contains(&SimEvent::ApparatusDestroyed {
        cause: DestroyCause::Sapper,
        by: Some(EnemyKind::Spy),
    }));
    assert!(snapshot.events.contains(&SimEvent::SapperRemoved {
        apparatus_destroyed: true
    }));
    assert!(!engine.unit(EnemyKind::Spy).sapper_attached());
}

// ---- Surveillance and lure ----

#[test]
fn test_watched_heavy_breaks_camera_until_restored() {
    let mut engine = quiet(&[]);
    engine.stage_unit(roamer(
        EnemyKind::Heavy,
        RoomNode::Lobby,
        RoamMode::Patrol {
            move_in_ms: HEAVY_MOVE_INTERVAL_MS,
        },
    ));
    let watching = TickInput {
        delta_ms: WATCH_DESTROY_MS,
        intents: PlayerIntents {
            camera: Some(RoomNode::Lobby),
            ..PlayerIntents::default()
        },
    };
    let snapshot = engine.tick(&watching);
    assert!(snapshot.events.contains(&SimEvent::CameraDestroyed {
        camera: RoomNode::Lobby,
        by: EnemyKind::Heavy,
    }));
    let lobby = snapshot
        .cameras
        .iter()
        .find(|c| c.camera == RoomNode::Lobby)
        .expect("lobby camera");
    assert!(lobby.destroyed);
    assert_eq!(
        lobby.destroyed_until_ms,
        Some(u64::from(WATCH_DESTROY_MS + CAMERA_DOWN_MS))
    );

    let snapshot = engine.tick(&TickInput::idle(CAMERA_DOWN_MS - 1));
    assert!(snapshot.cameras.iter().any(|c| c.camera == RoomNode::Lobby && c.destroyed));
    let snapshot = engine.tick(&TickInput::idle(1));
    assert!(snapshot.events.contains(&SimEvent::CameraRestored {
        camera: RoomNode::Lobby
    }));
}

#[test]
fn test_lure_draws_roamer_and_releases_it() {
    let mut engine = quiet(&[]);
    let mut heavy = roamer(
        EnemyKind::Heavy,
        RoomNode::Spawn,
        RoamMode::Patrol {
            move_in_ms: HEAVY_MOVE_INTERVAL_MS,
        },
    );
    heavy.set_ai_level(5);
    engine.stage_unit(heavy);

    let placed = engine.tick(&TickInput::action(0, PlayerAction::PlaceLure { room: RoomNode::Lobby }));
    assert!(placed.events.contains(&SimEvent::LurePlaced { room: RoomNode::Lobby }));
    assert_eq!(placed.metal_delta, -(LURE_PLACE_COST as i64));

    let playing = engine.tick(&TickInput::action(0, PlayerAction::PlayLure));
    assert!(playing.events.contains(&SimEvent::LurePlaying { room: RoomNode::Lobby }));
    assert!(playing.events.contains(&SimEvent::EnemyLured {
        enemy: EnemyKind::Heavy
    }));

    let snapshot = engine.tick(&TickInput::idle(LURE_PLAY_MS - 100));
    assert_eq!(engine.unit(EnemyKind::Heavy).room(), Some(RoomNode::Lobby));
    assert!(snapshot.lure.is_some_and(|l| l.playing && l.remaining_ms == 100));

    let snapshot = engine.tick(&TickInput::idle(100));
    assert!(snapshot.events.contains(&SimEvent::LureConsumed { room: RoomNode::Lobby }));
    assert!(snapshot.events.contains(&SimEvent::EnemyReleased {
        enemy: EnemyKind::Heavy
    }));
    assert!(snapshot.lure.is_none());
}

#[test]
fn test_second_lure_is_rejected() {
    let mut engine = quiet(&[]);
    engine.tick(&TickInput::action(0, PlayerAction::PlaceLure { room: RoomNode::Bridge }));
    let snapshot = engine.tick(&TickInput::action(0, PlayerAction::PlaceLure { room: RoomNode::Sewer }));
    assert!(snapshot.events.contains(&SimEvent::ActionDenied {
        action: PlayerAction::PlaceLure { room: RoomNode::Sewer },
        reason: Denial::LureExists,
    }));
}
