//! Simulation engine: the core of a night.
//!
//! `SimulationEngine` owns every unit and all session state, applies the
//! player's intents, runs the systems in a fixed order and produces a
//! `GameStateSnapshot` per tick. Completely headless, so a whole night can
//! be replayed deterministically from a seed and an input log.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use nightwatch_core::commands::{Denial, PlayerAction, PlayerIntents, TickInput};
use nightwatch_core::config::SessionConfig;
use nightwatch_core::constants::*;
use nightwatch_core::enums::{DoorSide, EnemyKind, LossCause, SessionPhase};
use nightwatch_core::events::SimEvent;
use nightwatch_core::rooms::RoomNode;
use nightwatch_core::state::{GameOver, GameStateSnapshot, SessionOutcome};
use nightwatch_core::types::SimTime;

use nightwatch_threat_ai::{EnemyUnit, SapperPress, UnitContext, UnitSignal};

use crate::systems;
use crate::systems::apparatus::{Apparatus, ResourcePool};
use crate::systems::evasion::Evasion;
use crate::systems::lure::Lure;
use crate::systems::snapshot::SnapshotSource;
use crate::systems::surveillance::Surveillance;

/// The simulation engine. Owns all session state.
pub struct SimulationEngine {
    config: SessionConfig,
    time: SimTime,
    phase: SessionPhase,
    rng: ChaCha8Rng,
    /// One unit per kind, in evaluation order.
    units: Vec<EnemyUnit>,
    resources: ResourcePool,
    apparatus: Apparatus,
    surveillance: Surveillance,
    evasion: Evasion,
    lure: Option<Lure>,
    game_over: Option<GameOver>,
    events: Vec<SimEvent>,

    // --- Held intents ---
    camera_open: Option<RoomNode>,
    flashlight: Option<DoorSide>,
}

impl SimulationEngine {
    /// Start a night. Same config (seed included) = same night.
    pub fn new(config: SessionConfig) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let units = EnemyKind::ALL
            .iter()
            .map(|&kind| {
                let mut unit = EnemyUnit::new(kind, config.ai_level(kind, 0), &mut rng);
                if config.is_force_despawned(kind) {
                    unit.force_despawn();
                }
                unit
            })
            .collect();
        info!(night = config.night, seed = config.seed, "night started");
        Self {
            resources: ResourcePool::new(config.starting_metal),
            config,
            time: SimTime::default(),
            phase: SessionPhase::default(),
            rng,
            units,
            apparatus: Apparatus::default(),
            surveillance: Surveillance::default(),
            evasion: Evasion::default(),
            lure: None,
            game_over: None,
            events: Vec::new(),
            camera_open: None,
            flashlight: None,
        }
    }

    /// Advance the night by `input.delta_ms` and return the resulting snapshot.
    pub fn tick(&mut self, input: &TickInput) -> GameStateSnapshot {
        let metal_before = self.resources.metal();

        if self.phase == SessionPhase::Active {
            self.apply_intents(&input.intents);
            if let Some(action) = input.intents.action {
                self.handle_action(action);
            }
            self.run_systems(input.delta_ms);
        } else if let Some(action) = input.intents.action {
            self.deny(action, Denial::SessionOver);
        }

        let metal_delta = i64::from(self.resources.metal()) - i64::from(metal_before);
        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            SnapshotSource {
                time: &self.time,
                phase: self.phase,
                game_over: self.game_over.as_ref(),
                metal_delta,
                resources: &self.resources,
                apparatus: &self.apparatus,
                units: &self.units,
                surveillance: &self.surveillance,
                watched: self.watched_room(),
                lure: self.lure.as_ref(),
                evasion: &self.evasion,
            },
            events,
        )
    }

    /// Final result for the progression layer.
    pub fn outcome(&self) -> SessionOutcome {
        SessionOutcome {
            night: self.config.night,
            victory: self.phase == SessionPhase::Victory,
            game_over: self.game_over.clone(),
            apparatus_max_level: self.apparatus.max_level_reached(),
            elapsed_ms: self.time.elapsed_ms,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    // --- Intents and actions ---

    /// Continuous intents only count while the player is at their post.
    fn apply_intents(&mut self, intents: &PlayerIntents) {
        if self.evasion.is_away() {
            self.camera_open = None;
            self.flashlight = None;
            self.apparatus.release_aim();
            return;
        }
        self.camera_open = intents.camera;
        self.flashlight = intents.flashlight;
        self.apparatus.set_aim(intents.manual_aim, intents.aim);
    }

    fn handle_action(&mut self, action: PlayerAction) {
        let result = match action {
            PlayerAction::Build => self.build(),
            PlayerAction::Repair => self.repair(),
            PlayerAction::Upgrade => self.upgrade(),
            PlayerAction::Fire => self.fire(),
            PlayerAction::Teleport { room } => self.teleport(room),
            PlayerAction::CancelTeleport => self.cancel_teleport(),
            PlayerAction::ReturnToPost => self.return_to_post(),
            PlayerAction::PlaceLure { room } => self.place_lure(room),
            PlayerAction::PlayLure => self.play_lure(),
            PlayerAction::PressSapper => self.press_sapper(),
        };
        if let Err(reason) = result {
            self.deny(action, reason);
        }
    }

    fn deny(&mut self, action: PlayerAction, reason: Denial) {
        debug!(?action, %reason, "action denied");
        self.events.push(SimEvent::ActionDenied { action, reason });
    }

    fn require_post(&self) -> Result<(), Denial> {
        if self.evasion.is_away() {
            return Err(Denial::PlayerAway);
        }
        Ok(())
    }

    fn build(&mut self) -> Result<(), Denial> {
        self.require_post()?;
        let cost = self.apparatus.validate_build(&self.resources)?;
        self.resources.spend(cost)?;
        self.apparatus.build();
        info!(metal = self.resources.metal(), "apparatus built");
        self.events.push(SimEvent::ApparatusBuilt);
        Ok(())
    }

    fn repair(&mut self) -> Result<(), Denial> {
        self.require_post()?;
        let cost = self.apparatus.validate_repair(&self.resources)?;
        self.resources.spend(cost)?;
        self.apparatus.repair(cost);
        self.events.push(SimEvent::ApparatusRepaired {
            hp: self.apparatus.hp(),
            cost,
        });
        Ok(())
    }

    fn upgrade(&mut self) -> Result<(), Denial> {
        self.require_post()?;
        let cost = self.apparatus.validate_upgrade(&self.resources)?;
        self.resources.spend(cost)?;
        self.apparatus.upgrade();
        let level = self.apparatus.level();
        info!(apparatus_level = level, "apparatus upgraded");
        self.events.push(SimEvent::ApparatusUpgraded { level });
        Ok(())
    }

    fn fire(&mut self) -> Result<(), Denial> {
        self.require_post()?;
        let side = self.apparatus.validate_fire(&self.resources)?;
        self.resources.spend(APPARATUS_FIRE_COST)?;
        self.apparatus.start_cooldown();
        systems::resolution::fire(
            side,
            &mut self.units,
            &mut self.apparatus,
            &mut self.resources,
            &mut self.rng,
            &mut self.events,
        );
        Ok(())
    }

    /// Repeating the request during transit cancels it.
    fn teleport(&mut self, room: RoomNode) -> Result<(), Denial> {
        if self.evasion.in_transit() {
            return self.cancel_teleport();
        }
        self.evasion.validate_teleport(room, &self.resources)?;
        self.evasion.start_teleport(room);
        debug!(%room, "teleport started");
        self.events.push(SimEvent::TeleportStarted { room });
        Ok(())
    }

    fn cancel_teleport(&mut self) -> Result<(), Denial> {
        let room = self.evasion.cancel()?;
        debug!(%room, "teleport cancelled");
        self.events.push(SimEvent::TeleportCancelled { room });
        Ok(())
    }

    fn return_to_post(&mut self) -> Result<(), Denial> {
        let escape_dropped = self.evasion.return_to_post()?;
        info!("returned to post");
        self.events.push(SimEvent::ReturnedToPost);
        if escape_dropped {
            self.events.push(SimEvent::EscapeCountdownCleared);
        }
        Ok(())
    }

    fn place_lure(&mut self, room: RoomNode) -> Result<(), Denial> {
        systems::lure::validate_place(self.lure.as_ref(), room, &self.resources)?;
        self.resources.spend(LURE_PLACE_COST)?;
        self.lure = Some(Lure {
            room,
            remaining_ms: None,
        });
        debug!(%room, "lure placed");
        self.events.push(SimEvent::LurePlaced { room });
        Ok(())
    }

    fn play_lure(&mut self) -> Result<(), Denial> {
        let room = systems::lure::validate_play(self.lure.as_ref())?;
        if let Some(lure) = self.lure.as_mut() {
            lure.remaining_ms = Some(LURE_PLAY_MS);
        }
        debug!(%room, "lure playing");
        self.events.push(SimEvent::LurePlaying { room });
        Ok(())
    }

    fn press_sapper(&mut self) -> Result<(), Denial> {
        self.require_post()?;
        for unit in &mut self.units {
            match unit.press_sapper() {
                SapperPress::Pressed { presses } => {
                    self.events.push(SimEvent::SapperPress {
                        presses,
                        required: SAPPER_REMOVE_PRESSES,
                    });
                    return Ok(());
                }
                SapperPress::Removed => {
                    info!("sapper removed");
                    self.events.push(SimEvent::SapperRemoved {
                        apparatus_destroyed: false,
                    });
                    return Ok(());
                }
                SapperPress::NoSapper => {}
            }
        }
        Err(Denial::NoSapper)
    }

    // --- Systems ---

    /// Run all systems in order. Stops early once the night is lost.
    fn run_systems(&mut self, delta_ms: u32) {
        // 1. Clock
        let previous_hour = self.time.hour();
        self.time.advance(delta_ms);
        let hour = self.time.hour();
        if hour != previous_hour {
            for passed in previous_hour + 1..=hour {
                info!(hour = %SimTime::hour_label(passed), "hour changed");
                self.events.push(SimEvent::HourChanged { hour: passed });
            }
            for unit in &mut self.units {
                unit.set_ai_level(self.config.ai_level(unit.kind(), hour));
            }
        }

        // 2. Resources
        let suppressed = self.apparatus.manual_aim() || self.evasion.is_away();
        self.resources.regenerate(delta_ms, suppressed);
        self.apparatus.tick_cooldown(delta_ms);

        // 3. Lure
        systems::lure::run(&mut self.lure, delta_ms, &mut self.events);

        // 4. Units, all against the same view of the world
        let ctx = self.unit_context();
        let reports: Vec<(EnemyKind, Vec<UnitSignal>)> = self
            .units
            .iter_mut()
            .map(|unit| (unit.kind(), unit.advance(delta_ms, &ctx, &mut self.rng)))
            .collect();

        // 5. Signals, attacks, then damage to the apparatus
        let mut camera_breaks = Vec::new();
        let mut arrived = Vec::new();
        for (kind, signals) in &reports {
            if signals.iter().any(|s| matches!(s, UnitSignal::ReachedTarget { .. })) {
                arrived.push(*kind);
            }
            systems::resolution::apply_signals(
                *kind,
                signals,
                &mut self.resources,
                &mut camera_breaks,
                &mut self.events,
            );
        }
        if let Some((enemy, cause)) = systems::resolution::resolve_attacks(
            &mut self.units,
            &mut self.apparatus,
            self.evasion.is_away(),
            &arrived,
            &mut self.rng,
            &mut self.events,
        ) {
            self.lose(enemy, cause);
            return;
        }
        for (kind, signals) in &reports {
            systems::resolution::apply_damage(
                *kind,
                signals,
                &mut self.units,
                &mut self.apparatus,
                &mut self.events,
            );
        }

        // 6. Evasion
        if let Some(target) = self.evasion.advance_transit(delta_ms) {
            if let Some(enemy) = self.complete_teleport(target) {
                self.lose(enemy, LossCause::Caught);
                return;
            }
        }
        if let Some((enemy, cause)) =
            systems::evasion::run(&mut self.evasion, &self.units, delta_ms, &mut self.events)
        {
            self.lose(enemy, cause);
            return;
        }

        // 7. Surveillance
        systems::surveillance::run(
            &mut self.surveillance,
            &camera_breaks,
            self.time.elapsed_ms,
            &mut self.events,
        );

        // 8. Victory
        if self.time.night_complete() {
            info!(elapsed_ms = self.time.elapsed_ms, "night survived");
            self.phase = SessionPhase::Victory;
        }
    }

    /// Charges the teleport and moves the player. Returns the occupant that
    /// catches them, if any.
    fn complete_teleport(&mut self, target: RoomNode) -> Option<EnemyKind> {
        if let Err(reason) = self.resources.spend(TELEPORT_COST) {
            debug!(%target, %reason, "teleport aborted on arrival");
            self.events.push(SimEvent::TeleportCancelled { room: target });
            return None;
        }
        self.evasion.arrive(target);
        self.apparatus.release_aim();
        self.camera_open = None;
        self.flashlight = None;
        info!(room = %target, "teleport completed");
        self.events.push(SimEvent::TeleportCompleted { room: target });

        if let Some(enemy) = systems::evasion::occupant(&self.units, target) {
            return Some(enemy);
        }
        if self.apparatus.exists() {
            for unit in &mut self.units {
                if unit.try_attach_sapper(&mut self.rng) {
                    info!(enemy = %unit.kind(), "sapper attached");
                    self.events.push(SimEvent::SapperAttached);
                }
            }
        }
        None
    }

    fn unit_context(&self) -> UnitContext {
        let player_away = self.evasion.is_away();
        let watched_room = self.watched_room();
        let shared_watch = watched_room.is_some_and(|room| {
            self.units
                .iter()
                .filter(|u| u.kind().breaks_cameras() && u.room() == Some(room))
                .count()
                >= 2
        });
        let heal_candidates = self
            .units
            .iter()
            .filter(|u| u.kind().healable() && u.is_active() && u.ai_level() > 0 && !u.is_mid_attack())
            .map(EnemyUnit::kind)
            .collect();
        let heal_target_busy = systems::resolution::grant_holder(&self.units)
            .and_then(|target| self.units.iter().find(|u| u.kind() == target))
            .is_some_and(EnemyUnit::is_mid_attack);

        UnitContext {
            watched_room,
            camera_open: !player_away && self.camera_open.is_some(),
            player_away,
            in_transit: self.evasion.in_transit(),
            lure: systems::lure::playing_room(self.lure.as_ref()),
            apparatus_present: self.apparatus.exists(),
            flashlight: if player_away { None } else { self.flashlight },
            shared_watch,
            heal_candidates,
            heal_target_busy,
        }
    }

    fn watched_room(&self) -> Option<RoomNode> {
        if self.evasion.is_away() {
            return None;
        }
        self.surveillance.watched_room(self.camera_open)
    }

    fn lose(&mut self, enemy: EnemyKind, cause: LossCause) {
        let game_over = GameOver::new(enemy, cause);
        info!(%enemy, ?cause, reason = %game_over.reason, "night lost");
        self.game_over = Some(game_over);
        self.phase = SessionPhase::Defeat;
    }
}

#[cfg(test)]
impl SimulationEngine {
    pub fn unit(&self, kind: EnemyKind) -> &EnemyUnit {
        self.units
            .iter()
            .find(|u| u.kind() == kind)
            .expect("every kind is spawned")
    }

    pub fn unit_mut(&mut self, kind: EnemyKind) -> &mut EnemyUnit {
        self.units
            .iter_mut()
            .find(|u| u.kind() == kind)
            .expect("every kind is spawned")
    }

    /// Swaps in a unit staged in a specific state.
    pub fn stage_unit(&mut self, unit: EnemyUnit) {
        let kind = unit.kind();
        *self.unit_mut(kind) = unit;
    }

    pub fn apparatus_mut(&mut self) -> &mut Apparatus {
        &mut self.apparatus
    }

    pub fn resources_mut(&mut self) -> &mut ResourcePool {
        &mut self.resources
    }

    pub fn evasion(&self) -> &Evasion {
        &self.evasion
    }
}
