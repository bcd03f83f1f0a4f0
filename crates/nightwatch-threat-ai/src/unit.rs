//! Enemy behavior units.
//!
//! Every antagonist is one [`EnemyUnit`]: a shared [`UnitCore`], a
//! [`Presence`] flag and a per-kind [`Behavior`] payload. `advance` walks
//! the unit's timers event by event, so advancing by Δ1 then Δ2 lands in the
//! same state as advancing once by Δ1+Δ2. Random draws only happen when a
//! timer fires.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use nightwatch_core::constants::{MAX_TRANSITIONS_PER_ADVANCE, MEDIC_RESELECT_MS};
use nightwatch_core::enums::{DoorSide, EnemyKind, EnemyStatus};
use nightwatch_core::rooms::RoomNode;
use nightwatch_core::state::EnemyView;

use crate::context::{UnitContext, UnitSignal};
use crate::demoman::{self, DemoPhase, DemoState};
use crate::medic::{self, MedicState};
use crate::pyro::{self, PyroMode, PyroState};
use crate::roamer::{self, RoamMode, RoamerState};
use crate::scout::{self, LinearState};
use crate::soldier::{self, SiegeState};
use crate::spy::{self, SapperPress, SpyState};
use crate::{dice, profiles};

/// Fields every unit carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitCore {
    pub kind: EnemyKind,
    pub ai_level: u8,
    /// Current location. For the Demoman this is the head until the body spawns.
    pub node: RoomNode,
}

/// Exactly one of these holds for a unit that is not force-despawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Presence {
    Active,
    Despawned { respawn_in_ms: u32 },
}

/// Per-kind state payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Behavior {
    Scout(LinearState),
    Soldier(SiegeState),
    Demoman(DemoState),
    Heavy(RoamerState),
    Sniper(RoamerState),
    Spy(SpyState),
    Pyro(PyroState),
    Medic(MedicState),
}

/// What a manual shot did to the doorway occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    Repelled { bonus: u32 },
    PartialHit { hits: u8, required: u8 },
    /// The shot bounced back; the apparatus is lost.
    Reflected,
    Immune,
}

/// Result of one event step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// No timer was reached; the whole budget was consumed.
    Idle,
    /// A transition happened after `consumed` ms.
    Fired { consumed: u32 },
}

/// Runs `timer` down by at most `budget`. Returns the time consumed when it
/// reaches zero within the budget.
pub(crate) fn run_down(timer: &mut u32, budget: u32) -> Option<u32> {
    if *timer <= budget {
        let consumed = *timer;
        *timer = 0;
        Some(consumed)
    } else {
        *timer -= budget;
        None
    }
}

/// Time to the earliest running timer, clipped to `budget`, and whether that
/// timer is reached.
pub(crate) fn horizon(budget: u32, timers: &[Option<u32>]) -> (u32, bool) {
    match timers.iter().flatten().min() {
        Some(&next) if next <= budget => (next, true),
        _ => (budget, false),
    }
}

/// One antagonist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyUnit {
    pub core: UnitCore,
    pub presence: Presence,
    /// Permanently inert for the session.
    pub force_despawned: bool,
    pub behavior: Behavior,
}

impl EnemyUnit {
    /// A freshly spawned unit at the start of a session.
    pub fn new<R: Rng + ?Sized>(kind: EnemyKind, ai_level: u8, rng: &mut R) -> Self {
        let (node, behavior) = spawn_state(kind, ai_level, rng);
        Self {
            core: UnitCore {
                kind,
                ai_level,
                node,
            },
            presence: Presence::Active,
            force_despawned: false,
            behavior,
        }
    }

    /// An active unit staged in a specific state.
    pub fn with_behavior(kind: EnemyKind, ai_level: u8, node: RoomNode, behavior: Behavior) -> Self {
        Self {
            core: UnitCore {
                kind,
                ai_level,
                node,
            },
            presence: Presence::Active,
            force_despawned: false,
            behavior,
        }
    }

    pub fn kind(&self) -> EnemyKind {
        self.core.kind
    }

    pub fn ai_level(&self) -> u8 {
        self.core.ai_level
    }

    pub fn set_ai_level(&mut self, ai_level: u8) {
        self.core.ai_level = ai_level;
    }

    /// Makes the unit inert for the rest of the session.
    pub fn force_despawn(&mut self) {
        self.force_despawned = true;
    }

    pub fn is_active(&self) -> bool {
        !self.force_despawned && self.presence == Presence::Active
    }

    /// Current room, if the unit is on the map.
    pub fn room(&self) -> Option<RoomNode> {
        self.is_active().then_some(self.core.node)
    }

    /// Advances the unit by `delta_ms`, returning what it did in order.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        delta_ms: u32,
        ctx: &UnitContext,
        rng: &mut R,
    ) -> Vec<UnitSignal> {
        let mut signals = Vec::new();
        if self.force_despawned {
            return signals;
        }
        let mut remaining = delta_ms;
        for _ in 0..MAX_TRANSITIONS_PER_ADVANCE {
            match self.step(remaining, ctx, rng, &mut signals) {
                Step::Idle => return signals,
                Step::Fired { consumed } => remaining = remaining.saturating_sub(consumed),
            }
        }
        warn!(enemy = %self.core.kind, remaining, "transition limit reached, dropping remaining time");
        signals
    }

    fn step<R: Rng + ?Sized>(
        &mut self,
        budget: u32,
        ctx: &UnitContext,
        rng: &mut R,
        out: &mut Vec<UnitSignal>,
    ) -> Step {
        if let Presence::Despawned { respawn_in_ms } = &mut self.presence {
            let Some(consumed) = run_down(respawn_in_ms, budget) else {
                return Step::Idle;
            };
            self.respawn(rng);
            out.push(UnitSignal::Respawned);
            return Step::Fired { consumed };
        }

        let Self { core, behavior, .. } = self;
        match behavior {
            Behavior::Scout(state) => scout::step(state, core, budget, rng, out),
            Behavior::Soldier(state) => soldier::step(state, core, budget, ctx, rng, out),
            Behavior::Demoman(state) => demoman::step(state, core, budget, ctx, rng, out),
            Behavior::Heavy(state) | Behavior::Sniper(state) => {
                roamer::step(state, core, budget, ctx, rng, out)
            }
            Behavior::Spy(state) => spy::step(state, core, budget, rng, out),
            Behavior::Pyro(state) => pyro::step(state, core, budget, ctx, rng, out),
            Behavior::Medic(state) => medic::step(state, core, budget, ctx, rng, out),
        }
    }

    fn respawn<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let (node, behavior) = spawn_state(self.core.kind, self.core.ai_level, rng);
        self.core.node = node;
        self.behavior = behavior;
        self.presence = Presence::Active;
        debug!(enemy = %self.core.kind, room = %node, "respawned");
    }

    // --- Queries ---

    /// Doorway the unit occupies, if it can be shot there.
    pub fn doorway(&self) -> Option<DoorSide> {
        if !self.is_active() {
            return None;
        }
        match self.behavior {
            Behavior::Scout(LinearState::AtDoor { .. } | LinearState::Attacking) => Some(DoorSide::Left),
            Behavior::Soldier(
                SiegeState::Sieging { .. } | SiegeState::Breaching { .. } | SiegeState::Attacking,
            ) => Some(DoorSide::Right),
            Behavior::Demoman(state) => match state.phase {
                DemoPhase::AtDoor { side, .. } | DemoPhase::Attacking { side } => Some(side),
                _ => None,
            },
            Behavior::Heavy(state) | Behavior::Sniper(state) => match state.mode {
                RoamMode::AtDoor { side, .. }
                | RoamMode::Perched { side, .. }
                | RoamMode::Attacking { side } => Some(side),
                _ => None,
            },
            Behavior::Pyro(state) => match state.mode {
                PyroMode::Room { .. } => self.core.node.door_side(),
                _ => None,
            },
            _ => None,
        }
    }

    /// The unit is attacking the protected room and waits for resolution.
    pub fn attack_pending(&self) -> bool {
        if !self.is_active() {
            return false;
        }
        match self.behavior {
            Behavior::Scout(state) => state == LinearState::Attacking,
            Behavior::Soldier(state) => state == SiegeState::Attacking,
            Behavior::Demoman(state) => matches!(state.phase, DemoPhase::Attacking { .. }),
            Behavior::Heavy(state) | Behavior::Sniper(state) => {
                matches!(state.mode, RoamMode::Attacking { .. })
            }
            Behavior::Pyro(state) => state.mode == PyroMode::Ignited,
            Behavior::Spy(_) | Behavior::Medic(_) => false,
        }
    }

    /// Committed to an assault: charging, at a doorway, or attacking.
    pub fn is_mid_attack(&self) -> bool {
        if !self.is_active() {
            return false;
        }
        match self.behavior {
            Behavior::Demoman(state) => !matches!(state.phase, DemoPhase::Dormant { .. }),
            _ => self.doorway().is_some() || self.attack_pending(),
        }
    }

    /// A lethal body stands in `room`.
    pub fn body_in(&self, room: RoomNode) -> bool {
        if !self.is_active() || self.core.node != room {
            return false;
        }
        match self.behavior {
            Behavior::Scout(_) | Behavior::Soldier(_) | Behavior::Heavy(_) | Behavior::Sniper(_) => true,
            Behavior::Demoman(state) => !matches!(
                state.phase,
                DemoPhase::Dormant { .. } | DemoPhase::Warning { .. }
            ),
            Behavior::Pyro(state) => matches!(state.mode, PyroMode::Room { .. }),
            Behavior::Spy(_) | Behavior::Medic(_) => false,
        }
    }

    /// Current Medic target.
    pub fn heal_target(&self) -> Option<EnemyKind> {
        match self.behavior {
            Behavior::Medic(state) if self.is_active() => state.target,
            _ => None,
        }
    }

    pub fn sapper_attached(&self) -> bool {
        matches!(self.behavior, Behavior::Spy(state) if state.sapper.is_some())
    }

    // --- Actions applied by the engine ---

    /// Sends the unit away after a repel, auto-defense or evaded attack.
    pub fn drive_off<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if !self.is_active() {
            return;
        }
        let kind = self.core.kind;
        if let Some(respawn_in_ms) = profiles::respawn_delay_ms(kind) {
            let (node, behavior) = spawn_state(kind, self.core.ai_level, rng);
            self.core.node = node;
            self.behavior = behavior;
            self.presence = Presence::Despawned { respawn_in_ms };
            debug!(enemy = %kind, respawn_in_ms, "driven off");
            return;
        }
        let ai_level = self.core.ai_level;
        let Self { core, behavior, .. } = self;
        match behavior {
            Behavior::Demoman(state) => demoman::reset(state, core, ai_level, rng),
            Behavior::Heavy(state) | Behavior::Sniper(state) => roamer::return_to_patrol(state, core, rng),
            Behavior::Pyro(state) => pyro::relocate(state, core, rng),
            Behavior::Spy(state) => spy::retreat(state, core),
            _ => {}
        }
        debug!(enemy = %kind, room = %self.core.node, "driven off");
    }

    /// Applies a manual shot to the unit occupying the aimed doorway.
    pub fn take_hit<R: Rng + ?Sized>(&mut self, apparatus_level: u8, rng: &mut R) -> HitOutcome {
        match &mut self.behavior {
            Behavior::Heavy(_) | Behavior::Spy(_) | Behavior::Medic(_) => HitOutcome::Immune,
            Behavior::Pyro(state) => {
                pyro::relocate(state, &mut self.core, rng);
                HitOutcome::Reflected
            }
            Behavior::Sniper(state) => {
                let required = profiles::sniper_hits_required(apparatus_level);
                match roamer::register_hit(state, required) {
                    Some(hits) => HitOutcome::PartialHit { hits, required },
                    None => {
                        self.drive_off(rng);
                        HitOutcome::Repelled { bonus: 0 }
                    }
                }
            }
            Behavior::Demoman(state) => {
                let bonus = demoman::repel_bonus(state);
                self.drive_off(rng);
                HitOutcome::Repelled { bonus }
            }
            Behavior::Scout(_) | Behavior::Soldier(_) => {
                self.drive_off(rng);
                HitOutcome::Repelled { bonus: 0 }
            }
        }
    }

    /// The apparatus was destroyed. Returns what the unit does about it.
    pub fn on_apparatus_lost(&mut self) -> Option<UnitSignal> {
        match &mut self.behavior {
            Behavior::Soldier(state) => soldier::begin_breach(state),
            Behavior::Spy(state) => {
                state.sapper = None;
                None
            }
            _ => None,
        }
    }

    /// Opportunistic sap attempt after a completed teleport.
    pub fn try_attach_sapper<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if !self.is_active() {
            return false;
        }
        let ai_level = self.core.ai_level;
        match &mut self.behavior {
            Behavior::Spy(state) => spy::try_attach(state, ai_level, rng),
            _ => false,
        }
    }

    /// One press of the sapper-removal sequence.
    pub fn press_sapper(&mut self) -> SapperPress {
        let Self { core, behavior, .. } = self;
        match behavior {
            Behavior::Spy(state) => spy::press(state, core),
            _ => SapperPress::NoSapper,
        }
    }

    /// Drops the Medic target and restarts the hourly reselection.
    pub fn clear_target(&mut self) {
        if let Behavior::Medic(state) = &mut self.behavior {
            state.target = None;
            state.reselect_in_ms = MEDIC_RESELECT_MS;
        }
    }

    // --- Reporting ---

    pub fn status(&self) -> EnemyStatus {
        if self.force_despawned {
            return EnemyStatus::Inert;
        }
        if let Presence::Despawned { .. } = self.presence {
            return EnemyStatus::Despawned;
        }
        match self.behavior {
            Behavior::Scout(state) => match state {
                LinearState::Approach { .. } => EnemyStatus::Approaching,
                LinearState::AtDoor { .. } => EnemyStatus::AtDoorway,
                LinearState::Attacking => EnemyStatus::Attacking,
            },
            Behavior::Soldier(state) => match state {
                SiegeState::Approach { .. } => EnemyStatus::Approaching,
                SiegeState::Sieging { .. } => EnemyStatus::Sieging,
                SiegeState::Breaching { .. } => EnemyStatus::Breaching,
                SiegeState::Attacking => EnemyStatus::Attacking,
            },
            Behavior::Demoman(state) => match state.phase {
                DemoPhase::Dormant { .. } => EnemyStatus::Dormant,
                DemoPhase::Warning { .. } => EnemyStatus::Warning,
                DemoPhase::Charging { .. } => EnemyStatus::Charging,
                DemoPhase::AtDoor { .. } => EnemyStatus::AtDoorway,
                DemoPhase::Attacking { .. } => EnemyStatus::Attacking,
            },
            Behavior::Heavy(state) | Behavior::Sniper(state) => match state.mode {
                RoamMode::Patrol { .. } => EnemyStatus::Patrolling,
                RoamMode::Lured { .. } => EnemyStatus::Lured,
                RoamMode::AtDoor { .. } => EnemyStatus::AtDoorway,
                RoamMode::Perched { .. } => EnemyStatus::Perched,
                RoamMode::Attacking { .. } => EnemyStatus::Attacking,
            },
            Behavior::Spy(state) => spy::status(&state),
            Behavior::Pyro(state) => match state.mode {
                PyroMode::Room { .. } => EnemyStatus::Roaming,
                PyroMode::Ambush { .. } => EnemyStatus::Lurking,
                PyroMode::Burning { .. } | PyroMode::Ignited => EnemyStatus::Burning,
            },
            Behavior::Medic(state) => match state.target {
                Some(_) => EnemyStatus::Healing,
                None => EnemyStatus::Idle,
            },
        }
    }

    /// Presentation view. `invulnerable` is filled in by the engine.
    pub fn view(&self) -> EnemyView {
        let active = self.is_active();
        let (appears_as, watch_progress, head_room) = match self.behavior {
            Behavior::Spy(state) => (spy::appears_as(&state), 0, None),
            Behavior::Heavy(state) | Behavior::Sniper(state) => {
                (None, roamer::watch_progress(&state), None)
            }
            Behavior::Demoman(state) => (None, 0, active.then_some(state.head)),
            _ => (None, 0, None),
        };
        let room = match self.behavior {
            Behavior::Demoman(state) if matches!(state.phase, DemoPhase::Dormant { .. } | DemoPhase::Warning { .. }) => {
                None
            }
            _ => self.room(),
        };
        let visible_on_cameras = room.is_some_and(|r| r.has_camera())
            && !matches!(self.behavior, Behavior::Pyro(_));
        EnemyView {
            kind: self.core.kind,
            status: self.status(),
            active,
            ai_level: self.core.ai_level,
            room,
            doorway: self.doorway(),
            visible_on_cameras,
            appears_as,
            invulnerable: false,
            watch_progress,
            head_room,
        }
    }
}

/// Starting room and state of a freshly spawned unit.
fn spawn_state<R: Rng + ?Sized>(kind: EnemyKind, ai_level: u8, rng: &mut R) -> (RoomNode, Behavior) {
    match kind {
        EnemyKind::Scout => (scout::SPAWN, Behavior::Scout(LinearState::fresh())),
        EnemyKind::Soldier => (soldier::SPAWN, Behavior::Soldier(SiegeState::fresh())),
        EnemyKind::Demoman => {
            let head = dice::pick(rng, &RoomNode::HEAD_SPOTS, None, RoomNode::Spawn);
            (head, Behavior::Demoman(DemoState::dormant(head, ai_level)))
        }
        EnemyKind::Heavy => {
            let room = dice::pick(rng, &RoomNode::PATROL_ROOMS, None, RoomNode::Spawn);
            (room, Behavior::Heavy(RoamerState::patrol(kind)))
        }
        EnemyKind::Sniper => {
            let room = dice::pick(rng, &RoomNode::PATROL_ROOMS, None, RoomNode::Spawn);
            (room, Behavior::Sniper(RoamerState::patrol(kind)))
        }
        EnemyKind::Spy => {
            let room = dice::pick(rng, &RoomNode::PATROL_ROOMS, None, RoomNode::Spawn);
            let disguise = dice::pick(rng, &EnemyKind::DISGUISES, None, EnemyKind::Scout);
            (room, Behavior::Spy(SpyState::disguised(disguise)))
        }
        EnemyKind::Pyro => {
            let room = dice::pick(rng, &RoomNode::CAMERA_ROOMS, None, RoomNode::Spawn);
            (room, Behavior::Pyro(PyroState::fresh()))
        }
        EnemyKind::Medic => (RoomNode::Spawn, Behavior::Medic(MedicState::fresh())),
    }
}
