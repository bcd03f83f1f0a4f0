//! Heavy and Sniper: free-roaming units.
//!
//! Both teleport among the patrol rooms, follow a playing lure, and smash a
//! camera that watches them for too long. From patrol the Heavy may push
//! into an adjacent doorway; the Sniper may perch on either doorway and
//! charge a shot.

use rand::Rng;
use serde::{Deserialize, Serialize};

use nightwatch_core::constants::*;
use nightwatch_core::enums::{DoorSide, EnemyKind};
use nightwatch_core::rooms::{next_hop_toward, RoomNode};

use crate::context::{UnitContext, UnitSignal};
use crate::dice;
use crate::profiles::move_interval_ms;
use crate::unit::{horizon, Step, UnitCore};

/// Exposure needed to break a camera, in ms x per-mille.
pub const WATCH_THRESHOLD: u64 = WATCH_DESTROY_MS as u64 * 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoamerState {
    pub mode: RoamMode,
    /// Accumulated camera exposure, ms x per-mille.
    pub watch: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoamMode {
    Patrol { move_in_ms: u32 },
    Lured { move_in_ms: u32 },
    /// Heavy standing in a doorway.
    AtDoor { side: DoorSide, remaining_ms: u32 },
    /// Sniper charging a shot from a doorway.
    Perched {
        side: DoorSide,
        charge_in_ms: u32,
        hits: u8,
        /// Window for the next hit after a partial one.
        retaliation_in_ms: Option<u32>,
    },
    Attacking { side: DoorSide },
}

impl RoamerState {
    pub fn patrol(kind: EnemyKind) -> Self {
        Self {
            mode: RoamMode::Patrol {
                move_in_ms: move_interval_ms(kind),
            },
            watch: 0,
        }
    }
}

impl RoamMode {
    fn next_event_ms(&self) -> Option<u32> {
        match *self {
            RoamMode::Patrol { move_in_ms } | RoamMode::Lured { move_in_ms } => Some(move_in_ms),
            RoamMode::AtDoor { remaining_ms, .. } => Some(remaining_ms),
            RoamMode::Perched {
                charge_in_ms,
                retaliation_in_ms,
                ..
            } => Some(retaliation_in_ms.map_or(charge_in_ms, |r| r.min(charge_in_ms))),
            RoamMode::Attacking { .. } => None,
        }
    }

    fn elapse(&mut self, ms: u32) {
        match self {
            RoamMode::Patrol { move_in_ms } | RoamMode::Lured { move_in_ms } => {
                *move_in_ms = move_in_ms.saturating_sub(ms);
            }
            RoamMode::AtDoor { remaining_ms, .. } => *remaining_ms = remaining_ms.saturating_sub(ms),
            RoamMode::Perched {
                charge_in_ms,
                retaliation_in_ms,
                ..
            } => {
                *charge_in_ms = charge_in_ms.saturating_sub(ms);
                if let Some(window) = retaliation_in_ms {
                    *window = window.saturating_sub(ms);
                }
            }
            RoamMode::Attacking { .. } => {}
        }
    }
}

/// Exposure gained per ms while watched.
fn watch_rate(ctx: &UnitContext, lured: bool) -> u64 {
    let base = if ctx.shared_watch {
        WATCH_SHARED_RATE_PERMILLE
    } else {
        WATCH_RATE_PERMILLE
    };
    if lured {
        base * WATCH_LURED_FACTOR_PERMILLE / 1_000
    } else {
        base
    }
}

/// Time until `watch` reaches the threshold at `rate`.
fn time_to_break(watch: u64, rate: u64) -> u32 {
    let missing = WATCH_THRESHOLD.saturating_sub(watch);
    u32::try_from(missing.div_ceil(rate)).unwrap_or(u32::MAX)
}

/// Camera-break progress, 0-1000.
pub fn watch_progress(state: &RoamerState) -> u32 {
    (state.watch.min(WATCH_THRESHOLD) * 1_000 / WATCH_THRESHOLD) as u32
}

/// Registers a hit on a perched Sniper. Returns the hit count if it holds
/// its ground, `None` once `required` is reached.
pub(crate) fn register_hit(state: &mut RoamerState, required: u8) -> Option<u8> {
    let (side, hits) = match state.mode {
        RoamMode::Perched { side, hits, .. } => (side, hits),
        RoamMode::Attacking { side } => (side, 0),
        _ => return None,
    };
    let hits = hits.saturating_add(1);
    if hits >= required {
        return None;
    }
    state.mode = RoamMode::Perched {
        side,
        charge_in_ms: SNIPER_CHARGE_MS,
        hits,
        retaliation_in_ms: Some(SNIPER_RETALIATION_WINDOW_MS),
    };
    Some(hits)
}

/// Back to patrol in a random patrol room.
pub(crate) fn return_to_patrol<R: Rng + ?Sized>(state: &mut RoamerState, core: &mut UnitCore, rng: &mut R) {
    core.node = dice::pick(rng, &RoomNode::PATROL_ROOMS, Some(core.node), core.node);
    state.mode = RoamMode::Patrol {
        move_in_ms: move_interval_ms(core.kind),
    };
}

fn teleport<R: Rng + ?Sized>(core: &mut UnitCore, rng: &mut R, out: &mut Vec<UnitSignal>) {
    let to = dice::pick(rng, &RoomNode::PATROL_ROOMS, Some(core.node), core.node);
    if to != core.node {
        out.push(UnitSignal::Moved { from: core.node, to });
        core.node = to;
    }
}

fn enter_doorway(core: &mut UnitCore, side: DoorSide, out: &mut Vec<UnitSignal>) {
    let to = side.doorway();
    out.push(UnitSignal::Moved { from: core.node, to });
    out.push(UnitSignal::ArrivedAtDoorway { side });
    core.node = to;
}

/// Patrol opportunity: move, push or perch.
fn patrol_move<R: Rng + ?Sized>(core: &mut UnitCore, rng: &mut R, out: &mut Vec<UnitSignal>) -> RoamMode {
    let idle = RoamMode::Patrol {
        move_in_ms: move_interval_ms(core.kind),
    };
    if !dice::opportunity(rng, core.ai_level) {
        return idle;
    }
    match core.kind {
        EnemyKind::Heavy => {
            if let Some(side) = core.node.adjacent_doorway() {
                if dice::committed(rng, core.ai_level) {
                    enter_doorway(core, side, out);
                    return RoamMode::AtDoor {
                        side,
                        remaining_ms: HEAVY_DOOR_WAIT_MS,
                    };
                }
            }
        }
        EnemyKind::Sniper => {
            if dice::committed(rng, core.ai_level) {
                let side = dice::pick(rng, &DoorSide::ALL, None, DoorSide::Left);
                enter_doorway(core, side, out);
                return RoamMode::Perched {
                    side,
                    charge_in_ms: SNIPER_CHARGE_MS,
                    hits: 0,
                    retaliation_in_ms: None,
                };
            }
        }
        _ => {}
    }
    teleport(core, rng, out);
    idle
}

pub(crate) fn step<R: Rng + ?Sized>(
    state: &mut RoamerState,
    core: &mut UnitCore,
    budget: u32,
    ctx: &UnitContext,
    rng: &mut R,
    out: &mut Vec<UnitSignal>,
) -> Step {
    // Lure engagement and release take no time.
    match (state.mode, ctx.lure) {
        (RoamMode::Lured { .. }, None) => {
            state.mode = RoamMode::Patrol {
                move_in_ms: move_interval_ms(core.kind),
            };
            out.push(UnitSignal::Released);
            return Step::Fired { consumed: 0 };
        }
        (RoamMode::Patrol { .. } | RoamMode::AtDoor { .. } | RoamMode::Perched { .. }, Some(_))
            if core.ai_level > 0 =>
        {
            state.mode = RoamMode::Lured {
                move_in_ms: LURED_MOVE_INTERVAL_MS,
            };
            out.push(UnitSignal::Lured);
            return Step::Fired { consumed: 0 };
        }
        _ => {}
    }

    let lured = matches!(state.mode, RoamMode::Lured { .. });
    let watched = ctx.watched_room == Some(core.node);
    let rate = watch_rate(ctx, lured);
    let break_in = watched.then(|| time_to_break(state.watch, rate));
    // Patrol teleports wait out the player's transit.
    let held = ctx.in_transit
        && core.kind.holds_teleports_in_transit()
        && matches!(state.mode, RoamMode::Patrol { .. });
    let next_move = if held { None } else { state.mode.next_event_ms() };
    let (consumed, fired) = horizon(budget, &[break_in, next_move]);

    state.watch = if watched {
        (state.watch + rate * u64::from(consumed)).min(WATCH_THRESHOLD)
    } else {
        state
            .watch
            .saturating_sub(WATCH_DECAY_PERMILLE * u64::from(consumed))
    };
    if !held {
        state.mode.elapse(consumed);
    }
    if !fired {
        return Step::Idle;
    }

    if watched && state.watch >= WATCH_THRESHOLD {
        state.watch = 0;
        out.push(UnitSignal::CameraDestroyed { camera: core.node });
        return Step::Fired { consumed };
    }

    state.mode = match state.mode {
        RoamMode::Patrol { .. } => patrol_move(core, rng, out),
        RoamMode::Lured { .. } => {
            if let Some(target) = ctx.lure {
                let to = next_hop_toward(core.node, target, dice::draw(rng));
                if to != core.node {
                    out.push(UnitSignal::Moved { from: core.node, to });
                    core.node = to;
                }
            }
            RoamMode::Lured {
                move_in_ms: LURED_MOVE_INTERVAL_MS,
            }
        }
        RoamMode::AtDoor { side, .. } => {
            out.push(UnitSignal::ReachedTarget { side });
            RoamMode::Attacking { side }
        }
        RoamMode::Perched {
            side,
            charge_in_ms,
            retaliation_in_ms: Some(0),
            ..
        } => RoamMode::Perched {
            side,
            charge_in_ms,
            hits: 0,
            retaliation_in_ms: None,
        },
        RoamMode::Perched { side, .. } => {
            out.push(UnitSignal::ChargeReady { side });
            out.push(UnitSignal::ReachedTarget { side });
            RoamMode::Attacking { side }
        }
        attacking @ RoamMode::Attacking { .. } => attacking,
    };
    Step::Fired { consumed }
}
