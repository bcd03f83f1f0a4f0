//! Scout: fast linear attacker.
//!
//! Walks a fixed path to the left doorway, waits there, then attacks.

use rand::Rng;
use serde::{Deserialize, Serialize};

use nightwatch_core::constants::{SCOUT_DOOR_WAIT_MS, SCOUT_MOVE_INTERVAL_MS};
use nightwatch_core::enums::DoorSide;
use nightwatch_core::rooms::RoomNode;

use crate::context::UnitSignal;
use crate::dice;
use crate::profiles::SCOUT_PATH;
use crate::unit::{run_down, Step, UnitCore};

pub const SPAWN: RoomNode = SCOUT_PATH[0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinearState {
    /// Walking the path; `index` is the position in it.
    Approach { index: usize, move_in_ms: u32 },
    AtDoor { remaining_ms: u32 },
    Attacking,
}

impl LinearState {
    pub fn fresh() -> Self {
        LinearState::Approach {
            index: 0,
            move_in_ms: SCOUT_MOVE_INTERVAL_MS,
        }
    }
}

/// Outcome of a path movement opportunity.
pub(crate) enum Walk {
    Stayed,
    Moved(usize),
    Arrived(DoorSide),
}

/// Rolls a movement opportunity along `path` from `index`.
pub(crate) fn walk<R: Rng + ?Sized>(
    path: &[RoomNode],
    index: usize,
    core: &mut UnitCore,
    rng: &mut R,
    out: &mut Vec<UnitSignal>,
) -> Walk {
    if index + 1 >= path.len() || !dice::opportunity(rng, core.ai_level) {
        return Walk::Stayed;
    }
    let next = index + 1;
    let to = path[next];
    out.push(UnitSignal::Moved {
        from: core.node,
        to,
    });
    core.node = to;
    match to.door_side() {
        Some(side) => Walk::Arrived(side),
        None => Walk::Moved(next),
    }
}

pub(crate) fn step<R: Rng + ?Sized>(
    state: &mut LinearState,
    core: &mut UnitCore,
    budget: u32,
    rng: &mut R,
    out: &mut Vec<UnitSignal>,
) -> Step {
    match state {
        LinearState::Approach { index, move_in_ms } => {
            let index = *index;
            let Some(consumed) = run_down(move_in_ms, budget) else {
                return Step::Idle;
            };
            *state = match walk(&SCOUT_PATH, index, core, rng, out) {
                Walk::Stayed => LinearState::Approach {
                    index,
                    move_in_ms: SCOUT_MOVE_INTERVAL_MS,
                },
                Walk::Moved(next) => LinearState::Approach {
                    index: next,
                    move_in_ms: SCOUT_MOVE_INTERVAL_MS,
                },
                Walk::Arrived(side) => {
                    out.push(UnitSignal::ArrivedAtDoorway { side });
                    LinearState::AtDoor {
                        remaining_ms: SCOUT_DOOR_WAIT_MS,
                    }
                }
            };
            Step::Fired { consumed }
        }
        LinearState::AtDoor { remaining_ms } => {
            let Some(consumed) = run_down(remaining_ms, budget) else {
                return Step::Idle;
            };
            *state = LinearState::Attacking;
            out.push(UnitSignal::ReachedTarget {
                side: DoorSide::Left,
            });
            Step::Fired { consumed }
        }
        LinearState::Attacking => Step::Idle,
    }
}
