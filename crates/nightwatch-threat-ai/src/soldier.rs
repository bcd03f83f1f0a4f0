//! Soldier: siege attacker.
//!
//! Follows its path to the right doorway, then shells the apparatus from
//! range. Once the apparatus is gone the breach countdown runs; rebuilding
//! in time sends it back to shelling.

use rand::Rng;
use serde::{Deserialize, Serialize};

use nightwatch_core::constants::{
    SOLDIER_BREACH_MS, SOLDIER_MOVE_INTERVAL_MS, SOLDIER_ROCKET_DAMAGE, SOLDIER_ROCKET_INTERVAL_MS,
};
use nightwatch_core::enums::DoorSide;
use nightwatch_core::rooms::RoomNode;

use crate::context::{UnitContext, UnitSignal};
use crate::profiles::SOLDIER_PATH;
use crate::scout::{walk, Walk};
use crate::unit::{run_down, Step, UnitCore};

pub const SPAWN: RoomNode = SOLDIER_PATH[0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SiegeState {
    Approach { index: usize, move_in_ms: u32 },
    Sieging { rocket_in_ms: u32 },
    Breaching { remaining_ms: u32 },
    Attacking,
}

impl SiegeState {
    pub fn fresh() -> Self {
        SiegeState::Approach {
            index: 0,
            move_in_ms: SOLDIER_MOVE_INTERVAL_MS,
        }
    }
}

/// Starts the breach countdown if the Soldier was shelling.
pub(crate) fn begin_breach(state: &mut SiegeState) -> Option<UnitSignal> {
    match state {
        SiegeState::Sieging { .. } => {
            *state = SiegeState::Breaching {
                remaining_ms: SOLDIER_BREACH_MS,
            };
            Some(UnitSignal::BreachStarted)
        }
        _ => None,
    }
}

pub(crate) fn step<R: Rng + ?Sized>(
    state: &mut SiegeState,
    core: &mut UnitCore,
    budget: u32,
    ctx: &UnitContext,
    rng: &mut R,
    out: &mut Vec<UnitSignal>,
) -> Step {
    match state {
        SiegeState::Approach { index, move_in_ms } => {
            let index = *index;
            let Some(consumed) = run_down(move_in_ms, budget) else {
                return Step::Idle;
            };
            *state = match walk(&SOLDIER_PATH, index, core, rng, out) {
                Walk::Stayed => SiegeState::Approach {
                    index,
                    move_in_ms: SOLDIER_MOVE_INTERVAL_MS,
                },
                Walk::Moved(next) => SiegeState::Approach {
                    index: next,
                    move_in_ms: SOLDIER_MOVE_INTERVAL_MS,
                },
                Walk::Arrived(side) => {
                    out.push(UnitSignal::ArrivedAtDoorway { side });
                    SiegeState::Sieging {
                        rocket_in_ms: SOLDIER_ROCKET_INTERVAL_MS,
                    }
                }
            };
            Step::Fired { consumed }
        }
        SiegeState::Sieging { .. } if !ctx.apparatus_present => {
            *state = SiegeState::Breaching {
                remaining_ms: SOLDIER_BREACH_MS,
            };
            out.push(UnitSignal::BreachStarted);
            Step::Fired { consumed: 0 }
        }
        SiegeState::Sieging { rocket_in_ms } => {
            let Some(consumed) = run_down(rocket_in_ms, budget) else {
                return Step::Idle;
            };
            *rocket_in_ms = SOLDIER_ROCKET_INTERVAL_MS;
            out.push(UnitSignal::Projectile {
                damage: SOLDIER_ROCKET_DAMAGE,
            });
            Step::Fired { consumed }
        }
        SiegeState::Breaching { .. } if ctx.apparatus_present => {
            *state = SiegeState::Sieging {
                rocket_in_ms: SOLDIER_ROCKET_INTERVAL_MS,
            };
            Step::Fired { consumed: 0 }
        }
        SiegeState::Breaching { remaining_ms } => {
            let Some(consumed) = run_down(remaining_ms, budget) else {
                return Step::Idle;
            };
            *state = SiegeState::Attacking;
            out.push(UnitSignal::ReachedTarget {
                side: DoorSide::Right,
            });
            Step::Fired { consumed }
        }
        SiegeState::Attacking => Step::Idle,
    }
}
