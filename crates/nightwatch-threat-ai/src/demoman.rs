//! Demoman: head/body pair.
//!
//! The head idles on a sensing point with a dormant timer that does not run
//! while the player is looking at it. When it expires a side is chosen, a
//! warning plays, and the body charges down that side's route to the
//! doorway. Repelling the body late in its doorway window pays a bonus.

use rand::Rng;
use serde::{Deserialize, Serialize};

use nightwatch_core::constants::{
    DEMO_BONUS_METAL, DEMO_BONUS_WINDOW_MS, DEMO_CHARGE_STEP_MS, DEMO_DOOR_WAIT_MS, DEMO_WARNING_MS,
};
use nightwatch_core::enums::DoorSide;
use nightwatch_core::rooms::RoomNode;

use crate::context::{UnitContext, UnitSignal};
use crate::dice;
use crate::profiles::{demo_charge_path, demo_dormant_ms};
use crate::unit::{run_down, Step, UnitCore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoState {
    /// Where the head sits. Persists across resets.
    pub head: RoomNode,
    pub phase: DemoPhase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DemoPhase {
    Dormant { remaining_ms: u32 },
    Warning { side: DoorSide, remaining_ms: u32 },
    /// `hop` indexes the side's charge route.
    Charging { side: DoorSide, hop: usize, hop_in_ms: u32 },
    AtDoor { side: DoorSide, remaining_ms: u32 },
    Attacking { side: DoorSide },
}

impl DemoState {
    pub fn dormant(head: RoomNode, ai_level: u8) -> Self {
        Self {
            head,
            phase: DemoPhase::Dormant {
                remaining_ms: demo_dormant_ms(ai_level),
            },
        }
    }
}

/// The player is looking at the head.
pub fn head_observed(head: RoomNode, ctx: &UnitContext) -> bool {
    ctx.watched_room == Some(head)
        || (head.is_protected() && !ctx.player_away && !ctx.camera_open)
}

/// Bonus earned by repelling the body now.
pub(crate) fn repel_bonus(state: &DemoState) -> u32 {
    match state.phase {
        DemoPhase::AtDoor { remaining_ms, .. } if remaining_ms <= DEMO_BONUS_WINDOW_MS => DEMO_BONUS_METAL,
        _ => 0,
    }
}

/// Sends the body home and moves the head to a new sensing point.
pub(crate) fn reset<R: Rng + ?Sized>(state: &mut DemoState, core: &mut UnitCore, ai_level: u8, rng: &mut R) {
    let head = dice::pick(rng, &RoomNode::HEAD_SPOTS, Some(state.head), state.head);
    *state = DemoState::dormant(head, ai_level);
    core.node = head;
}

pub(crate) fn step<R: Rng + ?Sized>(
    state: &mut DemoState,
    core: &mut UnitCore,
    budget: u32,
    ctx: &UnitContext,
    rng: &mut R,
    out: &mut Vec<UnitSignal>,
) -> Step {
    let head = state.head;
    match &mut state.phase {
        DemoPhase::Dormant { remaining_ms } => {
            if core.ai_level == 0 || head_observed(head, ctx) {
                return Step::Idle;
            }
            let Some(consumed) = run_down(remaining_ms, budget) else {
                return Step::Idle;
            };
            let side = dice::pick(rng, &DoorSide::ALL, None, DoorSide::Left);
            state.phase = DemoPhase::Warning {
                side,
                remaining_ms: DEMO_WARNING_MS,
            };
            out.push(UnitSignal::ChargeReady { side });
            Step::Fired { consumed }
        }
        DemoPhase::Warning { side, remaining_ms } => {
            let side = *side;
            let Some(consumed) = run_down(remaining_ms, budget) else {
                return Step::Idle;
            };
            let start = demo_charge_path(side)[0];
            out.push(UnitSignal::Moved {
                from: core.node,
                to: start,
            });
            core.node = start;
            state.phase = DemoPhase::Charging {
                side,
                hop: 0,
                hop_in_ms: DEMO_CHARGE_STEP_MS,
            };
            Step::Fired { consumed }
        }
        DemoPhase::Charging {
            side,
            hop,
            hop_in_ms,
        } => {
            let (side, hop) = (*side, *hop);
            let Some(consumed) = run_down(hop_in_ms, budget) else {
                return Step::Idle;
            };
            let path = demo_charge_path(side);
            let next = (hop + 1).min(path.len() - 1);
            out.push(UnitSignal::Moved {
                from: core.node,
                to: path[next],
            });
            core.node = path[next];
            state.phase = if next == path.len() - 1 {
                out.push(UnitSignal::ArrivedAtDoorway { side });
                DemoPhase::AtDoor {
                    side,
                    remaining_ms: DEMO_DOOR_WAIT_MS,
                }
            } else {
                DemoPhase::Charging {
                    side,
                    hop: next,
                    hop_in_ms: DEMO_CHARGE_STEP_MS,
                }
            };
            Step::Fired { consumed }
        }
        DemoPhase::AtDoor { side, remaining_ms } => {
            let side = *side;
            let Some(consumed) = run_down(remaining_ms, budget) else {
                return Step::Idle;
            };
            state.phase = DemoPhase::Attacking { side };
            out.push(UnitSignal::ReachedTarget { side });
            Step::Fired { consumed }
        }
        DemoPhase::Attacking { .. } => Step::Idle,
    }
}
