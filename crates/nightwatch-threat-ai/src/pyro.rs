//! Pyro: mode-alternating ambusher.
//!
//! Room mode: hops among every room but the protected one, invisible to
//! cameras but audible, and kills a player who teleports into its room.
//! A flashlight held on it in a doorway drives it off. Ambush mode: may
//! light up inside the protected room while the player is there; the
//! player has to be gone before the burn countdown ends.

use rand::Rng;
use serde::{Deserialize, Serialize};

use nightwatch_core::constants::*;
use nightwatch_core::enums::EnemyMode;
use nightwatch_core::rooms::RoomNode;

use crate::context::{UnitContext, UnitSignal};
use crate::dice;
use crate::unit::{horizon, Step, UnitCore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PyroMode {
    Room { hop_in_ms: u32 },
    Ambush { roll_in_ms: u32 },
    /// Inside the protected room, counting down.
    Burning { remaining_ms: u32 },
    /// The countdown ran out.
    Ignited,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PyroState {
    pub mode: PyroMode,
    /// Time to the next room/ambush flip. Paused while burning.
    pub mode_in_ms: u32,
    /// Continuous flashlight exposure at a doorway.
    pub lit_ms: u32,
}

impl PyroState {
    pub fn fresh() -> Self {
        Self {
            mode: PyroMode::Room {
                hop_in_ms: PYRO_HOP_INTERVAL_MS,
            },
            mode_in_ms: PYRO_MODE_INTERVAL_MS,
            lit_ms: 0,
        }
    }
}

/// Moves to a random patrol room, leaving any doorway or the protected room.
pub(crate) fn relocate<R: Rng + ?Sized>(state: &mut PyroState, core: &mut UnitCore, rng: &mut R) {
    core.node = dice::pick(rng, &RoomNode::PATROL_ROOMS, Some(core.node), core.node);
    state.lit_ms = 0;
    if matches!(state.mode, PyroMode::Burning { .. } | PyroMode::Ignited) {
        state.mode = PyroMode::Ambush {
            roll_in_ms: PYRO_AMBUSH_ROLL_MS,
        };
    }
}

fn relocate_signalled<R: Rng + ?Sized>(
    state: &mut PyroState,
    core: &mut UnitCore,
    rng: &mut R,
    out: &mut Vec<UnitSignal>,
) {
    let from = core.node;
    relocate(state, core, rng);
    out.push(UnitSignal::Moved { from, to: core.node });
}

pub(crate) fn step<R: Rng + ?Sized>(
    state: &mut PyroState,
    core: &mut UnitCore,
    budget: u32,
    ctx: &UnitContext,
    rng: &mut R,
    out: &mut Vec<UnitSignal>,
) -> Step {
    if matches!(state.mode, PyroMode::Burning { .. }) && ctx.player_away {
        relocate_signalled(state, core, rng, out);
        out.push(UnitSignal::Repelled { bonus: 0 });
        return Step::Fired { consumed: 0 };
    }

    let lit = matches!(state.mode, PyroMode::Room { .. })
        && core.node.door_side().is_some()
        && ctx.flashlight == core.node.door_side();
    if !lit {
        state.lit_ms = 0;
    }
    let lit_in = lit.then(|| PYRO_EXPOSURE_MS.saturating_sub(state.lit_ms));
    let flip_in = match state.mode {
        PyroMode::Burning { .. } | PyroMode::Ignited => None,
        _ => Some(state.mode_in_ms),
    };
    // Room hops wait out the player's transit.
    let held = ctx.in_transit
        && core.kind.holds_teleports_in_transit()
        && matches!(state.mode, PyroMode::Room { .. });
    let inner = match state.mode {
        PyroMode::Room { .. } if held => None,
        PyroMode::Room { hop_in_ms } => Some(hop_in_ms),
        PyroMode::Ambush { roll_in_ms } => Some(roll_in_ms),
        PyroMode::Burning { remaining_ms } => Some(remaining_ms),
        PyroMode::Ignited => None,
    };
    let (consumed, fired) = horizon(budget, &[lit_in, inner, flip_in]);

    if lit {
        state.lit_ms += consumed;
    }
    if flip_in.is_some() {
        state.mode_in_ms = state.mode_in_ms.saturating_sub(consumed);
    }
    match &mut state.mode {
        PyroMode::Room { .. } if held => {}
        PyroMode::Room { hop_in_ms: t }
        | PyroMode::Ambush { roll_in_ms: t }
        | PyroMode::Burning { remaining_ms: t } => *t = t.saturating_sub(consumed),
        PyroMode::Ignited => {}
    }
    if !fired {
        return Step::Idle;
    }

    if lit && state.lit_ms >= PYRO_EXPOSURE_MS {
        relocate_signalled(state, core, rng, out);
        out.push(UnitSignal::Repelled {
            bonus: PYRO_REPEL_BONUS,
        });
        return Step::Fired { consumed };
    }

    match state.mode {
        PyroMode::Room { hop_in_ms: 0 } => {
            state.mode = PyroMode::Room {
                hop_in_ms: PYRO_HOP_INTERVAL_MS,
            };
            if dice::opportunity(rng, core.ai_level) {
                let to = dice::pick(rng, &RoomNode::CAMERA_ROOMS, Some(core.node), core.node);
                out.push(UnitSignal::Moved { from: core.node, to });
                out.push(UnitSignal::Crackle { room: to });
                core.node = to;
            }
            return Step::Fired { consumed };
        }
        PyroMode::Ambush { roll_in_ms: 0 } => {
            state.mode = PyroMode::Ambush {
                roll_in_ms: PYRO_AMBUSH_ROLL_MS,
            };
            if !ctx.player_away && dice::opportunity(rng, core.ai_level) {
                out.push(UnitSignal::Moved {
                    from: core.node,
                    to: RoomNode::Intel,
                });
                out.push(UnitSignal::MatchLit);
                core.node = RoomNode::Intel;
                state.mode = PyroMode::Burning {
                    remaining_ms: PYRO_BURN_MS,
                };
            }
            return Step::Fired { consumed };
        }
        PyroMode::Burning { remaining_ms: 0 } => {
            state.mode = PyroMode::Ignited;
            out.push(UnitSignal::Burned);
            return Step::Fired { consumed };
        }
        _ => {}
    }

    // Only the mode flip is left.
    state.mode_in_ms = PYRO_MODE_INTERVAL_MS;
    let mode = match state.mode {
        PyroMode::Room { .. } => {
            state.mode = PyroMode::Ambush {
                roll_in_ms: PYRO_AMBUSH_ROLL_MS,
            };
            EnemyMode::AmbushMode
        }
        _ => {
            state.mode = PyroMode::Room {
                hop_in_ms: PYRO_HOP_INTERVAL_MS,
            };
            EnemyMode::RoomMode
        }
    };
    out.push(UnitSignal::ModeChanged { mode });
    Step::Fired { consumed }
}
