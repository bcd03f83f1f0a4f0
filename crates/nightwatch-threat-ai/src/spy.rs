//! Spy: disguise and sabotage.
//!
//! Roams the patrol rooms showing up on cameras as another kind. Every hour
//! it flips between disguised and armed; while armed, each completed player
//! teleport is a chance to plant a sapper on the apparatus.

use rand::Rng;
use serde::{Deserialize, Serialize};

use nightwatch_core::constants::*;
use nightwatch_core::enums::{EnemyKind, EnemyMode, EnemyStatus};
use nightwatch_core::rooms::RoomNode;

use crate::context::UnitSignal;
use crate::dice;
use crate::unit::{horizon, Step, UnitCore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpyMode {
    Disguised,
    Armed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sapper {
    pub sap_in_ms: u32,
    pub presses: u8,
    /// Remaining time to finish the removal sequence once started.
    pub press_window_ms: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpyState {
    pub mode: SpyMode,
    pub mode_in_ms: u32,
    pub move_in_ms: u32,
    /// Kind shown on cameras while disguised.
    pub disguise: EnemyKind,
    /// Idling at spawn after losing a sapper.
    pub retreating: bool,
    pub sapper: Option<Sapper>,
}

/// Result of one removal press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SapperPress {
    Pressed { presses: u8 },
    Removed,
    NoSapper,
}

impl SpyState {
    pub fn disguised(disguise: EnemyKind) -> Self {
        Self {
            mode: SpyMode::Disguised,
            mode_in_ms: HOUR_MS,
            move_in_ms: SPY_MOVE_INTERVAL_MS,
            disguise,
            retreating: false,
            sapper: None,
        }
    }
}

pub(crate) fn appears_as(state: &SpyState) -> Option<EnemyKind> {
    (state.mode == SpyMode::Disguised).then_some(state.disguise)
}

pub(crate) fn status(state: &SpyState) -> EnemyStatus {
    if state.sapper.is_some() {
        EnemyStatus::Sapping
    } else if state.retreating {
        EnemyStatus::Retreating
    } else {
        match state.mode {
            SpyMode::Disguised => EnemyStatus::Disguised,
            SpyMode::Armed => EnemyStatus::Armed,
        }
    }
}

pub(crate) fn try_attach<R: Rng + ?Sized>(state: &mut SpyState, ai_level: u8, rng: &mut R) -> bool {
    if state.mode != SpyMode::Armed || state.sapper.is_some() || state.retreating {
        return false;
    }
    if !dice::opportunity(rng, ai_level) {
        return false;
    }
    state.sapper = Some(Sapper {
        sap_in_ms: SPY_SAP_INTERVAL_MS,
        presses: 0,
        press_window_ms: None,
    });
    true
}

pub(crate) fn press(state: &mut SpyState, core: &mut UnitCore) -> SapperPress {
    let Some(sapper) = &mut state.sapper else {
        return SapperPress::NoSapper;
    };
    sapper.presses = sapper.presses.saturating_add(1);
    if sapper.presses >= SAPPER_REMOVE_PRESSES {
        retreat(state, core);
        return SapperPress::Removed;
    }
    if sapper.press_window_ms.is_none() {
        sapper.press_window_ms = Some(SAPPER_PRESS_WINDOW_MS);
    }
    SapperPress::Pressed {
        presses: sapper.presses,
    }
}

/// Back to spawn to idle after the sapper came off.
pub(crate) fn retreat(state: &mut SpyState, core: &mut UnitCore) {
    state.sapper = None;
    state.retreating = true;
    state.move_in_ms = SPY_RETREAT_MS;
    core.node = RoomNode::Spawn;
}

pub(crate) fn step<R: Rng + ?Sized>(
    state: &mut SpyState,
    core: &mut UnitCore,
    budget: u32,
    rng: &mut R,
    out: &mut Vec<UnitSignal>,
) -> Step {
    let sap_in = state.sapper.map(|s| s.sap_in_ms);
    let window = state.sapper.and_then(|s| s.press_window_ms);
    let (consumed, fired) = horizon(
        budget,
        &[window, sap_in, Some(state.mode_in_ms), Some(state.move_in_ms)],
    );

    state.mode_in_ms = state.mode_in_ms.saturating_sub(consumed);
    state.move_in_ms = state.move_in_ms.saturating_sub(consumed);
    if let Some(sapper) = &mut state.sapper {
        sapper.sap_in_ms = sapper.sap_in_ms.saturating_sub(consumed);
        if let Some(w) = &mut sapper.press_window_ms {
            *w = w.saturating_sub(consumed);
        }
    }
    if !fired {
        return Step::Idle;
    }

    if let Some(sapper) = &mut state.sapper {
        if sapper.press_window_ms == Some(0) {
            sapper.presses = 0;
            sapper.press_window_ms = None;
            return Step::Fired { consumed };
        }
        if sapper.sap_in_ms == 0 {
            sapper.sap_in_ms = SPY_SAP_INTERVAL_MS;
            out.push(UnitSignal::SapDamage {
                damage: SPY_SAP_DAMAGE,
            });
            return Step::Fired { consumed };
        }
    }

    if state.mode_in_ms == 0 {
        state.mode_in_ms = HOUR_MS;
        let mode = match state.mode {
            SpyMode::Disguised => {
                state.mode = SpyMode::Armed;
                EnemyMode::Armed
            }
            SpyMode::Armed => {
                state.mode = SpyMode::Disguised;
                state.disguise = dice::pick(rng, &EnemyKind::DISGUISES, Some(state.disguise), state.disguise);
                EnemyMode::Disguised
            }
        };
        out.push(UnitSignal::ModeChanged { mode });
        return Step::Fired { consumed };
    }

    state.move_in_ms = SPY_MOVE_INTERVAL_MS;
    state.retreating = false;
    if dice::opportunity(rng, core.ai_level) {
        let to = dice::pick(rng, &RoomNode::PATROL_ROOMS, Some(core.node), core.node);
        out.push(UnitSignal::Moved { from: core.node, to });
        core.node = to;
    }
    Step::Fired { consumed }
}
