//! Medic: support unit.
//!
//! Never attacks. Once an hour it picks one of the healable attackers and
//! makes it invulnerable to the apparatus until that attacker's assault is
//! resolved. A target that is mid-attack is kept; others are skipped.

use rand::Rng;
use serde::{Deserialize, Serialize};

use nightwatch_core::constants::MEDIC_RESELECT_MS;
use nightwatch_core::enums::EnemyKind;

use crate::context::{UnitContext, UnitSignal};
use crate::dice;
use crate::unit::{run_down, Step, UnitCore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicState {
    pub reselect_in_ms: u32,
    pub target: Option<EnemyKind>,
}

impl MedicState {
    /// Picks a first target as soon as the night starts.
    pub fn fresh() -> Self {
        Self {
            reselect_in_ms: 0,
            target: None,
        }
    }
}

pub(crate) fn step<R: Rng + ?Sized>(
    state: &mut MedicState,
    core: &mut UnitCore,
    budget: u32,
    ctx: &UnitContext,
    rng: &mut R,
    out: &mut Vec<UnitSignal>,
) -> Step {
    let Some(consumed) = run_down(&mut state.reselect_in_ms, budget) else {
        return Step::Idle;
    };
    state.reselect_in_ms = MEDIC_RESELECT_MS;
    if core.ai_level == 0 {
        state.target = None;
        return Step::Fired { consumed };
    }
    if state.target.is_some() && ctx.heal_target_busy {
        return Step::Fired { consumed };
    }
    let Some(first) = ctx.heal_candidates.first().copied() else {
        state.target = None;
        return Step::Fired { consumed };
    };
    let target = dice::pick(rng, &ctx.heal_candidates, None, first);
    if state.target != Some(target) {
        out.push(UnitSignal::TargetAcquired { target });
    }
    state.target = Some(target);
    Step::Fired { consumed }
}
