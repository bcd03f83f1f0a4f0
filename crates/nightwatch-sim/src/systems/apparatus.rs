//! Defense apparatus and the metal pool.
//!
//! Every operation validates in full and returns a [`Denial`] before any
//! state changes, so the pool and the apparatus never disagree.

use nightwatch_core::commands::Denial;
use nightwatch_core::constants::*;
use nightwatch_core::enums::DoorSide;
use nightwatch_core::state::{ApparatusView, ResourceView};

/// Bounded metal counter with fixed-rate regeneration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePool {
    metal: u32,
    /// Time accumulated toward the next unit of metal.
    regen_progress_ms: u32,
    regenerating: bool,
}

impl ResourcePool {
    pub fn new(metal: u32) -> Self {
        Self {
            metal: metal.min(METAL_MAX),
            regen_progress_ms: 0,
            regenerating: true,
        }
    }

    pub fn metal(&self) -> u32 {
        self.metal
    }

    pub fn check(&self, cost: u32) -> Result<(), Denial> {
        if self.metal < cost {
            return Err(Denial::InsufficientMetal {
                needed: cost,
                available: self.metal,
            });
        }
        Ok(())
    }

    pub fn spend(&mut self, cost: u32) -> Result<(), Denial> {
        self.check(cost)?;
        self.metal -= cost;
        Ok(())
    }

    /// Adds metal, clamped to the cap.
    pub fn add(&mut self, amount: u32) {
        self.metal = self.metal.saturating_add(amount).min(METAL_MAX);
    }

    /// Regenerates for `delta_ms` unless suppressed. Progress toward the next
    /// unit is kept while suppressed.
    pub fn regenerate(&mut self, delta_ms: u32, suppressed: bool) {
        self.regenerating = !suppressed;
        if suppressed {
            return;
        }
        let total = self.regen_progress_ms.saturating_add(delta_ms);
        self.add(total / METAL_REGEN_INTERVAL_MS);
        self.regen_progress_ms = total % METAL_REGEN_INTERVAL_MS;
    }

    pub fn view(&self) -> ResourceView {
        ResourceView {
            metal: self.metal,
            max_metal: METAL_MAX,
            regenerating: self.regenerating,
        }
    }

    #[cfg(test)]
    pub fn set_metal(&mut self, metal: u32) {
        self.metal = metal.min(METAL_MAX);
    }
}

/// The turret. It does not exist until built and is gone again at HP 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Apparatus {
    exists: bool,
    level: u8,
    hp: u32,
    manual_aim: bool,
    aim: Option<DoorSide>,
    cooldown_ms: u32,
    max_level_reached: u8,
}

impl Apparatus {
    pub fn exists(&self) -> bool {
        self.exists
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn max_hp(&self) -> u32 {
        if !self.exists {
            return 0;
        }
        let index = usize::from(self.level.clamp(1, APPARATUS_MAX_LEVEL)) - 1;
        APPARATUS_HP_BY_LEVEL[index]
    }

    pub fn manual_aim(&self) -> bool {
        self.manual_aim
    }

    pub fn aim(&self) -> Option<DoorSide> {
        self.aim
    }

    pub fn max_level_reached(&self) -> u8 {
        self.max_level_reached
    }

    /// Applies the held aim intent. A direction without manual aim is dropped.
    pub fn set_aim(&mut self, manual_aim: bool, aim: Option<DoorSide>) {
        if !self.exists {
            self.release_aim();
            return;
        }
        self.manual_aim = manual_aim;
        self.aim = if manual_aim { aim } else { None };
    }

    pub fn release_aim(&mut self) {
        self.manual_aim = false;
        self.aim = None;
    }

    pub fn tick_cooldown(&mut self, delta_ms: u32) {
        self.cooldown_ms = self.cooldown_ms.saturating_sub(delta_ms);
    }

    // --- Validation ---

    pub fn validate_build(&self, pool: &ResourcePool) -> Result<u32, Denial> {
        if self.exists {
            return Err(Denial::ApparatusPresent);
        }
        pool.check(APPARATUS_BUILD_COST)?;
        Ok(APPARATUS_BUILD_COST)
    }

    /// Repair cost: the missing HP, capped per action.
    pub fn validate_repair(&self, pool: &ResourcePool) -> Result<u32, Denial> {
        if !self.exists {
            return Err(Denial::ApparatusAbsent);
        }
        let missing = self.max_hp().saturating_sub(self.hp);
        if missing == 0 {
            return Err(Denial::FullHealth);
        }
        let cost = missing.min(APPARATUS_REPAIR_CEILING);
        pool.check(cost)?;
        Ok(cost)
    }

    pub fn validate_upgrade(&self, pool: &ResourcePool) -> Result<u32, Denial> {
        if !self.exists {
            return Err(Denial::ApparatusAbsent);
        }
        if self.level >= APPARATUS_MAX_LEVEL {
            return Err(Denial::MaxLevel);
        }
        if self.hp < self.max_hp() {
            return Err(Denial::NotFullHealth);
        }
        pool.check(APPARATUS_UPGRADE_COST)?;
        Ok(APPARATUS_UPGRADE_COST)
    }

    /// The aimed doorway, if a shot can go off now.
    pub fn validate_fire(&self, pool: &ResourcePool) -> Result<DoorSide, Denial> {
        if !self.exists {
            return Err(Denial::ApparatusAbsent);
        }
        let Some(side) = self.aim.filter(|_| self.manual_aim) else {
            return Err(Denial::NotAimed);
        };
        if self.cooldown_ms > 0 {
            return Err(Denial::Cooldown {
                remaining_ms: self.cooldown_ms,
            });
        }
        pool.check(APPARATUS_FIRE_COST)?;
        Ok(side)
    }

    // --- Mutation, after validation ---

    pub fn build(&mut self) {
        *self = Apparatus {
            exists: true,
            level: 1,
            hp: APPARATUS_HP_BY_LEVEL[0],
            max_level_reached: self.max_level_reached.max(1),
            ..Apparatus::default()
        };
    }

    pub fn repair(&mut self, amount: u32) {
        self.hp = self.hp.saturating_add(amount).min(self.max_hp());
    }

    pub fn upgrade(&mut self) {
        self.level = (self.level + 1).min(APPARATUS_MAX_LEVEL);
        self.hp = self.max_hp();
        self.max_level_reached = self.max_level_reached.max(self.level);
    }

    pub fn start_cooldown(&mut self) {
        self.cooldown_ms = APPARATUS_FIRE_COOLDOWN_MS;
    }

    /// Takes `amount` damage. Returns `true` when this destroys it.
    pub fn damage(&mut self, amount: u32) -> bool {
        if !self.exists {
            return false;
        }
        self.hp = self.hp.saturating_sub(amount);
        if self.hp == 0 {
            self.destroy();
            return true;
        }
        false
    }

    pub fn destroy(&mut self) {
        *self = Apparatus {
            max_level_reached: self.max_level_reached,
            ..Apparatus::default()
        };
    }

    pub fn view(&self, sapped: bool) -> ApparatusView {
        ApparatusView {
            exists: self.exists,
            level: self.level,
            hp: self.hp,
            max_hp: self.max_hp(),
            manual_aim: self.manual_aim,
            aim: self.aim,
            cooldown_ms: self.cooldown_ms,
            sapped,
        }
    }

    #[cfg(test)]
    pub fn set_hp(&mut self, hp: u32) {
        self.hp = hp.min(self.max_hp());
    }
}
