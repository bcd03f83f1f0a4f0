//! Random draws. Every roll goes through here so the units never touch the
//! random source outside their timer events.

use rand::Rng;

use nightwatch_core::select::{opportunity_succeeds, pick_excluding};

/// A d20 roll, 1-20.
pub fn d20<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    rng.gen_range(1..=20)
}

/// Rolls a movement opportunity. Level 0 never rolls.
pub fn opportunity<R: Rng + ?Sized>(rng: &mut R, ai_level: u8) -> bool {
    if ai_level == 0 {
        return false;
    }
    opportunity_succeeds(ai_level, d20(rng))
}

/// Second roll against half the level, used for doorway pushes and perches.
pub fn committed<R: Rng + ?Sized>(rng: &mut R, ai_level: u8) -> bool {
    opportunity(rng, ai_level / 2)
}

/// Raw draw for [`pick_excluding`] and the lure heuristic.
pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    rng.gen()
}

/// Picks an option other than `exclude`, falling back to `fallback`.
pub fn pick<R: Rng + ?Sized, T: Copy + PartialEq>(
    rng: &mut R,
    options: &[T],
    exclude: Option<T>,
    fallback: T,
) -> T {
    pick_excluding(options, exclude, draw(rng)).unwrap_or(fallback)
}
