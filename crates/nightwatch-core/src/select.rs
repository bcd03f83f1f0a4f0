//! Pure selection helpers. Randomness is supplied as an already-drawn value
//! so every choice is reproducible from (options, exclusion, draw).

/// Picks `options[draw % n]` among the options that are not `exclude`.
///
/// Returns `None` when nothing is left to pick.
pub fn pick_excluding<T: Copy + PartialEq>(options: &[T], exclude: Option<T>, draw: u32) -> Option<T> {
    let count = options.iter().filter(|o| Some(**o) != exclude).count();
    if count == 0 {
        return None;
    }
    let index = draw as usize % count;
    options
        .iter()
        .copied()
        .filter(|o| Some(*o) != exclude)
        .nth(index)
}

/// A movement opportunity succeeds when a d20 `roll` (1-20) does not exceed the AI level.
/// Level 0 never succeeds.
pub fn opportunity_succeeds(ai_level: u8, roll: u8) -> bool {
    ai_level > 0 && roll <= ai_level
}
