//! Simulation constants and tuning parameters.
//!
//! Every timer is in milliseconds of simulated time. Costs and rewards are
//! in metal.

// --- Night clock ---

/// Length of one in-game hour.
pub const HOUR_MS: u32 = 60_000;

/// Hours in a night (12 AM through 6 AM).
pub const NIGHT_HOURS: u32 = 6;

/// Total length of a night. Surviving this long is a victory.
pub const NIGHT_LENGTH_MS: u64 = HOUR_MS as u64 * NIGHT_HOURS as u64;

/// Hours at which every non-zero base AI level gains +1 on preset nights.
pub const AI_RAMP_HOURS: [u8; 3] = [2, 3, 4];

/// Highest AI level an enemy can have.
pub const MAX_AI_LEVEL: u8 = 20;

/// Number of the custom night (levels from config, no ramp).
pub const CUSTOM_NIGHT: u8 = 7;

// --- Resource pool ---

/// Metal cap.
pub const METAL_MAX: u32 = 200;

/// Metal at the start of a night.
pub const METAL_START: u32 = 150;

/// Time to regenerate one unit of metal.
pub const METAL_REGEN_INTERVAL_MS: u32 = 250;

// --- Defense apparatus ---

/// Cost to build a level 1 apparatus.
pub const APPARATUS_BUILD_COST: u32 = 130;

/// Cost of one upgrade step.
pub const APPARATUS_UPGRADE_COST: u32 = 200;

/// Most HP (and metal) a single repair action restores (spends).
pub const APPARATUS_REPAIR_CEILING: u32 = 60;

/// Metal spent per manual shot.
pub const APPARATUS_FIRE_COST: u32 = 10;

/// Minimum time between two manual shots.
pub const APPARATUS_FIRE_COOLDOWN_MS: u32 = 1_000;

/// Highest apparatus level.
pub const APPARATUS_MAX_LEVEL: u8 = 3;

/// Max HP per level (index 0 = level 1).
pub const APPARATUS_HP_BY_LEVEL: [u32; 3] = [150, 180, 216];

// --- Evasion ---

/// Duration of the teleport transit window.
pub const TELEPORT_TRANSIT_MS: u32 = 1_500;

/// Metal charged when a teleport completes.
pub const TELEPORT_COST: u32 = 20;

/// Time the player has to leave once a listener is adjacent to their room.
pub const ESCAPE_COUNTDOWN_MS: u32 = 6_000;

// --- Distraction ---

/// Metal charged to place a lure.
pub const LURE_PLACE_COST: u32 = 40;

/// How long a lure plays once started.
pub const LURE_PLAY_MS: u32 = 12_000;

/// Hop cadence of a lured unit.
pub const LURED_MOVE_INTERVAL_MS: u32 = 2_000;

// --- Surveillance ---

/// How long a broken camera stays down.
pub const CAMERA_DOWN_MS: u32 = 20_000;

/// Continuous watch time (at base rate) before a camera breaker smashes the camera.
pub const WATCH_DESTROY_MS: u32 = 6_000;

/// Exposure rate while watched, in per-mille of real time.
pub const WATCH_RATE_PERMILLE: u64 = 1_000;

/// Exposure rate when two camera breakers share the watched room.
pub const WATCH_SHARED_RATE_PERMILLE: u64 = 2_000;

/// Multiplier (per-mille) applied on top while the unit is lured.
pub const WATCH_LURED_FACTOR_PERMILLE: u64 = 1_500;

/// Exposure decay rate while unwatched, in per-mille of real time.
pub const WATCH_DECAY_PERMILLE: u64 = 500;

// --- Scout ---

/// Interval between Scout movement opportunities.
pub const SCOUT_MOVE_INTERVAL_MS: u32 = 3_000;

/// Time the Scout waits at its doorway before attacking.
pub const SCOUT_DOOR_WAIT_MS: u32 = 4_500;

/// Time a repelled Scout stays gone.
pub const SCOUT_RESPAWN_MS: u32 = 12_000;

// --- Soldier ---

/// Interval between Soldier movement opportunities.
pub const SOLDIER_MOVE_INTERVAL_MS: u32 = 4_500;

/// Interval between siege rockets.
pub const SOLDIER_ROCKET_INTERVAL_MS: u32 = 3_000;

/// Apparatus damage per rocket.
pub const SOLDIER_ROCKET_DAMAGE: u32 = 40;

/// Breach countdown once the apparatus is gone mid-siege.
pub const SOLDIER_BREACH_MS: u32 = 5_000;

/// Time a repelled Soldier stays gone.
pub const SOLDIER_RESPAWN_MS: u32 = 15_000;

// --- Demoman ---

/// Dormant time of the head at AI level 0.
pub const DEMO_DORMANT_BASE_MS: u32 = 40_000;

/// Dormant time shaved off per AI level.
pub const DEMO_DORMANT_PER_LEVEL_MS: u32 = 2_000;

/// Shortest dormant time regardless of AI level.
pub const DEMO_DORMANT_MIN_MS: u32 = 8_000;

/// Warning interval between dormant expiry and the body spawning.
pub const DEMO_WARNING_MS: u32 = 5_000;

/// Time per hop while the body charges.
pub const DEMO_CHARGE_STEP_MS: u32 = 700;

/// Body phase window at the doorway.
pub const DEMO_DOOR_WAIT_MS: u32 = 6_000;

/// Repelling with at most this much of the window left earns the bonus (~17 %).
pub const DEMO_BONUS_WINDOW_MS: u32 = DEMO_DOOR_WAIT_MS / 6;

/// Metal awarded for a last-second Demoman repel.
pub const DEMO_BONUS_METAL: u32 = 50;

// --- Heavy ---

/// Interval between Heavy movement opportunities.
pub const HEAVY_MOVE_INTERVAL_MS: u32 = 5_000;

/// Time the Heavy stands in a doorway before attacking.
pub const HEAVY_DOOR_WAIT_MS: u32 = 5_000;

// --- Sniper ---

/// Interval between Sniper movement opportunities.
pub const SNIPER_MOVE_INTERVAL_MS: u32 = 5_000;

/// Time to charge a shot from a doorway perch.
pub const SNIPER_CHARGE_MS: u32 = 8_000;

/// Window after a partial hit in which the next hit must land.
pub const SNIPER_RETALIATION_WINDOW_MS: u32 = 3_000;

/// Hits required at apparatus level 1.
pub const SNIPER_HITS_REQUIRED: u8 = 2;

/// Time a fully repelled Sniper stays gone.
pub const SNIPER_RESPAWN_MS: u32 = 15_000;

// --- Spy ---

/// Interval between Spy movement opportunities.
pub const SPY_MOVE_INTERVAL_MS: u32 = 6_000;

/// Interval between sapper damage ticks.
pub const SPY_SAP_INTERVAL_MS: u32 = 2_000;

/// Apparatus damage per sapper tick.
pub const SPY_SAP_DAMAGE: u32 = 15;

/// Presses needed to remove a sapper.
pub const SAPPER_REMOVE_PRESSES: u8 = 3;

/// Window in which the removal presses must land.
pub const SAPPER_PRESS_WINDOW_MS: u32 = 1_500;

/// Idle time after a Spy's sapper is removed.
pub const SPY_RETREAT_MS: u32 = 20_000;

// --- Pyro ---

/// Interval between Pyro room/ambush mode flips.
pub const PYRO_MODE_INTERVAL_MS: u32 = 40_000;

/// Interval between room-mode hop opportunities.
pub const PYRO_HOP_INTERVAL_MS: u32 = 7_000;

/// Interval between ambush opportunities.
pub const PYRO_AMBUSH_ROLL_MS: u32 = 5_000;

/// Burn countdown once the Pyro appears in the protected room.
pub const PYRO_BURN_MS: u32 = 3_500;

/// Continuous illumination needed to repel a doorway Pyro.
pub const PYRO_EXPOSURE_MS: u32 = 2_500;

/// Metal awarded for repelling a Pyro with the flashlight.
pub const PYRO_REPEL_BONUS: u32 = 25;

// --- Medic ---

/// Interval between Medic target selections.
pub const MEDIC_RESELECT_MS: u32 = HOUR_MS;

// --- Engine ---

/// Upper bound on transitions a single unit may take in one advance.
pub const MAX_TRANSITIONS_PER_ADVANCE: u32 = 4_096;
