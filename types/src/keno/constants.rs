/// Highest number on the board (numbers are `1..=BOARD_SIZE`).
pub const BOARD_SIZE: u8 = 40;

/// Numbers drawn per spin.
pub const DRAW_SIZE: usize = 10;

/// Draw positions exposed before the keep/raise decision.
pub const PREVIEW_SIZE: usize = 5;

/// Maximum numbers a player may select.
pub const MAX_PICKS: usize = 10;

/// Minor units per display credit. Every default split is exact at this resolution.
pub const UNITS_PER_CREDIT: u64 = 10_000;

/// Basis-point denominator used by every percentage in the engine.
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Wager split: share funding the tier bucket.
pub const BUCKET_SHARE_BPS: u64 = 9_400;
/// Wager split: share funding the drift balance.
pub const DRIFT_SHARE_BPS: u64 = 100;
/// Wager split: house share (never stored in the bucket).
pub const HOUSE_SHARE_BPS: u64 = 500;

/// Floor as a fraction of the tier cap.
pub const FLOOR_BPS: u64 = 1_500;
/// Eligibility threshold as a fraction of the tier cap.
pub const THRESHOLD_BPS: u64 = 3_000;
/// One-time bootstrap seed as a fraction of the tier cap.
pub const BOOTSTRAP_BPS: u64 = 2_500;

/// Default tier ladder (0.25, 0.50, 1.00, 2.00 credits).
pub const DEFAULT_TIER_STAKES: [u64; 4] = [
    UNITS_PER_CREDIT / 4,
    UNITS_PER_CREDIT / 2,
    UNITS_PER_CREDIT,
    2 * UNITS_PER_CREDIT,
];

/// Default tier cap as a multiple of the tier stake (0.25 -> 75 credits).
pub const DEFAULT_CAP_STAKE_MULTIPLE: u64 = 300;

// Trigger probability ramp.
pub const P_MIN: f64 = 0.03;
pub const P_MAX: f64 = 0.22;

// Drift bias.
pub const DRIFT_ALPHA: f64 = 0.08;
pub const P_DRIFT_CAP: f64 = 0.30;
pub const DRIFT_BETA: f64 = 0.35;
pub const DRIFT_BURN_BPS: u64 = 6_000;

/// Spend slices (bps of spendable-above-floor) and their weights. Small slices dominate.
pub const SLICE_TABLE: [(u64, u32); 6] = [
    (500, 28),
    (1_000, 22),
    (1_500, 18),
    (2_000, 14),
    (2_500, 10),
    (4_500, 8),
];

/// Spins (raised spins count double) that force a bonus round.
pub const BONUS_METER_CAP: u32 = 50;
/// Per-spin chance of an early bonus trigger.
pub const BONUS_EARLY_TRIGGER_P: f64 = 0.0125;
/// Free spins granted on bonus entry.
pub const BONUS_INITIAL_SPINS: u32 = 10;
/// Per-free-spin retrigger chance.
pub const BONUS_RETRIGGER_P: f64 = 0.02;
/// Free spins added by a retrigger.
pub const BONUS_RETRIGGER_SPINS: u32 = 10;
/// Share of every wager routed into the bonus pool (carved out of the house share).
pub const BONUS_POOL_SHARE_BPS: u64 = 200;
/// Max bet as a multiple of the tier stake (base + raise).
pub const MAX_BET_STAKE_MULTIPLE: u64 = 2;
/// Hard cap on a bonus payout as a multiple of the max bet.
pub const BONUS_CAP_MAX_BET_MULTIPLE: u64 = 40;

/// Bonus multipliers and weights.
pub const BONUS_MULTIPLIER_TABLE: [(u32, u32); 6] = [
    (5, 35),
    (8, 25),
    (12, 18),
    (18, 10),
    (25, 7),
    (40, 5),
];

/// Default RNG seed for a fresh process.
pub const DEFAULT_RNG_SEED: u64 = 13_371_337;
