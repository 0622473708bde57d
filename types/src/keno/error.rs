use thiserror::Error as ThisError;

use super::SpinId;

/// Rejections raised while validating a player's selection.
#[derive(Clone, Debug, ThisError, PartialEq, Eq)]
pub enum SelectionError {
    #[error("selection is empty")]
    Empty,
    #[error("too many numbers selected (got={got}, max={max})")]
    TooMany { got: usize, max: usize },
    #[error("number out of range (got={number}, max={max})")]
    OutOfRange { number: u8, max: u8 },
    #[error("duplicate number in selection ({number})")]
    Duplicate { number: u8 },
}

/// Caller-facing failures. None of these mutate tier state.
#[derive(Clone, Debug, ThisError, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid selection: {0}")]
    InvalidSelection(#[from] SelectionError),
    #[error("stake {stake} does not match tier unit {tier}")]
    TierMismatch { tier: u64, stake: u64 },
    #[error("no tier configured for stake {tier}")]
    UnknownTier { tier: u64 },
    #[error("spin {spin} is not pending")]
    UnknownSpin { spin: SpinId },
    #[error("no bonus round active on tier {tier}")]
    BonusNotActive { tier: u64 },
    #[error("bonus round already active on tier {tier}")]
    BonusAlreadyActive { tier: u64 },
    #[error("spin {spin} must be finished before starting another")]
    SpinInProgress { spin: SpinId },
    #[error("no spin is held by this session")]
    NoSpinHeld,
}

/// Bucket mutations that would break the floor.
#[derive(Clone, Debug, ThisError, PartialEq, Eq)]
pub enum BucketError {
    #[error("payout would breach floor (balance={balance}, amount={amount}, floor={floor})")]
    InsufficientFloor { balance: u64, amount: u64, floor: u64 },
}

/// Seed configuration problems detected by [`super::SeedConfig::validate`].
#[derive(Clone, Debug, ThisError, PartialEq)]
pub enum ConfigError {
    #[error("at least one tier must be configured")]
    NoTiers,
    #[error("tier stake must be non-zero")]
    ZeroStake,
    #[error("tier {stake} configured more than once")]
    DuplicateTier { stake: u64 },
    #[error("tier {stake} has a zero cap")]
    ZeroCap { stake: u64 },
    #[error("{field} out of range (got={value})")]
    ProbabilityOutOfRange { field: &'static str, value: f64 },
    #[error("probabilities must satisfy p_min <= p_max <= p_drift_cap")]
    ProbabilityOrder,
    #[error("{table} table is empty")]
    EmptyTable { table: &'static str },
    #[error("{table} table has zero total weight")]
    ZeroWeight { table: &'static str },
    #[error("slice fractions must be strictly ascending and within (0, 10000] bps")]
    InvalidSlices,
    #[error("{field} exceeds {max} bps (got={value})")]
    ShareTooLarge { field: &'static str, value: u64, max: u64 },
    #[error("paytable row out of range (picks={picks}, hits={hits})")]
    PaytableRow { picks: u8, hits: u8 },
    #[error("bonus meter cap must be non-zero")]
    ZeroMeterCap,
}
