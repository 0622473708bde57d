use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Draw, PREVIEW_SIZE};

/// Opaque handle for a pending spin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpinId(pub u64);

impl fmt::Display for SpinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Choice offered once the preview is visible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Keep,
    /// Add one more stake unit. Changes the payout, never the outcome.
    Raise,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusPhase {
    #[default]
    Inactive,
    Active,
    /// Transient: set while the final multiplier is paid, then back to `Inactive`.
    Resolved,
}

/// Per-tier bonus round state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusRound {
    pub phase: BonusPhase,
    pub spins_remaining: u32,
    pub total_spins_granted: u32,
    pub retrigger_count: u32,
    pub last_multiplier: u32,
    pub last_payout: u64,
}

impl BonusRound {
    pub fn is_active(&self) -> bool {
        self.phase == BonusPhase::Active
    }
}

/// Read-only view of one tier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierSnapshot {
    pub stake: u64,
    pub cap: u64,
    pub floor: u64,
    pub threshold: u64,
    pub bucket_balance: u64,
    pub drift_balance: u64,
    pub bootstrap_remaining: u64,
    pub bonus_pool: u64,
    pub meter: u32,
    pub bonus: BonusRound,
}

/// Returned by `start_spin`: the handle plus the first five balls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinTicket {
    pub spin_id: SpinId,
    pub first_five: [u8; PREVIEW_SIZE],
}

/// Returned by `finish_spin`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinOutcome {
    pub draw: Draw,
    pub hit_count: u8,
    pub multiplier: u32,
    pub final_stake: u64,
    pub payout: u64,
    pub raised: bool,
    pub bonus_activated: bool,
}

/// Returned by `bonus_spin`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BonusSpinOutcome {
    Continue {
        draw: Draw,
        hits: u8,
        spins_remaining: u32,
        retriggered: bool,
    },
    Resolved {
        draw: Draw,
        hits: u8,
        multiplier: u32,
        payout: u64,
        total_spins: u32,
        retriggers: u32,
    },
}

impl BonusSpinOutcome {
    pub fn draw(&self) -> &Draw {
        match self {
            Self::Continue { draw, .. } | Self::Resolved { draw, .. } => draw,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }
}
