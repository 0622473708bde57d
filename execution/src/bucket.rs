//! Per-tier liquidity bucket.
//!
//! Wagers are split into a bucket share, a drift share and a house share. Only the bucket pays
//! base-game wins, and no payout may take the balance below the floor.

use keno_types::keno::{
    bps_of, BucketError, TierSpec, BUCKET_SHARE_BPS, DRIFT_SHARE_BPS, HOUSE_SHARE_BPS,
};

/// How one wager was distributed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FundSplit {
    pub bucket: u64,
    pub drift: u64,
    /// Includes any rounding remainder, so the three parts always sum to the stake.
    pub house: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LiquidityBucket {
    cap: u64,
    floor: u64,
    threshold: u64,
    balance: u64,
    drift: u64,
    bootstrap_remaining: u64,
}

impl LiquidityBucket {
    /// Fresh bucket seeded at `threshold + bootstrap`.
    pub fn new(spec: &TierSpec) -> Self {
        let bootstrap = spec.bootstrap();
        Self {
            cap: spec.cap,
            floor: spec.floor(),
            threshold: spec.threshold(),
            balance: spec.threshold().saturating_add(bootstrap),
            drift: 0,
            bootstrap_remaining: bootstrap,
        }
    }

    /// Bucket with explicit balances, levels still derived from `spec`.
    pub fn from_parts(spec: &TierSpec, balance: u64, drift: u64, bootstrap_remaining: u64) -> Self {
        Self {
            balance,
            drift,
            bootstrap_remaining,
            ..Self::new(spec)
        }
    }

    pub fn cap(&self) -> u64 {
        self.cap
    }

    pub fn floor(&self) -> u64 {
        self.floor
    }

    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn drift(&self) -> u64 {
        self.drift
    }

    pub fn bootstrap_remaining(&self) -> u64 {
        self.bootstrap_remaining
    }

    /// Split `stake` and credit the bucket and drift shares.
    pub fn fund(&mut self, stake: u64) -> FundSplit {
        let bucket = bps_of(stake, BUCKET_SHARE_BPS);
        let drift = bps_of(stake, DRIFT_SHARE_BPS);
        debug_assert!(bps_of(stake, HOUSE_SHARE_BPS) <= stake - bucket - drift);
        let house = stake - bucket - drift;

        self.balance = self.balance.saturating_add(bucket);
        self.drift = self.drift.saturating_add(drift);
        FundSplit {
            bucket,
            drift,
            house,
        }
    }

    /// Payouts are only considered once the balance reaches the threshold.
    pub fn is_eligible(&self) -> bool {
        self.balance >= self.threshold
    }

    /// Largest payout that keeps the balance at or above the floor.
    pub fn spendable_above_floor(&self) -> u64 {
        self.balance.saturating_sub(self.floor)
    }

    /// Portion of the cap currently held as drift, clamped to `[0, 1]`.
    pub fn drift_ratio(&self) -> f64 {
        if self.cap == 0 {
            return 0.0;
        }
        (self.drift as f64 / self.cap as f64).clamp(0.0, 1.0)
    }

    /// Debit a payout. Fails without mutating if it would breach the floor.
    pub fn apply_payout(&mut self, amount: u64) -> Result<(), BucketError> {
        if amount > self.spendable_above_floor() {
            return Err(BucketError::InsufficientFloor {
                balance: self.balance,
                amount,
                floor: self.floor,
            });
        }
        self.balance -= amount;
        self.bootstrap_remaining = self.bootstrap_remaining.saturating_sub(amount);
        Ok(())
    }

    /// Remove up to `amount` of drift and return what was actually removed.
    pub fn burn_drift(&mut self, amount: u64) -> u64 {
        let burned = amount.min(self.drift);
        self.drift -= burned;
        burned
    }
}
