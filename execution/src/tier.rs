//! Everything one bet tier owns. The engine keeps each `TierState` behind its own lock.

use keno_types::keno::{bps_of, BonusRound, LifetimeStats, TierSnapshot, TierSpec};

use crate::bucket::{FundSplit, LiquidityBucket};
use crate::rng::GameRng;

#[derive(Clone, Debug)]
pub struct TierState {
    pub spec: TierSpec,
    pub bucket: LiquidityBucket,
    pub bonus_pool: u64,
    pub meter: u32,
    pub bonus: BonusRound,
    pub lifetime: LifetimeStats,
    pub rng: GameRng,
}

impl TierState {
    /// `stream` selects this tier's RNG stream under the shared seed.
    pub fn new(spec: TierSpec, seed: u64, stream: u64) -> Self {
        let bucket = LiquidityBucket::new(&spec);
        let mut lifetime = LifetimeStats::default();
        lifetime.observe_bucket(bucket.balance());
        Self {
            spec,
            bucket,
            bonus_pool: 0,
            meter: 0,
            bonus: BonusRound::default(),
            lifetime,
            rng: GameRng::new(seed, stream),
        }
    }

    pub fn stake(&self) -> u64 {
        self.spec.stake
    }

    /// Fund a wager and carve the bonus pool contribution out of the house share.
    pub fn fund_wager(&mut self, stake: u64, pool_share_bps: u64) -> FundSplit {
        let split = self.bucket.fund(stake);
        let bonus = bps_of(stake, pool_share_bps).min(split.house);
        self.bonus_pool = self.bonus_pool.saturating_add(bonus);
        self.lifetime
            .record_wager(stake, split.bucket, split.drift, split.house - bonus, bonus);
        self.lifetime.observe_bucket(self.bucket.balance());
        split
    }

    pub fn snapshot(&self) -> TierSnapshot {
        TierSnapshot {
            stake: self.spec.stake,
            cap: self.bucket.cap(),
            floor: self.bucket.floor(),
            threshold: self.bucket.threshold(),
            bucket_balance: self.bucket.balance(),
            drift_balance: self.bucket.drift(),
            bootstrap_remaining: self.bucket.bootstrap_remaining(),
            bonus_pool: self.bonus_pool,
            meter: self.meter,
            bonus: self.bonus.clone(),
        }
    }
}
