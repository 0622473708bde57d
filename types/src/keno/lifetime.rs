use serde::{Deserialize, Serialize};

/// Cumulative per-tier counters. The engine only ever adds to these.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifetimeStats {
    pub spins: u64,
    pub raises: u64,
    pub wagered: u64,
    /// Sum of the bucket shares of every wager.
    pub bucket_in: u64,
    pub paid: u64,
    pub drift_in: u64,
    pub drift_burned: u64,
    pub house_cut: u64,
    pub bonus_in: u64,
    pub bonus_rounds: u64,
    pub bonus_paid: u64,
    pub max_bucket: u64,
    pub max_payout: u64,
}

impl LifetimeStats {
    pub fn record_wager(&mut self, stake: u64, bucket: u64, drift: u64, house: u64, bonus: u64) {
        self.wagered = self.wagered.saturating_add(stake);
        self.bucket_in = self.bucket_in.saturating_add(bucket);
        self.drift_in = self.drift_in.saturating_add(drift);
        self.house_cut = self.house_cut.saturating_add(house);
        self.bonus_in = self.bonus_in.saturating_add(bonus);
    }

    pub fn observe_bucket(&mut self, balance: u64) {
        self.max_bucket = self.max_bucket.max(balance);
    }

    pub fn record_payout(&mut self, amount: u64) {
        self.paid = self.paid.saturating_add(amount);
        self.max_payout = self.max_payout.max(amount);
    }

    /// A raise funds a second stake and may add `top_up` to a spin whose total is `total_payout`.
    pub fn record_raise(&mut self, top_up: u64, total_payout: u64) {
        self.raises = self.raises.saturating_add(1);
        self.paid = self.paid.saturating_add(top_up);
        self.max_payout = self.max_payout.max(total_payout);
    }

    pub fn record_drift_burn(&mut self, amount: u64) {
        self.drift_burned = self.drift_burned.saturating_add(amount);
    }

    pub fn record_bonus(&mut self, payout: u64) {
        self.bonus_rounds = self.bonus_rounds.saturating_add(1);
        self.bonus_paid = self.bonus_paid.saturating_add(payout);
    }

    /// Fraction of wagers returned through the bucket and bonus pool.
    pub fn rtp(&self) -> f64 {
        if self.wagered == 0 {
            return 0.0;
        }
        self.paid.saturating_add(self.bonus_paid) as f64 / self.wagered as f64
    }
}
