//! Seed configuration consumed by `KenoEngine::init_from_seed_config`.
//!
//! Every struct deserializes with defaults so a YAML file only needs to name what it changes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::*;

/// One bet tier: its fixed stake unit and soft cap `C` (both in minor units).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierSpec {
    pub stake: u64,
    pub cap: u64,
}

impl TierSpec {
    /// Tier with the default cap (`300 x stake`).
    pub fn with_default_cap(stake: u64) -> Self {
        Self {
            stake,
            cap: stake.saturating_mul(DEFAULT_CAP_STAKE_MULTIPLE),
        }
    }

    pub fn floor(&self) -> u64 {
        bps_of(self.cap, FLOOR_BPS)
    }

    pub fn threshold(&self) -> u64 {
        bps_of(self.cap, THRESHOLD_BPS)
    }

    pub fn bootstrap(&self) -> u64 {
        bps_of(self.cap, BOOTSTRAP_BPS)
    }

    /// Largest wager a single spin can carry (base + raise).
    pub fn max_bet(&self) -> u64 {
        self.stake.saturating_mul(MAX_BET_STAKE_MULTIPLE)
    }
}

/// Parameters of the trigger/slice algorithm.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BopParams {
    pub p_min: f64,
    pub p_max: f64,
    pub alpha: f64,
    pub p_drift_cap: f64,
    pub beta: f64,
    pub drift_burn_bps: u64,
    /// `(slice_bps, weight)` pairs, strictly ascending by slice.
    pub slices: Vec<(u64, u32)>,
}

impl Default for BopParams {
    fn default() -> Self {
        Self {
            p_min: P_MIN,
            p_max: P_MAX,
            alpha: DRIFT_ALPHA,
            p_drift_cap: P_DRIFT_CAP,
            beta: DRIFT_BETA,
            drift_burn_bps: DRIFT_BURN_BPS,
            slices: SLICE_TABLE.to_vec(),
        }
    }
}

impl BopParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("p_min", self.p_min),
            ("p_max", self.p_max),
            ("alpha", self.alpha),
            ("p_drift_cap", self.p_drift_cap),
            ("beta", self.beta),
        ] {
            check_probability(field, value)?;
        }
        if self.p_min > self.p_max || self.p_max > self.p_drift_cap {
            return Err(ConfigError::ProbabilityOrder);
        }
        if self.drift_burn_bps > BPS_DENOMINATOR {
            return Err(ConfigError::ShareTooLarge {
                field: "drift_burn_bps",
                value: self.drift_burn_bps,
                max: BPS_DENOMINATOR,
            });
        }
        check_weights("slice", self.slices.iter().map(|(_, w)| *w))?;
        let ascending = self.slices.windows(2).all(|pair| pair[0].0 < pair[1].0);
        let in_range = self
            .slices
            .iter()
            .all(|(bps, _)| *bps > 0 && *bps <= BPS_DENOMINATOR);
        if !ascending || !in_range {
            return Err(ConfigError::InvalidSlices);
        }
        Ok(())
    }
}

/// Parameters of the meter-driven bonus round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BonusParams {
    pub meter_cap: u32,
    pub early_trigger_p: f64,
    pub initial_spins: u32,
    pub retrigger_p: f64,
    pub retrigger_spins: u32,
    /// Portion of each wager (out of the house share) that funds the bonus pool.
    pub pool_share_bps: u64,
    pub cap_max_bet_multiple: u64,
    /// `(multiplier, weight)` pairs.
    pub multipliers: Vec<(u32, u32)>,
}

impl Default for BonusParams {
    fn default() -> Self {
        Self {
            meter_cap: BONUS_METER_CAP,
            early_trigger_p: BONUS_EARLY_TRIGGER_P,
            initial_spins: BONUS_INITIAL_SPINS,
            retrigger_p: BONUS_RETRIGGER_P,
            retrigger_spins: BONUS_RETRIGGER_SPINS,
            pool_share_bps: BONUS_POOL_SHARE_BPS,
            cap_max_bet_multiple: BONUS_CAP_MAX_BET_MULTIPLE,
            multipliers: BONUS_MULTIPLIER_TABLE.to_vec(),
        }
    }
}

impl BonusParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.meter_cap == 0 {
            return Err(ConfigError::ZeroMeterCap);
        }
        check_probability("early_trigger_p", self.early_trigger_p)?;
        check_probability("retrigger_p", self.retrigger_p)?;
        if self.pool_share_bps > HOUSE_SHARE_BPS {
            return Err(ConfigError::ShareTooLarge {
                field: "pool_share_bps",
                value: self.pool_share_bps,
                max: HOUSE_SHARE_BPS,
            });
        }
        check_weights("bonus multiplier", self.multipliers.iter().map(|(_, w)| *w))
    }
}

/// Everything needed to build an engine from scratch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub seed: u64,
    pub tiers: Vec<TierSpec>,
    pub bop: BopParams,
    pub bonus: BonusParams,
    pub paytable: Paytable,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_RNG_SEED,
            tiers: DEFAULT_TIER_STAKES
                .iter()
                .map(|stake| TierSpec::with_default_cap(*stake))
                .collect(),
            bop: BopParams::default(),
            bonus: BonusParams::default(),
            paytable: Paytable::default(),
        }
    }
}

impl SeedConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tiers.is_empty() {
            return Err(ConfigError::NoTiers);
        }
        let mut seen = BTreeSet::new();
        for tier in &self.tiers {
            if tier.stake == 0 {
                return Err(ConfigError::ZeroStake);
            }
            if tier.cap == 0 {
                return Err(ConfigError::ZeroCap { stake: tier.stake });
            }
            if !seen.insert(tier.stake) {
                return Err(ConfigError::DuplicateTier { stake: tier.stake });
            }
        }
        self.bop.validate()?;
        self.bonus.validate()?;
        self.paytable.validate()
    }
}

/// `value * bps / 10_000`, rounded down, without intermediate overflow.
pub fn bps_of(value: u64, bps: u64) -> u64 {
    ((value as u128 * bps as u128) / BPS_DENOMINATOR as u128) as u64
}

fn check_probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::ProbabilityOutOfRange { field, value });
    }
    Ok(())
}

fn check_weights(
    table: &'static str,
    weights: impl ExactSizeIterator<Item = u32>,
) -> Result<(), ConfigError> {
    if weights.len() == 0 {
        return Err(ConfigError::EmptyTable { table });
    }
    if weights.map(u64::from).sum::<u64>() == 0 {
        return Err(ConfigError::ZeroWeight { table });
    }
    Ok(())
}
