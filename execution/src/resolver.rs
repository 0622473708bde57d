//! Spin resolver.
//!
//! Decides the hit target and payout of a wager before any ball is revealed. The whole resolution
//! runs against one tier and must be called with that tier's lock held.
//!
//! ## Steps
//!
//! 1. Fund the wager.
//! 2. Ineligible buckets (below threshold when the spin arrived) never pay.
//! 3. Roll the trigger: a base probability that ramps with the fill above threshold, plus a
//!    drift boost, capped.
//! 4. On trigger, pick a spend slice (optionally upgraded by drift) and turn it into an allowance.
//! 5. Pay the largest paytable row that fits the allowance and keeps the bucket above its floor.
//!
//! Every failure along the way degrades to a guaranteed non-paying hit target.

use keno_types::keno::{bps_of, BopParams, EngineError, Paytable, Selection};
use tracing::{debug, warn};

use crate::bucket::LiquidityBucket;
use crate::tier::TierState;

/// How a plan was reached. Informational only.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TriggerTrace {
    pub eligible: bool,
    pub p_base: f64,
    pub p_final: f64,
    pub triggered: bool,
    pub slice_bps: u64,
    pub allowance: u64,
    pub drift_used: bool,
    pub drift_burned: u64,
}

/// Fully decided outcome of one spin at its base stake.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpinPlan {
    pub hit_target: u8,
    pub multiplier: u32,
    pub payout: u64,
    pub trace: TriggerTrace,
}

impl SpinPlan {
    fn miss(hit_target: u8, trace: TriggerTrace) -> Self {
        Self {
            hit_target,
            multiplier: 0,
            payout: 0,
            trace,
        }
    }
}

/// Extra funding and payout applied when a spin is raised.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RaiseSettlement {
    pub extra_stake: u64,
    pub top_up: u64,
    /// The top-up was reduced to keep the bucket at its floor.
    pub clamped: bool,
}

/// `(p_base, p_final)` for the bucket as it stands.
///
/// `p_base` ramps linearly from `p_min` at the threshold to `p_max` at the cap. `p_final` adds the
/// drift boost and is capped at `p_drift_cap`.
pub fn trigger_probability(bucket: &LiquidityBucket, params: &BopParams) -> (f64, f64) {
    let span = bucket.cap().saturating_sub(bucket.threshold());
    let ramp = if span == 0 {
        1.0
    } else {
        let above = bucket.balance().saturating_sub(bucket.threshold());
        (above as f64 / span as f64).clamp(0.0, 1.0)
    };
    let p_base = params.p_min + (params.p_max - params.p_min) * ramp;
    let p_final = (p_base + params.alpha * bucket.drift_ratio()).min(params.p_drift_cap);
    (p_base, p_final)
}

/// Largest affordable `(hits, multiplier, payout)` for `picks`; ties go to the larger hit count.
pub fn pick_payout(
    paytable: &Paytable,
    picks: u8,
    stake: u64,
    allowance: u64,
    bucket: &LiquidityBucket,
) -> Option<(u8, u32, u64)> {
    let headroom = bucket.spendable_above_floor();
    paytable
        .paying_rows(picks)
        .filter_map(|(hits, mult)| {
            stake
                .checked_mul(u64::from(mult))
                .map(|payout| (hits, mult, payout))
        })
        .filter(|(_, _, payout)| *payout <= allowance && *payout <= headroom)
        .max_by_key(|(hits, _, payout)| (*payout, *hits))
}

fn non_paying(
    tier: &mut TierState,
    paytable: &Paytable,
    picks: u8,
    trace: TriggerTrace,
) -> SpinPlan {
    let hit_target = tier.rng.range_inclusive(0, paytable.max_non_paying_hit(picks));
    SpinPlan::miss(hit_target, trace)
}

/// Fund `stake` on `tier` and decide the spin's outcome.
///
/// Returns [`EngineError::TierMismatch`] without touching the tier if `stake` is not the tier's
/// unit. Otherwise never fails.
pub fn resolve_spin(
    tier: &mut TierState,
    paytable: &Paytable,
    params: &BopParams,
    pool_share_bps: u64,
    stake: u64,
    selection: &Selection,
) -> Result<SpinPlan, EngineError> {
    if stake != tier.stake() {
        return Err(EngineError::TierMismatch {
            tier: tier.stake(),
            stake,
        });
    }

    let eligible = tier.bucket.is_eligible();
    tier.fund_wager(stake, pool_share_bps);
    tier.lifetime.spins = tier.lifetime.spins.saturating_add(1);

    let picks = selection.picks();
    let mut trace = TriggerTrace {
        eligible,
        ..TriggerTrace::default()
    };
    if picks == 0 {
        return Ok(SpinPlan::miss(0, trace));
    }
    if !eligible {
        return Ok(non_paying(tier, paytable, picks, trace));
    }

    let (p_base, p_final) = trigger_probability(&tier.bucket, params);
    trace.p_base = p_base;
    trace.p_final = p_final;
    trace.triggered = tier.rng.chance(p_final);
    if !trace.triggered {
        return Ok(non_paying(tier, paytable, picks, trace));
    }

    let Some(mut slice_bps) = tier.rng.pick_weighted(&params.slices) else {
        return Ok(non_paying(tier, paytable, picks, trace));
    };
    let mut drift_used = p_final > p_base;
    if tier.rng.chance(params.beta * tier.bucket.drift_ratio()) {
        if let Some(&(next, _)) = params.slices.iter().find(|(bps, _)| *bps > slice_bps) {
            slice_bps = next;
            drift_used = true;
        }
    }
    trace.slice_bps = slice_bps;
    trace.drift_used = drift_used;
    trace.allowance = bps_of(tier.bucket.spendable_above_floor(), slice_bps);

    let Some((hit_target, multiplier, payout)) =
        pick_payout(paytable, picks, stake, trace.allowance, &tier.bucket)
    else {
        return Ok(non_paying(tier, paytable, picks, trace));
    };
    if let Err(err) = tier.bucket.apply_payout(payout) {
        warn!(tier = tier.stake(), payout, ?err, "planned payout rejected by bucket");
        return Ok(non_paying(tier, paytable, picks, trace));
    }
    tier.lifetime.record_payout(payout);
    if drift_used {
        let burned = tier.bucket.burn_drift(bps_of(payout, params.drift_burn_bps));
        tier.lifetime.record_drift_burn(burned);
        trace.drift_burned = burned;
    }

    debug!(
        tier = tier.stake(),
        picks,
        hit_target,
        payout,
        p_final,
        slice_bps,
        drift_used,
        bucket = tier.bucket.balance(),
        "spin resolved with payout"
    );
    Ok(SpinPlan {
        hit_target,
        multiplier,
        payout,
        trace,
    })
}

/// Fund a raise on an already planned spin and pay the extra stake at the planned multiplier.
///
/// The top-up is clamped to what the bucket can spend above its floor.
pub fn settle_raise(tier: &mut TierState, plan: &SpinPlan, pool_share_bps: u64) -> RaiseSettlement {
    let extra_stake = tier.stake();
    tier.fund_wager(extra_stake, pool_share_bps);

    let wanted = extra_stake.saturating_mul(u64::from(plan.multiplier));
    let mut top_up = wanted.min(tier.bucket.spendable_above_floor());
    let clamped = top_up < wanted;
    if clamped {
        warn!(
            tier = tier.stake(),
            wanted,
            top_up,
            bucket = tier.bucket.balance(),
            "raise top-up clamped at floor"
        );
    }
    if let Err(err) = tier.bucket.apply_payout(top_up) {
        warn!(tier = tier.stake(), top_up, ?err, "raise top-up rejected by bucket");
        top_up = 0;
    }
    tier.lifetime.record_raise(top_up, plan.payout.saturating_add(top_up));

    RaiseSettlement {
        extra_stake,
        top_up,
        clamped,
    }
}
