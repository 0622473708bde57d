//! Bonus controller.
//!
//! Every settled base spin advances the tier meter (raised spins count twice) and rolls an early
//! trigger. Either one starts a round of free spins. Free spins never pay on their own; when the
//! last one is played the round pays a single weighted multiplier of the max bet, capped by the
//! bonus pool and by the tier's hard cap.

use keno_types::keno::{
    BonusParams, BonusPhase, BonusRound, BonusSpinOutcome, EngineError, Selection,
};
use tracing::info;

use crate::draw::{count_hits, uniform_draw};
use crate::tier::TierState;

/// Advance the meter for a settled base spin. Returns `true` if a bonus round started.
pub fn record_spin(tier: &mut TierState, params: &BonusParams, raised: bool) -> bool {
    if tier.bonus.is_active() {
        return false;
    }
    tier.meter = tier.meter.saturating_add(if raised { 2 } else { 1 });
    let early = tier.rng.chance(params.early_trigger_p);
    if !early && tier.meter < params.meter_cap {
        return false;
    }

    info!(
        tier = tier.stake(),
        meter = tier.meter,
        early,
        pool = tier.bonus_pool,
        "bonus round activated"
    );
    tier.meter = 0;
    tier.bonus = BonusRound {
        phase: BonusPhase::Active,
        spins_remaining: params.initial_spins,
        total_spins_granted: params.initial_spins,
        retrigger_count: 0,
        last_multiplier: tier.bonus.last_multiplier,
        last_payout: tier.bonus.last_payout,
    };
    true
}

/// Play one free spin, resolving the round when it was the last.
pub fn play_free_spin(
    tier: &mut TierState,
    params: &BonusParams,
    selection: &Selection,
) -> Result<BonusSpinOutcome, EngineError> {
    if !tier.bonus.is_active() {
        return Err(EngineError::BonusNotActive { tier: tier.stake() });
    }

    let draw = uniform_draw(&mut tier.rng);
    let hits = count_hits(selection, &draw);
    tier.bonus.spins_remaining = tier.bonus.spins_remaining.saturating_sub(1);

    let retriggered = tier.rng.chance(params.retrigger_p);
    if retriggered {
        tier.bonus.spins_remaining = tier
            .bonus
            .spins_remaining
            .saturating_add(params.retrigger_spins);
        tier.bonus.total_spins_granted = tier
            .bonus
            .total_spins_granted
            .saturating_add(params.retrigger_spins);
        tier.bonus.retrigger_count += 1;
        info!(
            tier = tier.stake(),
            spins_remaining = tier.bonus.spins_remaining,
            retriggers = tier.bonus.retrigger_count,
            "bonus round retriggered"
        );
    }

    if tier.bonus.spins_remaining > 0 {
        return Ok(BonusSpinOutcome::Continue {
            draw,
            hits,
            spins_remaining: tier.bonus.spins_remaining,
            retriggered,
        });
    }

    let (multiplier, payout) = resolve_round(tier, params);
    Ok(BonusSpinOutcome::Resolved {
        draw,
        hits,
        multiplier,
        payout,
        total_spins: tier.bonus.total_spins_granted,
        retriggers: tier.bonus.retrigger_count,
    })
}

/// Pay the round and return the tier to `Inactive`. Returns `(multiplier, payout)`.
fn resolve_round(tier: &mut TierState, params: &BonusParams) -> (u32, u64) {
    tier.bonus.phase = BonusPhase::Resolved;

    let multiplier = tier.rng.pick_weighted(&params.multipliers).unwrap_or(0);
    let max_bet = tier.spec.max_bet();
    let hard_cap = max_bet.saturating_mul(params.cap_max_bet_multiple);
    let payout = max_bet
        .saturating_mul(u64::from(multiplier))
        .min(hard_cap)
        .min(tier.bonus_pool);

    tier.bonus_pool -= payout;
    tier.lifetime.record_bonus(payout);
    tier.bonus.last_multiplier = multiplier;
    tier.bonus.last_payout = payout;
    tier.bonus.spins_remaining = 0;
    tier.bonus.phase = BonusPhase::Inactive;

    info!(
        tier = tier.stake(),
        multiplier,
        payout,
        pool = tier.bonus_pool,
        total_spins = tier.bonus.total_spins_granted,
        retriggers = tier.bonus.retrigger_count,
        "bonus round resolved"
    );
    (multiplier, payout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use keno_types::keno::{TierSpec, UNITS_PER_CREDIT};

    fn tier() -> TierState {
        TierState::new(TierSpec::with_default_cap(UNITS_PER_CREDIT), 21, 0)
    }

    fn no_early() -> BonusParams {
        BonusParams {
            early_trigger_p: 0.0,
            retrigger_p: 0.0,
            ..BonusParams::default()
        }
    }

    fn selection() -> Selection {
        Selection::new(&[1, 2, 3, 4]).expect("valid")
    }

    #[test]
    fn test_meter_activates_at_cap() {
        let mut tier = tier();
        let params = no_early();
        for spin in 1..params.meter_cap {
            assert!(!record_spin(&mut tier, &params, false), "spin {spin}");
            assert_eq!(tier.meter, spin);
        }
        assert!(record_spin(&mut tier, &params, false));
        assert_eq!(tier.meter, 0);
        assert!(tier.bonus.is_active());
        assert_eq!(tier.bonus.spins_remaining, params.initial_spins);
    }

    #[test]
    fn test_raised_spins_count_double() {
        let mut tier = tier();
        let params = no_early();
        for _ in 0..24 {
            assert!(!record_spin(&mut tier, &params, true));
        }
        assert_eq!(tier.meter, 48);
        assert!(record_spin(&mut tier, &params, true));
    }

    #[test]
    fn test_meter_frozen_while_active() {
        let mut tier = tier();
        let params = BonusParams {
            early_trigger_p: 1.0,
            ..no_early()
        };
        assert!(record_spin(&mut tier, &params, false));
        assert!(!record_spin(&mut tier, &params, false));
        assert_eq!(tier.meter, 0);
    }

    #[test]
    fn test_free_spin_requires_active_round() {
        let mut tier = tier();
        assert_eq!(
            play_free_spin(&mut tier, &no_early(), &selection()),
            Err(EngineError::BonusNotActive {
                tier: UNITS_PER_CREDIT
            })
        );
    }

    #[test]
    fn test_round_resolves_after_initial_spins() {
        let mut tier = tier();
        let params = BonusParams {
            early_trigger_p: 1.0,
            multipliers: vec![(12, 1)],
            ..no_early()
        };
        tier.bonus_pool = 1_000_000;
        assert!(record_spin(&mut tier, &params, false));

        for remaining in (1..params.initial_spins).rev() {
            match play_free_spin(&mut tier, &params, &selection()).expect("active") {
                BonusSpinOutcome::Continue {
                    spins_remaining, ..
                } => assert_eq!(spins_remaining, remaining),
                other => panic!("unexpected {other:?}"),
            }
        }
        let outcome = play_free_spin(&mut tier, &params, &selection()).expect("active");
        assert_eq!(
            outcome,
            BonusSpinOutcome::Resolved {
                draw: *outcome.draw(),
                hits: outcome.draw().hits_against(&selection()),
                multiplier: 12,
                payout: 240_000,
                total_spins: params.initial_spins,
                retriggers: 0,
            }
        );
        assert!(!tier.bonus.is_active());
        assert_eq!(tier.bonus_pool, 760_000);
        assert_eq!(tier.lifetime.bonus_paid, 240_000);
        assert_eq!(tier.lifetime.bonus_rounds, 1);
    }

    #[test]
    fn test_payout_capped_by_pool_and_hard_cap() {
        let mut tier = tier();
        let params = BonusParams {
            early_trigger_p: 1.0,
            initial_spins: 1,
            multipliers: vec![(100, 1)],
            ..no_early()
        };

        tier.bonus_pool = 10_000_000;
        assert!(record_spin(&mut tier, &params, false));
        let outcome = play_free_spin(&mut tier, &params, &selection()).expect("active");
        // Hard cap: 40 x max bet (2 credits).
        assert!(matches!(outcome, BonusSpinOutcome::Resolved { payout: 800_000, .. }));

        tier.bonus_pool = 5_000;
        assert!(record_spin(&mut tier, &params, false));
        let outcome = play_free_spin(&mut tier, &params, &selection()).expect("active");
        assert!(matches!(outcome, BonusSpinOutcome::Resolved { payout: 5_000, .. }));
        assert_eq!(tier.bonus_pool, 0);
    }

    #[test]
    fn test_retrigger_extends_round() {
        let mut tier = tier();
        let params = BonusParams {
            early_trigger_p: 1.0,
            initial_spins: 1,
            retrigger_p: 1.0,
            retrigger_spins: 3,
            ..no_early()
        };
        assert!(record_spin(&mut tier, &params, false));
        let outcome = play_free_spin(&mut tier, &params, &selection()).expect("active");
        assert!(matches!(
            outcome,
            BonusSpinOutcome::Continue {
                spins_remaining: 3,
                retriggered: true,
                ..
            }
        ));
        assert_eq!(tier.bonus.retrigger_count, 1);
        assert_eq!(tier.bonus.total_spins_granted, 4);
    }
}
