//! The keno engine.
//!
//! Owns every tier, the registry of pending spins, and the injected paytable and parameters.
//! Each tier sits behind its own mutex, so spins on one tier are serialized while different tiers
//! resolve concurrently. The pending registry has its own lock and is never held while a tier
//! lock is being acquired.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use keno_types::keno::{
    BonusParams, BonusSpinOutcome, BopParams, ConfigError, Decision, EngineError, LifetimeStats,
    Paytable, SeedConfig, Selection, SpinId, SpinOutcome, SpinTicket, TierSnapshot,
};
use tracing::{debug, info};

use crate::bonus;
use crate::draw::{build_draw, count_hits};
use crate::resolver::{resolve_spin, settle_raise};
use crate::spin::PendingSpin;
use crate::tier::TierState;

/// Odd multiplier used to scatter sequential spin numbers into opaque ids.
const SPIN_ID_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

pub struct KenoEngine {
    tiers: BTreeMap<u64, Mutex<TierState>>,
    pending: Mutex<HashMap<SpinId, PendingSpin>>,
    spin_seq: AtomicU64,
    id_salt: u64,
    paytable: Paytable,
    bop: BopParams,
    bonus: BonusParams,
}

impl KenoEngine {
    /// Validate `config` and build fresh tiers from it.
    ///
    /// Every tier gets its own RNG stream (keyed by its stake) under the configured seed.
    pub fn init_from_seed_config(config: SeedConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let tiers = config
            .tiers
            .iter()
            .map(|spec| {
                let state = TierState::new(*spec, config.seed, spec.stake);
                (spec.stake, Mutex::new(state))
            })
            .collect();
        info!(
            seed = config.seed,
            tiers = config.tiers.len(),
            "keno engine initialized"
        );
        Ok(Self {
            tiers,
            pending: Mutex::new(HashMap::new()),
            spin_seq: AtomicU64::new(0),
            id_salt: config.seed,
            paytable: config.paytable,
            bop: config.bop,
            bonus: config.bonus,
        })
    }

    /// Lock the selection, fund the stake and decide the whole spin. Returns the first five balls.
    pub fn start_spin(
        &self,
        tier: u64,
        stake: u64,
        picks: &[u8],
    ) -> Result<SpinTicket, EngineError> {
        let selection = Selection::new(picks)?;
        let mut state = self.lock_tier(tier)?;
        if state.bonus.is_active() {
            return Err(EngineError::BonusAlreadyActive { tier });
        }
        let plan = resolve_spin(
            &mut state,
            &self.paytable,
            &self.bop,
            self.bonus.pool_share_bps,
            stake,
            &selection,
        )?;
        let draw = build_draw(&selection, plan.hit_target, &mut state.rng);
        drop(state);

        let spin_id = self.next_spin_id();
        let mut spin = PendingSpin::arm(spin_id, tier, selection, plan, draw);
        let first_five = spin
            .reveal_preview()
            .ok_or(EngineError::UnknownSpin { spin: spin_id })?;
        self.lock_pending().insert(spin_id, spin);

        debug!(spin = %spin_id, tier, hit_target = plan.hit_target, "spin armed");
        Ok(SpinTicket {
            spin_id,
            first_five,
        })
    }

    /// Apply the player's decision and reveal the full draw.
    pub fn finish_spin(
        &self,
        spin_id: SpinId,
        decision: Decision,
    ) -> Result<SpinOutcome, EngineError> {
        let mut spin = self
            .lock_pending()
            .remove(&spin_id)
            .ok_or(EngineError::UnknownSpin { spin: spin_id })?;
        if !spin.decide(decision) || !spin.begin_resolving() {
            return Err(EngineError::UnknownSpin { spin: spin_id });
        }

        let plan = *spin.plan();
        let raised = decision == Decision::Raise;
        let mut state = self.lock_tier(spin.tier())?;
        let (final_stake, payout) = if raised {
            let raise = settle_raise(&mut state, &plan, self.bonus.pool_share_bps);
            (
                state.stake().saturating_add(raise.extra_stake),
                plan.payout.saturating_add(raise.top_up),
            )
        } else {
            (state.stake(), plan.payout)
        };
        let bonus_activated = bonus::record_spin(&mut state, &self.bonus, raised);
        drop(state);

        let draw = spin
            .complete()
            .ok_or(EngineError::UnknownSpin { spin: spin_id })?;
        let hit_count = count_hits(spin.selection(), &draw);
        debug_assert_eq!(hit_count, plan.hit_target);

        debug!(
            spin = %spin_id,
            tier = spin.tier(),
            hit_count,
            raised,
            payout,
            bonus_activated,
            "spin finished"
        );
        Ok(SpinOutcome {
            draw,
            hit_count,
            multiplier: plan.multiplier,
            final_stake,
            payout,
            raised,
            bonus_activated,
        })
    }

    /// Play one free spin of the tier's active bonus round.
    pub fn bonus_spin(&self, tier: u64, picks: &[u8]) -> Result<BonusSpinOutcome, EngineError> {
        let selection = Selection::new(picks)?;
        let mut state = self.lock_tier(tier)?;
        bonus::play_free_spin(&mut state, &self.bonus, &selection)
    }

    pub fn tier_state(&self, tier: u64) -> Result<TierSnapshot, EngineError> {
        Ok(self.lock_tier(tier)?.snapshot())
    }

    pub fn lifetime(&self, tier: u64) -> Result<LifetimeStats, EngineError> {
        Ok(self.lock_tier(tier)?.lifetime.clone())
    }

    /// Configured tier stakes, ascending.
    pub fn tiers(&self) -> Vec<u64> {
        self.tiers.keys().copied().collect()
    }

    /// Spins started but not yet finished.
    pub fn pending_spins(&self) -> usize {
        self.lock_pending().len()
    }

    pub fn paytable(&self) -> &Paytable {
        &self.paytable
    }

    /// Run `f` with exclusive access to a tier.
    #[cfg(test)]
    pub(crate) fn with_tier<R>(
        &self,
        tier: u64,
        f: impl FnOnce(&mut TierState) -> R,
    ) -> Result<R, EngineError> {
        let mut state = self.lock_tier(tier)?;
        Ok(f(&mut state))
    }

    fn lock_tier(&self, tier: u64) -> Result<MutexGuard<'_, TierState>, EngineError> {
        self.tiers
            .get(&tier)
            .map(|state| state.lock().unwrap_or_else(PoisonError::into_inner))
            .ok_or(EngineError::UnknownTier { tier })
    }

    fn lock_pending(&self) -> MutexGuard<'_, HashMap<SpinId, PendingSpin>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_spin_id(&self) -> SpinId {
        let seq = self.spin_seq.fetch_add(1, Ordering::Relaxed);
        SpinId(seq.wrapping_mul(SPIN_ID_MIX) ^ self.id_salt)
    }
}
