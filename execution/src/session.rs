//! Player sessions.
//!
//! A session seats one player at one tier and tracks the single spin that player may hold
//! between `start` and `finish`.

use keno_types::keno::{
    BonusSpinOutcome, Decision, EngineError, SpinId, SpinOutcome, SpinTicket, TierSnapshot,
};

use crate::engine::KenoEngine;
use crate::spin::SpinPhase;

/// One player's seat at a tier. A held spin blocks further spins until it is finished.
pub struct PlayerSession<'a> {
    engine: &'a KenoEngine,
    tier: u64,
    held: Option<SpinId>,
}

impl<'a> PlayerSession<'a> {
    pub fn new(engine: &'a KenoEngine, tier: u64) -> Self {
        Self {
            engine,
            tier,
            held: None,
        }
    }

    pub fn tier(&self) -> u64 {
        self.tier
    }

    pub fn held(&self) -> Option<SpinId> {
        self.held
    }

    /// Phase of the held spin. `start` reveals the preview before returning, so a held spin
    /// always sits at [`SpinPhase::PreviewRevealed`] until it is finished.
    pub fn phase(&self) -> SpinPhase {
        match self.held {
            Some(_) => SpinPhase::PreviewRevealed,
            None => SpinPhase::Idle,
        }
    }

    pub fn start(&mut self, picks: &[u8]) -> Result<SpinTicket, EngineError> {
        if let Some(spin) = self.held {
            return Err(EngineError::SpinInProgress { spin });
        }
        let ticket = self.engine.start_spin(self.tier, self.tier, picks)?;
        self.held = Some(ticket.spin_id);
        Ok(ticket)
    }

    pub fn finish(&mut self, decision: Decision) -> Result<SpinOutcome, EngineError> {
        let spin = self.held.take().ok_or(EngineError::NoSpinHeld)?;
        self.engine.finish_spin(spin, decision)
    }

    pub fn bonus_spin(&self, picks: &[u8]) -> Result<BonusSpinOutcome, EngineError> {
        self.engine.bonus_spin(self.tier, picks)
    }

    pub fn tier_state(&self) -> Result<TierSnapshot, EngineError> {
        self.engine.tier_state(self.tier)
    }
}
