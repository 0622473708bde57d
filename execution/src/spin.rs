//! Spin state machine.
//!
//! A spin progresses through five phases:
//! 1. **Idle** - No spin held
//! 2. **Armed** - Selection locked, stake funded, draw and payout decided
//! 3. **PreviewRevealed** - First five balls exposed
//! 4. **Decision** - Keep or raise recorded
//! 5. **Resolving** - Remaining balls exposed, payout settled at the final stake
//!
//! Nothing after `Armed` can change the hit target or the draw.

use keno_types::keno::{Decision, Draw, Selection, SpinId, PREVIEW_SIZE};

use crate::resolver::SpinPlan;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpinPhase {
    Idle,
    Armed,
    PreviewRevealed,
    Decision,
    Resolving,
}

impl SpinPhase {
    /// Determine the phase after `self`. `Resolving` wraps back to `Idle`.
    pub fn next(self) -> SpinPhase {
        match self {
            SpinPhase::Idle => SpinPhase::Armed,
            SpinPhase::Armed => SpinPhase::PreviewRevealed,
            SpinPhase::PreviewRevealed => SpinPhase::Decision,
            SpinPhase::Decision => SpinPhase::Resolving,
            SpinPhase::Resolving => SpinPhase::Idle,
        }
    }

    /// Whether a spin in this phase blocks its owner from starting another.
    pub fn is_held(self) -> bool {
        !matches!(self, SpinPhase::Idle)
    }
}

/// A spin between `start_spin` and `finish_spin`.
#[derive(Clone, Debug)]
pub struct PendingSpin {
    id: SpinId,
    tier: u64,
    selection: Selection,
    plan: SpinPlan,
    draw: Draw,
    phase: SpinPhase,
    decision: Option<Decision>,
}

impl PendingSpin {
    /// A spin whose outcome has just been decided (`Idle -> Armed`).
    pub fn arm(id: SpinId, tier: u64, selection: Selection, plan: SpinPlan, draw: Draw) -> Self {
        Self {
            id,
            tier,
            selection,
            plan,
            draw,
            phase: SpinPhase::Idle.next(),
            decision: None,
        }
    }

    pub fn id(&self) -> SpinId {
        self.id
    }

    pub fn tier(&self) -> u64 {
        self.tier
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn plan(&self) -> &SpinPlan {
        &self.plan
    }

    pub fn phase(&self) -> SpinPhase {
        self.phase
    }

    pub fn decision(&self) -> Option<Decision> {
        self.decision
    }

    /// Expose the first five balls (`Armed -> PreviewRevealed`).
    pub fn reveal_preview(&mut self) -> Option<[u8; PREVIEW_SIZE]> {
        self.advance(SpinPhase::Armed).then(|| self.draw.preview())
    }

    /// Record the player's choice (`PreviewRevealed -> Decision`).
    pub fn decide(&mut self, decision: Decision) -> bool {
        if !self.advance(SpinPhase::PreviewRevealed) {
            return false;
        }
        self.decision = Some(decision);
        true
    }

    /// `Decision -> Resolving`.
    pub fn begin_resolving(&mut self) -> bool {
        self.advance(SpinPhase::Decision)
    }

    /// Expose the whole draw (`Resolving -> Idle`).
    pub fn complete(&mut self) -> Option<Draw> {
        self.advance(SpinPhase::Resolving).then_some(self.draw)
    }

    fn advance(&mut self, from: SpinPhase) -> bool {
        if self.phase != from {
            return false;
        }
        self.phase = from.next();
        true
    }
}
