//! Keno execution layer.
//!
//! This crate contains the liquidity-bounded payout engine: per-tier buckets, the spin resolver
//! that decides every outcome before a ball is shown, the draw builder that realizes it, the
//! spin and bonus state machines, and the [`KenoEngine`] that ties them together.
//!
//! ## Determinism requirements
//! - Do not use wall-clock time inside execution.
//! - Only derive randomness from the seeded per-tier [`GameRng`].
//! - A tier's RNG is only touched while its lock is held, so one seed replays one tier exactly
//!   given the same call order.
//!
//! ## Solvency invariants
//! - A payout never leaves a bucket below its floor.
//! - A bucket below its threshold when a spin arrives never pays that spin.
//! - `bucket = seed + bucket shares funded - payouts`, exactly.
//!
//! ## Minimal spin (example)
//! ```rust
//! use keno_execution::KenoEngine;
//! use keno_types::keno::{Decision, SeedConfig, UNITS_PER_CREDIT};
//!
//! let engine = KenoEngine::init_from_seed_config(SeedConfig::default())?;
//! let ticket = engine.start_spin(UNITS_PER_CREDIT, UNITS_PER_CREDIT, &[3, 11, 19, 27, 35])?;
//! // `ticket.first_five` can be shown before the player decides.
//! let outcome = engine.finish_spin(ticket.spin_id, Decision::Keep)?;
//! assert_eq!(outcome.draw.preview(), ticket.first_five);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod bonus;
pub mod bucket;
pub mod draw;
pub mod engine;
pub mod resolver;
pub mod rng;
pub mod session;
pub mod spin;
pub mod tier;


pub use bucket::{FundSplit, LiquidityBucket};
pub use draw::{build_draw, count_hits, uniform_draw};
pub use engine::KenoEngine;
pub use resolver::{RaiseSettlement, SpinPlan, TriggerTrace};
pub use rng::GameRng;
pub use session::PlayerSession;
pub use spin::{PendingSpin, SpinPhase};
pub use tier::TierState;
