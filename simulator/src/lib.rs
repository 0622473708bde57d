//! Monte Carlo driver for the keno engine.
//!
//! Spawns a population of players against one shared [`KenoEngine`], each seated at a tier
//! through a [`PlayerSession`], and reports per-tier lifetime stats, realized return-to-player
//! and a solvency check once every player has finished.

use std::thread;

use keno_execution::{GameRng, KenoEngine, PlayerSession};
use keno_types::keno::{
    BonusSpinOutcome, ConfigError, Decision, EngineError, LifetimeStats, SeedConfig,
    TierSnapshot, BOARD_SIZE, MAX_PICKS,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;
use tracing::{debug, info, warn};

/// Player RNG streams start here so they never collide with tier streams (keyed by stake).
const PLAYER_STREAM_BASE: u64 = 1 << 48;

#[derive(Debug, ThisError)]
pub enum SimulatorError {
    #[error("at least one player is required")]
    NoPlayers,
    #[error("raise_rate must be within [0, 1] (got={0})")]
    RaiseRate(f64),
    #[error("pick_count must be 0 (random) or 1..={max} (got={got})")]
    PickCount { got: u8, max: usize },
    #[error("invalid engine config: {0}")]
    Config(#[from] ConfigError),
    #[error("engine rejected a call: {0}")]
    Engine(#[from] EngineError),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Simulation parameters, loadable from YAML.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub engine: SeedConfig,
    pub players: usize,
    pub spins_per_player: u64,
    /// Probability that a player raises once the preview is shown.
    pub raise_rate: f64,
    /// Numbers picked per spin; 0 draws a fresh size in `1..=10` every spin.
    pub pick_count: u8,
    pub log_level: String,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            engine: SeedConfig::default(),
            players: 8,
            spins_per_player: 10_000,
            raise_rate: 0.25,
            pick_count: 0,
            log_level: "info".to_string(),
        }
    }
}

impl SimulatorConfig {
    pub fn from_yaml(source: &str) -> Result<Self, SimulatorError> {
        let config: Self = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SimulatorError> {
        if self.players == 0 {
            return Err(SimulatorError::NoPlayers);
        }
        if !(0.0..=1.0).contains(&self.raise_rate) {
            return Err(SimulatorError::RaiseRate(self.raise_rate));
        }
        if self.pick_count as usize > MAX_PICKS {
            return Err(SimulatorError::PickCount {
                got: self.pick_count,
                max: MAX_PICKS,
            });
        }
        self.engine.validate()?;
        Ok(())
    }
}

/// What one player did, as seen from the player's side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerTotals {
    pub spins: u64,
    pub raises: u64,
    pub wagered: u64,
    pub won: u64,
    pub bonus_rounds: u64,
    pub bonus_won: u64,
    /// Times a start was deferred because another player's bonus round held the tier.
    pub bonus_waits: u64,
}

impl PlayerTotals {
    fn merge(&mut self, other: &PlayerTotals) {
        self.spins += other.spins;
        self.raises += other.raises;
        self.wagered += other.wagered;
        self.won += other.won;
        self.bonus_rounds += other.bonus_rounds;
        self.bonus_won += other.bonus_won;
        self.bonus_waits += other.bonus_waits;
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TierReport {
    pub stake: u64,
    pub lifetime: LifetimeStats,
    pub snapshot: TierSnapshot,
    pub rtp: f64,
    /// Bucket never below floor and payouts covered by inflow plus initial headroom.
    pub solvent: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub seed: u64,
    pub players: usize,
    pub spins_per_player: u64,
    pub totals: PlayerTotals,
    pub tiers: Vec<TierReport>,
    pub rtp: f64,
    pub solvent: bool,
}

pub struct Simulation {
    config: SimulatorConfig,
    engine: KenoEngine,
}

impl Simulation {
    pub fn new(config: SimulatorConfig) -> Result<Self, SimulatorError> {
        config.validate()?;
        let engine = KenoEngine::init_from_seed_config(config.engine.clone())?;
        Ok(Self { config, engine })
    }

    pub fn engine(&self) -> &KenoEngine {
        &self.engine
    }

    pub fn run(&self) -> Result<SimulationReport, SimulatorError> {
        let tiers = self.engine.tiers();
        info!(
            players = self.config.players,
            spins_per_player = self.config.spins_per_player,
            tiers = tiers.len(),
            "simulation started"
        );

        let per_player = (0..self.config.players)
            .into_par_iter()
            .map(|player| self.play(player, tiers[player % tiers.len()]))
            .collect::<Result<Vec<_>, _>>()?;
        let mut totals = PlayerTotals::default();
        for player in &per_player {
            totals.merge(player);
        }

        let mut reports = Vec::with_capacity(tiers.len());
        for stake in tiers {
            reports.push(self.tier_report(stake)?);
        }
        let rtp = if totals.wagered == 0 {
            0.0
        } else {
            (totals.won + totals.bonus_won) as f64 / totals.wagered as f64
        };
        let solvent = reports.iter().all(|tier| tier.solvent);
        if !solvent {
            warn!("simulation finished with an insolvent tier");
        }
        info!(
            wagered = totals.wagered,
            won = totals.won,
            bonus_won = totals.bonus_won,
            rtp,
            solvent,
            "simulation finished"
        );

        Ok(SimulationReport {
            seed: self.config.engine.seed,
            players: self.config.players,
            spins_per_player: self.config.spins_per_player,
            totals,
            tiers: reports,
            rtp,
            solvent,
        })
    }

    fn play(&self, player: usize, tier: u64) -> Result<PlayerTotals, SimulatorError> {
        let mut session = PlayerSession::new(&self.engine, tier);
        let mut rng = GameRng::new(
            self.config.engine.seed,
            PLAYER_STREAM_BASE + player as u64,
        );
        let board: Vec<u8> = (1..=BOARD_SIZE).collect();
        let mut totals = PlayerTotals::default();

        for _ in 0..self.config.spins_per_player {
            let size = match self.config.pick_count {
                0 => rng.range_inclusive(1, MAX_PICKS as u8),
                fixed => fixed,
            };
            let picks = rng.sample(&board, size as usize);

            loop {
                match session.start(&picks) {
                    Ok(_) => break,
                    Err(EngineError::BonusAlreadyActive { .. }) => {
                        totals.bonus_waits += 1;
                        thread::yield_now();
                    }
                    Err(err) => return Err(err.into()),
                }
            }

            let decision = if rng.chance(self.config.raise_rate) {
                Decision::Raise
            } else {
                Decision::Keep
            };
            let outcome = session.finish(decision)?;
            totals.spins += 1;
            totals.wagered += outcome.final_stake;
            totals.won += outcome.payout;
            if outcome.raised {
                totals.raises += 1;
            }

            if outcome.bonus_activated {
                totals.bonus_rounds += 1;
                loop {
                    let spin = session.bonus_spin(&picks)?;
                    if let BonusSpinOutcome::Resolved { payout, .. } = spin {
                        totals.bonus_won += payout;
                        break;
                    }
                }
            }
        }

        debug!(player, tier, spins = totals.spins, won = totals.won, "player finished");
        Ok(totals)
    }

    fn tier_report(&self, stake: u64) -> Result<TierReport, SimulatorError> {
        let snapshot = self.engine.tier_state(stake)?;
        let lifetime = self.engine.lifetime(stake)?;
        let initial_headroom = snapshot
            .threshold
            .saturating_add(
                self.config
                    .engine
                    .tiers
                    .iter()
                    .find(|tier| tier.stake == stake)
                    .map(|tier| tier.bootstrap())
                    .unwrap_or(0),
            )
            .saturating_sub(snapshot.floor);
        let solvent = snapshot.bucket_balance >= snapshot.floor
            && lifetime.paid <= lifetime.bucket_in.saturating_add(initial_headroom);
        Ok(TierReport {
            stake,
            rtp: lifetime.rtp(),
            lifetime,
            snapshot,
            solvent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keno_types::keno::{BonusParams, TierSpec, UNITS_PER_CREDIT};

    fn small_config() -> SimulatorConfig {
        SimulatorConfig {
            engine: SeedConfig {
                tiers: vec![
                    TierSpec::with_default_cap(UNITS_PER_CREDIT / 4),
                    TierSpec::with_default_cap(UNITS_PER_CREDIT),
                ],
                ..SeedConfig::default()
            },
            players: 4,
            spins_per_player: 500,
            ..SimulatorConfig::default()
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(SimulatorConfig::default().validate().is_ok());

        let config = SimulatorConfig {
            players: 0,
            ..SimulatorConfig::default()
        };
        assert!(matches!(config.validate(), Err(SimulatorError::NoPlayers)));

        let config = SimulatorConfig {
            raise_rate: 1.5,
            ..SimulatorConfig::default()
        };
        assert!(matches!(config.validate(), Err(SimulatorError::RaiseRate(_))));

        let config = SimulatorConfig {
            pick_count: 11,
            ..SimulatorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimulatorError::PickCount { got: 11, .. })
        ));
    }

    #[test]
    fn test_config_from_yaml() {
        let yaml = r#"
players: 3
spins_per_player: 20
raise_rate: 0.5
pick_count: 6
engine:
  seed: 99
  tiers:
    - stake: 5000
      cap: 1500000
"#;
        let config = SimulatorConfig::from_yaml(yaml).expect("valid yaml");
        assert_eq!(config.players, 3);
        assert_eq!(config.pick_count, 6);
        assert_eq!(config.engine.seed, 99);
        assert_eq!(config.engine.tiers.len(), 1);
        assert_eq!(config.log_level, "info");

        assert!(matches!(
            SimulatorConfig::from_yaml("players: [1"),
            Err(SimulatorError::Parse(_))
        ));
        assert!(matches!(
            SimulatorConfig::from_yaml("engine:\n  tiers: []\n"),
            Err(SimulatorError::Config(ConfigError::NoTiers))
        ));
    }

    #[test]
    fn test_run_reports_consistent_totals() {
        let simulation = Simulation::new(small_config()).expect("valid");
        let report = simulation.run().expect("runs");

        assert_eq!(report.totals.spins, 4 * 500);
        assert_eq!(report.tiers.len(), 2);
        assert!(report.solvent);
        assert_eq!(simulation.engine().pending_spins(), 0);

        let wagered: u64 = report.tiers.iter().map(|tier| tier.lifetime.wagered).sum();
        let paid: u64 = report.tiers.iter().map(|tier| tier.lifetime.paid).sum();
        let bonus_paid: u64 = report
            .tiers
            .iter()
            .map(|tier| tier.lifetime.bonus_paid)
            .sum();
        assert_eq!(wagered, report.totals.wagered);
        assert_eq!(paid, report.totals.won);
        assert_eq!(bonus_paid, report.totals.bonus_won);
        for tier in &report.tiers {
            assert!(tier.snapshot.bucket_balance >= tier.snapshot.floor);
            assert!(!tier.snapshot.bonus.is_active());
        }
    }

    #[test]
    fn test_many_players_share_a_bonus_tier() {
        let mut config = small_config();
        config.engine.tiers.truncate(1);
        config.engine.bonus = BonusParams {
            meter_cap: 5,
            ..BonusParams::default()
        };
        config.players = 6;
        config.spins_per_player = 100;
        let report = Simulation::new(config).expect("valid").run().expect("runs");
        assert_eq!(report.totals.spins, 600);
        assert!(report.totals.bonus_rounds > 0);
        assert_eq!(
            report.totals.bonus_rounds,
            report.tiers[0].lifetime.bonus_rounds
        );
    }

    #[test]
    fn test_same_seed_single_player_is_reproducible() {
        let mut config = small_config();
        config.players = 1;
        let first = Simulation::new(config.clone()).expect("valid").run().expect("runs");
        let second = Simulation::new(config).expect("valid").run().expect("runs");
        assert_eq!(first, second);
    }
}
