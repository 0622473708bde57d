//! Injected paytable: `(picks k, hits h) -> multiplier`.
//!
//! Rows are either exact-hit or minimum-hit rules. Lookup precedence is an exact match first,
//! then the highest minimum the hit count satisfies.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{ConfigError, DRAW_SIZE, MAX_PICKS};

/// A single paytable row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PayRule {
    /// Pays `mult` when exactly `hits` numbers match.
    ExactHit { hits: u8, mult: u32 },
    /// Pays `mult` when at least `hits` numbers match.
    MinHit { hits: u8, mult: u32 },
}

impl PayRule {
    pub fn hits(&self) -> u8 {
        match self {
            Self::ExactHit { hits, .. } | Self::MinHit { hits, .. } => *hits,
        }
    }

    pub fn mult(&self) -> u32 {
        match self {
            Self::ExactHit { mult, .. } | Self::MinHit { mult, .. } => *mult,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paytable {
    rows: BTreeMap<u8, Vec<PayRule>>,
}

impl Paytable {
    pub fn new(rows: BTreeMap<u8, Vec<PayRule>>) -> Self {
        Self { rows }
    }

    /// Rows configured for a selection of size `picks`.
    pub fn rules(&self, picks: u8) -> &[PayRule] {
        self.rows.get(&picks).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Multiplier paid for `hits` matches out of `picks`.
    pub fn multiplier(&self, picks: u8, hits: u8) -> u32 {
        let rules = self.rules(picks);
        if let Some(rule) = rules
            .iter()
            .find(|rule| matches!(rule, PayRule::ExactHit { hits: h, .. } if *h == hits))
        {
            return rule.mult();
        }
        rules
            .iter()
            .filter(|rule| matches!(rule, PayRule::MinHit { hits: h, .. } if hits >= *h))
            .max_by_key(|rule| rule.hits())
            .map(PayRule::mult)
            .unwrap_or(0)
    }

    /// Smallest hit count that pays anything for `picks`.
    pub fn first_paying_hit(&self, picks: u8) -> Option<u8> {
        self.rules(picks)
            .iter()
            .filter(|rule| rule.mult() > 0)
            .map(PayRule::hits)
            .min()
    }

    /// Largest hit count that is guaranteed to pay nothing for `picks`.
    pub fn max_non_paying_hit(&self, picks: u8) -> u8 {
        match self.first_paying_hit(picks) {
            Some(first) => first.saturating_sub(1).min(picks),
            None => picks,
        }
    }

    /// Every paying `(hits, mult)` for `picks`, ascending by hit count.
    ///
    /// A `MinHit` rule yields one candidate per hit count it covers, each with the effective
    /// multiplier after precedence.
    pub fn paying_rows(&self, picks: u8) -> impl Iterator<Item = (u8, u32)> + '_ {
        (1..=picks.min(DRAW_SIZE as u8))
            .map(move |hits| (hits, self.multiplier(picks, hits)))
            .filter(|(_, mult)| *mult > 0)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (&picks, rules) in &self.rows {
            if picks == 0 || picks as usize > MAX_PICKS {
                return Err(ConfigError::PaytableRow { picks, hits: 0 });
            }
            for rule in rules {
                let hits = rule.hits();
                if hits == 0 || hits > picks || hits as usize > DRAW_SIZE {
                    return Err(ConfigError::PaytableRow { picks, hits });
                }
            }
        }
        Ok(())
    }

    /// Exact-hit table tuned for the BOP liquidity model.
    pub fn bop() -> Self {
        let table: [(u8, &[(u8, u32)]); 10] = [
            (1, &[(1, 1)]),
            (2, &[(1, 1), (2, 4)]),
            (3, &[(2, 2), (3, 8)]),
            (4, &[(2, 1), (3, 4), (4, 15)]),
            (5, &[(2, 1), (3, 3), (4, 8), (5, 25)]),
            (6, &[(3, 1), (4, 3), (5, 10), (6, 35)]),
            (7, &[(3, 1), (4, 2), (5, 6), (6, 18), (7, 60)]),
            (8, &[(3, 1), (4, 2), (5, 5), (6, 15), (7, 40), (8, 100)]),
            (9, &[(4, 1), (5, 2), (6, 6), (7, 20), (8, 60), (9, 140)]),
            (
                10,
                &[(4, 1), (5, 2), (6, 5), (7, 16), (8, 45), (9, 120), (10, 200)],
            ),
        ];
        let rows = table
            .iter()
            .map(|(picks, rows)| {
                let rules = rows
                    .iter()
                    .map(|&(hits, mult)| PayRule::ExactHit { hits, mult })
                    .collect();
                (*picks, rules)
            })
            .collect();
        Self { rows }
    }

    /// Flatter table whose top rows for 8..=10 picks are minimum-hit rules.
    pub fn classic() -> Self {
        use PayRule::{ExactHit, MinHit};

        let mut rows = BTreeMap::new();
        rows.insert(1, vec![ExactHit { hits: 1, mult: 1 }]);
        rows.insert(2, vec![ExactHit { hits: 1, mult: 1 }, ExactHit { hits: 2, mult: 3 }]);
        rows.insert(3, vec![ExactHit { hits: 2, mult: 1 }, ExactHit { hits: 3, mult: 3 }]);
        rows.insert(
            4,
            vec![
                ExactHit { hits: 2, mult: 1 },
                ExactHit { hits: 3, mult: 3 },
                ExactHit { hits: 4, mult: 7 },
            ],
        );
        rows.insert(
            5,
            vec![
                ExactHit { hits: 2, mult: 1 },
                ExactHit { hits: 3, mult: 3 },
                ExactHit { hits: 4, mult: 7 },
                ExactHit { hits: 5, mult: 16 },
            ],
        );
        rows.insert(
            6,
            vec![
                ExactHit { hits: 3, mult: 1 },
                ExactHit { hits: 4, mult: 3 },
                ExactHit { hits: 5, mult: 7 },
                ExactHit { hits: 6, mult: 16 },
            ],
        );
        rows.insert(
            7,
            vec![
                ExactHit { hits: 3, mult: 1 },
                ExactHit { hits: 4, mult: 3 },
                ExactHit { hits: 5, mult: 7 },
                ExactHit { hits: 6, mult: 16 },
                ExactHit { hits: 7, mult: 40 },
            ],
        );
        rows.insert(
            8,
            vec![
                ExactHit { hits: 3, mult: 1 },
                ExactHit { hits: 4, mult: 3 },
                ExactHit { hits: 5, mult: 7 },
                ExactHit { hits: 6, mult: 16 },
                MinHit { hits: 7, mult: 40 },
            ],
        );
        for picks in [9, 10] {
            rows.insert(
                picks,
                vec![
                    ExactHit { hits: 4, mult: 1 },
                    ExactHit { hits: 5, mult: 3 },
                    ExactHit { hits: 6, mult: 7 },
                    ExactHit { hits: 7, mult: 16 },
                    MinHit { hits: 8, mult: 40 },
                ],
            );
        }
        Self { rows }
    }
}

impl Default for Paytable {
    fn default() -> Self {
        Self::bop()
    }
}
