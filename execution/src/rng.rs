//! Seeded randomness for every stochastic decision in the engine.
//!
//! Each tier draws from its own ChaCha20 stream so tiers never share generator state and a
//! given `(seed, stream)` always replays the same decisions.

use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha20Rng,
}

impl GameRng {
    pub fn new(seed: u64, stream: u64) -> Self {
        let mut inner = ChaCha20Rng::seed_from_u64(seed);
        inner.set_stream(stream);
        Self { inner }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// Bernoulli trial. `p <= 0` never succeeds and `p >= 1` always does.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform in `[lo, hi]`; returns `lo` when the range is empty.
    pub fn range_inclusive(&mut self, lo: u8, hi: u8) -> u8 {
        if hi <= lo {
            return lo;
        }
        self.inner.gen_range(lo..=hi)
    }

    /// Pick a value with probability proportional to its weight.
    pub fn pick_weighted<T: Copy>(&mut self, table: &[(T, u32)]) -> Option<T> {
        let total: u64 = table.iter().map(|(_, weight)| u64::from(*weight)).sum();
        if total == 0 {
            return None;
        }
        let mut roll = self.inner.gen_range(0..total);
        for (value, weight) in table {
            let weight = u64::from(*weight);
            if roll < weight {
                return Some(*value);
            }
            roll -= weight;
        }
        None
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.inner);
    }

    /// `amount` distinct elements of `items`, without replacement.
    pub fn sample(&mut self, items: &[u8], amount: usize) -> Vec<u8> {
        items
            .choose_multiple(&mut self.inner, amount)
            .copied()
            .collect()
    }
}
