use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;

/// The single random stream of a simulation. Every draw the engine makes goes
/// through here so a seed fixes the whole run.
#[derive(Clone, Debug)]
pub struct SimRng {
    inner: ChaCha12Rng,
}

impl SimRng {
    pub fn seed_from_u64(seed: u64) -> Self {
        Self {
            inner: ChaCha12Rng::seed_from_u64(seed),
        }
    }

    /// Uniform in `[0, 1)`.
    pub fn uniform(&mut self) -> f64 {
        self.inner.random::<f64>()
    }

    /// Uniform in `[0, upper)`; `upper <= 0` yields 0.
    pub fn uniform_below(&mut self, upper: f64) -> f64 {
        if upper > 0.0 {
            self.uniform() * upper
        } else {
            0.0
        }
    }

    /// Uniform integer in `[low, high]`. Requires `low <= high`.
    pub fn int_inclusive(&mut self, low: u32, high: u32) -> u32 {
        debug_assert!(low <= high, "empty integer range {low}..={high}");
        self.inner.random_range(low..=high)
    }

    /// Uniform index in `[0, len)`. Requires `len > 0`.
    pub fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "cannot draw an index from an empty range");
        self.inner.random_range(0..len)
    }

    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.index(items.len());
        items.get(idx)
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.inner);
    }
}
