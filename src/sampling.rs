//! Seeded random selection over explicit index lists.
//!
//! Every random draw a layout makes goes through [`DeckRng`], so a run is
//! fully reproducible from its seed. Selection is a partial Fisher–Yates
//! shuffle over `0..len`, which yields distinct indices in random order.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic RNG used for pool sampling and per-frame picks.
#[derive(Clone, Debug)]
pub struct DeckRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl DeckRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed drawn from the OS entropy source.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// `count` distinct indices from `0..len`, in random order.
    ///
    /// Returns `None` when `count > len`.
    pub fn sample_indices(&mut self, len: usize, count: usize) -> Option<Vec<usize>> {
        if count > len {
            return None;
        }
        let mut indices: Vec<usize> = (0..len).collect();
        for i in 0..count {
            let j = self.inner.gen_range(i..len);
            indices.swap(i, j);
        }
        indices.truncate(count);
        Some(indices)
    }

    /// Clone `count` distinct items out of `items`, in random order.
    pub fn sample<T: Clone>(&mut self, items: &[T], count: usize) -> Option<Vec<T>> {
        let picked = self.sample_indices(items.len(), count)?;
        Some(picked.into_iter().map(|i| items[i].clone()).collect())
    }
}
