//! Random Replacement Policy.
//!
//! This policy fills a uniformly random way, regardless of validity. The source
//! is pluggable: by default a `StdRng` seeded with a fixed value, so identical
//! access sequences replay identical evictions.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::common::constants::DEFAULT_RANDOM_SEED;

/// Source of random way indices.
pub struct RandomSource {
    rng: Box<dyn RngCore + Send>,
}

impl RandomSource {
    /// Creates a deterministic source from `seed`.
    pub fn from_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    /// Wraps an arbitrary generator.
    pub fn from_rng(rng: impl RngCore + Send + 'static) -> Self {
        Self { rng: Box::new(rng) }
    }

    /// Returns a way index in `0..ways`.
    ///
    /// `ways` must be non-zero.
    pub fn pick_way(&mut self, ways: u32) -> u32 {
        self.rng.gen_range(0..ways)
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::from_seed(DEFAULT_RANDOM_SEED)
    }
}

impl fmt::Debug for RandomSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomSource").finish_non_exhaustive()
    }
}
