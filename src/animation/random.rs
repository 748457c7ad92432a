//! Random sources for particle spawning

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform samples in [0, 1)
pub trait RandomSource {
    fn next_unit(&mut self) -> f32;
}

/// `StdRng` backed source
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    /// Deterministic source for a given seed
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Source seeded from the thread RNG
    pub fn from_entropy() -> Self {
        Self::from_seed(rand::rng().random())
    }
}

impl RandomSource for StdRandom {
    fn next_unit(&mut self) -> f32 {
        self.rng.random::<f32>()
    }
}
