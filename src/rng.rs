//! Random Number Generation for path simulation
//!
//! Every stochastic routine in the crate draws from a single seeded
//! [`StdRng`] per path, so a run is fully determined by its seed. Ensembles
//! derive one stream per path from the base seed, which keeps the output
//! independent of how rayon schedules the work.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

/// RNG factory for reproducible per-path streams
#[derive(Debug, Clone, Copy)]
pub struct RngFactory {
    base_seed: u64,
}

impl RngFactory {
    pub fn new(base_seed: u64) -> Self {
        Self { base_seed }
    }

    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }

    /// Standard RNG for a specific path: seeded with `base_seed + path_id`
    pub fn create_std_rng(&self, path_id: u64) -> StdRng {
        seed_rng_from_u64(self.base_seed.wrapping_add(path_id))
    }
}

pub fn seed_rng_from_u64(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn get_normal_draw<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    StandardNormal.sample(rng)
}
