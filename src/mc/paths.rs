// src/mc/paths.rs
//! Asset path simulation under geometric Brownian motion
//!
//! A single path consumes one RNG stream sequentially; the draw order is
//! part of the output, so the same seed always reproduces the same path.
//! Ensembles run paths in parallel with rayon, giving path `i` its own
//! stream seeded with `seed + i` so the result does not depend on the
//! number of worker threads.

use crate::error::{validation::*, LabError, LabResult};
use crate::models::gbm::Gbm;
use crate::rng::{self, RngFactory};
use ndarray::parallel::prelude::*;
use ndarray::{Array2, Axis};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Ordered `(time, spot)` samples of one simulated path
#[derive(Clone, Debug, PartialEq)]
pub struct SimulatedPath {
    pub times: Vec<f64>,
    pub spots: Vec<f64>,
}

impl SimulatedPath {
    pub fn len(&self) -> usize {
        self.spots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }

    pub fn terminal(&self) -> Option<f64> {
        self.spots.last().copied()
    }
}

/// Simulate `steps` increments of size `dt`, returning `steps + 1` samples
/// starting at `(0, s0)`.
pub fn simulate_path<R: Rng + ?Sized>(
    model: &Gbm,
    dt: f64,
    steps: usize,
    rng: &mut R,
) -> SimulatedPath {
    let mut times = Vec::with_capacity(steps + 1);
    let mut spots = Vec::with_capacity(steps + 1);
    times.push(0.0);
    spots.push(model.s0);

    let mut current_s = model.s0;
    for i in 1..=steps {
        current_s = model.step(current_s, dt, rng);
        times.push(dt * i as f64);
        spots.push(current_s);
    }

    SimulatedPath { times, spots }
}

/// Ensemble configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    pub paths: usize,
    pub steps: usize,
    pub s0: f64,
    pub mu: f64,
    pub sigma: f64,
    /// Horizon in years; `dt = t / steps`
    pub t: f64,
    pub seed: u64,
}

impl PathConfig {
    pub fn validate(&self) -> LabResult<()> {
        validate_paths(self.paths)?;
        validate_steps(self.steps)?;
        validate_grid_size(self.paths, self.steps + 1)?;
        validate_positive("t", self.t)?;
        validate_finite("t", self.t)?;
        Gbm::new(self.s0, self.mu, self.sigma).map(|_| ())
    }

    pub fn dt(&self) -> f64 {
        self.t / self.steps as f64
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        PathConfig {
            paths: 50,
            steps: 100,
            s0: 1.0,
            mu: 0.05,
            sigma: 0.5,
            t: 1.0,
            seed: 12345,
        }
    }
}

/// Simulate `paths` GBM paths; row `i` holds path `i` over `steps + 1` samples.
pub fn simulate_ensemble(cfg: &PathConfig) -> LabResult<Array2<f64>> {
    cfg.validate()?;
    let model = Gbm::new(cfg.s0, cfg.mu, cfg.sigma)?;
    let dt = cfg.dt();
    let factory = RngFactory::new(cfg.seed);

    let mut grid = Array2::<f64>::zeros((cfg.paths, cfg.steps + 1));
    grid.axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(i, mut row)| {
            let mut rng = factory.create_std_rng(i as u64);
            let mut current_s = model.s0;
            row[0] = current_s;
            for j in 1..=cfg.steps {
                current_s = model.exact_step(current_s, dt, rng::get_normal_draw(&mut rng));
                row[j] = current_s;
            }
        });

    if grid.iter().any(|s| !s.is_finite()) {
        return Err(LabError::NumericalInstability {
            method: "simulate_ensemble".to_string(),
            reason: "non-finite spot in simulated paths".to_string(),
        });
    }

    debug!(
        paths = cfg.paths,
        steps = cfg.steps,
        seed = cfg.seed,
        "simulated GBM ensemble"
    );

    Ok(grid)
}

/// Time axis matching [`simulate_ensemble`] columns
pub fn ensemble_times(cfg: &PathConfig) -> Vec<f64> {
    let dt = cfg.dt();
    (0..=cfg.steps).map(|i| dt * i as f64).collect()
}
