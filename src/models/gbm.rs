// src/models/gbm.rs
//! Geometric Brownian motion
//!
//! ```text
//! dS_t = μ S_t dt + σ S_t dW_t
//! ```
//! discretised exactly in log space:
//! ```text
//! S_{i+1} = S_i * exp((μ - σ²/2)Δt + σ√Δt * Z),   Z ~ N(0,1)
//! ```

use crate::error::{validation::*, LabResult};
use crate::rng;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Gbm {
    pub s0: f64,
    pub mu: f64,
    pub sigma: f64,
}

impl Gbm {
    pub fn new(s0: f64, mu: f64, sigma: f64) -> LabResult<Self> {
        let gbm = Gbm { s0, mu, sigma };
        gbm.validate()?;
        Ok(gbm)
    }

    pub fn validate(&self) -> LabResult<()> {
        validate_positive("s0", self.s0)?;
        validate_finite("s0", self.s0)?;
        validate_finite("mu", self.mu)?;
        validate_non_negative("sigma", self.sigma)?;
        validate_finite("sigma", self.sigma)
    }

    pub fn exact_step(&self, s_t: f64, dt: f64, normal_draw: f64) -> f64 {
        s_t * ((self.mu - 0.5 * self.sigma * self.sigma) * dt
            + self.sigma * dt.sqrt() * normal_draw)
            .exp()
    }

    /// Advance one step with a fresh draw from `rng`
    pub fn step<R: Rng + ?Sized>(&self, s_t: f64, dt: f64, rng: &mut R) -> f64 {
        self.exact_step(s_t, dt, rng::get_normal_draw(rng))
    }
}
