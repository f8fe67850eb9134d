//! Dynamic delta hedging of a European call along one simulated path
//!
//! # Algorithm
//!
//! The time grid holds `N = ⌊T/Δt⌋` samples spread evenly over `[0, T]`, so
//! the final revaluation happens exactly at expiry. The spot evolves by the
//! exact GBM step with the real-world drift μ and step Δt. At each step:
//!
//! ```text
//! portfolio[i+1] = shares[i]*S[i+1] + cash[i]*(1 + rΔt)
//! shares[i+1]    = Δ_call(S[i+1], τ = T - t[i+1])
//! cash[i+1]      = cash[i]*(1 + rΔt) - S[i+1]*(shares[i+1] - shares[i])
//! values[i+1]    = C(S[i+1], τ = T - t[i+1])
//! ```
//!
//! The book starts with `initial_cash` and no shares. The comparison series
//! shifts the option value by the initial funding gap grown at the risk-free
//! rate:
//!
//! ```text
//! theoretical[i] = values[i] - (values[0] - portfolio[0]) * e^(r t[i])
//! ```
//!
//! so that a perfect hedge would make `portfolio` and `theoretical` coincide.

use crate::analytics::bs_analytic::{price, MarketSnapshot};
use crate::error::{validation::*, LabError, LabResult};
use crate::math_utils::linspace;
use crate::models::gbm::Gbm;
use crate::rng;
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HedgeConfig {
    /// Initial spot S₀
    pub s0: f64,
    /// Real-world drift μ of the simulated path
    pub mu: f64,
    /// Volatility σ, used both for the path and for revaluation
    pub sigma: f64,
    /// Risk-free rate r
    pub r: f64,
    /// Option maturity T in years
    pub maturity: f64,
    /// Strike E of the hedged call
    pub strike: f64,
    /// Rebalancing interval Δt
    pub dt: f64,
    pub initial_cash: f64,
    pub seed: u64,
}

impl Default for HedgeConfig {
    fn default() -> Self {
        HedgeConfig {
            s0: 1.0,
            mu: 0.02,
            sigma: 0.35,
            r: 0.03,
            maturity: 5.0,
            strike: 2.0,
            dt: 1e-2,
            initial_cash: 1.0,
            seed: 12345,
        }
    }
}

impl HedgeConfig {
    pub fn validate(&self) -> LabResult<()> {
        Gbm::new(self.s0, self.mu, self.sigma)?;
        validate_positive("sigma", self.sigma)?;
        validate_finite("r", self.r)?;
        validate_positive("maturity", self.maturity)?;
        validate_finite("maturity", self.maturity)?;
        validate_positive("strike", self.strike)?;
        validate_finite("strike", self.strike)?;
        validate_positive("dt", self.dt)?;
        validate_finite("initial_cash", self.initial_cash)?;

        let n = self.num_samples();
        if n < 2 {
            return Err(LabError::InvalidConfiguration {
                field: "dt".to_string(),
                reason: format!(
                    "maturity / dt = {} yields fewer than 2 time samples",
                    self.maturity / self.dt
                ),
            });
        }
        validate_steps(n)
    }

    /// Number of time samples N = ⌊T/Δt⌋
    pub fn num_samples(&self) -> usize {
        (self.maturity / self.dt).floor() as usize
    }
}

/// Per-step state of one hedging run; every series has length N
#[derive(Clone, Debug, PartialEq)]
pub struct HedgeRun {
    pub times: Vec<f64>,
    pub spots: Vec<f64>,
    /// Black-Scholes call value at each sample
    pub option_values: Vec<f64>,
    /// Shares held after rebalancing
    pub shares: Vec<f64>,
    pub cash: Vec<f64>,
    /// Replicating portfolio value before rebalancing
    pub portfolio: Vec<f64>,
    /// Option value shifted by the initial funding gap
    pub theoretical: Vec<f64>,
}

impl HedgeRun {
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn theoretical(&self) -> &[f64] {
        &self.theoretical
    }

    pub fn portfolio(&self) -> &[f64] {
        &self.portfolio
    }

    /// Terminal `portfolio - theoretical`
    pub fn tracking_error(&self) -> f64 {
        match (self.portfolio.last(), self.theoretical.last()) {
            (Some(p), Some(v)) => p - v,
            _ => 0.0,
        }
    }
}

/// Run the hedge with a fresh RNG seeded from `cfg.seed`
pub fn run_delta_hedge(cfg: &HedgeConfig) -> LabResult<HedgeRun> {
    let mut rng = rng::seed_rng_from_u64(cfg.seed);
    run_delta_hedge_with_rng(cfg, &mut rng)
}

/// Run the hedge drawing one standard normal per step from `rng`
pub fn run_delta_hedge_with_rng<R: Rng + ?Sized>(
    cfg: &HedgeConfig,
    rng: &mut R,
) -> LabResult<HedgeRun> {
    cfg.validate()?;

    let model = Gbm::new(cfg.s0, cfg.mu, cfg.sigma)?;
    let n = cfg.num_samples();
    let times = linspace(0.0, cfg.maturity, n);
    let growth = 1.0 + cfg.r * cfg.dt;
    let market = MarketSnapshot::new(cfg.s0, cfg.strike, cfg.r, cfg.sigma, cfg.maturity);

    let mut spots = vec![0.0; n];
    let mut option_values = vec![0.0; n];
    let mut shares = vec![0.0; n];
    let mut cash = vec![0.0; n];
    let mut portfolio = vec![0.0; n];

    spots[0] = cfg.s0;
    option_values[0] = price(&market)?.call;
    cash[0] = cfg.initial_cash;
    portfolio[0] = shares[0] * spots[0] + cash[0];

    for i in 0..n - 1 {
        spots[i + 1] = model.step(spots[i], cfg.dt, rng);
        portfolio[i + 1] = shares[i] * spots[i + 1] + cash[i] * growth;

        let tau = (cfg.maturity - times[i + 1]).max(0.0);
        let valuation = price(&MarketSnapshot {
            spot: spots[i + 1],
            tau,
            ..market
        })?;

        shares[i + 1] = valuation.call_delta;
        cash[i + 1] = cash[i] * growth - spots[i + 1] * (shares[i + 1] - shares[i]);
        option_values[i + 1] = valuation.call;
    }

    let funding_gap = option_values[0] - portfolio[0];
    let theoretical: Vec<f64> = option_values
        .iter()
        .zip(&times)
        .map(|(v, t)| v - funding_gap * (cfg.r * t).exp())
        .collect();

    let run = HedgeRun {
        times,
        spots,
        option_values,
        shares,
        cash,
        portfolio,
        theoretical,
    };

    debug!(
        samples = n,
        seed = cfg.seed,
        terminal_spot = run.spots[n - 1],
        tracking_error = run.tracking_error(),
        "delta hedge complete"
    );

    Ok(run)
}

/// Summary of terminal tracking errors across independent runs
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackingErrorStats {
    pub runs: usize,
    pub mean_abs: f64,
    pub rms: f64,
    pub max_abs: f64,
}

/// Repeat the hedge for seeds `cfg.seed .. cfg.seed + runs` in parallel.
pub fn tracking_error_study(cfg: &HedgeConfig, runs: usize) -> LabResult<TrackingErrorStats> {
    validate_paths(runs)?;
    cfg.validate()?;

    let errors = (0..runs as u64)
        .into_par_iter()
        .map(|i| {
            let run_cfg = HedgeConfig {
                seed: cfg.seed.wrapping_add(i),
                ..cfg.clone()
            };
            run_delta_hedge(&run_cfg).map(|run| run.tracking_error())
        })
        .collect::<LabResult<Vec<f64>>>()?;

    let count = errors.len() as f64;
    Ok(TrackingErrorStats {
        runs,
        mean_abs: errors.iter().map(|e| e.abs()).sum::<f64>() / count,
        rms: (errors.iter().map(|e| e * e).sum::<f64>() / count).sqrt(),
        max_abs: errors.iter().fold(0.0, |m, e| m.max(e.abs())),
    })
}
