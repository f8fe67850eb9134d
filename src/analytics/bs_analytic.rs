// src/analytics/bs_analytic.rs
//! Analytical Black-Scholes valuation for European options and Greeks
//!
//! # Mathematical Foundation
//!
//! Under the Black-Scholes model, the underlying asset follows:
//! ```text
//! dS_t = r S_t dt + σ S_t dW_t
//! ```
//!
//! European calls have the closed form
//! ```text
//! C(S,E,r,σ,τ) = S*Φ(d₁) - E*e^(-rτ)*Φ(d₂)
//! d₁ = [ln(S/E) + (r + σ²/2)τ] / (σ√τ)
//! d₂ = d₁ - σ√τ
//! ```
//! and puts follow from put-call parity, `P = C + E*e^(-rτ) - S`.
//!
//! At expiry (τ = 0) every quantity collapses to its payoff limit. The call
//! delta there is `½(sign(S-E) + 1)`, which is exactly 0.5 at the money.

use crate::error::{validation::*, LabError, LabResult};
use crate::math_utils::{norm_cdf, norm_pdf, sign};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Selects which sensitivities a report renders
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct GreekSet: u32 {
        const NONE  = 0;
        const DELTA = 1 << 0;
        const VEGA  = 1 << 1;
        const GAMMA = 1 << 2;
        const THETA = 1 << 3;
        const RHO   = 1 << 4;
    }
}

impl GreekSet {
    /// Parse a comma separated list such as `"delta,vega"`; `"all"` selects everything.
    pub fn parse_list(list: &str) -> LabResult<Self> {
        let mut set = GreekSet::NONE;
        for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            set |= match name.to_ascii_lowercase().as_str() {
                "delta" => GreekSet::DELTA,
                "vega" => GreekSet::VEGA,
                "gamma" => GreekSet::GAMMA,
                "theta" => GreekSet::THETA,
                "rho" => GreekSet::RHO,
                "all" => GreekSet::all(),
                other => {
                    return Err(LabError::InvalidConfiguration {
                        field: "greeks".to_string(),
                        reason: format!("unknown greek '{}'", other),
                    })
                }
            };
        }
        Ok(set)
    }
}

/// The five scalar market parameters the valuation consumes
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Spot price S
    pub spot: f64,
    /// Strike (exercise price) E
    pub strike: f64,
    /// Continuously compounded risk-free rate r
    pub rate: f64,
    /// Volatility σ
    pub sigma: f64,
    /// Time to expiry τ, in years
    pub tau: f64,
}

impl MarketSnapshot {
    pub fn new(spot: f64, strike: f64, rate: f64, sigma: f64, tau: f64) -> Self {
        MarketSnapshot {
            spot,
            strike,
            rate,
            sigma,
            tau,
        }
    }

    /// Same market, different volatility
    pub fn with_sigma(self, sigma: f64) -> Self {
        MarketSnapshot { sigma, ..self }
    }

    pub fn validate(&self) -> LabResult<()> {
        validate_positive("spot", self.spot)?;
        validate_finite("spot", self.spot)?;
        validate_positive("strike", self.strike)?;
        validate_finite("strike", self.strike)?;
        validate_finite("rate", self.rate)?;
        validate_non_negative("tau", self.tau)?;
        validate_finite("tau", self.tau)?;
        validate_non_negative("sigma", self.sigma)?;
        validate_finite("sigma", self.sigma)?;

        if self.tau > 0.0 && self.sigma == 0.0 {
            return Err(LabError::InvalidParameters {
                parameter: "sigma".to_string(),
                value: self.sigma,
                constraint: "must be positive (> 0) when tau > 0".to_string(),
            });
        }

        Ok(())
    }

    /// `(d₁, d₂)`; only meaningful for τ > 0, σ > 0
    fn d1_d2(&self) -> (f64, f64) {
        let sigma_sqrt_tau = self.sigma * self.tau.sqrt();
        let d1 = ((self.spot / self.strike).ln()
            + (self.rate + 0.5 * self.sigma * self.sigma) * self.tau)
            / sigma_sqrt_tau;
        (d1, d1 - sigma_sqrt_tau)
    }

    fn discounted_strike(&self) -> f64 {
        self.strike * (-self.rate * self.tau).exp()
    }
}

/// Call and put prices with their delta and vega
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Valuation {
    pub call: f64,
    pub call_delta: f64,
    pub call_vega: f64,
    pub put: f64,
    pub put_delta: f64,
    pub put_vega: f64,
}

/// Higher-order sensitivities; all zero at expiry
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Sensitivities {
    pub gamma: f64,
    pub call_theta: f64,
    pub put_theta: f64,
    pub call_rho: f64,
    pub put_rho: f64,
}

/// Black-Scholes valuation of a European call and put
///
/// # Formula
/// For τ > 0:
/// ```text
/// call       = S*Φ(d₁) - E*e^(-rτ)*Φ(d₂)
/// call_delta = Φ(d₁)
/// call_vega  = S*√τ*φ(d₁)
/// put        = call + E*e^(-rτ) - S
/// put_delta  = call_delta - 1
/// put_vega   = call_vega
/// ```
///
/// For τ = 0:
/// ```text
/// call       = max(S - E, 0)
/// call_delta = ½(sign(S - E) + 1)
/// put        = max(E - S, 0)
/// put_delta  = call_delta - 1
/// vega       = 0
/// ```
///
/// # Errors
/// `LabError::InvalidParameters` for non-positive spot or strike, negative
/// τ, non-finite inputs, or σ = 0 with τ > 0.
pub fn price(snapshot: &MarketSnapshot) -> LabResult<Valuation> {
    snapshot.validate()?;

    let valuation = if snapshot.tau > 0.0 {
        let (d1, d2) = snapshot.d1_d2();
        let n1 = norm_cdf(d1);
        let n2 = norm_cdf(d2);
        let discounted_strike = snapshot.discounted_strike();

        let call = snapshot.spot * n1 - discounted_strike * n2;
        let call_vega = snapshot.spot * snapshot.tau.sqrt() * norm_pdf(d1);

        Valuation {
            call,
            call_delta: n1,
            call_vega,
            put: call + discounted_strike - snapshot.spot,
            put_delta: n1 - 1.0,
            put_vega: call_vega,
        }
    } else {
        let moneyness = snapshot.spot - snapshot.strike;
        let call_delta = 0.5 * (sign(moneyness) + 1.0);

        Valuation {
            call: moneyness.max(0.0),
            call_delta,
            call_vega: 0.0,
            put: (-moneyness).max(0.0),
            put_delta: call_delta - 1.0,
            put_vega: 0.0,
        }
    };

    if !valuation.call.is_finite() || !valuation.put.is_finite() {
        return Err(LabError::NumericalInstability {
            method: "black_scholes".to_string(),
            reason: format!("non-finite price for {:?}", snapshot),
        });
    }

    Ok(valuation)
}

/// Positional form of [`price`]: `price_parts(S, E, r, σ, τ)`
pub fn price_parts(spot: f64, strike: f64, rate: f64, sigma: f64, tau: f64) -> LabResult<Valuation> {
    price(&MarketSnapshot::new(spot, strike, rate, sigma, tau))
}

/// Gamma, theta and rho for the call and put
///
/// # Formula
/// ```text
/// Γ        = φ(d₁) / (S*σ*√τ)
/// Θ_call   = -S*φ(d₁)*σ/(2√τ) - r*E*e^(-rτ)*Φ(d₂)
/// Θ_put    = Θ_call + r*E*e^(-rτ)
/// ρ_call   = E*τ*e^(-rτ)*Φ(d₂)
/// ρ_put    = ρ_call - E*τ*e^(-rτ)
/// ```
/// Theta is per year; rho is per unit change in rate.
pub fn sensitivities(snapshot: &MarketSnapshot) -> LabResult<Sensitivities> {
    snapshot.validate()?;

    if snapshot.tau == 0.0 {
        return Ok(Sensitivities::default());
    }

    let (d1, d2) = snapshot.d1_d2();
    let sqrt_tau = snapshot.tau.sqrt();
    let discounted_strike = snapshot.discounted_strike();
    let pdf_d1 = norm_pdf(d1);

    let call_theta = -snapshot.spot * pdf_d1 * snapshot.sigma / (2.0 * sqrt_tau)
        - snapshot.rate * discounted_strike * norm_cdf(d2);
    let call_rho = snapshot.tau * discounted_strike * norm_cdf(d2);

    Ok(Sensitivities {
        gamma: pdf_d1 / (snapshot.spot * snapshot.sigma * sqrt_tau),
        call_theta,
        put_theta: call_theta + snapshot.rate * discounted_strike,
        call_rho,
        put_rho: call_rho - snapshot.tau * discounted_strike,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_expiry_tie_break_at_the_money() {
        let v = price_parts(2.5, 2.5, 0.03, 0.25, 0.0).unwrap();
        assert_eq!(v.call, 0.0);
        assert_eq!(v.put, 0.0);
        assert_eq!(v.call_delta, 0.5);
        assert_eq!(v.put_delta, -0.5);
        assert_eq!(v.call_vega, 0.0);
    }

    #[test]
    fn test_expiry_deltas_in_and_out_of_the_money() {
        let itm = price_parts(3.0, 2.5, 0.03, 0.25, 0.0).unwrap();
        assert_eq!(itm.call, 0.5);
        assert_eq!(itm.call_delta, 1.0);
        assert_eq!(itm.put_delta, 0.0);

        let otm = price_parts(2.0, 2.5, 0.03, 0.25, 0.0).unwrap();
        assert_eq!(otm.put, 0.5);
        assert_eq!(otm.call_delta, 0.0);
        assert_eq!(otm.put_delta, -1.0);
    }

    #[test]
    fn test_zero_sigma_allowed_only_at_expiry() {
        assert!(price_parts(2.0, 2.5, 0.03, 0.0, 0.0).is_ok());
        let err = price_parts(2.0, 2.5, 0.03, 0.0, 1.0).unwrap_err();
        assert!(matches!(err, LabError::InvalidParameters { ref parameter, .. } if parameter == "sigma"));
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        assert!(price_parts(0.0, 2.5, 0.03, 0.25, 1.0).is_err());
        assert!(price_parts(2.0, -1.0, 0.03, 0.25, 1.0).is_err());
        assert!(price_parts(2.0, 2.5, 0.03, 0.25, -0.1).is_err());
        assert!(price_parts(2.0, 2.5, f64::NAN, 0.25, 1.0).is_err());
        assert!(price_parts(f64::INFINITY, 2.5, 0.03, 0.25, 1.0).is_err());
    }

    #[test]
    fn test_sensitivities_zero_at_expiry() {
        let s = sensitivities(&MarketSnapshot::new(100.0, 90.0, 0.05, 0.2, 0.0)).unwrap();
        assert_eq!(s, Sensitivities::default());
    }

    #[test]
    fn test_put_theta_and_rho_from_call() {
        let snap = MarketSnapshot::new(100.0, 110.0, 0.05, 0.3, 0.5);
        let s = sensitivities(&snap).unwrap();
        let discounted = 110.0 * (-0.05_f64 * 0.5).exp();
        assert_abs_diff_eq!(s.put_theta - s.call_theta, 0.05 * discounted, epsilon = 1e-12);
        assert_abs_diff_eq!(s.call_rho - s.put_rho, 0.5 * discounted, epsilon = 1e-12);
        assert!(s.gamma > 0.0);
    }

    #[test]
    fn test_greek_set_parse() {
        let set = GreekSet::parse_list("delta, Vega").unwrap();
        assert!(set.contains(GreekSet::DELTA | GreekSet::VEGA));
        assert!(!set.contains(GreekSet::GAMMA));
        assert_eq!(GreekSet::parse_list("all").unwrap(), GreekSet::all());
        assert_eq!(GreekSet::parse_list("").unwrap(), GreekSet::NONE);
        assert!(GreekSet::parse_list("vanna").is_err());
    }
}
