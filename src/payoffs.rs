//! Option Payoff Functions
//!
//! # Mathematical Definitions
//!
//! Payoffs at expiry as a function of the terminal asset price `s`:
//!
//! - **Long call**: max(s - E, 0)
//! - **Long put**: max(E - s, 0)
//! - **Short call / short put**: the negated long payoffs
//! - **Bull spread**: long call at E₁, short call at E₂ (E₁ < E₂)
//! - **Butterfly spread**: calls at E₁ and E₃, two short calls at E₂
//!
//! The set of positions is closed; composite spreads are expressed through
//! the single-leg call payoff.

use crate::error::{validation::*, LabError, LabResult};
use crate::math_utils::linspace;
use serde::{Deserialize, Serialize};

pub fn call_payoff(s: f64, strike: f64) -> f64 {
    (s - strike).max(0.0)
}

pub fn put_payoff(s: f64, strike: f64) -> f64 {
    (strike - s).max(0.0)
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Payoff {
    LongCall { strike: f64 },
    LongPut { strike: f64 },
    ShortCall { strike: f64 },
    ShortPut { strike: f64 },
    BullSpread { lower: f64, upper: f64 },
    ButterflySpread { low: f64, mid: f64, high: f64 },
}

impl Payoff {
    /// Build a payoff from a kind name and its strikes, e.g. `("bull", &[90.0, 110.0])`.
    pub fn from_parts(kind: &str, strikes: &[f64]) -> LabResult<Self> {
        let require_strikes = |n: usize| -> LabResult<()> {
            if strikes.len() == n {
                Ok(())
            } else {
                Err(LabError::InvalidConfiguration {
                    field: "strikes".to_string(),
                    reason: format!("'{}' needs {} strike(s), got {}", kind, n, strikes.len()),
                })
            }
        };

        let payoff = match kind {
            "long-call" | "call" => {
                require_strikes(1)?;
                Payoff::LongCall { strike: strikes[0] }
            }
            "long-put" | "put" => {
                require_strikes(1)?;
                Payoff::LongPut { strike: strikes[0] }
            }
            "short-call" => {
                require_strikes(1)?;
                Payoff::ShortCall { strike: strikes[0] }
            }
            "short-put" => {
                require_strikes(1)?;
                Payoff::ShortPut { strike: strikes[0] }
            }
            "bull" | "bull-spread" => {
                require_strikes(2)?;
                Payoff::BullSpread {
                    lower: strikes[0],
                    upper: strikes[1],
                }
            }
            "butterfly" | "butterfly-spread" => {
                require_strikes(3)?;
                Payoff::ButterflySpread {
                    low: strikes[0],
                    mid: strikes[1],
                    high: strikes[2],
                }
            }
            other => {
                return Err(LabError::InvalidConfiguration {
                    field: "kind".to_string(),
                    reason: format!("unknown payoff '{}'", other),
                })
            }
        };

        payoff.validate()?;
        Ok(payoff)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Payoff::LongCall { .. } => "long_call",
            Payoff::LongPut { .. } => "long_put",
            Payoff::ShortCall { .. } => "short_call",
            Payoff::ShortPut { .. } => "short_put",
            Payoff::BullSpread { .. } => "bull_spread",
            Payoff::ButterflySpread { .. } => "butterfly_spread",
        }
    }

    /// Strikes must be positive; spread strikes strictly increasing
    pub fn validate(&self) -> LabResult<()> {
        match *self {
            Payoff::LongCall { strike }
            | Payoff::LongPut { strike }
            | Payoff::ShortCall { strike }
            | Payoff::ShortPut { strike } => validate_positive("strike", strike),
            Payoff::BullSpread { lower, upper } => {
                validate_positive("lower", lower)?;
                ensure_increasing("upper", lower, upper)
            }
            Payoff::ButterflySpread { low, mid, high } => {
                validate_positive("low", low)?;
                ensure_increasing("mid", low, mid)?;
                ensure_increasing("high", mid, high)
            }
        }
    }

    /// Payoff at expiry for terminal price `s`
    pub fn calculate(&self, s: f64) -> f64 {
        match *self {
            Payoff::LongCall { strike } => call_payoff(s, strike),
            Payoff::LongPut { strike } => put_payoff(s, strike),
            Payoff::ShortCall { strike } => -call_payoff(s, strike),
            Payoff::ShortPut { strike } => -put_payoff(s, strike),
            Payoff::BullSpread { lower, upper } => call_payoff(s, lower) - call_payoff(s, upper),
            Payoff::ButterflySpread { low, mid, high } => {
                call_payoff(s, low) - 2.0 * call_payoff(s, mid) + call_payoff(s, high)
            }
        }
    }

    pub fn calculate_all(&self, prices: &[f64]) -> Vec<f64> {
        prices.iter().map(|&s| self.calculate(s)).collect()
    }

    /// `(prices, payoffs)` over `points` evenly spaced prices in `[min_price, max_price]`
    pub fn diagram(
        &self,
        min_price: f64,
        max_price: f64,
        points: usize,
    ) -> LabResult<(Vec<f64>, Vec<f64>)> {
        validate_non_negative("min_price", min_price)?;
        validate_finite("max_price", max_price)?;
        if max_price <= min_price {
            return Err(LabError::InvalidParameters {
                parameter: "max_price".to_string(),
                value: max_price,
                constraint: format!("must exceed min_price ({})", min_price),
            });
        }
        if points < 2 {
            return Err(LabError::InvalidConfiguration {
                field: "points".to_string(),
                reason: "a diagram needs at least 2 points".to_string(),
            });
        }

        let prices = linspace(min_price, max_price, points);
        let values = self.calculate_all(&prices);
        Ok((prices, values))
    }
}

fn ensure_increasing(name: &str, previous: f64, value: f64) -> LabResult<()> {
    if value.is_finite() && value > previous {
        Ok(())
    } else {
        Err(LabError::InvalidParameters {
            parameter: name.to_string(),
            value,
            constraint: format!("must exceed the preceding strike ({})", previous),
        })
    }
}
