//! Implied volatility by bisection
//!
//! Black-Scholes prices are strictly increasing in σ for τ > 0, so a simple
//! bracket search over `[SIGMA_LOW, SIGMA_HIGH]` always converges once the
//! target price lies inside the bracket.

use super::bs_analytic::{price, MarketSnapshot};
use crate::error::{validation::*, LabError, LabResult};
use serde::{Deserialize, Serialize};

pub const SIGMA_LOW: f64 = 0.01;
pub const SIGMA_HIGH: f64 = 5.0;
pub const PRICE_TOLERANCE: f64 = 1e-6;
pub const MAX_ITERATIONS: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    Call,
    Put,
}

impl OptionKind {
    pub fn is_call(self) -> bool {
        matches!(self, OptionKind::Call)
    }
}

/// Volatility that reproduces `market_price` for the given contract.
///
/// `snapshot.sigma` is ignored. Stops as soon as the model price is within
/// [`PRICE_TOLERANCE`] of the target, otherwise returns the bracket midpoint
/// after [`MAX_ITERATIONS`] halvings.
///
/// # Errors
/// - invalid snapshot fields, τ = 0, or a non-positive market price
/// - a price outside `[price(SIGMA_LOW), price(SIGMA_HIGH)]`
pub fn implied_volatility(
    snapshot: &MarketSnapshot,
    market_price: f64,
    kind: OptionKind,
) -> LabResult<f64> {
    validate_positive("tau", snapshot.tau)?;
    validate_positive("market_price", market_price)?;
    validate_finite("market_price", market_price)?;

    let model_price = |sigma: f64| -> LabResult<f64> {
        let v = price(&snapshot.with_sigma(sigma))?;
        Ok(if kind.is_call() { v.call } else { v.put })
    };

    let mut vol_low = SIGMA_LOW;
    let mut vol_high = SIGMA_HIGH;
    let price_low = model_price(vol_low)?;
    let price_high = model_price(vol_high)?;

    if market_price < price_low - PRICE_TOLERANCE || market_price > price_high + PRICE_TOLERANCE {
        return Err(LabError::InvalidParameters {
            parameter: "market_price".to_string(),
            value: market_price,
            constraint: format!(
                "must lie within [{:.6}, {:.6}] for implied vol in [{}, {}]",
                price_low, price_high, SIGMA_LOW, SIGMA_HIGH
            ),
        });
    }

    let mut vol_mid = 0.5 * (vol_low + vol_high);
    for _ in 0..MAX_ITERATIONS {
        vol_mid = 0.5 * (vol_low + vol_high);
        let price_mid = model_price(vol_mid)?;

        if (price_mid - market_price).abs() < PRICE_TOLERANCE {
            return Ok(vol_mid);
        }

        if price_mid < market_price {
            vol_low = vol_mid;
        } else {
            vol_high = vol_mid;
        }
    }

    Ok(vol_mid)
}
