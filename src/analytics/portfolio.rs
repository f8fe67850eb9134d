//! Aggregated Greeks for a book of European option positions
//!
//! Each position is revalued at its own implied volatility, backed out from
//! the quoted market price, then scaled by the held quantity.

use super::bs_analytic::{price, sensitivities, MarketSnapshot};
use super::implied_vol::{implied_volatility, OptionKind};
use crate::error::{validation::*, LabResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Signed number of contracts (negative = short)
    pub quantity: f64,
    pub strike: f64,
    /// Time to expiry in years
    pub expiry: f64,
    pub kind: OptionKind,
    pub market_price: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioGreeks {
    pub total_delta: f64,
    pub total_gamma: f64,
    pub total_theta: f64,
    pub total_vega: f64,
    pub total_rho: f64,
    pub portfolio_value: f64,
}

pub fn analyze(spot: f64, rate: f64, positions: &[Position]) -> LabResult<PortfolioGreeks> {
    validate_positive("spot", spot)?;
    validate_finite("rate", rate)?;

    let mut totals = PortfolioGreeks::default();

    for position in positions {
        validate_finite("quantity", position.quantity)?;

        let base = MarketSnapshot::new(spot, position.strike, rate, 0.0, position.expiry);
        let iv = implied_volatility(&base, position.market_price, position.kind)?;
        let snapshot = base.with_sigma(iv);
        let valuation = price(&snapshot)?;
        let greeks = sensitivities(&snapshot)?;

        let (delta, theta, rho) = match position.kind {
            OptionKind::Call => (valuation.call_delta, greeks.call_theta, greeks.call_rho),
            OptionKind::Put => (valuation.put_delta, greeks.put_theta, greeks.put_rho),
        };

        debug!(
            strike = position.strike,
            expiry = position.expiry,
            implied_vol = iv,
            "revalued position"
        );

        let q = position.quantity;
        totals.total_delta += q * delta;
        totals.total_gamma += q * greeks.gamma;
        totals.total_theta += q * theta;
        totals.total_vega += q * valuation.call_vega;
        totals.total_rho += q * rho;
        totals.portfolio_value += q * position.market_price;
    }

    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn quoted(kind: OptionKind, strike: f64, expiry: f64, sigma: f64) -> f64 {
        let v = price(&MarketSnapshot::new(100.0, strike, 0.03, sigma, expiry)).unwrap();
        if kind.is_call() {
            v.call
        } else {
            v.put
        }
    }

    #[test]
    fn test_straddle_is_nearly_delta_neutral() {
        let call = Position {
            quantity: 1.0,
            strike: 100.0,
            expiry: 0.5,
            kind: OptionKind::Call,
            market_price: quoted(OptionKind::Call, 100.0, 0.5, 0.25),
        };
        let put = Position {
            kind: OptionKind::Put,
            market_price: quoted(OptionKind::Put, 100.0, 0.5, 0.25),
            ..call
        };

        let book = analyze(100.0, 0.03, &[call, put]).unwrap();
        let single = analyze(100.0, 0.03, &[call]).unwrap();

        // call delta + put delta = 2Φ(d₁) - 1, small at the money
        assert!(book.total_delta.abs() < 0.2);
        assert_abs_diff_eq!(book.total_gamma, 2.0 * single.total_gamma, epsilon = 1e-6);
        assert_abs_diff_eq!(
            book.portfolio_value,
            call.market_price + put.market_price,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_short_position_flips_signs() {
        let long = Position {
            quantity: 2.0,
            strike: 95.0,
            expiry: 1.0,
            kind: OptionKind::Call,
            market_price: quoted(OptionKind::Call, 95.0, 1.0, 0.3),
        };
        let short = Position {
            quantity: -2.0,
            ..long
        };

        let a = analyze(100.0, 0.03, &[long]).unwrap();
        let b = analyze(100.0, 0.03, &[short]).unwrap();
        assert_abs_diff_eq!(a.total_delta, -b.total_delta, epsilon = 1e-12);
        assert_abs_diff_eq!(a.total_vega, -b.total_vega, epsilon = 1e-12);
        assert!(a.total_delta > 0.0 && a.total_delta < 2.0);
    }

    #[test]
    fn test_empty_book() {
        assert_eq!(analyze(100.0, 0.03, &[]).unwrap(), PortfolioGreeks::default());
    }
}
