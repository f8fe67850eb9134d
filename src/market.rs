//! Market-data boundary
//!
//! The valuation code only ever consumes scalars (spot, rate, volatility).
//! [`MarketDataProvider`] is the seam to whatever supplies them; the free
//! functions here turn raw provider answers into those scalars and report
//! every provider failure as a single [`LabError::DataFetch`].

use crate::analytics::bs_analytic::MarketSnapshot;
use crate::analytics::implied_vol::{implied_volatility, OptionKind};
use crate::error::{LabError, LabResult};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One quoted contract of an option chain
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OptionChainRow {
    #[serde(default)]
    pub symbol: String,
    pub option_type: OptionKind,
    pub expiration: NaiveDate,
    pub strike: f64,
    pub market_price: Option<f64>,
    pub bid: Option<f64>,
    pub ask: Option<f64>,
    pub volume: Option<f64>,
    pub open_interest: Option<f64>,
    #[serde(alias = "implied_volatility")]
    pub implied_vol: Option<f64>,
    #[serde(alias = "T_years")]
    pub time_to_expiry_years: Option<f64>,
}

/// Source of raw market observations
pub trait MarketDataProvider {
    /// Latest traded price of `symbol`
    fn spot_price(&self, symbol: &str) -> LabResult<f64>;

    /// Cash dividend amounts paid by `symbol` in `[since, until]`
    fn dividend_amounts(&self, symbol: &str, since: NaiveDate, until: NaiveDate)
        -> LabResult<Vec<f64>>;

    /// 10-year treasury observations in `[since, until]`, oldest first.
    /// Values may be quoted as fractions or percentages; gaps are `None`.
    fn treasury_rates_10y(&self, since: NaiveDate, until: NaiveDate) -> LabResult<Vec<Option<f64>>>;

    fn option_chain(&self, symbol: &str) -> LabResult<Vec<OptionChainRow>>;
}

/// Scalars describing one underlying
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnderlyingData {
    pub symbol: String,
    pub spot_price: f64,
    pub dividend_yield: f64,
    pub risk_free_rate: f64,
}

impl UnderlyingData {
    pub fn snapshot(&self, strike: f64, sigma: f64, tau: f64) -> MarketSnapshot {
        MarketSnapshot::new(self.spot_price, strike, self.risk_free_rate, sigma, tau)
    }
}

pub fn spot_price<P: MarketDataProvider + ?Sized>(provider: &P, symbol: &str) -> LabResult<f64> {
    let request = format!("spot price for symbol {}", symbol);
    let price = provider
        .spot_price(symbol)
        .map_err(|e| LabError::data_fetch(&request, e.to_string()))?;

    if !price.is_finite() || price < 0.0 {
        return Err(LabError::data_fetch(
            request,
            format!("invalid price data ({})", price),
        ));
    }
    Ok(price)
}

/// Trailing one-year dividend yield: total dividends over the spot price.
///
/// A spot price of zero yields 0 rather than an error.
pub fn dividend_yield<P: MarketDataProvider + ?Sized>(
    provider: &P,
    symbol: &str,
    today: NaiveDate,
) -> LabResult<f64> {
    let request = format!("dividend yield for symbol {}", symbol);
    let since = today - Duration::days(365);

    let amounts: Vec<f64> = provider
        .dividend_amounts(symbol, since, today)
        .map_err(|e| LabError::data_fetch(&request, e.to_string()))?
        .into_iter()
        .filter(|a| a.is_finite())
        .collect();

    if amounts.is_empty() {
        return Err(LabError::data_fetch(request, "no valid dividend amounts found"));
    }

    let total: f64 = amounts.iter().sum();
    let price = spot_price(provider, symbol).map_err(|e| LabError::data_fetch(&request, e.to_string()))?;

    Ok(if price == 0.0 { 0.0 } else { total / price })
}

/// Most recent valid 10-year rate over the last ten days, as a fraction.
///
/// Observations of 1 or more are read as percentages.
pub fn risk_free_rate<P: MarketDataProvider + ?Sized>(provider: &P, today: NaiveDate) -> LabResult<f64> {
    let request = "risk-free rate";
    let observations = provider
        .treasury_rates_10y(today - Duration::days(10), today)
        .map_err(|e| LabError::data_fetch(request, e.to_string()))?;

    observations
        .into_iter()
        .rev()
        .flatten()
        .find(|rate| rate.is_finite())
        .map(normalize_rate)
        .ok_or_else(|| LabError::data_fetch(request, "no valid rate observations"))
}

pub fn normalize_rate(rate: f64) -> f64 {
    if rate < 1.0 {
        rate
    } else {
        rate / 100.0
    }
}

pub fn fetch_underlying<P: MarketDataProvider + ?Sized>(
    provider: &P,
    symbol: &str,
    today: NaiveDate,
) -> LabResult<UnderlyingData> {
    let data = UnderlyingData {
        symbol: symbol.to_string(),
        spot_price: spot_price(provider, symbol)?,
        dividend_yield: dividend_yield(provider, symbol, today)?,
        risk_free_rate: risk_free_rate(provider, today)?,
    };
    debug!(?data, "fetched underlying");
    Ok(data)
}

/// Option chain for `symbol`, restricted to `expiries` (all when empty).
///
/// Rows without a time to expiry are completed by [`fill_time_to_expiry`].
pub fn fetch_option_chain<P: MarketDataProvider + ?Sized>(
    provider: &P,
    symbol: &str,
    expiries: &[NaiveDate],
    today: NaiveDate,
) -> LabResult<Vec<OptionChainRow>> {
    let rows = provider
        .option_chain(symbol)
        .map_err(|e| LabError::data_fetch(format!("option chain for symbol {}", symbol), e.to_string()))?;

    let mut rows: Vec<OptionChainRow> = rows
        .into_iter()
        .filter(|row| expiries.is_empty() || expiries.contains(&row.expiration))
        .map(|mut row| {
            row.symbol = symbol.to_string();
            row
        })
        .collect();
    fill_time_to_expiry(&mut rows, today);
    Ok(rows)
}

/// Set `time_to_expiry_years = days_to_expiry / 365`, measured from `today`,
/// on every row that lacks one. Rows that already carry a value keep it.
pub fn fill_time_to_expiry(rows: &mut [OptionChainRow], today: NaiveDate) {
    for row in rows.iter_mut().filter(|r| r.time_to_expiry_years.is_none()) {
        row.time_to_expiry_years = Some((row.expiration - today).num_days() as f64 / 365.0);
    }
}

/// One point of an implied volatility smile
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SmilePoint {
    pub expiration: NaiveDate,
    pub strike: f64,
    pub option_type: OptionKind,
    pub implied_vol: f64,
}

/// Implied volatilities backed out from quoted prices, ordered by expiry then strike.
///
/// Rows without a positive price or with τ ≤ 0 are ignored. Rows missing τ
/// (see [`fill_time_to_expiry`]) or quoted outside the no-arbitrage bracket
/// are skipped with a warning.
pub fn implied_vol_smile(rows: &[OptionChainRow], spot: f64, rate: f64) -> Vec<SmilePoint> {
    let mut smile: Vec<SmilePoint> = rows
        .iter()
        .filter_map(|row| {
            let quote = row.market_price.filter(|p| *p > 0.0)?;
            let Some(tau) = row.time_to_expiry_years else {
                warn!(strike = row.strike, expiration = %row.expiration, "skipping quote without time to expiry");
                return None;
            };
            if tau <= 0.0 {
                return None;
            }
            let snapshot = MarketSnapshot::new(spot, row.strike, rate, 0.0, tau);

            match implied_volatility(&snapshot, quote, row.option_type) {
                Ok(iv) => Some(SmilePoint {
                    expiration: row.expiration,
                    strike: row.strike,
                    option_type: row.option_type,
                    implied_vol: iv,
                }),
                Err(e) => {
                    warn!(strike = row.strike, %e, "skipping quote");
                    None
                }
            }
        })
        .collect();

    smile.sort_by(|a, b| {
        a.expiration
            .cmp(&b.expiration)
            .then(a.strike.total_cmp(&b.strike))
    });
    smile
}
