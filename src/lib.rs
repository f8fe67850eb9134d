//! # option-lab: Black-Scholes valuation and delta-hedging experiments
//!
//! A small library for the classic textbook exercises of quantitative
//! finance: closed-form option valuation, geometric Brownian motion paths,
//! and a dynamic delta hedge that replicates a call with stock and cash.
//!
//! ## Key Features
//!
//! - **Closed-form valuation**: call/put prices, delta, vega, gamma, theta, rho
//! - **Implied volatility**: bisection against quoted prices, per contract or per chain
//! - **Path simulation**: seeded GBM paths, ensembles in parallel with Rayon
//! - **Asian options**: Monte Carlo arithmetic-average calls and puts
//! - **Delta hedging**: replicating portfolio tracked against the option value
//! - **Payoffs**: long/short calls and puts, bull and butterfly spreads
//!
//! ## Quick Start
//!
//! ```rust
//! use option_lab::analytics::bs_analytic::{price, MarketSnapshot};
//! use option_lab::hedging::delta_hedge::{run_delta_hedge, HedgeConfig};
//!
//! let snapshot = MarketSnapshot::new(2.0, 2.5, 0.03, 0.25, 1.0);
//! let valuation = price(&snapshot).expect("valid market");
//! assert!(valuation.call > 0.0);
//!
//! let run = run_delta_hedge(&HedgeConfig::default()).expect("valid configuration");
//! assert_eq!(run.theoretical().len(), run.portfolio().len());
//! ```

// Module declarations
pub mod analytics;
pub mod config;
pub mod error;
pub mod hedging;
pub mod market;
pub mod math_utils;
pub mod mc;
pub mod models;
pub mod output;
pub mod payoffs;
pub mod rng;

// Re-export commonly used types for convenience
pub use analytics::bs_analytic::{price, MarketSnapshot, Valuation};
pub use error::{LabError, LabResult};
