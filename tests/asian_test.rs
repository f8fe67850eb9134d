// tests/asian_test.rs
use option_lab::analytics::bs_analytic::price_parts;
use option_lab::analytics::implied_vol::OptionKind;
use option_lab::math_utils::norm_cdf;
use option_lab::mc::asian::{price_asian, AsianConfig};

fn contract(kind: OptionKind) -> AsianConfig {
    AsianConfig {
        s0: 100.0,
        strike: 100.0,
        t: 1.0,
        r: 0.05,
        sigma: 0.2,
        paths: 20_000,
        steps: 50,
        kind,
        seed: 2024,
    }
}

/// Closed-form price of the discretely monitored geometric-average option
/// over the same averaging dates.
fn geometric_asian(cfg: &AsianConfig) -> f64 {
    let n = cfg.steps as f64;
    let dt = cfg.t / n;
    let mean = cfg.s0.ln() + (cfg.r - 0.5 * cfg.sigma * cfg.sigma) * dt * (n + 1.0) / 2.0;
    let var = cfg.sigma * cfg.sigma * dt * (n + 1.0) * (2.0 * n + 1.0) / (6.0 * n);
    let d1 = (mean - cfg.strike.ln() + var) / var.sqrt();
    let d2 = d1 - var.sqrt();
    let forward = (mean + 0.5 * var).exp();
    let discount = (-cfg.r * cfg.t).exp();

    match cfg.kind {
        OptionKind::Call => discount * (forward * norm_cdf(d1) - cfg.strike * norm_cdf(d2)),
        OptionKind::Put => discount * (cfg.strike * norm_cdf(-d2) - forward * norm_cdf(-d1)),
    }
}

#[test]
fn test_asian_call_below_european_call() {
    let cfg = contract(OptionKind::Call);
    let est = price_asian(&cfg).expect("valid configuration");
    let european = price_parts(cfg.s0, cfg.strike, cfg.r, cfg.sigma, cfg.t).unwrap();

    println!("Asian call {:.6} ± {:.6}, European {:.6}", est.price, est.std_error, european.call);
    assert!(est.price > 0.0);
    assert!(est.price < european.call);
    assert!(est.std_error > 0.0 && est.std_error < 0.1);
}

#[test]
fn test_asian_put_below_european_put() {
    let cfg = contract(OptionKind::Put);
    let est = price_asian(&cfg).expect("valid configuration");
    let european = price_parts(cfg.s0, cfg.strike, cfg.r, cfg.sigma, cfg.t).unwrap();

    assert!(est.price > 0.0);
    assert!(est.price < european.put);
}

#[test]
fn test_arithmetic_average_bounds_against_geometric() {
    // The arithmetic mean dominates the geometric mean path by path, so the
    // call is worth at least, and the put at most, the geometric price.
    let call = contract(OptionKind::Call);
    let est = price_asian(&call).unwrap();
    assert!(
        est.price > geometric_asian(&call) - 4.0 * est.std_error,
        "call {} vs geometric {}",
        est.price,
        geometric_asian(&call)
    );

    let put = contract(OptionKind::Put);
    let est = price_asian(&put).unwrap();
    assert!(
        est.price < geometric_asian(&put) + 4.0 * est.std_error,
        "put {} vs geometric {}",
        est.price,
        geometric_asian(&put)
    );
}

#[test]
fn test_more_paths_shrink_standard_error() {
    let coarse = price_asian(&AsianConfig {
        paths: 2_000,
        ..contract(OptionKind::Call)
    })
    .unwrap();
    let fine = price_asian(&contract(OptionKind::Call)).unwrap();
    assert!(fine.std_error < coarse.std_error);
}
