// tests/integration_test.rs
use approx::assert_relative_eq;
use option_lab::mc::paths::{simulate_ensemble, simulate_path, PathConfig};
use option_lab::models::gbm::Gbm;
use option_lab::payoffs::Payoff;
use option_lab::rng;

#[test]
fn test_single_path_is_reproducible() {
    let gbm = Gbm::new(1.0, 0.05, 0.5).unwrap();

    let mut rng1 = rng::seed_rng_from_u64(2024);
    let mut rng2 = rng::seed_rng_from_u64(2024);
    let a = simulate_path(&gbm, 0.01, 250, &mut rng1);
    let b = simulate_path(&gbm, 0.01, 250, &mut rng2);
    assert_eq!(a, b);

    let mut rng3 = rng::seed_rng_from_u64(2025);
    let c = simulate_path(&gbm, 0.01, 250, &mut rng3);
    assert_ne!(a.spots, c.spots);
}

#[test]
fn test_ensemble_is_reproducible_and_matches_single_paths() {
    let cfg = PathConfig {
        paths: 16,
        steps: 64,
        seed: 7,
        ..Default::default()
    };

    let first = simulate_ensemble(&cfg).unwrap();
    let second = simulate_ensemble(&cfg).unwrap();
    assert_eq!(first, second);

    // Row i is exactly the single path drawn from seed + i
    let gbm = Gbm::new(cfg.s0, cfg.mu, cfg.sigma).unwrap();
    for i in [0usize, 5, 15] {
        let mut rng = rng::seed_rng_from_u64(cfg.seed + i as u64);
        let path = simulate_path(&gbm, cfg.dt(), cfg.steps, &mut rng);
        assert_eq!(first.row(i).to_vec(), path.spots);
    }
}

#[test]
fn test_ensemble_terminal_mean_matches_drift() {
    let cfg = PathConfig {
        paths: 20_000,
        steps: 10,
        s0: 1.0,
        mu: 0.05,
        sigma: 0.3,
        t: 1.0,
        seed: 99,
    };
    let grid = simulate_ensemble(&cfg).unwrap();
    let terminal = grid.column(cfg.steps);
    let mean = terminal.sum() / cfg.paths as f64;

    // E[S_T] = S_0 e^(μT); standard error here is about 0.0022
    assert_relative_eq!(mean, 0.05_f64.exp(), max_relative = 0.01);
}

#[test]
fn test_payoff_on_simulated_terminal_prices() {
    let gbm = Gbm::new(100.0, 0.0, 0.2).unwrap();
    let mut rng = rng::seed_rng_from_u64(1);
    let butterfly = Payoff::ButterflySpread {
        low: 90.0,
        mid: 100.0,
        high: 110.0,
    };

    for _ in 0..200 {
        let path = simulate_path(&gbm, 1.0 / 52.0, 52, &mut rng);
        let payoff = butterfly.calculate(path.terminal().unwrap());
        assert!((0.0..=10.0).contains(&payoff));
    }
}
