// demos/demo.rs
use option_lab::analytics::bs_analytic::{price, sensitivities, MarketSnapshot};
use option_lab::analytics::implied_vol::{implied_volatility, OptionKind};
use option_lab::analytics::portfolio::{analyze, Position};
use option_lab::hedging::delta_hedge::{run_delta_hedge, tracking_error_study, HedgeConfig};
use option_lab::math_utils::Timer;
use option_lab::mc::asian::{price_asian, AsianConfig};
use option_lab::mc::paths::{ensemble_times, simulate_ensemble, PathConfig};
use option_lab::output;
use option_lab::payoffs::Payoff;
use std::fs::{self, File};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 && args[1] == "--study" {
        run_tracking_error_study();
    } else {
        run_demo_mode();
    }
}

/// Tracking error as the rebalancing interval shrinks
fn run_tracking_error_study() {
    let base = HedgeConfig {
        maturity: 1.0,
        strike: 1.0,
        ..Default::default()
    };

    println!("{:>10} {:>12} {:>12} {:>12} {:>10}", "dt", "mean |err|", "rms", "max", "ms");
    for dt in [0.04, 0.02, 0.01, 0.005, 0.0025, 0.00125] {
        let cfg = HedgeConfig { dt, ..base.clone() };
        let timer = Timer::new();
        let stats = tracking_error_study(&cfg, 500).expect("Valid configuration");
        println!(
            "{:>10} {:>12.6} {:>12.6} {:>12.6} {:>10.1}",
            dt,
            stats.mean_abs,
            stats.rms,
            stats.max_abs,
            timer.elapsed_ms()
        );
    }
}

fn run_demo_mode() {
    println!("Running option-lab demo\n");

    // --- Valuation ---
    println!("--- Black-Scholes Valuation ---");
    let snapshot = MarketSnapshot::new(2.0, 2.5, 0.03, 0.25, 1.0);
    let v = price(&snapshot).expect("Valid market");
    let s = sensitivities(&snapshot).expect("Valid market");
    println!("Call: {:.6}  Delta: {:.6}  Vega: {:.6}", v.call, v.call_delta, v.call_vega);
    println!("Put:  {:.6}  Delta: {:.6}  Vega: {:.6}", v.put, v.put_delta, v.put_vega);
    println!("Gamma: {:.6}  Call theta: {:.6}  Call rho: {:.6}\n", s.gamma, s.call_theta, s.call_rho);

    // --- Implied volatility ---
    println!("--- Implied Volatility ---");
    let iv = implied_volatility(&snapshot, v.call, OptionKind::Call).expect("Quote inside bracket");
    println!("Quoted call {:.6} -> implied vol {:.6} (true 0.25)\n", v.call, iv);

    // --- Portfolio ---
    println!("--- Portfolio Greeks ---");
    let book_market = MarketSnapshot::new(100.0, 100.0, 0.03, 0.2, 0.5);
    let quote = |strike: f64, kind: OptionKind| {
        let v = price(&MarketSnapshot { strike, ..book_market }).expect("Valid market");
        if kind.is_call() {
            v.call
        } else {
            v.put
        }
    };
    let book = [
        Position {
            quantity: 10.0,
            strike: 100.0,
            expiry: 0.5,
            kind: OptionKind::Call,
            market_price: quote(100.0, OptionKind::Call),
        },
        Position {
            quantity: -5.0,
            strike: 95.0,
            expiry: 0.5,
            kind: OptionKind::Put,
            market_price: quote(95.0, OptionKind::Put),
        },
    ];
    let greeks = analyze(book_market.spot, book_market.rate, &book).expect("Valid book");
    println!("{:#?}\n", greeks);

    // --- Delta hedging ---
    println!("--- Delta Hedging ---");
    let cfg = HedgeConfig::default();
    let timer = Timer::new();
    let run = run_delta_hedge(&cfg).expect("Valid configuration");
    println!(
        "{} rebalances in {:.2} ms, terminal tracking error {:.6}",
        run.len(),
        timer.elapsed_ms(),
        run.tracking_error()
    );

    // --- Asian option ---
    println!("\n--- Arithmetic Asian Call (Monte Carlo) ---");
    let asian = AsianConfig::default();
    let timer = Timer::new();
    let estimate = price_asian(&asian).expect("Valid configuration");
    let european = price(&MarketSnapshot::new(asian.s0, asian.strike, asian.r, asian.sigma, asian.t))
        .expect("Valid market");
    println!(
        "Asian {:.6} ± {:.6} vs European {:.6} ({:.2} ms)",
        estimate.price,
        estimate.std_error,
        european.call,
        timer.elapsed_ms()
    );

    // --- Paths and payoffs ---
    println!("\n--- GBM Paths ---");
    let path_cfg = PathConfig::default();
    let grid = simulate_ensemble(&path_cfg).expect("Valid configuration");
    let terminal = grid.column(path_cfg.steps);
    println!(
        "{} paths, mean terminal spot {:.6}",
        path_cfg.paths,
        terminal.sum() / path_cfg.paths as f64
    );

    let butterfly = Payoff::ButterflySpread {
        low: 90.0,
        mid: 100.0,
        high: 110.0,
    };
    let (prices, payoffs) = butterfly.diagram(80.0, 120.0, 401).expect("Valid range");

    fs::create_dir_all("results").expect("Could not create results directory");
    output::write_hedge_run(File::create("results/hedge.csv").expect("Could not create file"), &run)
        .expect("Could not write hedge run");
    output::write_paths(
        File::create("results/paths.csv").expect("Could not create file"),
        &ensemble_times(&path_cfg),
        &grid,
    )
    .expect("Could not write paths");
    output::write_payoff_diagram(
        File::create("results/butterfly.csv").expect("Could not create file"),
        &prices,
        &payoffs,
    )
    .expect("Could not write payoff diagram");

    println!("\nResults written to results/");
}
