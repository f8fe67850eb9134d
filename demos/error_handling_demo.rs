// demos/error_handling_demo.rs
use option_lab::analytics::bs_analytic::{price, MarketSnapshot};
use option_lab::analytics::implied_vol::{implied_volatility, OptionKind};
use option_lab::config::LabConfig;
use option_lab::hedging::delta_hedge::{run_delta_hedge, HedgeConfig};
use option_lab::mc::paths::{simulate_ensemble, PathConfig};
use option_lab::payoffs::Payoff;
use option_lab::LabError;

fn main() {
    println!("Error Handling Demo for option-lab");
    println!("==================================\n");

    // Test 1: Negative spot
    println!("1. Testing a negative spot price...");
    match price(&MarketSnapshot::new(-100.0, 100.0, 0.05, 0.2, 1.0)) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }

    // Test 2: Zero volatility with time remaining
    println!("\n2. Testing sigma = 0 before expiry...");
    match price(&MarketSnapshot::new(100.0, 100.0, 0.05, 0.0, 1.0)) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }

    // Test 3: At expiry sigma no longer matters
    println!("\n3. Testing a valuation at expiry...");
    match price(&MarketSnapshot::new(100.0, 100.0, 0.05, 0.0, 0.0)) {
        Ok(v) => println!("   ✓ Success: call {} put {} delta {}", v.call, v.put, v.call_delta),
        Err(e) => println!("   Unexpected error: {}", e),
    }

    // Test 4: Quote below intrinsic value
    println!("\n4. Testing an implied vol for an arbitrage quote...");
    let itm = MarketSnapshot::new(100.0, 50.0, 0.05, 0.0, 1.0);
    match implied_volatility(&itm, 1.0, OptionKind::Call) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }

    // Test 5: Hedge rebalancing interval longer than the maturity
    println!("\n5. Testing a hedge with dt > maturity...");
    let bad_hedge = HedgeConfig {
        maturity: 0.5,
        dt: 1.0,
        ..Default::default()
    };
    match run_delta_hedge(&bad_hedge) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }

    // Test 6: Empty ensemble
    println!("\n6. Testing an ensemble with zero paths...");
    let empty = PathConfig {
        paths: 0,
        ..Default::default()
    };
    match simulate_ensemble(&empty) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }

    // Test 7: Inverted spread strikes
    println!("\n7. Testing a bull spread with inverted strikes...");
    match Payoff::from_parts("bull", &[110.0, 100.0]) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }

    // Test 8: Error type matching
    println!("\n8. Testing error type matching...");
    match LabConfig::from_toml("[hedge]\nsigma = \"high\"\n") {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(LabError::Config(msg)) => println!("   ✓ Config error: {}", msg),
        Err(e) => println!("   Other error: {}", e),
    }
    match price(&MarketSnapshot::new(100.0, f64::NAN, 0.05, 0.2, 1.0)) {
        Err(LabError::InvalidParameters {
            parameter,
            constraint,
            ..
        }) => println!("   ✓ Invalid parameter '{}': {}", parameter, constraint),
        Err(e) => println!("   Other error: {}", e),
        Ok(_) => println!("   Unexpected: Should have failed!"),
    }

    println!("\n✓ Error handling demo completed!");
}
