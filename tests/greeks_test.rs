// tests/greeks_test.rs
use approx::assert_abs_diff_eq;
use option_lab::analytics::bs_analytic::{price, price_parts, sensitivities, MarketSnapshot};
use option_lab::LabError;
use proptest::prelude::*;

#[test]
fn test_reference_script_fixture() {
    let v = price_parts(2.0, 2.5, 0.03, 0.25, 1.0).expect("valid market");

    println!("\nCall: {} Delta: {}", v.call, v.call_delta);
    println!("Put:  {} Delta: {}", v.put, v.put_delta);

    assert_abs_diff_eq!(v.call, 0.06914188052850295, epsilon = 1e-10);
    assert_abs_diff_eq!(v.call_delta, 0.2586301926840547, epsilon = 1e-10);
    assert_abs_diff_eq!(v.put, 0.49525571439977334, epsilon = 1e-10);
    assert_abs_diff_eq!(v.put_delta, -0.7413698073159454, epsilon = 1e-10);
    assert_abs_diff_eq!(v.call_vega, 0.6469621232568693, epsilon = 1e-10);
    assert_eq!(v.call_vega, v.put_vega);
}

#[test]
fn test_bs_call_vega_analytic() {
    let v = price_parts(100.0, 100.0, 0.05, 0.20, 1.0).unwrap();
    let expected_vega = 37.524034691693792;

    let rel_error = (v.call_vega - expected_vega).abs() / expected_vega;
    assert!(rel_error < 1e-10, "Relative error for Vega exceeds tolerance: {}", rel_error);
    assert_abs_diff_eq!(v.call, 10.450583572185565, epsilon = 1e-9);
}

#[test]
fn test_bs_call_gamma_analytic() {
    let s = sensitivities(&MarketSnapshot::new(100.0, 100.0, 0.05, 0.20, 1.0)).unwrap();
    let expected_gamma = 0.018762017345847;

    let rel_error = (s.gamma - expected_gamma).abs() / expected_gamma;
    assert!(rel_error < 1e-10, "Relative error for Gamma exceeds tolerance: {}", rel_error);
}

#[test]
fn test_bs_call_theta_and_rho_analytic() {
    let s = sensitivities(&MarketSnapshot::new(100.0, 100.0, 0.05, 0.20, 1.0)).unwrap();

    assert_abs_diff_eq!(s.call_theta, -6.414027546438197, epsilon = 1e-9);
    assert_abs_diff_eq!(s.call_rho, 53.232481545376345, epsilon = 1e-9);
}

#[test]
fn test_gamma_matches_delta_finite_difference() {
    let snap = MarketSnapshot::new(100.0, 110.0, 0.05, 0.3, 0.5);
    let h = 1e-3;
    let up = price(&MarketSnapshot { spot: 100.0 + h, ..snap }).unwrap();
    let down = price(&MarketSnapshot { spot: 100.0 - h, ..snap }).unwrap();
    let fd_gamma = (up.call_delta - down.call_delta) / (2.0 * h);

    assert_abs_diff_eq!(sensitivities(&snap).unwrap().gamma, fd_gamma, epsilon = 1e-6);
}

#[test]
fn test_vega_matches_price_finite_difference() {
    let snap = MarketSnapshot::new(100.0, 110.0, 0.05, 0.3, 0.5);
    let h = 1e-5;
    let up = price(&snap.with_sigma(0.3 + h)).unwrap();
    let down = price(&snap.with_sigma(0.3 - h)).unwrap();
    let fd_vega = (up.call - down.call) / (2.0 * h);

    assert_abs_diff_eq!(price(&snap).unwrap().call_vega, fd_vega, epsilon = 1e-5);
}

#[test]
fn test_sigma_zero_with_time_remaining_is_rejected() {
    let err = price_parts(100.0, 100.0, 0.05, 0.0, 0.5).unwrap_err();
    assert!(matches!(err, LabError::InvalidParameters { .. }));
    assert!(err.to_string().contains("sigma"));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// At expiry the valuation is the intrinsic payoff, exactly.
    #[test]
    fn prop_expiry_is_intrinsic(
        s in 0.01f64..500.0,
        e in 0.01f64..500.0,
        r in -0.05f64..0.2,
        sigma in 0.01f64..2.0,
    ) {
        let v = price_parts(s, e, r, sigma, 0.0).unwrap();
        prop_assert_eq!(v.call, (s - e).max(0.0));
        prop_assert_eq!(v.put, (e - s).max(0.0));
        prop_assert_eq!(v.call_vega, 0.0);
        prop_assert_eq!(v.put_vega, 0.0);
        prop_assert_eq!(v.put_delta, v.call_delta - 1.0);
    }

    /// call - put = S - E e^(-rτ)
    #[test]
    fn prop_put_call_parity(
        s in 0.5f64..300.0,
        e in 0.5f64..300.0,
        r in -0.05f64..0.2,
        sigma in 0.01f64..1.5,
        tau in 0.0f64..5.0,
    ) {
        let v = price_parts(s, e, r, sigma, tau).unwrap();
        let parity = s - e * (-r * tau).exp();
        prop_assert!(
            (v.call - v.put - parity).abs() <= 1e-9 * (1.0 + s + e),
            "parity violated: call {} put {} expected {}", v.call, v.put, parity
        );
    }

    #[test]
    fn prop_delta_bounds(
        s in 0.5f64..300.0,
        e in 0.5f64..300.0,
        r in -0.05f64..0.2,
        sigma in 0.01f64..1.5,
        tau in 0.0f64..5.0,
    ) {
        let v = price_parts(s, e, r, sigma, tau).unwrap();
        prop_assert!((0.0..=1.0).contains(&v.call_delta), "call delta {}", v.call_delta);
        prop_assert!((-1.0..=0.0).contains(&v.put_delta), "put delta {}", v.put_delta);
        prop_assert!(v.call >= 0.0 || v.call.abs() < 1e-9);
    }
}
