// src/math_utils.rs
use statrs::function::erf;
use std::f64::consts::{PI, SQRT_2};

/// Standard normal cumulative distribution function, Φ(x) = ½(1 + erf(x/√2))
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf::erf(x / SQRT_2))
}

/// Standard normal probability density function
pub fn norm_pdf(x: f64) -> f64 {
    (1.0 / (2.0 * PI).sqrt()) * (-0.5 * x * x).exp()
}

/// Three-way sign: -1, 0 or 1. Unlike `f64::signum`, zero maps to zero.
pub fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// `points` evenly spaced samples over `[start, end]`, both ends included.
///
/// The last sample is pinned to `end` so callers can rely on an exact
/// terminal value.
pub fn linspace(start: f64, end: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (points - 1) as f64;
            let mut grid: Vec<f64> = (0..points).map(|i| start + step * i as f64).collect();
            grid[points - 1] = end;
            grid
        }
    }
}

pub struct Timer {
    start_time: std::time::Instant,
}

impl Timer {
    pub fn new() -> Timer {
        Timer {
            start_time: std::time::Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64() * 1000.0
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_norm_cdf_reference_points() {
        assert_abs_diff_eq!(norm_cdf(0.0), 0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(norm_cdf(1.96), 0.975002104851780, epsilon = 1e-11);
        assert_abs_diff_eq!(norm_cdf(-1.0) + norm_cdf(1.0), 1.0, epsilon = 1e-14);
    }

    #[test]
    fn test_norm_pdf_peak() {
        assert_abs_diff_eq!(norm_pdf(0.0), 0.398942280401433, epsilon = 1e-14);
        assert_abs_diff_eq!(norm_pdf(1.3), norm_pdf(-1.3), epsilon = 1e-16);
    }

    #[test]
    fn test_sign_zero() {
        assert_eq!(sign(0.0), 0.0);
        assert_eq!(sign(-0.0), 0.0);
        assert_eq!(sign(3.0), 1.0);
        assert_eq!(sign(-2.5), -1.0);
    }

    #[test]
    fn test_linspace_endpoints() {
        let grid = linspace(0.0, 0.7, 13);
        assert_eq!(grid.len(), 13);
        assert_eq!(grid[0], 0.0);
        assert_eq!(grid[12], 0.7);
        assert_abs_diff_eq!(grid[1] - grid[0], 0.7 / 12.0, epsilon = 1e-15);
        assert!(linspace(1.0, 2.0, 0).is_empty());
        assert_eq!(linspace(1.0, 2.0, 1), vec![1.0]);
    }
}
