// src/error.rs
use thiserror::Error;

/// Error types for the option-lab library
#[derive(Debug, Error)]
pub enum LabError {
    /// Invalid parameter values
    #[error("Invalid parameter '{parameter}' = {value}: {constraint}")]
    InvalidParameters {
        parameter: String,
        value: f64,
        constraint: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfiguration { field: String, reason: String },

    /// Numerical instability or non-finite intermediate result
    #[error("Numerical instability in {method}: {reason}")]
    NumericalInstability { method: String, reason: String },

    /// Market-data provider failure
    #[error("Failed to retrieve {request}: {reason}")]
    DataFetch { request: String, reason: String },

    /// Configuration file could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl LabError {
    pub fn data_fetch(request: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DataFetch {
            request: request.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for option-lab operations
pub type LabResult<T> = Result<T, LabError>;

/// Validation utilities
pub mod validation {
    use super::{LabError, LabResult};

    /// Validate that a parameter is positive
    pub fn validate_positive(name: &str, value: f64) -> LabResult<()> {
        if value.is_nan() || value <= 0.0 {
            Err(LabError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be positive (> 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is non-negative
    pub fn validate_non_negative(name: &str, value: f64) -> LabResult<()> {
        if value.is_nan() || value < 0.0 {
            Err(LabError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be non-negative (≥ 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a value is finite and not NaN
    pub fn validate_finite(name: &str, value: f64) -> LabResult<()> {
        if !value.is_finite() {
            Err(LabError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be finite (not NaN or infinite)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate paths count
    pub fn validate_paths(paths: usize) -> LabResult<()> {
        if paths == 0 {
            Err(LabError::InvalidConfiguration {
                field: "paths".to_string(),
                reason: "must be greater than 0".to_string(),
            })
        } else if paths > 1_000_000 {
            Err(LabError::InvalidConfiguration {
                field: "paths".to_string(),
                reason: "exceeds maximum allowed (1,000,000)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate steps count
    pub fn validate_steps(steps: usize) -> LabResult<()> {
        if steps == 0 {
            Err(LabError::InvalidConfiguration {
                field: "steps".to_string(),
                reason: "must be greater than 0".to_string(),
            })
        } else if steps > 10_000_000 {
            Err(LabError::InvalidConfiguration {
                field: "steps".to_string(),
                reason: "exceeds maximum allowed (10,000,000)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Largest `paths × samples` grid an ensemble may allocate
    pub const MAX_GRID_CELLS: usize = 100_000_000;

    /// Validate the total size of a `paths × samples` grid
    pub fn validate_grid_size(paths: usize, samples: usize) -> LabResult<()> {
        match paths.checked_mul(samples) {
            Some(cells) if cells <= MAX_GRID_CELLS => Ok(()),
            _ => Err(LabError::InvalidConfiguration {
                field: "paths".to_string(),
                reason: format!(
                    "{} paths × {} samples exceeds the maximum grid of {} values",
                    paths, samples, MAX_GRID_CELLS
                ),
            }),
        }
    }
}
