//! Run configuration
//!
//! Loaded from a TOML file; every field has a default so a partial (or
//! missing) file is fine. Environment variables override the file:
//!
//! | Variable | Field |
//! |---|---|
//! | `OPTION_LAB_SEED` | `hedge.seed`, `paths.seed` and `asian.seed` |
//! | `OPTION_LAB_LOG_LEVEL` | `log_level` |
//! | `OPTION_LAB_OUTPUT_DIR` | `output_dir` |
//!
//! ```toml
//! log_level = "debug"
//! output_dir = "results"
//!
//! [hedge]
//! sigma = 0.35
//! dt = 0.005
//!
//! [paths]
//! paths = 50
//! steps = 100
//!
//! [asian]
//! kind = "put"
//! steps = 52
//! ```

use crate::error::{LabError, LabResult};
use crate::hedging::delta_hedge::HedgeConfig;
use crate::mc::asian::AsianConfig;
use crate::mc::paths::PathConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    pub log_level: String,
    pub output_dir: PathBuf,
    pub hedge: HedgeConfig,
    pub paths: PathConfig,
    pub asian: AsianConfig,
}

impl Default for LabConfig {
    fn default() -> Self {
        LabConfig {
            log_level: "info".to_string(),
            output_dir: PathBuf::from("results"),
            hedge: HedgeConfig::default(),
            paths: PathConfig::default(),
            asian: AsianConfig::default(),
        }
    }
}

impl LabConfig {
    pub fn load(path: &Path) -> LabResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| LabError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> LabResult<Self> {
        toml::from_str(content).map_err(|e| LabError::Config(e.to_string()))
    }

    /// Load `path` when it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> LabResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn with_env_override(self) -> LabResult<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn with_overrides<F>(mut self, lookup: F) -> LabResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(seed) = lookup("OPTION_LAB_SEED") {
            let seed: u64 = seed
                .trim()
                .parse()
                .map_err(|_| LabError::Config(format!("OPTION_LAB_SEED is not a u64: '{}'", seed)))?;
            self.hedge.seed = seed;
            self.paths.seed = seed;
            self.asian.seed = seed;
        }

        if let Some(level) = lookup("OPTION_LAB_LOG_LEVEL") {
            self.log_level = level;
        }

        if let Some(dir) = lookup("OPTION_LAB_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }

        Ok(self)
    }

    pub fn validate(&self) -> LabResult<()> {
        self.hedge.validate()?;
        self.paths.validate()?;
        self.asian.validate()?;
        if self.log_level.trim().is_empty() {
            return Err(LabError::InvalidConfiguration {
                field: "log_level".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let cfg = LabConfig::from_toml(
            r#"
            log_level = "debug"

            [hedge]
            dt = 0.005
            "#,
        )
        .unwrap();

        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.hedge.dt, 0.005);
        assert_eq!(cfg.hedge.sigma, HedgeConfig::default().sigma);
        assert_eq!(cfg.paths, PathConfig::default());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_asian_section() {
        let cfg = LabConfig::from_toml(
            r#"
            [asian]
            kind = "put"
            steps = 52
            "#,
        )
        .unwrap();

        assert_eq!(cfg.asian.kind, crate::analytics::implied_vol::OptionKind::Put);
        assert_eq!(cfg.asian.steps, 52);
        assert_eq!(cfg.asian.strike, AsianConfig::default().strike);
    }

    #[test]
    fn test_malformed_file() {
        let err = LabConfig::from_toml("[hedge]\ndt = \"fast\"").unwrap_err();
        assert!(matches!(err, LabError::Config(_)));
    }

    #[test]
    fn test_overrides() {
        let cfg = LabConfig::default()
            .with_overrides(|key| match key {
                "OPTION_LAB_SEED" => Some("99".to_string()),
                "OPTION_LAB_OUTPUT_DIR" => Some("/tmp/lab".to_string()),
                _ => None,
            })
            .unwrap();

        assert_eq!(cfg.hedge.seed, 99);
        assert_eq!(cfg.paths.seed, 99);
        assert_eq!(cfg.asian.seed, 99);
        assert_eq!(cfg.output_dir, PathBuf::from("/tmp/lab"));
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn test_bad_seed_override() {
        let result = LabConfig::default().with_overrides(|key| {
            (key == "OPTION_LAB_SEED").then(|| "abc".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let cfg = LabConfig::load_or_default(Path::new("/nonexistent/option-lab.toml")).unwrap();
        assert_eq!(cfg, LabConfig::default());
    }
}
