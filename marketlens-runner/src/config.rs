//! Serializable scan configuration.
//!
//! Every field has a default, so an empty TOML document is a valid config:
//!
//! ```toml
//! period = "6mo"
//! min_score = 10.0
//! throttle_ms = 100
//! top_per_sector = 10
//!
//! [simulation]
//! enabled = true
//! days = 30
//! paths = 1000
//! seed = 42
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use marketlens_core::domain::Period;
use marketlens_core::montecarlo::MonteCarlo;

/// Errors from loading or validating a config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScanConfig {
    /// Lookback window requested from the provider.
    pub period: Period,

    /// Entries scoring below this are left out of scan reports.
    pub min_score: f64,

    /// Pause after each symbol in a batch scan.
    pub throttle_ms: u64,

    /// Entries kept per sector in a sector scan.
    pub top_per_sector: usize,

    pub simulation: SimulationConfig,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            period: Period::SixMonths,
            min_score: 10.0,
            throttle_ms: 100,
            top_per_sector: 10,
            simulation: SimulationConfig::default(),
        }
    }
}

/// Monte Carlo projection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Attach a projection to single-symbol analyses.
    pub enabled: bool,
    pub days: usize,
    pub paths: usize,
    /// Master seed; each symbol derives its own stream from it.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            days: 30,
            paths: 1000,
            seed: 42,
        }
    }
}

impl SimulationConfig {
    pub fn monte_carlo(&self) -> MonteCarlo {
        MonteCarlo::new(self.days, self.paths)
    }
}

impl ScanConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: ScanConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.min_score.is_finite() || !(0.0..=100.0).contains(&self.min_score) {
            return Err(ConfigError::Invalid(format!(
                "min_score must be within [0, 100], got {}",
                self.min_score
            )));
        }
        if self.top_per_sector == 0 {
            return Err(ConfigError::Invalid("top_per_sector must be >= 1".into()));
        }
        if self.simulation.paths == 0 {
            return Err(ConfigError::Invalid("simulation.paths must be >= 1".into()));
        }
        Ok(())
    }

    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }
}
