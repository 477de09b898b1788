//! Metric function settings.

use serde::{Deserialize, Serialize};

use crate::metric::{DEFAULT_ITERATIONS, MonteCarloConfig};

/// Monte Carlo metric settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricSettings {
    /// Draws per portfolio.
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Parent seed for reproducible runs.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for MetricSettings {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            seed: None,
        }
    }
}

impl From<MetricSettings> for MonteCarloConfig {
    fn from(settings: MetricSettings) -> Self {
        Self {
            iterations: settings.iterations,
            seed: settings.seed,
        }
    }
}

const fn default_iterations() -> u32 {
    DEFAULT_ITERATIONS
}
