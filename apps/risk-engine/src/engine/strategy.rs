//! Execution strategies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How a batch is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Strategy {
    /// One portfolio at a time on the calling thread.
    Sequential,
    /// Data-parallel map over the process-wide rayon pool.
    #[default]
    ParallelShared,
    /// Data-parallel map on the calculator's own worker pool.
    ParallelDedicated,
}

impl Strategy {
    /// All strategies, in benchmark order.
    pub const ALL: [Self; 3] = [Self::Sequential, Self::ParallelShared, Self::ParallelDedicated];

    /// Stable name used in logs, metrics and the CLI.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sequential => "SEQUENTIAL",
            Self::ParallelShared => "PARALLEL_SHARED",
            Self::ParallelDedicated => "PARALLEL_DEDICATED",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognised strategy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown strategy '{0}' (expected sequential, shared or dedicated)")]
pub struct ParseStrategyError(String);

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "sequential" => Ok(Self::Sequential),
            "shared" | "parallel" | "parallel_shared" => Ok(Self::ParallelShared),
            "dedicated" | "custom" | "parallel_dedicated" => Ok(Self::ParallelDedicated),
            _ => Err(ParseStrategyError(s.to_string())),
        }
    }
}
