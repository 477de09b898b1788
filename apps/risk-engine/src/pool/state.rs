//! Worker pool lifecycle states.
//!
//! ```text
//! CREATED → RUNNING → DRAINING → TERMINATED
//!                         ↓
//!                    FORCED_STOP (grace period elapsed or interrupted)
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a worker pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PoolState {
    /// Threads built, not yet accepting work.
    Created,
    /// Accepting submissions.
    Running,
    /// No new submissions; queued and in-flight tasks are finishing.
    Draining,
    /// All work finished within the grace period.
    Terminated,
    /// Remaining work was cancelled.
    ForcedStop,
}

impl PoolState {
    /// Returns true once the pool can never run work again.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminated | Self::ForcedStop)
    }

    /// Whether `next` is a legal successor of `self`.
    #[must_use]
    pub const fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Created, Self::Running)
                | (Self::Running, Self::Draining)
                | (Self::Draining, Self::Terminated)
                | (Self::Running | Self::Draining, Self::ForcedStop)
        )
    }
}

impl fmt::Display for PoolState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "CREATED"),
            Self::Running => write!(f, "RUNNING"),
            Self::Draining => write!(f, "DRAINING"),
            Self::Terminated => write!(f, "TERMINATED"),
            Self::ForcedStop => write!(f, "FORCED_STOP"),
        }
    }
}

/// Why a pool was force-stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StopReason {
    /// The shutdown grace period elapsed with work still pending.
    Timeout,
    /// A waiting thread was interrupted.
    Interrupted,
}

/// Result of [`WorkerPool::shutdown`](super::WorkerPool::shutdown).
///
/// Draining never raises: a slow or interrupted drain is reported here and
/// the remaining work is cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShutdownOutcome {
    /// Every task completed within the grace period.
    Terminated,
    /// Remaining work was cancelled.
    ForcedStop(StopReason),
}

impl ShutdownOutcome {
    /// Label used in logs and metrics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Terminated => "terminated",
            Self::ForcedStop(StopReason::Timeout) => "forced_timeout",
            Self::ForcedStop(StopReason::Interrupted) => "forced_interrupted",
        }
    }
}
