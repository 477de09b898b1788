//! Configuration for worker pools.

use std::num::NonZeroUsize;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::PoolError;

/// Default drain wait before a pool is force-stopped.
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(60);

/// Default queue bound for the task-executor preset.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1000;

/// Default worker thread name prefix.
pub const DEFAULT_THREAD_NAME_PREFIX: &str = "risk-calc-";

/// What a submission does when the bounded queue is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SaturationPolicy {
    /// The submitting thread runs the task itself.
    #[default]
    CallerRuns,
}

/// Configuration for a [`WorkerPool`](super::WorkerPool).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Number of work-stealing worker threads.
    pub core_threads: usize,
    /// Upper bound on threads; anything above `core_threads` is used for
    /// overflow threads once the queue is full.
    pub max_threads: usize,
    /// Bound on submitted-but-not-started tasks (None = unbounded).
    pub queue_capacity: Option<usize>,
    /// Behaviour when the queue is full and no overflow thread is left.
    pub saturation: SaturationPolicy,
    /// Worker thread name prefix.
    pub thread_name_prefix: String,
    /// How long shutdown waits for pending work.
    pub shutdown_grace: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::dedicated()
    }
}

impl PoolConfig {
    /// Dedicated pool: one thread per logical processor, unbounded queue.
    ///
    /// With no queue bound there is no caller-runs degradation; backpressure
    /// is limited only by memory.
    #[must_use]
    pub fn dedicated() -> Self {
        let cpus = logical_processors();
        Self {
            core_threads: cpus,
            max_threads: cpus,
            queue_capacity: None,
            saturation: SaturationPolicy::CallerRuns,
            thread_name_prefix: DEFAULT_THREAD_NAME_PREFIX.to_string(),
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
        }
    }

    /// General task executor: core = processors, max = 2x processors,
    /// queue of 1000, caller-runs on saturation.
    #[must_use]
    pub fn task_executor() -> Self {
        let cpus = logical_processors();
        Self {
            core_threads: cpus,
            max_threads: cpus * 2,
            queue_capacity: Some(DEFAULT_QUEUE_CAPACITY),
            ..Self::dedicated()
        }
    }

    /// Number of overflow threads allowed beyond the core workers.
    #[must_use]
    pub const fn overflow_threads(&self) -> usize {
        self.max_threads.saturating_sub(self.core_threads)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns error if thread counts, queue capacity or grace period are unusable.
    pub fn validate(&self) -> Result<(), PoolError> {
        if self.core_threads == 0 {
            return Err(invalid("core_threads must be positive"));
        }
        if self.max_threads < self.core_threads {
            return Err(invalid("max_threads must be >= core_threads"));
        }
        if self.queue_capacity == Some(0) {
            return Err(invalid("queue_capacity must be positive when set"));
        }
        if self.shutdown_grace.is_zero() {
            return Err(invalid("shutdown_grace must be positive"));
        }
        Ok(())
    }
}

fn invalid(message: &str) -> PoolError {
    PoolError::InvalidConfig {
        message: message.to_string(),
    }
}

/// Logical processors visible to this process (at least 1).
#[must_use]
pub fn logical_processors() -> usize {
    std::thread::available_parallelism().map_or(1, NonZeroUsize::get)
}
