//! Worker pool settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::pool::{
    DEFAULT_QUEUE_CAPACITY, DEFAULT_THREAD_NAME_PREFIX, PoolConfig, SaturationPolicy,
    logical_processors,
};

/// Worker pool settings as written in the config file.
///
/// Zero thread counts mean "derive from the logical processor count".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSettings {
    /// Worker threads (0 = logical processors).
    #[serde(default)]
    pub core_threads: usize,
    /// Maximum threads including overflow threads (0 = same as core).
    #[serde(default)]
    pub max_threads: usize,
    /// Bounded queue capacity (None = unbounded).
    #[serde(default)]
    pub queue_capacity: Option<usize>,
    /// Saturation policy for a full queue.
    #[serde(default)]
    pub saturation: SaturationPolicy,
    /// Worker thread name prefix.
    #[serde(default = "default_thread_name_prefix")]
    pub thread_name_prefix: String,
    /// Shutdown grace period in seconds.
    #[serde(default = "default_shutdown_grace_secs")]
    pub shutdown_grace_secs: u64,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            core_threads: 0,
            max_threads: 0,
            queue_capacity: None,
            saturation: SaturationPolicy::CallerRuns,
            thread_name_prefix: default_thread_name_prefix(),
            shutdown_grace_secs: default_shutdown_grace_secs(),
        }
    }
}

impl PoolSettings {
    /// Settings matching the general task executor: core = processors,
    /// max = 2x processors, queue of 1000, caller-runs.
    #[must_use]
    pub fn task_executor() -> Self {
        let cpus = logical_processors();
        Self {
            core_threads: cpus,
            max_threads: cpus * 2,
            queue_capacity: Some(DEFAULT_QUEUE_CAPACITY),
            ..Self::default()
        }
    }

    /// Resolve zero thread counts against the processor count.
    #[must_use]
    pub fn to_pool_config(&self) -> PoolConfig {
        let core_threads = if self.core_threads == 0 {
            logical_processors()
        } else {
            self.core_threads
        };
        let max_threads = if self.max_threads == 0 {
            core_threads
        } else {
            self.max_threads
        };

        PoolConfig {
            core_threads,
            max_threads,
            queue_capacity: self.queue_capacity,
            saturation: self.saturation,
            thread_name_prefix: self.thread_name_prefix.clone(),
            shutdown_grace: Duration::from_secs(self.shutdown_grace_secs),
        }
    }
}

fn default_thread_name_prefix() -> String {
    DEFAULT_THREAD_NAME_PREFIX.to_string()
}

const fn default_shutdown_grace_secs() -> u64 {
    60
}
