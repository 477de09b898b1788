//! Worker pool with an explicit lifecycle.
//!
//! Wraps a dedicated rayon thread pool (work-stealing) with:
//! - Lifecycle states `CREATED → RUNNING → DRAINING → TERMINATED | FORCED_STOP`
//! - Optional bounded queue with overflow threads and caller-runs backpressure
//! - Bounded-wait shutdown that force-cancels work after the grace period
//! - Panic capture per task, reported through the [`TaskHandle`]
//! - Nested parallelism kept on the pool's own workers via [`TaskContext::install`]
//!
//! # Example
//!
//! ```ignore
//! use risk_engine::pool::{PoolConfig, WorkerPool};
//!
//! let pool = WorkerPool::new(PoolConfig::dedicated())?;
//! let handle = pool.submit(|task| task.install(|| expensive_parallel_work()))?;
//! let value = handle.join()?;
//!
//! pool.shutdown();
//! ```

mod config;
mod error;
mod handle;
mod state;
mod worker_pool;

pub use config::{
    DEFAULT_QUEUE_CAPACITY, DEFAULT_SHUTDOWN_GRACE, DEFAULT_THREAD_NAME_PREFIX, PoolConfig,
    SaturationPolicy, logical_processors,
};
pub use error::PoolError;
pub use handle::{CancelToken, Interrupt, TaskContext, TaskHandle, WAIT_POLL_INTERVAL};
pub use state::{PoolState, ShutdownOutcome, StopReason};
pub use worker_pool::WorkerPool;

pub(crate) use worker_pool::panic_message;
