//! Error types for worker pool operations.

use thiserror::Error;

use super::state::PoolState;

/// Errors from worker pool operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// Pool configuration is invalid.
    #[error("Invalid worker pool configuration: {message}")]
    InvalidConfig {
        /// Error message.
        message: String,
    },

    /// Thread pool initialization failed.
    #[error("Failed to initialize worker pool: {message}")]
    Build {
        /// Error message.
        message: String,
    },

    /// Submission refused because the pool is not running.
    #[error("Worker pool is not accepting tasks (state: {state})")]
    Rejected {
        /// State the pool was in.
        state: PoolState,
    },

    /// The submitted task panicked.
    #[error("Task panicked: {message}")]
    TaskPanicked {
        /// Panic payload rendered as text.
        message: String,
    },

    /// The task was discarded by a forced stop before it completed.
    #[error("Task cancelled by forced pool stop")]
    Cancelled,

    /// The waiting thread was interrupted.
    #[error("Interrupted while waiting on the worker pool")]
    Interrupted,
}
