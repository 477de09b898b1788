//! Error types for risk batch execution.

use thiserror::Error;

use crate::pool::PoolError;

/// Errors from a risk batch.
///
/// A failing batch reports exactly one error and no partial results.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The metric function failed for one portfolio, aborting the batch.
    #[error("Risk calculation failed for portfolio '{portfolio_id}': {message}")]
    Computation {
        /// Portfolio whose computation failed first.
        portfolio_id: String,
        /// Failure message.
        message: String,
    },

    /// The caller was interrupted while waiting for the batch.
    #[error("Interrupted while awaiting batch completion")]
    Interrupted,

    /// The batch was cancelled by a forced pool stop.
    #[error("Batch cancelled before completion")]
    Cancelled,

    /// The dedicated pool could not run the batch.
    #[error("Parallel calculation failed: {0}")]
    Pool(#[from] PoolError),
}
