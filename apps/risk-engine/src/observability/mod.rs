//! Observability module for logging and metrics.
//!
//! Logging goes through `tracing`; counters and histograms go through the
//! `metrics` facade, so the hosting process decides which recorder (if any)
//! to install.

mod metrics;
mod tracing;

pub use self::metrics::{record_batch, record_caller_runs, record_pool_state, record_shutdown};
pub use self::tracing::{TracingInitError, init_tracing};
