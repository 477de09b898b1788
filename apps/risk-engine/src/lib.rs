// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss,
        clippy::needless_collect,
        clippy::items_after_statements
    )
)]

//! Risk Engine - Parallel Monte Carlo Risk Metrics
//!
//! Computes a per-portfolio risk metric for a batch of portfolios and lets
//! the caller pick how the batch is executed.
//!
//! # Modules
//!
//! - **domain**: `Portfolio` input records and the fixed-point `RiskMetric`
//! - **metric**: the `MetricFunction` trait and the Monte Carlo metric
//! - **pool**: the dedicated `WorkerPool` and its lifecycle
//!   (`CREATED -> RUNNING -> DRAINING -> TERMINATED | FORCED_STOP`)
//! - **engine**: `RiskCalculator`, dispatching a batch to one of three
//!   strategies
//! - **config**: YAML configuration with environment interpolation
//! - **observability**: tracing subscriber setup and batch/pool metrics
//!
//! # Strategies
//!
//! | Strategy | Runs on |
//! |---|---|
//! | `sequential` | the calling thread |
//! | `parallel_shared` | rayon's global pool |
//! | `parallel_dedicated` | the calculator's own pool, owned and shut down with it |
//!
//! # Example
//!
//! ```rust,ignore
//! use risk_engine::{Portfolio, RiskCalculator, Strategy};
//!
//! let calculator = RiskCalculator::new()?;
//! let batch = vec![Portfolio::new("P1", 1_000_000.0, 0.08, 0.25)];
//! let metrics = calculator.run(Strategy::ParallelDedicated, &batch)?;
//! calculator.shutdown();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Configuration loading and validation.
pub mod config;

/// Input records and computed metrics.
pub mod domain;

/// Strategy dispatch over the worker pools.
pub mod engine;

/// Per-portfolio metric functions.
pub mod metric;

/// Tracing and metrics instrumentation.
pub mod observability;

/// Dedicated worker pool.
pub mod pool;

pub use config::{ConfigError, EngineConfig, load_config};
pub use domain::{Portfolio, RiskMetric};
pub use engine::{EngineError, RiskCalculator, Strategy};
pub use metric::{MetricFunction, MonteCarloConfig, MonteCarloMetric};
pub use pool::{PoolConfig, PoolError, PoolState, ShutdownOutcome, WorkerPool};
