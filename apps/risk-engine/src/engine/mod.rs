//! Risk batch execution.
//!
//! [`RiskCalculator`] computes one [`RiskMetric`](crate::domain::RiskMetric)
//! per [`Portfolio`](crate::domain::Portfolio) using one of three strategies:
//!
//! - [`Strategy::Sequential`]: calling thread, input order, no pool
//! - [`Strategy::ParallelShared`]: rayon's global work-stealing pool
//! - [`Strategy::ParallelDedicated`]: the calculator's own [`WorkerPool`](crate::pool::WorkerPool)
//!
//! All three return metrics in input order, or a single error and nothing else.
//!
//! # Example
//!
//! ```ignore
//! use risk_engine::{Portfolio, RiskCalculator};
//!
//! let calculator = RiskCalculator::new()?;
//! let batch = vec![Portfolio::new("P1", 1_000_000.0, 0.10, 0.20)];
//!
//! let metrics = calculator.run_parallel_dedicated(&batch)?;
//! calculator.shutdown();
//! ```

mod calculator;
mod error;
mod strategy;

pub use calculator::RiskCalculator;
pub use error::EngineError;
pub use strategy::{ParseStrategyError, Strategy};
