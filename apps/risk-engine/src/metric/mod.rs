//! Risk metric functions.
//!
//! A [`MetricFunction`] maps one [`Portfolio`] to one [`RiskMetric`] without
//! touching shared mutable state, which makes it the unit of parallel work
//! for every execution strategy.

mod monte_carlo;

pub use monte_carlo::{DEFAULT_ITERATIONS, MonteCarloConfig, MonteCarloMetric};

use crate::domain::{Portfolio, RiskMetric};

/// Per-portfolio metric computation.
///
/// Implementations must be safe to call concurrently from many worker
/// threads. Any randomness has to come from a generator owned by the call
/// (or by the current thread), never from one shared across calls.
pub trait MetricFunction: Send + Sync {
    /// Compute the metric for a single portfolio.
    fn compute(&self, portfolio: &Portfolio) -> RiskMetric;
}

impl<F> MetricFunction for F
where
    F: Fn(&Portfolio) -> RiskMetric + Send + Sync,
{
    fn compute(&self, portfolio: &Portfolio) -> RiskMetric {
        self(portfolio)
    }
}
