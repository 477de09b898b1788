//! Domain Layer
//!
//! Immutable value objects shared by the metric function and the
//! execution strategies:
//!
//! - [`Portfolio`]: one record of a batch (notional, expected return, volatility)
//! - [`RiskMetric`]: the fixed-point result computed for a single portfolio

mod portfolio;
mod risk_metric;

pub use portfolio::Portfolio;
pub use risk_metric::{METRIC_SCALE, RiskMetric};
