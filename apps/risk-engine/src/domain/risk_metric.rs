//! Risk metric value object.

use std::fmt;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Number of fractional digits kept in a metric.
pub const METRIC_SCALE: u32 = 4;

/// Result of the risk metric function for one portfolio.
///
/// Finite results are stored as a [`Decimal`] rounded half-up to
/// [`METRIC_SCALE`] fractional digits. Non-finite inputs (NaN or infinite
/// notional, return or volatility) are not rejected: they propagate into a
/// [`RiskMetric::Raw`] value carrying the unrounded float, as does any result
/// too large for a `Decimal`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RiskMetric {
    /// Fixed-point metric with exactly [`METRIC_SCALE`] fractional digits.
    Decimal(Decimal),
    /// Raw value with no fixed-point representation (NaN, infinity, overflow).
    Raw(f64),
}

impl RiskMetric {
    /// Zero metric.
    pub const ZERO: Self = Self::Decimal(Decimal::ZERO);

    /// Round a raw computation result into a metric.
    #[must_use]
    pub fn from_raw(value: f64) -> Self {
        match Decimal::from_f64(value) {
            Some(decimal) => {
                let mut rounded = decimal
                    .round_dp_with_strategy(METRIC_SCALE, RoundingStrategy::MidpointAwayFromZero);
                rounded.rescale(METRIC_SCALE);
                Self::Decimal(rounded)
            }
            None => Self::Raw(value),
        }
    }

    /// The fixed-point value, if the metric has one.
    #[must_use]
    pub const fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Decimal(d) => Some(*d),
            Self::Raw(_) => None,
        }
    }

    /// The metric as a float (lossy for decimals).
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        match self {
            Self::Decimal(d) => d.to_f64().unwrap_or(f64::NAN),
            Self::Raw(v) => *v,
        }
    }

    /// Returns true unless the metric is NaN or infinite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Decimal(_) => true,
            Self::Raw(v) => v.is_finite(),
        }
    }
}

impl fmt::Display for RiskMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decimal(d) => write!(f, "{d}"),
            Self::Raw(v) => write!(f, "{v}"),
        }
    }
}
