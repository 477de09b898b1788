//! Portfolio value object.

use serde::{Deserialize, Serialize};

/// A single unit of work in a risk batch.
///
/// Immutable once constructed: fields are private and only exposed through
/// getters. Two portfolios are equal when all their fields are equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    id: String,
    notional: f64,
    expected_return: f64,
    volatility: f64,
}

impl Portfolio {
    /// Create a new portfolio record.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        notional: f64,
        expected_return: f64,
        volatility: f64,
    ) -> Self {
        Self {
            id: id.into(),
            notional,
            expected_return,
            volatility,
        }
    }

    /// Portfolio identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Notional amount.
    #[must_use]
    pub const fn notional(&self) -> f64 {
        self.notional
    }

    /// Expected return (e.g. `0.10` for 10%).
    #[must_use]
    pub const fn expected_return(&self) -> f64 {
        self.expected_return
    }

    /// Return volatility (e.g. `0.20` for 20%).
    #[must_use]
    pub const fn volatility(&self) -> f64 {
        self.volatility
    }
}
