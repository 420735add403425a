//! Holding representation.

use super::{PricePoint, ReturnSeries};
use crate::analytics::returns_from_history;
use crate::error::PortfolioResult;
use serde::{Deserialize, Serialize};

/// A single position: a symbol, its portfolio weight and its return series.
///
/// Weights are used exactly as given. Nothing in this crate renormalizes a
/// holding set so that weights sum to one; callers own that step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Ticker or other identifier.
    pub symbol: String,

    /// Portfolio weight (fraction, typically in `[0, 1]`).
    pub weight: f64,

    /// Period returns aligned with the rest of the holding set.
    pub returns: ReturnSeries,

    /// Price history the returns were derived from, if known.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub price_history: Vec<PricePoint>,
}

impl Holding {
    /// Creates a holding from an existing return series.
    #[must_use]
    pub fn new(symbol: impl Into<String>, weight: f64, returns: impl Into<ReturnSeries>) -> Self {
        Self {
            symbol: symbol.into(),
            weight,
            returns: returns.into(),
            price_history: Vec::new(),
        }
    }

    /// Creates a holding whose returns are derived from a dated price history.
    ///
    /// The history must be in strictly increasing date order with positive
    /// closes; see [`returns_from_history`].
    pub fn from_price_history(
        symbol: impl Into<String>,
        weight: f64,
        price_history: Vec<PricePoint>,
    ) -> PortfolioResult<Self> {
        let returns = returns_from_history(&price_history)?;
        Ok(Self {
            symbol: symbol.into(),
            weight,
            returns,
            price_history,
        })
    }

    /// Sum of the holding's period returns over the window.
    #[must_use]
    pub fn total_return(&self) -> f64 {
        self.returns.total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_new() {
        let h = Holding::new("AAPL", 0.25, vec![0.01, 0.02]);
        assert_eq!(h.symbol, "AAPL");
        assert_relative_eq!(h.weight, 0.25);
        assert_eq!(h.returns.len(), 2);
        assert!(h.price_history.is_empty());
        assert_relative_eq!(h.total_return(), 0.03);
    }

    #[test]
    fn test_from_price_history() {
        let history = vec![
            PricePoint::new(day(2), 100.0),
            PricePoint::new(day(3), 110.0),
            PricePoint::new(day(4), 99.0),
        ];

        let h = Holding::from_price_history("MSFT", 0.5, history).unwrap();

        assert_eq!(h.returns.len(), 2);
        assert_relative_eq!(h.returns[0], 0.10, epsilon = 1e-12);
        assert_relative_eq!(h.returns[1], -0.10, epsilon = 1e-12);
        assert_eq!(h.price_history.len(), 3);
    }

    #[test]
    fn test_from_unordered_history_fails() {
        let history = vec![
            PricePoint::new(day(3), 100.0),
            PricePoint::new(day(2), 110.0),
        ];

        let err = Holding::from_price_history("MSFT", 0.5, history).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_serde_skips_empty_history() {
        let h = Holding::new("AAPL", 0.25, vec![0.01]);
        let json = serde_json::to_string(&h).unwrap();
        assert!(!json.contains("price_history"));

        let parsed: Holding = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, h);
    }
}
