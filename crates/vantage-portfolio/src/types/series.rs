//! Price observations and return series.

use crate::analytics::compute_returns;
use crate::error::PortfolioResult;
use crate::TRADING_DAYS_PER_YEAR;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// A single closing price observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Observation date.
    pub date: NaiveDate,
    /// Closing price.
    pub close: f64,
}

impl PricePoint {
    /// Creates a new price point.
    #[must_use]
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Ordered sequence of simple period returns (e.g. daily fractional change).
///
/// Immutable once built: the series dereferences to `[f64]` but exposes no
/// mutable access.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReturnSeries(Vec<f64>);

impl ReturnSeries {
    /// Wraps already computed period returns.
    #[must_use]
    pub fn new(returns: Vec<f64>) -> Self {
        Self(returns)
    }

    /// Derives simple returns from a price sequence.
    ///
    /// See [`compute_returns`] for the validation rules.
    pub fn from_prices(prices: &[f64]) -> PortfolioResult<Self> {
        compute_returns(prices)
    }

    /// Returns the underlying slice.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Consumes the series and returns the raw values.
    #[must_use]
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }

    /// Arithmetic mean of the period returns, `None` if empty.
    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        if self.0.is_empty() {
            None
        } else {
            Some(self.0.iter().sum::<f64>() / self.0.len() as f64)
        }
    }

    /// Sum of the period returns over the window.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Mean period return scaled by 252 trading days.
    #[must_use]
    pub fn annualized_return(&self) -> Option<f64> {
        self.mean().map(|m| m * TRADING_DAYS_PER_YEAR)
    }

    /// Population standard deviation scaled by `sqrt(252)`.
    #[must_use]
    pub fn annualized_volatility(&self) -> Option<f64> {
        let mean = self.mean()?;
        let variance =
            self.0.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / self.0.len() as f64;
        Some(variance.sqrt() * TRADING_DAYS_PER_YEAR.sqrt())
    }
}

impl Deref for ReturnSeries {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}

impl From<Vec<f64>> for ReturnSeries {
    fn from(returns: Vec<f64>) -> Self {
        Self(returns)
    }
}

impl AsRef<[f64]> for ReturnSeries {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}
