//! Period returns from price sequences.

use crate::error::{PortfolioError, PortfolioResult};
use crate::types::{PricePoint, ReturnSeries};
use crate::TRADING_DAYS_PER_YEAR;

/// Computes simple period returns `r[i-1] = (p[i] - p[i-1]) / p[i-1]`.
///
/// The output has exactly `prices.len() - 1` elements.
///
/// # Errors
///
/// - `InsufficientData` if fewer than two prices are supplied.
/// - `InvalidInput` if any price is zero, negative or non-finite.
///
/// # Example
///
/// ```rust
/// use vantage_portfolio::compute_returns;
///
/// let returns = compute_returns(&[100.0, 110.0, 99.0]).unwrap();
/// assert!((returns[0] - 0.10).abs() < 1e-12);
/// assert!((returns[1] + 0.10).abs() < 1e-12);
/// ```
pub fn compute_returns(prices: &[f64]) -> PortfolioResult<ReturnSeries> {
    if prices.len() < 2 {
        return Err(PortfolioError::insufficient_data(2, prices.len()));
    }

    if let Some((i, p)) = prices
        .iter()
        .enumerate()
        .find(|(_, p)| !p.is_finite() || **p <= 0.0)
    {
        return Err(PortfolioError::invalid_input(format!(
            "price at index {i} must be positive and finite, got {p}"
        )));
    }

    let returns = prices.windows(2).map(|w| (w[1] - w[0]) / w[0]).collect();
    Ok(ReturnSeries::new(returns))
}

/// Computes period returns from a dated price history.
///
/// Dates must be strictly increasing; the closes are then passed to
/// [`compute_returns`].
pub fn returns_from_history(history: &[PricePoint]) -> PortfolioResult<ReturnSeries> {
    if let Some(w) = history.windows(2).find(|w| w[1].date <= w[0].date) {
        return Err(PortfolioError::invalid_input(format!(
            "price history must be in strictly increasing date order ({} then {})",
            w[0].date, w[1].date
        )));
    }

    let closes: Vec<f64> = history.iter().map(|p| p.close).collect();
    compute_returns(&closes)
}

/// Annualized mean return of each series, for use as optimizer input.
///
/// # Errors
///
/// `InsufficientData` if any series is empty.
pub fn expected_returns_from_series<S: AsRef<[f64]>>(series: &[S]) -> PortfolioResult<Vec<f64>> {
    series
        .iter()
        .map(|s| {
            let s = s.as_ref();
            if s.is_empty() {
                return Err(PortfolioError::insufficient_data(1, 0));
            }
            Ok(s.iter().sum::<f64>() / s.len() as f64 * TRADING_DAYS_PER_YEAR)
        })
        .collect()
}
