//! Pairwise Pearson correlation across holdings.

use super::parallel::maybe_parallel_try_map;
use crate::error::{PortfolioError, PortfolioResult};
use crate::types::{AnalyticsConfig, Holding};
use serde::{Deserialize, Serialize};
use vantage_math::statistics::{pearson_correlation, population_variance};

/// Correlation between two holdings' return series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationPair {
    /// Symbol of the first holding (lower index).
    pub asset_a: String,

    /// Symbol of the second holding (higher index).
    pub asset_b: String,

    /// Pearson correlation in `[-1, 1]`, or `None` when either series has
    /// zero variance and the correlation is undefined.
    pub correlation: Option<f64>,
}

impl CorrelationPair {
    /// Returns true if the correlation is defined.
    #[must_use]
    pub fn is_defined(&self) -> bool {
        self.correlation.is_some()
    }
}

/// Computes the correlation of every unordered pair of holdings.
///
/// Pairs are emitted in the order `(0,1), (0,2), ..., (0,n-1), (1,2), ...`,
/// giving `n(n-1)/2` entries with no self-pairs. Fewer than two holdings
/// yields an empty list.
///
/// # Errors
///
/// `LengthMismatch` if the return series differ in length,
/// `InsufficientData` if they hold fewer than two observations,
/// `InvalidInput` for non-finite returns.
///
/// # Example
///
/// ```rust
/// use vantage_portfolio::{calculate_correlation_matrix, AnalyticsConfig, Holding};
///
/// let holdings = vec![
///     Holding::new("AAA", 0.5, vec![0.01, -0.02, 0.03]),
///     Holding::new("BBB", 0.5, vec![-0.01, 0.02, -0.03]),
/// ];
///
/// let pairs = calculate_correlation_matrix(&holdings, &AnalyticsConfig::default()).unwrap();
/// assert_eq!(pairs.len(), 1);
/// assert!((pairs[0].correlation.unwrap() + 1.0).abs() < 1e-12);
/// ```
pub fn calculate_correlation_matrix(
    holdings: &[Holding],
    config: &AnalyticsConfig,
) -> PortfolioResult<Vec<CorrelationPair>> {
    if holdings.len() < 2 {
        return Ok(Vec::new());
    }
    validate_series(holdings)?;

    let n = holdings.len();
    let pairs: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .collect();

    maybe_parallel_try_map(&pairs, config, |&(i, j)| {
        let correlation = pearson_correlation(&holdings[i].returns, &holdings[j].returns)?;
        Ok(CorrelationPair {
            asset_a: holdings[i].symbol.clone(),
            asset_b: holdings[j].symbol.clone(),
            correlation,
        })
    })
}

/// Computes the full symmetric N x N correlation matrix.
///
/// Entry `(i, j)` for `i != j` matches the corresponding
/// [`CorrelationPair`]. The diagonal is `Some(1.0)` unless the series has
/// zero variance, in which case it is `None` as well.
///
/// # Errors
///
/// Same as [`calculate_correlation_matrix`].
pub fn correlation_matrix_dense(
    holdings: &[Holding],
    config: &AnalyticsConfig,
) -> PortfolioResult<Vec<Vec<Option<f64>>>> {
    let n = holdings.len();
    if n == 0 {
        return Ok(Vec::new());
    }
    validate_series(holdings)?;

    let mut matrix = vec![vec![None; n]; n];
    for (i, row) in matrix.iter_mut().enumerate() {
        if population_variance(&holdings[i].returns)? > 0.0 {
            row[i] = Some(1.0);
        }
    }

    let pairs = calculate_correlation_matrix(holdings, config)?;
    let mut it = pairs.into_iter();
    for i in 0..n {
        for j in (i + 1)..n {
            let c = it.next().and_then(|p| p.correlation);
            matrix[i][j] = c;
            matrix[j][i] = c;
        }
    }

    Ok(matrix)
}

fn validate_series(holdings: &[Holding]) -> PortfolioResult<()> {
    let len = holdings[0].returns.len();
    if len < 2 {
        return Err(PortfolioError::insufficient_data(2, len));
    }
    for h in holdings {
        if h.returns.len() != len {
            return Err(PortfolioError::length_mismatch(
                format!("returns of {}", h.symbol),
                len,
                h.returns.len(),
            ));
        }
        if h.returns.iter().any(|r| !r.is_finite()) {
            return Err(PortfolioError::invalid_input(format!(
                "returns of {} contain non-finite values",
                h.symbol
            )));
        }
    }
    Ok(())
}
