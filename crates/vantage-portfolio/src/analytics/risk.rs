//! Return-based risk metrics against a benchmark.
//!
//! All moments are population moments of the period returns. Annualization
//! follows the fixed 252 trading-day convention: means scale by 252,
//! standard deviations by `sqrt(252)`.

use crate::error::{PortfolioError, PortfolioResult};
use crate::types::{guarded_ratio, AnalyticsWarning};
use crate::{TRADING_DAYS_PER_YEAR, VAR_TAIL};
use serde::{Deserialize, Serialize};
use vantage_math::statistics::{covariance, mean, population_variance, sorted_ascending};

/// Risk and performance metrics for one return series against a benchmark.
///
/// Ratios whose denominator is exactly zero hold `+inf`, `-inf` or `NaN` and
/// are listed in [`RiskMetrics::warnings`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Number of observations.
    pub observations: usize,

    /// Annualized mean return.
    pub mean_return: f64,

    /// Annualized volatility.
    pub volatility: f64,

    /// Annualized benchmark volatility.
    pub benchmark_volatility: f64,

    /// `(annualized mean - rf) / volatility`.
    pub sharpe_ratio: f64,

    /// Historical 95% Value at Risk, as a positive loss.
    pub var_95: f64,

    /// Mean of the returns at or below the VaR observation, as a positive loss.
    pub cvar_95: f64,

    /// Largest peak-to-trough decline of the compounded return path.
    pub max_drawdown: f64,

    /// Regression slope against the benchmark.
    pub beta: f64,

    /// Jensen's alpha (annualized).
    pub alpha: f64,

    /// Annualized root-mean-square active return.
    pub tracking_error: f64,

    /// Annualized active return over tracking error.
    pub information_ratio: f64,

    /// Excess return over beta.
    pub treynor_ratio: f64,

    /// Annualized return over maximum drawdown.
    pub calmar_ratio: f64,

    /// Zero-denominator conditions met while computing the ratios.
    pub warnings: Vec<AnalyticsWarning>,
}

impl RiskMetrics {
    /// Returns true if any ratio hit a zero denominator.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Computes the full risk metric set for `returns` against `benchmark_returns`.
///
/// # Arguments
///
/// * `returns` - Portfolio or asset period returns
/// * `benchmark_returns` - Benchmark period returns, same length
/// * `risk_free_rate` - Annualized risk-free rate (see [`crate::DEFAULT_RISK_FREE_RATE`])
///
/// # Errors
///
/// `InsufficientData` if either series has fewer than two observations,
/// `LengthMismatch` if the lengths differ, `InvalidInput` for non-finite values.
///
/// # Example
///
/// ```rust
/// use vantage_portfolio::{calculate_risk_metrics, DEFAULT_RISK_FREE_RATE};
///
/// let returns = [0.01, -0.02, 0.015, 0.003, -0.007];
/// let benchmark = [0.008, -0.015, 0.01, 0.002, -0.004];
///
/// let metrics = calculate_risk_metrics(&returns, &benchmark, DEFAULT_RISK_FREE_RATE).unwrap();
/// assert!(metrics.volatility > 0.0);
/// assert!(metrics.max_drawdown >= 0.0);
/// ```
pub fn calculate_risk_metrics(
    returns: &[f64],
    benchmark_returns: &[f64],
    risk_free_rate: f64,
) -> PortfolioResult<RiskMetrics> {
    validate_pair(returns, benchmark_returns)?;
    if !risk_free_rate.is_finite() {
        return Err(PortfolioError::invalid_input("risk-free rate must be finite"));
    }

    let n = returns.len();
    let annualization = TRADING_DAYS_PER_YEAR.sqrt();
    let mut warnings = Vec::new();

    let period_mean = mean(returns)?;
    let variance = population_variance(returns)?;
    let bench_mean = mean(benchmark_returns)?;
    let bench_variance = population_variance(benchmark_returns)?;

    let mean_return = period_mean * TRADING_DAYS_PER_YEAR;
    let bench_return = bench_mean * TRADING_DAYS_PER_YEAR;
    let volatility = variance.sqrt() * annualization;
    let benchmark_volatility = bench_variance.sqrt() * annualization;

    let sharpe_ratio = guarded_ratio(
        mean_return - risk_free_rate,
        volatility,
        "sharpe_ratio",
        &mut warnings,
    );

    let (var_95, cvar_95) = historical_var_cvar(returns);
    let max_drawdown = max_drawdown(returns);

    let beta = guarded_ratio(
        covariance(returns, benchmark_returns)?,
        bench_variance,
        "beta",
        &mut warnings,
    );
    let alpha = mean_return - (risk_free_rate + beta * (bench_return - risk_free_rate));

    let active_sq: f64 = returns
        .iter()
        .zip(benchmark_returns)
        .map(|(r, b)| (r - b).powi(2))
        .sum::<f64>()
        / n as f64;
    let tracking_error = active_sq.sqrt() * annualization;
    let information_ratio = guarded_ratio(
        mean_return - bench_return,
        tracking_error,
        "information_ratio",
        &mut warnings,
    );

    let treynor_ratio = guarded_ratio(
        mean_return - risk_free_rate,
        beta,
        "treynor_ratio",
        &mut warnings,
    );
    let calmar_ratio = guarded_ratio(mean_return, max_drawdown, "calmar_ratio", &mut warnings);

    Ok(RiskMetrics {
        observations: n,
        mean_return,
        volatility,
        benchmark_volatility,
        sharpe_ratio,
        var_95,
        cvar_95,
        max_drawdown,
        beta,
        alpha,
        tracking_error,
        information_ratio,
        treynor_ratio,
        calmar_ratio,
        warnings,
    })
}

fn validate_pair(returns: &[f64], benchmark_returns: &[f64]) -> PortfolioResult<()> {
    if returns.len() < 2 {
        return Err(PortfolioError::insufficient_data(2, returns.len()));
    }
    if benchmark_returns.len() < 2 {
        return Err(PortfolioError::insufficient_data(
            2,
            benchmark_returns.len(),
        ));
    }
    if returns.len() != benchmark_returns.len() {
        return Err(PortfolioError::length_mismatch(
            "benchmark returns",
            returns.len(),
            benchmark_returns.len(),
        ));
    }
    if returns
        .iter()
        .chain(benchmark_returns)
        .any(|r| !r.is_finite())
    {
        return Err(PortfolioError::invalid_input(
            "return series contain non-finite values",
        ));
    }
    Ok(())
}

/// Historical VaR and CVaR at the 95% level, both expressed as positive losses.
///
/// VaR is the sorted return at index `floor(0.05 * n)`; CVaR averages the
/// returns up to and including that index.
pub fn historical_var_cvar(returns: &[f64]) -> (f64, f64) {
    if returns.is_empty() {
        return (0.0, 0.0);
    }

    let sorted = sorted_ascending(returns);
    let index = ((VAR_TAIL * sorted.len() as f64).floor() as usize).min(sorted.len() - 1);

    let tail = &sorted[..=index];
    let tail_mean = tail.iter().sum::<f64>() / tail.len() as f64;

    (-sorted[index], -tail_mean)
}

/// Maximum drawdown of the compounded return path.
///
/// The path starts at 1.0, which counts as the initial peak.
pub fn max_drawdown(returns: &[f64]) -> f64 {
    let mut cumulative = 1.0_f64;
    let mut peak = 1.0_f64;
    let mut worst = 0.0_f64;

    for r in returns {
        cumulative *= 1.0 + r;
        if cumulative > peak {
            peak = cumulative;
        }
        let drawdown = (peak - cumulative) / peak;
        if drawdown > worst {
            worst = drawdown;
        }
    }

    worst
}
