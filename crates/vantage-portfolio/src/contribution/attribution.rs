//! Single-period Brinson attribution.
//!
//! Decomposes active return into allocation, selection and interaction:
//! - Allocation = Σ (w_h - w_b) × (R_h - R_b)
//! - Selection = Σ w_b × (R_h - R_s)
//! - Interaction = Σ (w_h - w_b) × (R_h - R_s)
//!
//! `w_b` is the flat benchmark weight from [`AnalyticsConfig`]. Holding
//! returns are summed over the window. No sector series are supplied, so the
//! sector benchmark return `R_s` equals the summed benchmark return `R_b`.

use crate::error::{PortfolioError, PortfolioResult};
use crate::types::{AnalyticsConfig, Holding};
use serde::{Deserialize, Serialize};

/// Attribution effects for a single holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingAttribution {
    /// Holding symbol.
    pub symbol: String,

    /// Portfolio weight as supplied.
    pub weight: f64,

    /// Summed return of the holding over the window.
    pub holding_return: f64,

    /// Allocation effect.
    pub allocation: f64,

    /// Selection effect.
    pub selection: f64,

    /// Interaction effect.
    pub interaction: f64,
}

impl HoldingAttribution {
    /// Sum of the three effects.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.allocation + self.selection + self.interaction
    }
}

/// Portfolio-level Brinson attribution.
///
/// `total_attribution` is computed as
/// `asset_allocation + security_selection + interaction`, so the identity
/// holds exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributionResult {
    /// Total allocation effect.
    pub asset_allocation: f64,

    /// Total selection effect.
    pub security_selection: f64,

    /// Total interaction effect.
    pub interaction: f64,

    /// Sum of the three effects.
    pub total_attribution: f64,

    /// Summed portfolio return over the window.
    pub portfolio_return: f64,

    /// Summed benchmark return over the window.
    pub benchmark_return: f64,

    /// `portfolio_return - benchmark_return`.
    pub active_return: f64,

    /// Effects by holding, in input order.
    pub by_holding: Vec<HoldingAttribution>,
}

/// Computes a single-period Brinson attribution.
///
/// # Arguments
///
/// * `portfolio_returns` - Portfolio period returns over the window
/// * `benchmark_returns` - Benchmark period returns, same length
/// * `holdings` - Holdings with weights and return series
/// * `config` - Supplies the flat benchmark weight
///
/// # Errors
///
/// `InsufficientData` if the portfolio series is empty, `LengthMismatch` if
/// the benchmark series differs in length, `InvalidInput` for non-finite
/// returns or weights.
///
/// # Example
///
/// ```rust
/// use vantage_portfolio::{calculate_performance_attribution, AnalyticsConfig, Holding};
///
/// let holdings = vec![
///     Holding::new("AAA", 0.6, vec![0.02, 0.01]),
///     Holding::new("BBB", 0.4, vec![-0.01, 0.005]),
/// ];
/// let result = calculate_performance_attribution(
///     &[0.008, 0.008],
///     &[0.005, 0.004],
///     &holdings,
///     &AnalyticsConfig::default(),
/// )
/// .unwrap();
///
/// let sum = result.asset_allocation + result.security_selection + result.interaction;
/// assert!((result.total_attribution - sum).abs() < 1e-12);
/// ```
pub fn calculate_performance_attribution(
    portfolio_returns: &[f64],
    benchmark_returns: &[f64],
    holdings: &[Holding],
    config: &AnalyticsConfig,
) -> PortfolioResult<AttributionResult> {
    if portfolio_returns.is_empty() {
        return Err(PortfolioError::insufficient_data(1, 0));
    }
    if portfolio_returns.len() != benchmark_returns.len() {
        return Err(PortfolioError::length_mismatch(
            "benchmark returns",
            portfolio_returns.len(),
            benchmark_returns.len(),
        ));
    }
    if portfolio_returns
        .iter()
        .chain(benchmark_returns)
        .any(|r| !r.is_finite())
    {
        return Err(PortfolioError::invalid_input(
            "return series contain non-finite values",
        ));
    }
    if !config.benchmark_weight.is_finite() {
        return Err(PortfolioError::invalid_input(
            "benchmark weight must be finite",
        ));
    }

    let portfolio_return: f64 = portfolio_returns.iter().sum();
    let benchmark_return: f64 = benchmark_returns.iter().sum();
    let sector_benchmark_return = benchmark_return;
    let benchmark_weight = config.benchmark_weight;

    let mut by_holding = Vec::with_capacity(holdings.len());
    for h in holdings {
        if !h.weight.is_finite() || h.returns.iter().any(|r| !r.is_finite()) {
            return Err(PortfolioError::invalid_input(format!(
                "holding {} has a non-finite weight or return",
                h.symbol
            )));
        }

        let holding_return = h.total_return();
        let active_weight = h.weight - benchmark_weight;

        by_holding.push(HoldingAttribution {
            symbol: h.symbol.clone(),
            weight: h.weight,
            holding_return,
            allocation: active_weight * (holding_return - benchmark_return),
            selection: benchmark_weight * (holding_return - sector_benchmark_return),
            interaction: active_weight * (holding_return - sector_benchmark_return),
        });
    }

    let asset_allocation: f64 = by_holding.iter().map(|a| a.allocation).sum();
    let security_selection: f64 = by_holding.iter().map(|a| a.selection).sum();
    let interaction: f64 = by_holding.iter().map(|a| a.interaction).sum();

    Ok(AttributionResult {
        asset_allocation,
        security_selection,
        interaction,
        total_attribution: asset_allocation + security_selection + interaction,
        portfolio_return,
        benchmark_return,
        active_return: portfolio_return - benchmark_return,
        by_holding,
    })
}
