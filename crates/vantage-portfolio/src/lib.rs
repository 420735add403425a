//! # Vantage Portfolio
//!
//! Quantitative analytics for portfolios of return series.
//!
//! This crate turns per-asset return series into risk metrics, correlation,
//! performance attribution and optimized weights.
//!
//! ## Design Philosophy
//!
//! - **Pure functions**: All calculations are stateless with explicit inputs
//! - **Fixed conventions**: 252 trading days, population moments, 95% historical VaR
//! - **Explicit degeneracy**: Zero denominators and non-convergence are reported
//!   as warnings on results, never silently replaced
//! - **Config-driven parallelism**: Optional rayon support with threshold-based switching
//!
//! ## Features
//!
//! - **Returns**: Simple period returns from prices or dated histories
//! - **Risk Metrics**: Volatility, Sharpe/Treynor/Calmar/Information ratios,
//!   VaR/CVaR, max drawdown, beta, alpha, tracking error
//! - **Correlation**: Pairwise Pearson correlation across holdings
//! - **Attribution**: Single-period Brinson allocation/selection/interaction
//! - **Optimization**: Max Sharpe, min variance, max return, risk parity and
//!   efficient frontier sampling under per-asset bounds
//!
//! ## Quick Start
//!
//! ```rust
//! use vantage_portfolio::prelude::*;
//!
//! let a = compute_returns(&[100.0, 101.0, 99.5, 102.0, 103.5]).unwrap();
//! let b = compute_returns(&[50.0, 50.4, 50.1, 50.9, 51.2]).unwrap();
//!
//! let metrics = calculate_risk_metrics(&a, &b, DEFAULT_RISK_FREE_RATE).unwrap();
//! assert!(metrics.volatility > 0.0);
//!
//! let cov = CovarianceMatrix::from_returns(&[&a, &b]).unwrap();
//! let mu = expected_returns_from_series(&[&a, &b]).unwrap();
//! let result = PortfolioOptimizer::default()
//!     .optimize(
//!         &["A", "B"],
//!         &mu,
//!         &cov,
//!         Strategy::MinVariance,
//!         &OptimizationConstraints::default(),
//!     )
//!     .unwrap();
//! assert!((result.weights.iter().sum::<f64>() - 1.0).abs() < 1e-6);
//! ```
//!
//! ## Module Overview
//!
//! - [`analytics`] - Returns, risk metrics, correlation
//! - [`contribution`] - Brinson attribution and risk contributions
//! - [`optimization`] - Strategies, constraints, optimizer, efficient frontier
//! - [`types`] - Core types (Holding, ReturnSeries, CovarianceMatrix, Config)
//!
//! ## Feature Flags
//!
//! - `parallel`: Enable rayon-based parallel processing for large inputs

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::float_cmp)]

pub mod analytics;
pub mod contribution;
pub mod error;
pub mod optimization;
pub mod types;

/// Trading days per year used to annualize means and volatilities.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Confidence level of the historical VaR and CVaR.
pub const VAR_CONFIDENCE: f64 = 0.95;

/// Tail probability `1 - VAR_CONFIDENCE`, written out to keep the VaR index exact.
pub const VAR_TAIL: f64 = 0.05;

/// Default annualized risk-free rate.
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.02;

// Re-export error types at crate root
pub use error::{PortfolioError, PortfolioResult};

// Re-export main types
pub use types::{
    AnalyticsConfig, AnalyticsWarning, CovarianceMatrix, Holding, PricePoint, ReturnSeries,
    DEFAULT_BENCHMARK_WEIGHT,
};

// Re-export analytics types and functions
pub use analytics::{
    // Correlation
    calculate_correlation_matrix,
    // Risk
    calculate_risk_metrics,
    // Returns
    compute_returns,
    correlation_matrix_dense,
    expected_returns_from_series,
    historical_var_cvar,
    // Parallel utilities
    maybe_parallel_map,
    maybe_parallel_try_map,
    max_drawdown,
    returns_from_history,
    CorrelationPair,
    RiskMetrics,
};

// Re-export contribution analysis types and functions
pub use contribution::{
    calculate_performance_attribution, risk_contributions, variance_shares, AttributionResult,
    HoldingAttribution,
};

// Re-export optimization types and functions
pub use optimization::{
    calculate_efficient_frontier, optimize_portfolio, FrontierPoint, OptimizationConstraints,
    OptimizationResult, PortfolioOptimizer, Strategy,
};

/// Prelude module for convenient imports.
///
/// ```rust
/// use vantage_portfolio::prelude::*;
/// ```
pub mod prelude {
    // Error types
    pub use crate::error::{PortfolioError, PortfolioResult};

    // Core types
    pub use crate::types::{
        AnalyticsConfig, AnalyticsWarning, CovarianceMatrix, Holding, PricePoint, ReturnSeries,
    };

    // Analytics
    pub use crate::analytics::{
        calculate_correlation_matrix, calculate_risk_metrics, compute_returns,
        expected_returns_from_series, returns_from_history, CorrelationPair, RiskMetrics,
    };

    // Contribution analysis
    pub use crate::contribution::{calculate_performance_attribution, AttributionResult};

    // Optimization
    pub use crate::optimization::{
        calculate_efficient_frontier, optimize_portfolio, FrontierPoint, OptimizationConstraints,
        OptimizationResult, PortfolioOptimizer, Strategy,
    };

    // Conventions
    pub use crate::{DEFAULT_RISK_FREE_RATE, TRADING_DAYS_PER_YEAR};
}
