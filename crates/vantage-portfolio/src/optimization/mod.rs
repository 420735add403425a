//! Mean-variance portfolio optimization.
//!
//! - [`Strategy`]: Max Sharpe, min variance, max return, risk parity
//! - [`OptimizationConstraints`]: Per-asset bounds plus advisory limits
//! - [`PortfolioOptimizer`]: Weights for a strategy and frontier sampling
//!
//! All weights are fully invested (sum to one) and respect the per-asset
//! bounds. Constraints that admit no such portfolio are rejected with
//! [`crate::PortfolioError::InfeasibleConstraints`].

mod constraints;
mod frontier;
mod optimizer;
mod strategy;

pub use constraints::OptimizationConstraints;
pub use frontier::{calculate_efficient_frontier, FrontierPoint};
pub use optimizer::{optimize_portfolio, OptimizationResult, PortfolioOptimizer};
pub use strategy::Strategy;
