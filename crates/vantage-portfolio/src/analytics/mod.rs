//! Return-series analytics.
//!
//! This module provides the statistics computed directly from return series:
//! - Period returns from prices and dated histories
//! - Risk metrics against a benchmark (volatility, VaR/CVaR, drawdown,
//!   beta/alpha, Sharpe/Treynor/Calmar/Information ratios)
//! - Pairwise correlation across holdings
//!
//! All functions are pure - they take series and configuration as input
//! and return computed results. No caching, no I/O, no side effects.

mod correlation;
mod parallel;
mod returns;
mod risk;

pub use correlation::*;
pub use parallel::*;
pub use returns::*;
pub use risk::*;
