//! Domain types for portfolio analytics.
//!
//! - [`ReturnSeries`] / [`PricePoint`]: Inputs derived from price histories
//! - [`Holding`]: A symbol with its weight and return series
//! - [`CovarianceMatrix`]: Validated square, symmetric covariance input
//! - [`AnalyticsWarning`]: Non-fatal conditions attached to results
//! - [`AnalyticsConfig`]: Configuration for analytics computation

mod config;
mod covariance;
mod holding;
mod series;
mod warning;

pub use config::{AnalyticsConfig, DEFAULT_BENCHMARK_WEIGHT};
pub use covariance::CovarianceMatrix;
pub use holding::Holding;
pub use series::{PricePoint, ReturnSeries};
pub use warning::AnalyticsWarning;

pub(crate) use warning::{guarded_ratio, sentinel_ratio};
