//! Configuration for portfolio analytics computation.

use crate::DEFAULT_RISK_FREE_RATE;
use serde::{Deserialize, Serialize};
use vantage_math::optimization::OptimizationConfig;

/// Flat benchmark weight per holding used by the single-period attribution.
pub const DEFAULT_BENCHMARK_WEIGHT: f64 = 0.1;

/// Configuration for portfolio analytics computation.
///
/// Controls the risk-free rate, attribution benchmark weight, parallelism and
/// the iteration budget of the optimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Annualized risk-free rate (e.g. 0.02 for 2%).
    pub risk_free_rate: f64,

    /// Benchmark weight applied to every holding in attribution.
    pub benchmark_weight: f64,

    /// Enable parallel processing (requires 'parallel' feature).
    pub parallel: bool,

    /// Minimum item count to trigger parallel processing.
    /// Below this threshold, sequential is faster due to thread overhead.
    pub parallel_threshold: usize,

    /// Iteration budget and tolerance for the iterative solvers.
    pub solver: OptimizationConfig,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            benchmark_weight: DEFAULT_BENCHMARK_WEIGHT,
            parallel: true,
            parallel_threshold: 100,
            solver: OptimizationConfig::default(),
        }
    }
}

impl AnalyticsConfig {
    /// Creates a new config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a config that always uses sequential processing.
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Sets the annualized risk-free rate.
    #[must_use]
    pub fn with_risk_free_rate(mut self, rate: f64) -> Self {
        self.risk_free_rate = rate;
        self
    }

    /// Sets the flat benchmark weight used by attribution.
    #[must_use]
    pub fn with_benchmark_weight(mut self, weight: f64) -> Self {
        self.benchmark_weight = weight;
        self
    }

    /// Sets whether to use parallel processing.
    #[must_use]
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Sets the threshold for parallel processing.
    #[must_use]
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Sets the solver iteration budget.
    #[must_use]
    pub fn with_solver(mut self, solver: OptimizationConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Returns true if parallel processing should be used for the given count.
    #[must_use]
    pub fn should_parallelize(&self, count: usize) -> bool {
        cfg!(feature = "parallel") && self.parallel && count >= self.parallel_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = AnalyticsConfig::default();
        assert!((config.risk_free_rate - 0.02).abs() < f64::EPSILON);
        assert!((config.benchmark_weight - 0.1).abs() < f64::EPSILON);
        assert!(config.parallel);
        assert_eq!(config.parallel_threshold, 100);
        assert_eq!(config.solver.max_iterations, 10_000);
    }

    #[test]
    fn test_sequential() {
        let config = AnalyticsConfig::sequential();
        assert!(!config.parallel);
        assert!(!config.should_parallelize(1_000_000));
    }

    #[test]
    fn test_builder_pattern() {
        let config = AnalyticsConfig::new()
            .with_risk_free_rate(0.035)
            .with_benchmark_weight(0.2)
            .with_threshold(50)
            .with_solver(OptimizationConfig::default().with_max_iterations(250));

        assert!((config.risk_free_rate - 0.035).abs() < f64::EPSILON);
        assert!((config.benchmark_weight - 0.2).abs() < f64::EPSILON);
        assert_eq!(config.parallel_threshold, 50);
        assert_eq!(config.solver.max_iterations, 250);
    }

    #[test]
    fn test_should_parallelize() {
        let config = AnalyticsConfig::new().with_threshold(100);

        #[cfg(feature = "parallel")]
        {
            assert!(!config.should_parallelize(50));
            assert!(config.should_parallelize(100));
        }

        #[cfg(not(feature = "parallel"))]
        {
            assert!(!config.should_parallelize(50));
            assert!(!config.should_parallelize(100));
        }
    }

    #[test]
    fn test_serde() {
        let config = AnalyticsConfig::new()
            .with_threshold(75)
            .with_risk_free_rate(0.01);

        let json = serde_json::to_string(&config).unwrap();
        let parsed: AnalyticsConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, config);
    }
}
