//! Mean-variance portfolio optimizer.
//!
//! Every strategy searches the box-constrained simplex
//! `{ w : Σw = 1, min ≤ w_i ≤ max }`:
//! - Max Sharpe and min variance try the closed-form solution first
//!   (`Σ⁻¹(μ - rf)` and `Σ⁻¹1`, normalized) and keep it when it already
//!   satisfies the bounds; otherwise they run projected gradient descent.
//! - Max return fills weights greedily in descending expected return.
//! - Risk parity runs cyclical coordinate descent on the equal risk budget.

use super::constraints::OptimizationConstraints;
use super::strategy::Strategy;
use crate::contribution::risk_contributions;
use crate::error::{PortfolioError, PortfolioResult};
use crate::types::{guarded_ratio, AnalyticsConfig, AnalyticsWarning, CovarianceMatrix};
use log::{debug, warn};
use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use vantage_math::linear_algebra::solve_spd;
use vantage_math::optimization::{
    project_onto_capped_simplex, projected_gradient_descent, MinimizationResult,
    OptimizationConfig,
};

/// Result of a portfolio optimization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Asset identifiers, in input order.
    pub assets: Vec<String>,

    /// Objective that produced the weights.
    pub strategy: Strategy,

    /// Weights aligned with `assets`; sum to one within the bounds.
    pub weights: Vec<f64>,

    /// `w·μ`.
    pub expected_return: f64,

    /// `sqrt(w'Σw)`.
    pub volatility: f64,

    /// `(expected_return - rf) / volatility`.
    pub sharpe_ratio: f64,

    /// Per-asset contribution to volatility; sums to `volatility`.
    pub risk_contributions: Vec<f64>,

    /// Iterations used by the iterative solver (0 for closed-form solutions).
    pub iterations: u32,

    /// False if the solver ran out of budget before meeting its tolerance.
    pub converged: bool,

    /// Constraints the optimization ran under, echoed back.
    pub constraints: OptimizationConstraints,

    /// Non-fatal conditions (non-convergence, zero volatility).
    pub warnings: Vec<AnalyticsWarning>,
}

impl OptimizationResult {
    /// Weight assigned to `asset`, if present.
    #[must_use]
    pub fn weight_of(&self, asset: &str) -> Option<f64> {
        self.assets
            .iter()
            .position(|a| a == asset)
            .map(|i| self.weights[i])
    }
}

/// Portfolio optimizer configured with a risk-free rate and solver budget.
///
/// # Example
///
/// ```rust
/// use vantage_portfolio::optimization::{OptimizationConstraints, PortfolioOptimizer, Strategy};
/// use vantage_portfolio::{AnalyticsConfig, CovarianceMatrix};
///
/// let cov = CovarianceMatrix::diagonal(&[0.04, 0.0225, 0.09]).unwrap();
/// let optimizer = PortfolioOptimizer::new(AnalyticsConfig::default());
///
/// let result = optimizer
///     .optimize(
///         &["A", "B", "C"],
///         &[0.10, 0.08, 0.12],
///         &cov,
///         Strategy::MinVariance,
///         &OptimizationConstraints::default(),
///     )
///     .unwrap();
///
/// let total: f64 = result.weights.iter().sum();
/// assert!((total - 1.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PortfolioOptimizer {
    config: AnalyticsConfig,
}

impl PortfolioOptimizer {
    /// Creates an optimizer with the given configuration.
    #[must_use]
    pub fn new(config: AnalyticsConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Computes weights for `strategy` under `constraints`.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` / `LengthMismatch` for empty or misaligned inputs,
    ///   non-finite expected returns, or a zero-variance asset under risk parity.
    /// - `InfeasibleConstraints` if the bounds admit no fully invested portfolio.
    pub fn optimize<S: AsRef<str>>(
        &self,
        assets: &[S],
        expected_returns: &[f64],
        covariance: &CovarianceMatrix,
        strategy: Strategy,
        constraints: &OptimizationConstraints,
    ) -> PortfolioResult<OptimizationResult> {
        let problem = Problem::new(
            assets.len(),
            expected_returns,
            covariance,
            constraints,
            &self.config,
        )?;

        debug!(
            "optimizing {} assets with strategy {} (bounds [{}, {}])",
            problem.n, strategy, problem.lower, problem.upper
        );

        let solution = match strategy {
            Strategy::MinVariance => problem.min_variance()?,
            Strategy::MaxSharpe => problem.max_sharpe()?,
            Strategy::MaxReturn => Solution::exact(problem.max_return()),
            Strategy::RiskParity => problem.risk_parity()?,
        };

        let mut warnings = Vec::new();
        if !solution.converged {
            warn!(
                "{strategy}: not converged after {} iterations (residual {:.2e})",
                solution.iterations, solution.residual
            );
            warnings.push(AnalyticsWarning::not_converged(
                strategy.name(),
                solution.iterations,
                solution.residual,
            ));
        }

        let weights = solution.weights;
        let expected_return = problem.expected_return(&weights);
        let volatility = problem.variance(&weights).max(0.0).sqrt();
        let sharpe_ratio = guarded_ratio(
            expected_return - problem.risk_free_rate,
            volatility,
            "sharpe_ratio",
            &mut warnings,
        );
        let risk_contributions = risk_contributions(&weights, covariance)?;

        Ok(OptimizationResult {
            assets: assets.iter().map(|a| a.as_ref().to_string()).collect(),
            strategy,
            weights,
            expected_return,
            volatility,
            sharpe_ratio,
            risk_contributions,
            iterations: solution.iterations,
            converged: solution.converged,
            constraints: *constraints,
            warnings,
        })
    }
}

/// Optimizes with the default configuration, taking the covariance as rows.
///
/// # Errors
///
/// Same as [`PortfolioOptimizer::optimize`], plus `InvalidInput` if
/// `covariance` is not a valid covariance matrix.
///
/// # Example
///
/// ```rust
/// use vantage_portfolio::optimization::{optimize_portfolio, OptimizationConstraints, Strategy};
///
/// let result = optimize_portfolio(
///     &["A", "B"],
///     &[0.08, 0.12],
///     &[vec![0.04, 0.0], vec![0.0, 0.09]],
///     Strategy::MaxReturn,
///     &OptimizationConstraints::default(),
/// )
/// .unwrap();
///
/// assert_eq!(result.weights, vec![0.0, 1.0]);
/// ```
pub fn optimize_portfolio<S: AsRef<str>>(
    assets: &[S],
    expected_returns: &[f64],
    covariance: &[Vec<f64>],
    strategy: Strategy,
    constraints: &OptimizationConstraints,
) -> PortfolioResult<OptimizationResult> {
    let covariance = CovarianceMatrix::from_rows(covariance.to_vec())?;
    PortfolioOptimizer::default().optimize(
        assets,
        expected_returns,
        &covariance,
        strategy,
        constraints,
    )
}

/// Weights produced by one solver run.
#[derive(Debug, Clone)]
pub(crate) struct Solution {
    pub(crate) weights: Vec<f64>,
    pub(crate) iterations: u32,
    pub(crate) converged: bool,
    pub(crate) residual: f64,
}

impl Solution {
    pub(crate) fn exact(weights: Vec<f64>) -> Self {
        Self {
            weights,
            iterations: 0,
            converged: true,
            residual: 0.0,
        }
    }
}

impl From<MinimizationResult> for Solution {
    fn from(result: MinimizationResult) -> Self {
        Self {
            weights: result.parameters,
            iterations: result.iterations,
            converged: result.converged,
            residual: result.residual,
        }
    }
}

/// A validated optimization problem.
pub(crate) struct Problem<'a> {
    pub(crate) n: usize,
    pub(crate) mu: &'a [f64],
    pub(crate) covariance: &'a CovarianceMatrix,
    pub(crate) lower: f64,
    pub(crate) upper: f64,
    pub(crate) risk_free_rate: f64,
    pub(crate) solver: OptimizationConfig,
}

impl<'a> Problem<'a> {
    pub(crate) fn new(
        n: usize,
        mu: &'a [f64],
        covariance: &'a CovarianceMatrix,
        constraints: &OptimizationConstraints,
        config: &AnalyticsConfig,
    ) -> PortfolioResult<Self> {
        if n == 0 {
            return Err(PortfolioError::invalid_input("no assets to optimize"));
        }
        if mu.len() != n {
            return Err(PortfolioError::length_mismatch(
                "expected returns",
                n,
                mu.len(),
            ));
        }
        if covariance.dim() != n {
            return Err(PortfolioError::length_mismatch(
                "covariance dimension",
                n,
                covariance.dim(),
            ));
        }
        if mu.iter().any(|r| !r.is_finite()) {
            return Err(PortfolioError::invalid_input(
                "expected returns contain non-finite values",
            ));
        }
        if !config.risk_free_rate.is_finite() {
            return Err(PortfolioError::invalid_input("risk-free rate must be finite"));
        }
        constraints.validate(n)?;

        Ok(Self {
            n,
            mu,
            covariance,
            lower: constraints.min_asset_allocation,
            upper: constraints.max_asset_allocation,
            risk_free_rate: config.risk_free_rate,
            solver: config.solver,
        })
    }

    pub(crate) fn sigma_w(&self, w: &[f64]) -> Vec<f64> {
        let product = self.covariance.as_matrix() * DVector::from_column_slice(w);
        product.iter().copied().collect()
    }

    pub(crate) fn variance(&self, w: &[f64]) -> f64 {
        w.iter().zip(self.sigma_w(w)).map(|(a, b)| a * b).sum()
    }

    pub(crate) fn expected_return(&self, w: &[f64]) -> f64 {
        w.iter().zip(self.mu).map(|(a, b)| a * b).sum()
    }

    pub(crate) fn project(&self, v: &[f64]) -> PortfolioResult<Vec<f64>> {
        Ok(project_onto_capped_simplex(v, self.lower, self.upper, 1.0)?)
    }

    fn admits(&self, w: &[f64]) -> bool {
        OptimizationConstraints::bounded(self.lower, self.upper).admits(w)
    }

    /// Normalized `Σ⁻¹ rhs`, if it exists, has a positive sum and fits the bounds.
    fn closed_form(&self, rhs: &[f64]) -> Option<Vec<f64>> {
        let x = solve_spd(self.covariance.as_matrix(), rhs).ok()?;
        let total: f64 = x.iter().sum();
        if !(total > 0.0 && total.is_finite()) {
            return None;
        }
        let w: Vec<f64> = x.iter().map(|v| v / total).collect();
        self.admits(&w).then_some(w)
    }

    fn equal_weight_start(&self) -> PortfolioResult<Vec<f64>> {
        self.project(&vec![1.0 / self.n as f64; self.n])
    }

    pub(crate) fn min_variance(&self) -> PortfolioResult<Solution> {
        if let Some(w) = self.closed_form(&vec![1.0; self.n]) {
            debug!("min variance: closed-form solution within bounds");
            return Ok(Solution::exact(w));
        }

        let start = self.equal_weight_start()?;
        let result = projected_gradient_descent(
            |w| self.variance(w),
            |w| self.sigma_w(w).iter().map(|v| 2.0 * v).collect(),
            |v| project_onto_capped_simplex(v, self.lower, self.upper, 1.0),
            &start,
            &self.solver,
        )?;
        Ok(result.into())
    }

    /// Minimizes `w'Σw - λ w·μ`, starting from `start`.
    pub(crate) fn mean_variance(&self, lambda: f64, start: &[f64]) -> PortfolioResult<Solution> {
        let result = projected_gradient_descent(
            |w| self.variance(w) - lambda * self.expected_return(w),
            |w| {
                self.sigma_w(w)
                    .iter()
                    .zip(self.mu)
                    .map(|(s, m)| 2.0 * s - lambda * m)
                    .collect()
            },
            |v| project_onto_capped_simplex(v, self.lower, self.upper, 1.0),
            start,
            &self.solver,
        )?;
        Ok(result.into())
    }

    fn negative_sharpe(&self, w: &[f64]) -> f64 {
        let variance = self.variance(w);
        if variance <= 0.0 {
            return f64::INFINITY;
        }
        -(self.expected_return(w) - self.risk_free_rate) / variance.sqrt()
    }

    fn negative_sharpe_gradient(&self, w: &[f64]) -> Vec<f64> {
        let sigma_w = self.sigma_w(w);
        let variance: f64 = w.iter().zip(&sigma_w).map(|(a, b)| a * b).sum();
        if variance <= 0.0 {
            return vec![0.0; self.n];
        }
        let s = variance.sqrt();
        let excess = self.expected_return(w) - self.risk_free_rate;
        self.mu
            .iter()
            .zip(&sigma_w)
            .map(|(m, sw)| -((m - self.risk_free_rate) / s - excess * sw / (s * s * s)))
            .collect()
    }

    fn max_sharpe(&self) -> PortfolioResult<Solution> {
        let excess: Vec<f64> = self.mu.iter().map(|m| m - self.risk_free_rate).collect();
        if let Some(w) = self.closed_form(&excess) {
            debug!("max sharpe: tangency portfolio within bounds");
            return Ok(Solution::exact(w));
        }

        let starts = [self.min_variance()?.weights, self.equal_weight_start()?];
        let mut best: Option<MinimizationResult> = None;
        for start in &starts {
            let result = projected_gradient_descent(
                |w| self.negative_sharpe(w),
                |w| self.negative_sharpe_gradient(w),
                |v| project_onto_capped_simplex(v, self.lower, self.upper, 1.0),
                start,
                &self.solver,
            )?;
            let better = best
                .as_ref()
                .map_or(true, |b| result.objective_value < b.objective_value);
            if better {
                best = Some(result);
            }
        }

        match best {
            Some(result) => Ok(result.into()),
            None => Err(PortfolioError::invalid_input("no starting point for max sharpe")),
        }
    }

    /// Greedy fill from the lower bounds in descending expected return.
    ///
    /// Ties keep input order.
    pub(crate) fn max_return(&self) -> Vec<f64> {
        let mut order: Vec<usize> = (0..self.n).collect();
        order.sort_by(|&a, &b| self.mu[b].total_cmp(&self.mu[a]));

        let mut w = vec![self.lower; self.n];
        let mut remaining = 1.0 - self.lower * self.n as f64;
        for i in order {
            if remaining <= 0.0 {
                break;
            }
            let add = (self.upper - self.lower).min(remaining);
            w[i] += add;
            remaining -= add;
        }
        w
    }

    fn risk_parity(&self) -> PortfolioResult<Solution> {
        if let Some(i) = (0..self.n).find(|&i| self.covariance.variance(i) <= 0.0) {
            return Err(PortfolioError::invalid_input(format!(
                "asset {i} has zero variance; equal risk contributions are undefined"
            )));
        }

        let inverse_vol: Vec<f64> = (0..self.n)
            .map(|i| 1.0 / self.covariance.volatility(i))
            .collect();

        let mut solution = if self.covariance.is_diagonal() {
            debug!("risk parity: diagonal covariance, inverse-volatility weights");
            Solution::exact(normalized(&inverse_vol))
        } else {
            self.risk_parity_descent(inverse_vol)
        };

        if !self.admits(&solution.weights) {
            debug!("risk parity: weights outside bounds, projecting");
            solution.weights = self.project(&solution.weights)?;
        }
        Ok(solution)
    }

    /// Cyclical coordinate descent for `x_i (Σx)_i = 1/n`, normalized at the end.
    fn risk_parity_descent(&self, start: Vec<f64>) -> Solution {
        let cov = self.covariance;
        let budget = 1.0 / self.n as f64;
        let mut x = start;
        let mut residual = f64::INFINITY;

        for iteration in 0..self.solver.max_iterations {
            let mut change = 0.0_f64;
            let mut scale = 0.0_f64;

            for i in 0..self.n {
                let sigma_ii = cov.variance(i);
                let c: f64 = (0..self.n)
                    .filter(|&j| j != i)
                    .map(|j| cov.get(i, j) * x[j])
                    .sum();
                let updated = (-c + (c * c + 4.0 * sigma_ii * budget).sqrt()) / (2.0 * sigma_ii);

                change = change.max((updated - x[i]).abs());
                scale = scale.max(updated.abs());
                x[i] = updated;
            }

            residual = change / scale.max(1.0);
            if residual <= self.solver.tolerance {
                debug!("risk parity converged after {} sweeps", iteration + 1);
                return Solution {
                    weights: normalized(&x),
                    iterations: iteration + 1,
                    converged: true,
                    residual,
                };
            }
        }

        Solution {
            weights: normalized(&x),
            iterations: self.solver.max_iterations,
            converged: false,
            residual,
        }
    }
}

fn normalized(x: &[f64]) -> Vec<f64> {
    let total: f64 = x.iter().sum();
    x.iter().map(|v| v / total).collect()
}
