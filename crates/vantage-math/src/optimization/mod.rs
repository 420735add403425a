//! Constrained optimization.
//!
//! Portfolio problems live on the box-constrained simplex
//! `{ w : sum(w) = budget, lower <= w_i <= upper }`. This module provides the
//! exact Euclidean projection onto that set and a projected-gradient
//! minimizer with backtracking that works on any projection.

use crate::error::{MathError, MathResult};
use crate::solvers::{bisection, SolverConfig};
use log::debug;
use serde::{Deserialize, Serialize};

/// Slack allowed when checking that the budget is attainable within the bounds.
const FEASIBILITY_SLACK: f64 = 1e-12;

/// Configuration for optimization algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimizationConfig {
    /// Convergence tolerance on the norm of a projected step.
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
    /// Step length tried on the first iteration.
    pub initial_step: f64,
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-12,
            max_iterations: 10_000,
            initial_step: 1.0,
        }
    }
}

impl OptimizationConfig {
    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the initial step length.
    #[must_use]
    pub fn with_initial_step(mut self, initial_step: f64) -> Self {
        self.initial_step = initial_step;
        self
    }
}

/// Result of a minimization run.
#[derive(Debug, Clone)]
pub struct MinimizationResult {
    /// Best parameters found.
    pub parameters: Vec<f64>,
    /// Objective function value at `parameters`.
    pub objective_value: f64,
    /// Number of iterations used.
    pub iterations: u32,
    /// Whether the tolerance was met within the iteration budget.
    pub converged: bool,
    /// Norm of the last projected step.
    pub residual: f64,
}

/// Projects `v` onto `{ w : sum(w) = budget, lower <= w_i <= upper }`.
///
/// The projection has the form `w_i = clamp(v_i - tau, lower, upper)` where
/// `tau` is the root of the (decreasing) budget residual, located by
/// bisection. Any remaining rounding residual is spread over the coordinates
/// strictly inside their bounds.
///
/// # Errors
///
/// [`MathError::Infeasible`] when `lower > upper` or the budget cannot be met
/// (`n * lower > budget` or `n * upper < budget`).
pub fn project_onto_capped_simplex(
    v: &[f64],
    lower: f64,
    upper: f64,
    budget: f64,
) -> MathResult<Vec<f64>> {
    let n = v.len();
    if n == 0 {
        return Err(MathError::invalid_input("Cannot project an empty vector"));
    }
    if v.iter().any(|x| !x.is_finite()) {
        return Err(MathError::invalid_input("Vector contains non-finite values"));
    }
    if lower > upper {
        return Err(MathError::infeasible(format!(
            "lower bound {lower} exceeds upper bound {upper}"
        )));
    }

    let count = n as f64;
    if count * lower > budget + FEASIBILITY_SLACK {
        return Err(MathError::infeasible(format!(
            "{n} x {lower} exceeds budget {budget}"
        )));
    }
    if count * upper < budget - FEASIBILITY_SLACK {
        return Err(MathError::infeasible(format!(
            "{n} x {upper} cannot reach budget {budget}"
        )));
    }

    let residual = |tau: f64| -> f64 {
        v.iter().map(|x| (x - tau).clamp(lower, upper)).sum::<f64>() - budget
    };

    let v_min = v.iter().copied().fold(f64::INFINITY, f64::min);
    let v_max = v.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let config = SolverConfig::new(1e-15, 200);
    let tau = bisection(residual, v_min - upper, v_max - lower, &config)?.root;

    let mut w: Vec<f64> = v.iter().map(|x| (x - tau).clamp(lower, upper)).collect();

    let gap = budget - w.iter().sum::<f64>();
    let free: Vec<usize> = (0..n).filter(|&i| w[i] > lower && w[i] < upper).collect();
    if gap != 0.0 && !free.is_empty() {
        let share = gap / free.len() as f64;
        for i in free {
            w[i] = (w[i] + share).clamp(lower, upper);
        }
    }

    Ok(w)
}

/// Minimizes `objective` over the set defined by `project`.
///
/// Each iteration takes a gradient step and projects it back onto the feasible
/// set. The step length backtracks (halving) until the standard sufficient
/// decrease condition for projected gradients holds, and grows again after an
/// accepted step. Iteration stops when the projected step is shorter than
/// `config.tolerance`.
///
/// A run that exhausts `config.max_iterations` is not an error: the best
/// iterate is returned with `converged == false`.
///
/// # Example
///
/// ```rust
/// use vantage_math::optimization::{
///     project_onto_capped_simplex, projected_gradient_descent, OptimizationConfig,
/// };
///
/// // Closest point to (0.9, 0.9) on the unit simplex.
/// let f = |w: &[f64]| (w[0] - 0.9).powi(2) + (w[1] - 0.9).powi(2);
/// let grad = |w: &[f64]| vec![2.0 * (w[0] - 0.9), 2.0 * (w[1] - 0.9)];
/// let project = |v: &[f64]| project_onto_capped_simplex(v, 0.0, 1.0, 1.0);
///
/// let result =
///     projected_gradient_descent(f, grad, project, &[1.0, 0.0], &OptimizationConfig::default())
///         .unwrap();
/// assert!((result.parameters[0] - 0.5).abs() < 1e-9);
/// ```
pub fn projected_gradient_descent<F, G, P>(
    objective: F,
    gradient: G,
    project: P,
    initial: &[f64],
    config: &OptimizationConfig,
) -> MathResult<MinimizationResult>
where
    F: Fn(&[f64]) -> f64,
    G: Fn(&[f64]) -> Vec<f64>,
    P: Fn(&[f64]) -> MathResult<Vec<f64>>,
{
    let mut x = project(initial)?;
    let mut fx = objective(&x);
    let mut step = config.initial_step;
    let mut residual = f64::INFINITY;

    for iteration in 0..config.max_iterations {
        let g = gradient(&x);
        if g.len() != x.len() {
            return Err(MathError::length_mismatch(x.len(), g.len()));
        }

        loop {
            let trial: Vec<f64> = x.iter().zip(&g).map(|(xi, gi)| xi - step * gi).collect();
            let y = project(&trial)?;

            let d: Vec<f64> = y.iter().zip(&x).map(|(yi, xi)| yi - xi).collect();
            let d_norm_sq: f64 = d.iter().map(|di| di * di).sum();
            residual = d_norm_sq.sqrt();

            // A fixed point of the projected step is a stationary point.
            if residual <= config.tolerance {
                debug!(
                    "projected gradient converged after {} iterations (f = {:.6e})",
                    iteration, fx
                );
                return Ok(MinimizationResult {
                    parameters: x,
                    objective_value: fx,
                    iterations: iteration,
                    converged: true,
                    residual,
                });
            }

            let fy = objective(&y);
            let g_dot_d: f64 = g.iter().zip(&d).map(|(gi, di)| gi * di).sum();

            if fy <= fx + g_dot_d + d_norm_sq / (2.0 * step) {
                x = y;
                fx = fy;
                break;
            }

            step *= 0.5;
            if step < 1e-20 {
                debug!(
                    "projected gradient stalled after {} iterations (step {:.2e})",
                    iteration, residual
                );
                return Ok(MinimizationResult {
                    parameters: x,
                    objective_value: fx,
                    iterations: iteration,
                    converged: false,
                    residual,
                });
            }
        }

        step *= 2.0;
    }

    debug!(
        "projected gradient exhausted {} iterations (last step {:.2e})",
        config.max_iterations, residual
    );
    Ok(MinimizationResult {
        parameters: x,
        objective_value: fx,
        iterations: config.max_iterations,
        converged: false,
        residual,
    })
}
