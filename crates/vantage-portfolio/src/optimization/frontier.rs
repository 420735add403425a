//! Efficient frontier sampling.
//!
//! Each frontier point minimizes variance for a target return:
//!
//! ```text
//! min w'Σw   s.t.  w·μ = target,  Σw = 1,  min ≤ w_i ≤ max
//! ```
//!
//! The return constraint is handled through its multiplier. For `λ ≥ 0` the
//! problem `min w'Σw - λ w·μ` over the box-constrained simplex has a return
//! that is non-decreasing in `λ`, so `λ` is bracketed and bisected until the
//! achieved return matches the target.

use super::constraints::OptimizationConstraints;
use super::optimizer::{PortfolioOptimizer, Problem, Solution};
use crate::analytics::maybe_parallel_try_map;
use crate::error::{PortfolioError, PortfolioResult};
use crate::types::{sentinel_ratio, CovarianceMatrix};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Relative tolerance on the achieved return of a frontier point.
const RETURN_TOLERANCE: f64 = 1e-10;

/// Maximum doublings of the upper multiplier while bracketing.
const MAX_BRACKET_DOUBLINGS: u32 = 64;

/// Maximum bisection steps on the multiplier.
const MAX_BISECTION_STEPS: u32 = 100;

/// A point on the efficient frontier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrontierPoint {
    /// Portfolio volatility `sqrt(w'Σw)`.
    pub risk: f64,

    /// Portfolio expected return `w·μ`.
    #[serde(rename = "return")]
    pub expected_return: f64,

    /// `(return - rf) / risk`.
    pub sharpe_ratio: f64,

    /// Weights aligned with the input assets.
    pub weights: Vec<f64>,

    /// False when a solve behind this point ran out of iterations.
    pub converged: bool,
}

impl PortfolioOptimizer {
    /// Samples `n_points` portfolios along the efficient frontier.
    ///
    /// Target returns are spaced evenly from the minimum-variance portfolio's
    /// return to the highest return the bounds allow. Points are returned in
    /// increasing-return order. If that range is empty (all assets share one
    /// expected return) a single minimum-variance point is returned.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if `n_points` is zero, plus the errors of
    /// [`PortfolioOptimizer::optimize`].
    pub fn efficient_frontier<S: AsRef<str>>(
        &self,
        assets: &[S],
        expected_returns: &[f64],
        covariance: &CovarianceMatrix,
        n_points: usize,
        constraints: &OptimizationConstraints,
    ) -> PortfolioResult<Vec<FrontierPoint>> {
        if n_points == 0 {
            return Err(PortfolioError::invalid_input(
                "efficient frontier needs at least one point",
            ));
        }

        let problem = Problem::new(
            assets.len(),
            expected_returns,
            covariance,
            constraints,
            self.config(),
        )?;

        let min_variance = problem.min_variance()?;
        let max_return = Solution::exact(problem.max_return());
        let r_min = problem.expected_return(&min_variance.weights);
        let r_max = problem.expected_return(&max_return.weights);

        if n_points == 1 || r_max - r_min < problem.solver.tolerance.max(f64::EPSILON) {
            return Ok(vec![frontier_point(&problem, min_variance)]);
        }

        debug!(
            "efficient frontier: {} points on returns [{:.6}, {:.6}]",
            n_points, r_min, r_max
        );

        let step = (r_max - r_min) / (n_points - 1) as f64;
        let indices: Vec<usize> = (0..n_points).collect();

        let mut points = maybe_parallel_try_map(&indices, self.config(), |&k| {
            let solution = if k == 0 {
                min_variance.clone()
            } else if k == n_points - 1 {
                max_return.clone()
            } else {
                target_return_weights(&problem, r_min + step * k as f64, &min_variance)?
            };
            Ok::<_, PortfolioError>(frontier_point(&problem, solution))
        })?;

        let unconverged = points.iter().filter(|p| !p.converged).count();
        if unconverged > 0 {
            warn!("efficient frontier: {unconverged} of {n_points} points did not converge");
        }

        points.sort_by(|a, b| a.expected_return.total_cmp(&b.expected_return));
        Ok(points)
    }
}

/// Samples the efficient frontier with the default configuration and
/// long-only, fully invested constraints.
///
/// # Errors
///
/// Same as [`PortfolioOptimizer::efficient_frontier`], plus `InvalidInput`
/// if `covariance` is not a valid covariance matrix.
///
/// # Example
///
/// ```rust
/// use vantage_portfolio::optimization::calculate_efficient_frontier;
///
/// let frontier = calculate_efficient_frontier(
///     &["A", "B"],
///     &[0.06, 0.12],
///     &[vec![0.01, 0.0], vec![0.0, 0.04]],
///     5,
/// )
/// .unwrap();
///
/// assert_eq!(frontier.len(), 5);
/// assert!(frontier.windows(2).all(|p| p[0].expected_return <= p[1].expected_return));
/// ```
pub fn calculate_efficient_frontier<S: AsRef<str>>(
    assets: &[S],
    expected_returns: &[f64],
    covariance: &[Vec<f64>],
    n_points: usize,
) -> PortfolioResult<Vec<FrontierPoint>> {
    let covariance = CovarianceMatrix::from_rows(covariance.to_vec())?;
    PortfolioOptimizer::default().efficient_frontier(
        assets,
        expected_returns,
        &covariance,
        n_points,
        &OptimizationConstraints::default(),
    )
}

fn frontier_point(problem: &Problem<'_>, solution: Solution) -> FrontierPoint {
    let expected_return = problem.expected_return(&solution.weights);
    let risk = problem.variance(&solution.weights).max(0.0).sqrt();
    FrontierPoint {
        risk,
        expected_return,
        sharpe_ratio: sentinel_ratio(expected_return - problem.risk_free_rate, risk),
        weights: solution.weights,
        converged: solution.converged,
    }
}

/// Minimum-variance weights whose return matches `target`.
///
/// `lower_start` is the `λ = 0` solution (the minimum-variance portfolio).
/// The returned solution is flagged unconverged when the inner solve did not
/// converge, the multiplier bracket could not reach `target`, or bisection
/// ran out of steps before matching it.
fn target_return_weights(
    problem: &Problem<'_>,
    target: f64,
    lower_start: &Solution,
) -> PortfolioResult<Solution> {
    let tolerance = RETURN_TOLERANCE * (1.0 + target.abs());
    let gap = |s: &Solution| problem.expected_return(&s.weights) - target;

    let mut lo_lambda = 0.0_f64;
    let mut lo = lower_start.clone();

    let mut hi_lambda = 1.0_f64;
    let mut hi = problem.mean_variance(hi_lambda, &lo.weights)?;
    let mut doublings = 0;
    while gap(&hi) < 0.0 && doublings < MAX_BRACKET_DOUBLINGS {
        lo_lambda = hi_lambda;
        lo = hi;
        hi_lambda *= 2.0;
        hi = problem.mean_variance(hi_lambda, &lo.weights)?;
        doublings += 1;
    }
    if gap(&hi) < 0.0 {
        hi.converged = false;
        return Ok(hi);
    }

    for _ in 0..MAX_BISECTION_STEPS {
        if gap(&hi).abs() <= tolerance {
            return Ok(hi);
        }
        if gap(&lo).abs() <= tolerance {
            return Ok(lo);
        }
        if hi_lambda - lo_lambda <= f64::EPSILON * (1.0 + hi_lambda) {
            break;
        }

        let mid_lambda = 0.5 * (lo_lambda + hi_lambda);
        let mid = problem.mean_variance(mid_lambda, &lo.weights)?;
        if gap(&mid) < 0.0 {
            lo_lambda = mid_lambda;
            lo = mid;
        } else {
            hi_lambda = mid_lambda;
            hi = mid;
        }
    }

    let mut best = if gap(&lo).abs() < gap(&hi).abs() { lo } else { hi };
    best.converged = false;
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AnalyticsConfig;
    use approx::assert_relative_eq;
    use vantage_math::optimization::OptimizationConfig;

    const ASSETS: [&str; 3] = ["A", "B", "C"];
    const MU: [f64; 3] = [0.10, 0.08, 0.12];

    fn cov() -> CovarianceMatrix {
        CovarianceMatrix::from_rows(vec![
            vec![0.04, 0.006, 0.012],
            vec![0.006, 0.0225, 0.0054],
            vec![0.012, 0.0054, 0.09],
        ])
        .unwrap()
    }

    fn frontier(n: usize) -> Vec<FrontierPoint> {
        PortfolioOptimizer::new(AnalyticsConfig::sequential())
            .efficient_frontier(&ASSETS, &MU, &cov(), n, &OptimizationConstraints::default())
            .unwrap()
    }

    #[test]
    fn test_endpoints_and_order() {
        let points = frontier(6);
        assert_eq!(points.len(), 6);

        assert!(points
            .windows(2)
            .all(|p| p[0].expected_return <= p[1].expected_return));

        // Last point holds the highest-return asset outright.
        let last = &points[5];
        assert_relative_eq!(last.expected_return, 0.12, epsilon = 1e-12);
        assert_relative_eq!(last.risk, 0.3, epsilon = 1e-12);
    }

    #[test]
    fn test_points_hit_even_targets() {
        let points = frontier(5);
        let r_min = points[0].expected_return;
        let step = (points[4].expected_return - r_min) / 4.0;

        for (k, p) in points.iter().enumerate() {
            assert_relative_eq!(p.expected_return, r_min + step * k as f64, epsilon = 1e-8);
            assert_relative_eq!(p.weights.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
            assert!(p.weights.iter().all(|w| *w >= -1e-12));
        }
    }

    #[test]
    fn test_risk_increases_above_min_variance() {
        let points = frontier(8);
        assert!(points.windows(2).all(|p| p[1].risk >= p[0].risk - 1e-9));
    }

    #[test]
    fn test_interior_point_is_minimum_variance_for_its_return() {
        let points = frontier(3);
        let mid = &points[1];

        // Any other feasible mix with the same return has at least as much risk.
        // Moving along the direction d = (2, -1, -1)·t keeps return changes
        // 0.2 - 0.08 - 0.12 = 0 and weight sum fixed.
        let c = cov();
        for t in [-0.05, -0.01, 0.01, 0.05] {
            let w: Vec<f64> = mid
                .weights
                .iter()
                .zip([2.0, -1.0, -1.0])
                .map(|(w, d)| w + d * t)
                .collect();
            if w.iter().all(|x| *x >= 0.0) {
                let risk = c.portfolio_variance(&w).unwrap().sqrt();
                assert!(risk >= mid.risk - 1e-8);
            }
        }
    }

    #[test]
    fn test_converged_flag_tracks_solver_budget() {
        let points = frontier(5);
        assert!(points[4].converged);

        let starved = AnalyticsConfig::sequential()
            .with_solver(OptimizationConfig::default().with_max_iterations(1));
        let points = PortfolioOptimizer::new(starved)
            .efficient_frontier(&ASSETS, &MU, &cov(), 5, &OptimizationConstraints::default())
            .unwrap();

        assert_eq!(points.len(), 5);
        assert!(points[1..4].iter().all(|p| !p.converged));
        assert!(points[4].converged);
        for p in &points {
            assert_relative_eq!(p.weights.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_single_point_and_flat_returns() {
        let single = frontier(1);
        assert_eq!(single.len(), 1);

        let flat = PortfolioOptimizer::default()
            .efficient_frontier(
                &ASSETS,
                &[0.1, 0.1, 0.1],
                &cov(),
                10,
                &OptimizationConstraints::default(),
            )
            .unwrap();
        assert_eq!(flat.len(), 1);
    }

    #[test]
    fn test_zero_points_rejected() {
        let err = PortfolioOptimizer::default()
            .efficient_frontier(&ASSETS, &MU, &cov(), 0, &OptimizationConstraints::default())
            .unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_serializes_return_field() {
        let point = FrontierPoint {
            risk: 0.2,
            expected_return: 0.1,
            sharpe_ratio: 0.4,
            weights: vec![1.0],
            converged: true,
        };
        let json = serde_json::to_value(&point).unwrap();
        assert_eq!(json["return"], 0.1);
        assert!(json.get("expected_return").is_none());
    }
}
