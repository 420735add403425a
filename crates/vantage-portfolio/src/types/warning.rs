//! Non-fatal analytics warnings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A condition worth surfacing that does not invalidate a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalyticsWarning {
    /// A ratio's denominator was exactly zero. The metric holds `+inf`,
    /// `-inf` (by the sign of the numerator) or `NaN` (zero numerator).
    DivisionByZero {
        /// Name of the affected metric, e.g. `"sharpe_ratio"`.
        metric: String,
    },

    /// An iterative solver ran out of budget before meeting its tolerance.
    /// The result holds the best iterate found.
    NotConverged {
        /// Which solver stopped early.
        solver: String,
        /// Iterations performed.
        iterations: u32,
        /// Final residual.
        residual: f64,
    },
}

impl AnalyticsWarning {
    /// Creates a division-by-zero warning for `metric`.
    #[must_use]
    pub fn division_by_zero(metric: impl Into<String>) -> Self {
        Self::DivisionByZero {
            metric: metric.into(),
        }
    }

    /// Creates a non-convergence warning.
    #[must_use]
    pub fn not_converged(solver: impl Into<String>, iterations: u32, residual: f64) -> Self {
        Self::NotConverged {
            solver: solver.into(),
            iterations,
            residual,
        }
    }

    /// Returns true if this warning flags a zero denominator for `name`.
    #[must_use]
    pub fn is_division_by_zero_for(&self, name: &str) -> bool {
        matches!(self, Self::DivisionByZero { metric } if metric == name)
    }
}

impl fmt::Display for AnalyticsWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DivisionByZero { metric } => {
                write!(f, "{metric}: denominator is zero")
            }
            Self::NotConverged {
                solver,
                iterations,
                residual,
            } => write!(
                f,
                "{solver}: not converged after {iterations} iterations (residual {residual:.2e})"
            ),
        }
    }
}

/// Divides `numerator` by `denominator`, recording a warning on a zero denominator.
///
/// See [`sentinel_ratio`] for the value returned in that case.
pub(crate) fn guarded_ratio(
    numerator: f64,
    denominator: f64,
    metric: &str,
    warnings: &mut Vec<AnalyticsWarning>,
) -> f64 {
    if denominator == 0.0 {
        log::warn!("{metric}: zero denominator");
        warnings.push(AnalyticsWarning::division_by_zero(metric));
    }
    sentinel_ratio(numerator, denominator)
}

/// Divides `numerator` by `denominator`.
///
/// A zero denominator yields `+inf`/`-inf` by the sign of the numerator, or
/// `NaN` when the numerator is zero too.
#[allow(clippy::float_cmp)]
pub(crate) fn sentinel_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return if numerator > 0.0 {
            f64::INFINITY
        } else if numerator < 0.0 {
            f64::NEG_INFINITY
        } else {
            f64::NAN
        };
    }
    numerator / denominator
}
