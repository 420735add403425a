//! Bracketed bisection.

use crate::error::{MathError, MathResult};
use crate::solvers::{SolverConfig, SolverResult};

/// Finds a sign change of `f` inside `[a, b]` by halving the bracket.
///
/// `f` only has to be monotone on the bracket, not continuous: for a step
/// function the jump location is returned. This is what the simplex
/// projection relies on, since its residual in the shift is piecewise linear
/// with flat pieces.
///
/// The endpoints may be given in either order. The search stops when `|f|`
/// drops below `config.tolerance`, when the bracket is narrower than the
/// tolerance relative to its midpoint, or when `f64` can no longer split it.
///
/// # Errors
///
/// - [`MathError::InvalidBracket`] if `f(a)` and `f(b)` are both non-zero
///   with the same sign.
/// - [`MathError::ConvergenceFailed`] if `config.max_iterations` halvings do
///   not reach the tolerance.
///
/// # Example
///
/// ```rust
/// use vantage_math::solvers::{bisection, SolverConfig};
///
/// // Shift that makes the clamped weights sum to one.
/// let v = [0.5, 0.3, 0.9];
/// let residual = |tau: f64| v.iter().map(|x| (x - tau).clamp(0.0, 1.0)).sum::<f64>() - 1.0;
///
/// let tau = bisection(residual, -1.0, 1.0, &SolverConfig::default()).unwrap().root;
/// let total: f64 = v.iter().map(|x| (x - tau).clamp(0.0, 1.0)).sum();
/// assert!((total - 1.0).abs() < 1e-10);
/// ```
pub fn bisection<F>(f: F, a: f64, b: f64, config: &SolverConfig) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    let (mut lo, mut hi) = if a <= b { (a, b) } else { (b, a) };
    let (f_lo, f_hi) = (f(lo), f(hi));

    for (x, fx) in [(lo, f_lo), (hi, f_hi)] {
        if fx.abs() < config.tolerance {
            return Ok(SolverResult {
                root: x,
                iterations: 0,
                residual: fx,
            });
        }
    }

    if f_lo.signum() == f_hi.signum() {
        return Err(MathError::InvalidBracket {
            a: lo,
            b: hi,
            fa: f_lo,
            fb: f_hi,
        });
    }
    let lo_sign = f_lo.signum();

    let mut iterations = 0;
    while iterations < config.max_iterations {
        iterations += 1;
        let mid = lo + 0.5 * (hi - lo);
        let f_mid = f(mid);

        let resolved = mid <= lo || mid >= hi;
        let narrow = 0.5 * (hi - lo) <= config.tolerance * (1.0 + mid.abs());
        if f_mid.abs() < config.tolerance || narrow || resolved {
            return Ok(SolverResult {
                root: mid,
                iterations,
                residual: f_mid,
            });
        }

        if f_mid.signum() == lo_sign {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    let mid = lo + 0.5 * (hi - lo);
    Err(MathError::convergence_failed(iterations, f(mid).abs()))
}
