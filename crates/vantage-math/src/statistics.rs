//! Descriptive statistics over sample slices.
//!
//! All moments are population moments (divide by `n`, not `n - 1`).

use crate::error::{MathError, MathResult};

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> MathResult<f64> {
    if values.is_empty() {
        return Err(MathError::insufficient_data(1, 0));
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Whether every observation equals the first one.
///
/// An empty sample counts as constant.
#[must_use]
pub fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

/// Population variance.
///
/// Exactly `0.0` for a constant sample, whatever rounding the mean picks up.
pub fn population_variance(values: &[f64]) -> MathResult<f64> {
    let mu = mean(values)?;
    if is_constant(values) {
        return Ok(0.0);
    }
    let sum_sq: f64 = values.iter().map(|x| (x - mu).powi(2)).sum();
    Ok(sum_sq / values.len() as f64)
}

/// Population standard deviation.
pub fn population_std_dev(values: &[f64]) -> MathResult<f64> {
    population_variance(values).map(f64::sqrt)
}

/// Population covariance of two equally long samples.
///
/// Exactly `0.0` when either sample is constant.
pub fn covariance(x: &[f64], y: &[f64]) -> MathResult<f64> {
    if x.len() != y.len() {
        return Err(MathError::length_mismatch(x.len(), y.len()));
    }
    let mx = mean(x)?;
    let my = mean(y)?;
    if is_constant(x) || is_constant(y) {
        return Ok(0.0);
    }
    let sum: f64 = x.iter().zip(y).map(|(a, b)| (a - mx) * (b - my)).sum();
    Ok(sum / x.len() as f64)
}

/// Pearson correlation `cov(x, y) / sqrt(var(x) * var(y))`.
///
/// Returns `Ok(None)` when either sample has zero variance, in which case the
/// correlation is undefined. Defined values are clamped to `[-1, 1]` to absorb
/// rounding.
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> MathResult<Option<f64>> {
    let cov = covariance(x, y)?;
    let var_x = population_variance(x)?;
    let var_y = population_variance(y)?;

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return Ok(None);
    }

    Ok(Some((cov / denom).clamp(-1.0, 1.0)))
}

/// Returns a copy of `values` sorted ascending (NaN last).
#[must_use]
pub fn sorted_ascending(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}
