//! Risk contribution analysis.
//!
//! Splits portfolio volatility into per-asset contributions
//! `RC_i = w_i (Σw)_i / σ_p`, which sum to `σ_p`.

use crate::error::{PortfolioError, PortfolioResult};
use crate::types::CovarianceMatrix;

/// Per-asset contributions to portfolio volatility.
///
/// Returns all zeros when the portfolio variance is zero.
///
/// # Errors
///
/// `LengthMismatch` if `weights` does not match the covariance dimension.
pub fn risk_contributions(
    weights: &[f64],
    covariance: &CovarianceMatrix,
) -> PortfolioResult<Vec<f64>> {
    if weights.len() != covariance.dim() {
        return Err(PortfolioError::length_mismatch(
            "weights",
            covariance.dim(),
            weights.len(),
        ));
    }

    let marginal = covariance.times(weights)?;
    let variance: f64 = weights.iter().zip(&marginal).map(|(w, m)| w * m).sum();
    if variance <= 0.0 {
        return Ok(vec![0.0; weights.len()]);
    }

    let volatility = variance.sqrt();
    Ok(weights
        .iter()
        .zip(&marginal)
        .map(|(w, m)| w * m / volatility)
        .collect())
}

/// Per-asset shares of portfolio variance, `w_i (Σw)_i / (w'Σw)`.
///
/// Equal shares characterise a risk-parity portfolio.
pub fn variance_shares(
    weights: &[f64],
    covariance: &CovarianceMatrix,
) -> PortfolioResult<Vec<f64>> {
    let contributions = risk_contributions(weights, covariance)?;
    let total: f64 = contributions.iter().sum();
    if total <= 0.0 {
        return Ok(contributions);
    }
    Ok(contributions.iter().map(|c| c / total).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_contributions_sum_to_volatility() {
        let cov = CovarianceMatrix::from_rows(vec![
            vec![0.04, 0.006, 0.0],
            vec![0.006, 0.0225, 0.004],
            vec![0.0, 0.004, 0.09],
        ])
        .unwrap();
        let w = [0.5, 0.3, 0.2];

        let rc = risk_contributions(&w, &cov).unwrap();
        let vol = cov.portfolio_variance(&w).unwrap().sqrt();

        assert_relative_eq!(rc.iter().sum::<f64>(), vol, epsilon = 1e-12);
    }

    #[test]
    fn test_inverse_vol_weights_equalize_shares() {
        let cov = CovarianceMatrix::diagonal(&[0.04, 0.01]).unwrap();
        // 1/0.2 : 1/0.1 = 1 : 2
        let shares = variance_shares(&[1.0 / 3.0, 2.0 / 3.0], &cov).unwrap();
        assert_relative_eq!(shares[0], 0.5, epsilon = 1e-12);
        assert_relative_eq!(shares[1], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_variance_and_mismatch() {
        let cov = CovarianceMatrix::diagonal(&[0.0, 0.0]).unwrap();
        assert_eq!(risk_contributions(&[0.5, 0.5], &cov).unwrap(), vec![0.0, 0.0]);
        assert!(risk_contributions(&[1.0], &cov).unwrap_err().is_invalid_input());
    }
}
