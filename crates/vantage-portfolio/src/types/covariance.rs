//! Validated covariance matrix.

use crate::error::{PortfolioError, PortfolioResult};
use crate::TRADING_DAYS_PER_YEAR;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use vantage_math::linear_algebra::{is_symmetric, mat_vec, quadratic_form};
use vantage_math::statistics::covariance;

/// Absolute tolerance for the symmetry check.
const SYMMETRY_TOLERANCE: f64 = 1e-10;

/// Square, symmetric N x N covariance matrix with non-negative variances.
///
/// Serializes as a list of rows; deserialization runs the same validation as
/// [`CovarianceMatrix::from_rows`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct CovarianceMatrix {
    matrix: DMatrix<f64>,
}

impl CovarianceMatrix {
    /// Builds a covariance matrix from row vectors.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the rows are empty, ragged, not square, contain
    /// non-finite values, are asymmetric, or have a negative diagonal entry.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> PortfolioResult<Self> {
        let n = rows.len();
        if n == 0 {
            return Err(PortfolioError::invalid_input("covariance matrix is empty"));
        }
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != n) {
            return Err(PortfolioError::invalid_input(format!(
                "covariance matrix is not square: row {i} has {} entries, expected {n}",
                row.len()
            )));
        }

        let flat: Vec<f64> = rows.into_iter().flatten().collect();
        Self::from_matrix(DMatrix::from_row_slice(n, n, &flat))
    }

    /// Builds a covariance matrix from an `nalgebra` matrix.
    pub fn from_matrix(matrix: DMatrix<f64>) -> PortfolioResult<Self> {
        let n = matrix.nrows();
        if n == 0 {
            return Err(PortfolioError::invalid_input("covariance matrix is empty"));
        }
        if n != matrix.ncols() {
            return Err(PortfolioError::invalid_input(format!(
                "covariance matrix is {}x{}, expected square",
                n,
                matrix.ncols()
            )));
        }
        if matrix.iter().any(|v| !v.is_finite()) {
            return Err(PortfolioError::invalid_input(
                "covariance matrix contains non-finite values",
            ));
        }
        if !is_symmetric(&matrix, SYMMETRY_TOLERANCE) {
            return Err(PortfolioError::invalid_input(
                "covariance matrix is not symmetric",
            ));
        }
        if let Some(i) = (0..n).find(|&i| matrix[(i, i)] < 0.0) {
            return Err(PortfolioError::invalid_input(format!(
                "negative variance {} at diagonal {i}",
                matrix[(i, i)]
            )));
        }

        Ok(Self { matrix })
    }

    /// Builds a diagonal (uncorrelated) covariance matrix from variances.
    pub fn diagonal(variances: &[f64]) -> PortfolioResult<Self> {
        let n = variances.len();
        let mut matrix = DMatrix::zeros(n, n);
        for (i, v) in variances.iter().enumerate() {
            matrix[(i, i)] = *v;
        }
        Self::from_matrix(matrix)
    }

    /// Estimates an annualized covariance matrix from period return series.
    ///
    /// Uses population covariance scaled by 252 trading days. All series must
    /// have the same length and at least two observations.
    pub fn from_returns<S: AsRef<[f64]>>(series: &[S]) -> PortfolioResult<Self> {
        let n = series.len();
        if n == 0 {
            return Err(PortfolioError::invalid_input("no return series supplied"));
        }
        let len = series[0].as_ref().len();
        if len < 2 {
            return Err(PortfolioError::insufficient_data(2, len));
        }
        if let Some(s) = series.iter().find(|s| s.as_ref().len() != len) {
            return Err(PortfolioError::length_mismatch(
                "return series",
                len,
                s.as_ref().len(),
            ));
        }

        let mut matrix = DMatrix::zeros(n, n);
        for i in 0..n {
            for j in i..n {
                let c = covariance(series[i].as_ref(), series[j].as_ref())? * TRADING_DAYS_PER_YEAR;
                matrix[(i, j)] = c;
                matrix[(j, i)] = c;
            }
        }

        Self::from_matrix(matrix)
    }

    /// Number of assets.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.matrix.nrows()
    }

    /// Entry `(i, j)`.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.matrix[(i, j)]
    }

    /// Variance of asset `i`.
    #[must_use]
    pub fn variance(&self, i: usize) -> f64 {
        self.matrix[(i, i)]
    }

    /// Volatility (square root of variance) of asset `i`.
    #[must_use]
    pub fn volatility(&self, i: usize) -> f64 {
        self.variance(i).sqrt()
    }

    /// Returns true if every off-diagonal entry is exactly zero.
    #[must_use]
    pub fn is_diagonal(&self) -> bool {
        let n = self.dim();
        (0..n).all(|i| (0..n).all(|j| i == j || self.matrix[(i, j)] == 0.0))
    }

    /// Borrow the underlying matrix.
    #[must_use]
    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// Copies the matrix out as row vectors.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.dim())
            .map(|i| self.matrix.row(i).iter().copied().collect())
            .collect()
    }

    /// Computes `Σ w`.
    pub fn times(&self, weights: &[f64]) -> PortfolioResult<Vec<f64>> {
        Ok(mat_vec(&self.matrix, weights)?)
    }

    /// Portfolio variance `w' Σ w`.
    pub fn portfolio_variance(&self, weights: &[f64]) -> PortfolioResult<f64> {
        Ok(quadratic_form(&self.matrix, weights)?)
    }
}

impl TryFrom<Vec<Vec<f64>>> for CovarianceMatrix {
    type Error = PortfolioError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<CovarianceMatrix> for Vec<Vec<f64>> {
    fn from(cov: CovarianceMatrix) -> Self {
        cov.to_rows()
    }
}
