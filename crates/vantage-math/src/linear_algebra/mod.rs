//! Linear algebra utilities.
//!
//! Thin helpers over `nalgebra` dense matrices for covariance work:
//! matrix-vector products, quadratic forms and symmetric positive-definite
//! solves.

use crate::error::{MathError, MathResult};
use nalgebra::{DMatrix, DVector};

/// Checks that `v` conforms to the column count of `matrix`.
fn check_conformable(matrix: &DMatrix<f64>, v: &[f64]) -> MathResult<()> {
    if matrix.ncols() != v.len() {
        return Err(MathError::DimensionMismatch {
            rows1: matrix.nrows(),
            cols1: matrix.ncols(),
            rows2: v.len(),
            cols2: 1,
        });
    }
    Ok(())
}

/// Computes the matrix-vector product `M v`.
pub fn mat_vec(matrix: &DMatrix<f64>, v: &[f64]) -> MathResult<Vec<f64>> {
    check_conformable(matrix, v)?;
    let product = matrix * DVector::from_column_slice(v);
    Ok(product.iter().copied().collect())
}

/// Computes the quadratic form `v' M v`.
pub fn quadratic_form(matrix: &DMatrix<f64>, v: &[f64]) -> MathResult<f64> {
    let mv = mat_vec(matrix, v)?;
    Ok(v.iter().zip(&mv).map(|(a, b)| a * b).sum())
}

/// Returns true if `matrix` is square and symmetric within `tolerance`.
pub fn is_symmetric(matrix: &DMatrix<f64>, tolerance: f64) -> bool {
    let n = matrix.nrows();
    if n != matrix.ncols() {
        return false;
    }
    for i in 0..n {
        for j in (i + 1)..n {
            if (matrix[(i, j)] - matrix[(j, i)]).abs() > tolerance {
                return false;
            }
        }
    }
    true
}

/// Solves `A x = b` for a symmetric positive-definite `A` via Cholesky.
///
/// Returns [`MathError::SingularMatrix`] when `A` is not positive definite.
pub fn solve_spd(a: &DMatrix<f64>, b: &[f64]) -> MathResult<Vec<f64>> {
    let n = a.nrows();
    if n != a.ncols() {
        return Err(MathError::invalid_input("Matrix must be square"));
    }
    if n != b.len() {
        return Err(MathError::DimensionMismatch {
            rows1: n,
            cols1: n,
            rows2: b.len(),
            cols2: 1,
        });
    }

    let cholesky = a.clone().cholesky().ok_or(MathError::SingularMatrix)?;
    let x = cholesky.solve(&DVector::from_column_slice(b));

    if x.iter().any(|v| !v.is_finite()) {
        return Err(MathError::SingularMatrix);
    }

    Ok(x.iter().copied().collect())
}
