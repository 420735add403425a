//! # Vantage Math
//!
//! Numerical building blocks for the Vantage portfolio analytics library.
//!
//! This crate provides:
//!
//! - **Statistics**: Population moments, covariance and Pearson correlation
//! - **Linear Algebra**: Quadratic forms and symmetric positive-definite solves
//! - **Solvers**: Bracketing root finder (Bisection)
//! - **Optimization**: Projection onto the box-constrained simplex and
//!   projected-gradient minimization
//!
//! ## Design Philosophy
//!
//! - **Pure functions**: No shared state, safe to call from any thread
//! - **Bounded iteration**: Every iterative routine honours an explicit budget
//! - **Explicit failures**: Degenerate inputs surface as [`MathError`]

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::float_cmp)]
#![allow(clippy::uninlined_format_args)]

pub mod error;
pub mod linear_algebra;
pub mod optimization;
pub mod solvers;
pub mod statistics;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::linear_algebra::{mat_vec, quadratic_form, solve_spd};
    pub use crate::optimization::{
        project_onto_capped_simplex, projected_gradient_descent, MinimizationResult,
        OptimizationConfig,
    };
    pub use crate::solvers::{bisection, SolverConfig, SolverResult};
    pub use crate::statistics::{
        covariance, is_constant, mean, pearson_correlation, population_std_dev,
        population_variance,
    };
}

pub use error::{MathError, MathResult};
