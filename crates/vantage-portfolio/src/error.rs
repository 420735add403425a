//! Error types for portfolio analytics.
//!
//! Fatal conditions are reported through [`PortfolioError`]. Non-fatal
//! conditions (a zero ratio denominator, an iterative solver running out of
//! budget) are attached to results as [`crate::types::AnalyticsWarning`]
//! values instead.

use thiserror::Error;
use vantage_math::MathError;

/// Result type for portfolio operations.
pub type PortfolioResult<T> = Result<T, PortfolioError>;

/// Errors that can occur during portfolio analytics.
#[derive(Error, Debug, Clone)]
pub enum PortfolioError {
    /// Malformed input (non-positive price, empty matrix, non-finite value).
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// The reason the input is invalid.
        reason: String,
    },

    /// A series is too short for the requested statistic.
    #[error("Insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData {
        /// Minimum number of observations.
        required: usize,
        /// Observations provided.
        actual: usize,
    },

    /// Two inputs that must align have different lengths.
    #[error("Length mismatch in {context}: expected {expected}, got {actual}")]
    LengthMismatch {
        /// What was being compared.
        context: String,
        /// The expected length.
        expected: usize,
        /// The actual length.
        actual: usize,
    },

    /// Optimizer constraints admit no valid weight vector.
    #[error("Infeasible constraints: {reason}")]
    InfeasibleConstraints {
        /// Why the feasible region is empty.
        reason: String,
    },

    /// Numerical failure in the math layer.
    #[error(transparent)]
    Math(MathError),
}

impl PortfolioError {
    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Create an insufficient data error.
    #[must_use]
    pub fn insufficient_data(required: usize, actual: usize) -> Self {
        Self::InsufficientData { required, actual }
    }

    /// Create a length mismatch error.
    #[must_use]
    pub fn length_mismatch(context: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::LengthMismatch {
            context: context.into(),
            expected,
            actual,
        }
    }

    /// Create an infeasible constraints error.
    #[must_use]
    pub fn infeasible(reason: impl Into<String>) -> Self {
        Self::InfeasibleConstraints {
            reason: reason.into(),
        }
    }

    /// Returns true for every kind of malformed-input failure.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput { .. } | Self::InsufficientData { .. } | Self::LengthMismatch { .. }
        )
    }

    /// Returns true if the optimizer's feasible region was empty.
    #[must_use]
    pub fn is_infeasible(&self) -> bool {
        matches!(self, Self::InfeasibleConstraints { .. })
    }
}

impl From<MathError> for PortfolioError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::Infeasible { reason } => Self::InfeasibleConstraints { reason },
            MathError::InvalidInput { reason } => Self::InvalidInput { reason },
            MathError::InsufficientData { required, actual } => {
                Self::InsufficientData { required, actual }
            }
            other => Self::Math(other),
        }
    }
}
