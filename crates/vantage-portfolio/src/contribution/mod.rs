//! Contribution analysis.
//!
//! Provides return and risk decomposition:
//! - Brinson allocation / selection / interaction attribution
//! - Per-asset contributions to portfolio volatility
//!
//! # Example
//!
//! ```rust
//! use vantage_portfolio::contribution::risk_contributions;
//! use vantage_portfolio::CovarianceMatrix;
//!
//! let cov = CovarianceMatrix::diagonal(&[0.04, 0.09]).unwrap();
//! let rc = risk_contributions(&[0.6, 0.4], &cov).unwrap();
//! assert_eq!(rc.len(), 2);
//! ```

mod attribution;
mod risk;

pub use attribution::*;
pub use risk::*;
