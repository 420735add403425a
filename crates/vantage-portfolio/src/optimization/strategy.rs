//! Optimization objectives.

use crate::error::PortfolioError;
use serde::{Deserialize, Serialize};

/// Objective used by the portfolio optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Maximize `(w·μ - rf) / sqrt(w'Σw)`.
    #[default]
    MaxSharpe,
    /// Minimize `w'Σw`.
    MinVariance,
    /// Concentrate in the highest expected returns, as far as bounds allow.
    MaxReturn,
    /// Equalize each asset's contribution to portfolio variance.
    RiskParity,
}

impl Strategy {
    /// Returns all strategies.
    #[must_use]
    pub fn all() -> &'static [Strategy] {
        &[
            Strategy::MaxSharpe,
            Strategy::MinVariance,
            Strategy::MaxReturn,
            Strategy::RiskParity,
        ]
    }

    /// Returns the canonical identifier, e.g. `"max_sharpe"`.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Strategy::MaxSharpe => "max_sharpe",
            Strategy::MinVariance => "min_variance",
            Strategy::MaxReturn => "max_return",
            Strategy::RiskParity => "risk_parity",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Strategy {
    type Err = PortfolioError;

    /// Parses a strategy identifier.
    ///
    /// Accepts snake_case (`"max_sharpe"`), kebab-case (`"max-sharpe"`) and
    /// enum-style (`"MaxSharpe"`) spellings, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-' && !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "maxsharpe" | "sharpe" | "tangency" => Ok(Strategy::MaxSharpe),
            "minvariance" | "minvar" => Ok(Strategy::MinVariance),
            "maxreturn" => Ok(Strategy::MaxReturn),
            "riskparity" | "erc" => Ok(Strategy::RiskParity),
            _ => Err(PortfolioError::invalid_input(format!(
                "unknown optimization strategy '{s}'"
            ))),
        }
    }
}
