//! Allocation constraints for the optimizer.

use crate::error::{PortfolioError, PortfolioResult};
use serde::{Deserialize, Serialize};

/// Per-asset bounds plus advisory exposure limits.
///
/// Only `min_asset_allocation` and `max_asset_allocation` are enforced by the
/// solver. Sector, region and drift limits are carried through to the result
/// unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizationConstraints {
    /// Largest weight any single asset may hold.
    pub max_asset_allocation: f64,

    /// Smallest weight any single asset may hold.
    pub min_asset_allocation: f64,

    /// Advisory cap on a sector's total weight.
    pub max_sector_exposure: f64,

    /// Advisory cap on a region's total weight.
    pub max_region_exposure: f64,

    /// Advisory rebalancing drift tolerance.
    pub max_drift: f64,
}

impl Default for OptimizationConstraints {
    fn default() -> Self {
        Self {
            max_asset_allocation: 1.0,
            min_asset_allocation: 0.0,
            max_sector_exposure: 1.0,
            max_region_exposure: 1.0,
            max_drift: 0.05,
        }
    }
}

impl OptimizationConstraints {
    /// Creates long-only constraints with the given per-asset bounds.
    #[must_use]
    pub fn bounded(min_asset_allocation: f64, max_asset_allocation: f64) -> Self {
        Self {
            min_asset_allocation,
            max_asset_allocation,
            ..Self::default()
        }
    }

    /// Sets the per-asset maximum.
    #[must_use]
    pub fn with_max_asset_allocation(mut self, max: f64) -> Self {
        self.max_asset_allocation = max;
        self
    }

    /// Sets the per-asset minimum.
    #[must_use]
    pub fn with_min_asset_allocation(mut self, min: f64) -> Self {
        self.min_asset_allocation = min;
        self
    }

    /// Sets the advisory sector cap.
    #[must_use]
    pub fn with_max_sector_exposure(mut self, max: f64) -> Self {
        self.max_sector_exposure = max;
        self
    }

    /// Sets the advisory region cap.
    #[must_use]
    pub fn with_max_region_exposure(mut self, max: f64) -> Self {
        self.max_region_exposure = max;
        self
    }

    /// Sets the advisory drift tolerance.
    #[must_use]
    pub fn with_max_drift(mut self, drift: f64) -> Self {
        self.max_drift = drift;
        self
    }

    /// Checks that the bounds admit a fully invested portfolio of `n` assets.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for non-finite bounds, `InfeasibleConstraints` when
    /// `min > max`, `n * min > 1` or `n * max < 1`.
    pub fn validate(&self, n: usize) -> PortfolioResult<()> {
        let (lo, hi) = (self.min_asset_allocation, self.max_asset_allocation);
        if !lo.is_finite() || !hi.is_finite() {
            return Err(PortfolioError::invalid_input(
                "asset allocation bounds must be finite",
            ));
        }
        if lo > hi {
            return Err(PortfolioError::infeasible(format!(
                "min asset allocation {lo} exceeds max asset allocation {hi}"
            )));
        }

        let count = n as f64;
        if count * lo > 1.0 + BOUND_SLACK {
            return Err(PortfolioError::infeasible(format!(
                "{n} assets at minimum allocation {lo} exceed a fully invested portfolio"
            )));
        }
        if count * hi < 1.0 - BOUND_SLACK {
            return Err(PortfolioError::infeasible(format!(
                "{n} assets at maximum allocation {hi} cannot reach a fully invested portfolio"
            )));
        }
        Ok(())
    }

    /// Returns true if every weight lies within the per-asset bounds.
    #[must_use]
    pub fn admits(&self, weights: &[f64]) -> bool {
        weights.iter().all(|w| {
            *w >= self.min_asset_allocation - BOUND_SLACK
                && *w <= self.max_asset_allocation + BOUND_SLACK
        })
    }
}

/// Slack on bound checks to absorb rounding.
pub(crate) const BOUND_SLACK: f64 = 1e-12;
