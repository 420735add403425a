//! Property-based tests for portfolio analytics invariants.
//!
//! These tests verify key mathematical properties that should always hold:
//! - Prices are reconstructed from their returns
//! - Correlation pairs cover every unordered pair and stay in [-1, 1]
//! - Constant series have exactly zero variance and undefined correlation
//! - Attribution total equals the sum of its effects
//! - Optimized weights are fully invested and within bounds
//! - Minimum variance never loses to equal weighting

use proptest::prelude::*;
use vantage_portfolio::prelude::*;
use vantage_portfolio::Strategy;
#[allow(unused_imports)]
use proptest::strategy::Strategy as _;

// =============================================================================
// TEST DATA GENERATORS
// =============================================================================

/// Simple deterministic hash for test data generation.
fn simple_hash(seed: u64, i: u64) -> u64 {
    let mut x = seed.wrapping_add(i).wrapping_mul(0x517cc1b727220a95);
    x ^= x >> 32;
    x = x.wrapping_mul(0x517cc1b727220a95);
    x ^= x >> 32;
    x
}

/// Deterministic value in `[-1, 1)`.
fn unit(seed: u64, i: u64) -> f64 {
    (simple_hash(seed, i) % 2_000_000) as f64 / 1_000_000.0 - 1.0
}

/// Positive-definite covariance `0.1 A'A / n + 0.001 I` from a seeded `A`.
fn generate_covariance(n: usize, seed: u64) -> CovarianceMatrix {
    let a: Vec<Vec<f64>> = (0..n)
        .map(|k| (0..n).map(|i| unit(seed, (k * n + i) as u64)).collect())
        .collect();

    let rows: Vec<Vec<f64>> = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| {
                    let dot: f64 = (0..n).map(|k| a[k][i] * a[k][j]).sum();
                    0.1 * dot / n as f64 + if i == j { 0.001 } else { 0.0 }
                })
                .collect()
        })
        .collect();

    CovarianceMatrix::from_rows(rows).unwrap()
}

fn generate_expected_returns(n: usize, seed: u64) -> Vec<f64> {
    (0..n)
        .map(|i| 0.06 + 0.05 * unit(seed ^ 0xABCD, i as u64))
        .collect()
}

fn asset_names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("ASSET{i}")).collect()
}

fn variance_of(cov: &CovarianceMatrix, w: &[f64]) -> f64 {
    cov.portfolio_variance(w).unwrap()
}

// =============================================================================
// PROPERTY: RETURNS RECONSTRUCT PRICES
// =============================================================================

proptest! {
    #[test]
    fn property_returns_reconstruct_prices(prices in prop::collection::vec(1.0f64..1_000.0, 2..60)) {
        let returns = compute_returns(&prices).unwrap();
        prop_assert_eq!(returns.len(), prices.len() - 1);

        for (i, r) in returns.iter().enumerate() {
            let rebuilt = prices[i] * (1.0 + r);
            prop_assert!((rebuilt - prices[i + 1]).abs() <= 1e-9 * prices[i + 1]);
        }
    }

    #[test]
    fn property_negation_keeps_beta_and_flips_alpha(
        pairs in prop::collection::vec((-0.05f64..0.05, -0.05f64..0.05), 3..60)
    ) {
        let returns: Vec<f64> = pairs.iter().map(|p| p.0).collect();
        let benchmark: Vec<f64> = pairs.iter().map(|p| p.1).collect();
        let spread = benchmark.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
            - benchmark.iter().cloned().fold(f64::INFINITY, f64::min);
        prop_assume!(spread > 1e-6);

        let neg_r: Vec<f64> = returns.iter().map(|r| -r).collect();
        let neg_b: Vec<f64> = benchmark.iter().map(|b| -b).collect();

        let m = calculate_risk_metrics(&returns, &benchmark, 0.0).unwrap();
        let n = calculate_risk_metrics(&neg_r, &neg_b, 0.0).unwrap();

        prop_assert!((m.beta - n.beta).abs() <= 1e-9 * (1.0 + m.beta.abs()));
        prop_assert!((m.alpha + n.alpha).abs() <= 1e-9 * (1.0 + m.alpha.abs()));
        prop_assert!((m.volatility - n.volatility).abs() <= 1e-12);
    }

    #[test]
    fn property_correlation_pairs(n in 0usize..8, len in 2usize..20, seed in any::<u64>()) {
        let holdings: Vec<Holding> = (0..n)
            .map(|h| {
                let returns: Vec<f64> = (0..len)
                    .map(|t| 0.02 * unit(seed, (h * 100 + t) as u64))
                    .collect();
                Holding::new(format!("H{h}"), 1.0 / n as f64, returns)
            })
            .collect();

        let pairs = calculate_correlation_matrix(&holdings, &AnalyticsConfig::default()).unwrap();
        prop_assert_eq!(pairs.len(), n * n.saturating_sub(1) / 2);

        for p in &pairs {
            prop_assert!(p.asset_a != p.asset_b);
            if let Some(c) = p.correlation {
                prop_assert!((-1.0..=1.0).contains(&c));
            }
        }
    }

    #[test]
    fn property_constant_series_has_zero_variance(
        c in -0.2f64..0.2,
        len in 2usize..40,
        seed in any::<u64>(),
    ) {
        let flat = vec![c; len];
        let varying: Vec<f64> = (0..len).map(|t| 0.02 * unit(seed, t as u64)).collect();
        let spread = varying.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
            - varying.iter().cloned().fold(f64::INFINITY, f64::min);
        prop_assume!(spread > 1e-6);

        let holdings = vec![
            Holding::new("VARYING", 0.5, varying.clone()),
            Holding::new("FLAT", 0.5, flat.clone()),
        ];
        let pairs = calculate_correlation_matrix(&holdings, &AnalyticsConfig::sequential()).unwrap();
        prop_assert_eq!(pairs[0].correlation, None);

        let m = calculate_risk_metrics(&flat, &varying, 0.02).unwrap();
        prop_assert_eq!(m.volatility, 0.0);
        prop_assert!(m.warnings.iter().any(|w| w.is_division_by_zero_for("sharpe_ratio")));
    }

    #[test]
    fn property_attribution_total_is_sum(
        weights in prop::collection::vec(0.0f64..1.0, 0..10),
        len in 1usize..30,
        seed in any::<u64>(),
        benchmark_weight in 0.0f64..0.5,
    ) {
        let holdings: Vec<Holding> = weights
            .iter()
            .enumerate()
            .map(|(h, w)| {
                let returns: Vec<f64> = (0..len)
                    .map(|t| 0.03 * unit(seed, (h * 1_000 + t) as u64))
                    .collect();
                Holding::new(format!("H{h}"), *w, returns)
            })
            .collect();
        let portfolio: Vec<f64> = (0..len).map(|t| 0.01 * unit(seed ^ 1, t as u64)).collect();
        let benchmark: Vec<f64> = (0..len).map(|t| 0.01 * unit(seed ^ 2, t as u64)).collect();

        let config = AnalyticsConfig::default().with_benchmark_weight(benchmark_weight);
        let r = calculate_performance_attribution(&portfolio, &benchmark, &holdings, &config).unwrap();

        let sum = r.asset_allocation + r.security_selection + r.interaction;
        prop_assert!((r.total_attribution - sum).abs() <= 1e-9);
    }
}

// =============================================================================
// PROPERTY: OPTIMIZER WEIGHTS ARE FEASIBLE
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn property_weights_sum_to_one_within_bounds(
        n in 2usize..7,
        seed in any::<u64>(),
        lower_frac in 0.0f64..1.0,
        upper_frac in 0.0f64..1.0,
        strategy_index in 0usize..4,
    ) {
        let equal = 1.0 / n as f64;
        let lo = lower_frac * equal;
        let hi = equal + upper_frac * (1.0 - equal);
        let constraints = OptimizationConstraints::bounded(lo, hi);
        let strategy = Strategy::all()[strategy_index];

        let cov = generate_covariance(n, seed);
        let mu = generate_expected_returns(n, seed);

        let r = PortfolioOptimizer::new(AnalyticsConfig::sequential())
            .optimize(&asset_names(n), &mu, &cov, strategy, &constraints)
            .unwrap();

        let total: f64 = r.weights.iter().sum();
        prop_assert!((total - 1.0).abs() <= 1e-6, "weights sum to {}", total);
        for w in &r.weights {
            prop_assert!(*w >= lo - 1e-9 && *w <= hi + 1e-9, "weight {} outside [{}, {}]", w, lo, hi);
        }
    }
}

// =============================================================================
// PROPERTY: MIN VARIANCE BEATS EQUAL WEIGHT
// =============================================================================

#[test]
fn property_min_variance_not_worse_than_equal_weight() {
    let optimizer = PortfolioOptimizer::new(AnalyticsConfig::sequential());

    for seed in 0..10 {
        for n in [2, 3, 5, 8] {
            let cov = generate_covariance(n, seed);
            let mu = generate_expected_returns(n, seed);

            for constraints in [
                OptimizationConstraints::default(),
                OptimizationConstraints::bounded(0.0, 2.0 / n as f64),
            ] {
                let r = optimizer
                    .optimize(&asset_names(n), &mu, &cov, Strategy::MinVariance, &constraints)
                    .unwrap();

                let equal_vol = variance_of(&cov, &vec![1.0 / n as f64; n]).sqrt();
                assert!(
                    r.volatility <= equal_vol + 1e-9,
                    "min variance vol {} exceeds equal weight {} for n={}, seed={}",
                    r.volatility,
                    equal_vol,
                    n,
                    seed
                );
            }
        }
    }
}

#[test]
fn property_max_sharpe_not_worse_than_min_variance() {
    let optimizer = PortfolioOptimizer::new(AnalyticsConfig::sequential());
    let constraints = OptimizationConstraints::bounded(0.0, 0.6);

    for seed in 0..10 {
        let n = 4;
        let cov = generate_covariance(n, seed);
        let mu = generate_expected_returns(n, seed);

        let sharpe = optimizer
            .optimize(&asset_names(n), &mu, &cov, Strategy::MaxSharpe, &constraints)
            .unwrap();
        let min_var = optimizer
            .optimize(&asset_names(n), &mu, &cov, Strategy::MinVariance, &constraints)
            .unwrap();

        assert!(
            sharpe.sharpe_ratio >= min_var.sharpe_ratio - 1e-9,
            "max sharpe {} below min variance sharpe {} for seed={}",
            sharpe.sharpe_ratio,
            min_var.sharpe_ratio,
            seed
        );
    }
}

#[test]
fn property_frontier_sorted_and_above_min_variance() {
    let optimizer = PortfolioOptimizer::new(AnalyticsConfig::sequential());

    for seed in 0..5 {
        let n = 4;
        let cov = generate_covariance(n, seed);
        let mu = generate_expected_returns(n, seed);

        let frontier = optimizer
            .efficient_frontier(&asset_names(n), &mu, &cov, 6, &OptimizationConstraints::default())
            .unwrap();

        assert!(frontier
            .windows(2)
            .all(|p| p[0].expected_return <= p[1].expected_return));
        let min_risk = frontier[0].risk;
        for p in &frontier {
            assert!(p.risk >= min_risk - 1e-9, "seed={seed}");
            assert!((p.weights.iter().sum::<f64>() - 1.0).abs() <= 1e-6);
        }
    }
}
