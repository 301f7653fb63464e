//! Property-based tests for the windowed moment tracker and the spread signal.
//!
//! These tests use proptest to check the incremental statistics against a
//! direct recomputation across many random windows.

use autotrader::math::WindowedStats;
use autotrader::strategy::SpreadSignalEngine;
use autotrader::types::Instrument;
use proptest::prelude::*;

fn tolerance(values: &[f64]) -> f64 {
    let max_abs = values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    1e-9 * (1.0 + max_abs)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Window never exceeds capacity and evicts oldest first
    #[test]
    fn window_is_bounded_fifo(
        capacity in 1usize..40,
        values in prop::collection::vec(-1.0e6f64..1.0e6, 0..200)
    ) {
        let mut stats = WindowedStats::new(capacity);
        for (i, &value) in values.iter().enumerate() {
            let evicted = stats.push(value);
            prop_assert!(stats.len() <= capacity);

            if i >= capacity {
                prop_assert_eq!(evicted, Some(values[i - capacity]));
            } else {
                prop_assert_eq!(evicted, None);
            }

            let start = (i + 1).saturating_sub(capacity);
            let expected: Vec<f64> = values[start..=i].to_vec();
            let window: Vec<f64> = stats.iter().copied().collect();
            prop_assert_eq!(window, expected);
        }
    }

    /// Incremental mean matches the arithmetic mean of the window
    #[test]
    fn incremental_mean_matches_oracle(
        capacity in 1usize..40,
        values in prop::collection::vec(-1.0e6f64..1.0e6, 1..200)
    ) {
        let tol = tolerance(&values);
        let mut stats = WindowedStats::new(capacity);
        for &value in &values {
            stats.push(value);
            let oracle = stats.recompute();
            prop_assert!(
                (stats.mean() - oracle.mean).abs() <= tol,
                "mean {} vs oracle {}", stats.mean(), oracle.mean
            );
        }
    }

    /// Incremental sample variance matches the direct sum of squared deviations
    #[test]
    fn incremental_variance_matches_oracle(
        capacity in 1usize..40,
        values in prop::collection::vec(-1.0e4f64..1.0e4, 1..200)
    ) {
        let max_abs = values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
        let tol = 1e-7 * (1.0 + max_abs * max_abs);
        let mut stats = WindowedStats::new(capacity);
        for &value in &values {
            stats.push(value);
            let oracle = stats.recompute();
            prop_assert!(stats.variance() >= 0.0);
            prop_assert!(
                (stats.variance() - oracle.variance).abs() <= tol,
                "variance {} vs oracle {}", stats.variance(), oracle.variance
            );
        }
    }

    /// The score never depends on the observation being scored
    #[test]
    fn signal_uses_only_prior_spreads(
        spreads in prop::collection::vec(0u64..5_000, 2..60)
    ) {
        let mut engine = SpreadSignalEngine::new(100);
        let mut shadow = WindowedStats::new(100);

        engine.update_and_signal(Instrument::Index, 10_000, 10_000);
        for spread in spreads {
            let price = 10_000 + spread;
            let expected = shadow.z_score(spread as f64);
            let signal = engine.update_and_signal(Instrument::Future, price, price);
            shadow.push(spread as f64);

            prop_assert!(signal.value >= 0.0);
            prop_assert!(signal.value.is_finite());
            prop_assert!((signal.value - expected).abs() <= 1e-9 * (1.0 + expected));
        }
    }
}

#[test]
fn test_single_push_has_zero_std() {
    let mut stats = WindowedStats::new(100);
    stats.push(200.0);
    assert_eq!(stats.standard_deviation(), 0.0);
    assert_eq!(stats.z_score(1_000.0), 0.0);
}

#[test]
fn test_constant_window_gives_zero_signal() {
    let mut stats = WindowedStats::new(5);
    for _ in 0..20 {
        stats.push(42.0);
    }
    assert_eq!(stats.standard_deviation(), 0.0);
    assert_eq!(stats.z_score(42.0), 0.0);
}
