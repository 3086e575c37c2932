//! Property-based tests for the frequency estimator.
//!
//! Run with: cargo test -p sensor-frequency -- proptest

#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;
use sensor_frequency::{FrequencyError, FrequencyEstimator};

// =============================================================================
// Strategies
// =============================================================================

/// Non-decreasing timestamps built from random gaps, paired with values.
fn arb_stream(max_len: usize) -> impl Strategy<Value = Vec<(i64, f64)>> {
    prop::collection::vec((0..50i64, -100.0..100.0f64), 0..max_len).prop_map(|steps| {
        let mut t = 0;
        steps
            .into_iter()
            .map(|(gap, value)| {
                t += gap;
                (t, value)
            })
            .collect()
    })
}

fn arb_estimator() -> impl Strategy<Value = FrequencyEstimator> {
    (0..2_000u64, 1.0..100_000.0f64, 0.0..10.0f64).prop_map(|(window, denominator, filter)| {
        FrequencyEstimator::new(window, denominator, filter).unwrap()
    })
}

// =============================================================================
// Property Tests: Buffer
// =============================================================================

proptest! {
    /// Every retained reading lies within the window of the latest observation.
    #[test]
    fn pruning_keeps_window_invariant(
        mut estimator in arb_estimator(),
        stream in arb_stream(300),
    ) {
        let window = i64::try_from(estimator.window_millis()).unwrap();
        for (t, value) in stream {
            estimator.observe(t, value).unwrap();

            prop_assert!(estimator.readings().iter().all(|r| r.timestamp_millis >= t - window));
            prop_assert_eq!(estimator.readings().latest().map(|r| r.timestamp_millis), Some(t));
        }
    }

    /// Shrinking the window prunes against the newest reading right away.
    #[test]
    fn change_window_keeps_window_invariant(
        mut estimator in arb_estimator(),
        stream in arb_stream(200),
        new_window in 0..500u64,
    ) {
        for (t, value) in &stream {
            estimator.observe(*t, *value).unwrap();
        }
        estimator.change_window(new_window);

        if let Some(newest) = estimator.readings().latest().map(|r| r.timestamp_millis) {
            let horizon = newest - i64::try_from(new_window).unwrap();
            prop_assert!(estimator.readings().iter().all(|r| r.timestamp_millis >= horizon));
        } else {
            prop_assert!(stream.is_empty());
        }
    }

    /// A reading older than the newest one is rejected without side effects.
    #[test]
    fn out_of_order_is_rejected(
        mut estimator in arb_estimator(),
        stream in arb_stream(100),
        back in 1..1_000i64,
    ) {
        for (t, value) in &stream {
            estimator.observe(*t, *value).unwrap();
        }
        let Some(newest) = estimator.readings().latest().map(|r| r.timestamp_millis) else {
            return Ok(());
        };
        let len = estimator.len();

        let result = estimator.observe(newest - back, 0.0);

        prop_assert_eq!(result, Err(FrequencyError::out_of_order(newest - back, newest)));
        prop_assert_eq!(estimator.len(), len);
    }
}

// =============================================================================
// Property Tests: Estimate
// =============================================================================

proptest! {
    /// Estimates are finite and non-negative for any in-order stream.
    #[test]
    fn frequency_is_finite_and_non_negative(
        mut estimator in arb_estimator(),
        stream in arb_stream(300),
    ) {
        for (t, value) in stream {
            let frequency = estimator.observe(t, value).unwrap();
            prop_assert!(frequency.is_finite());
            prop_assert!(frequency >= 0.0);
        }
    }

    /// Recomputing without new input returns the same value.
    #[test]
    fn recompute_is_idempotent(
        mut estimator in arb_estimator(),
        stream in arb_stream(300),
    ) {
        let mut observed = 0.0;
        for (t, value) in stream {
            observed = estimator.observe(t, value).unwrap();
        }

        let first = estimator.current_frequency();
        let second = estimator.current_frequency();
        prop_assert_eq!(first.to_bits(), second.to_bits());
        prop_assert_eq!(first.to_bits(), observed.to_bits());
    }

    /// A constant signal never oscillates.
    #[test]
    fn constant_signal_is_zero(
        mut estimator in arb_estimator(),
        stream in arb_stream(200),
        level in -1_000.0..1_000.0f64,
    ) {
        for (t, _) in stream {
            prop_assert_eq!(estimator.observe(t, level).unwrap(), 0.0);
        }
    }
}
