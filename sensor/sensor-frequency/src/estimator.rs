//! Sliding-window frequency estimation by zero-crossing counting.

use sensor_types::{ScalarReading, ValueFilter};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{FrequencyConfig, validate_filter};
use crate::crossing::CrossingScan;
use crate::error::Result;
use crate::window::{ReadingWindow, WindowStats};

/// Why an estimate came out the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EstimateStatus {
    /// A frequency was measured.
    Measured,

    /// Fewer than two readings are buffered.
    InsufficientData,

    /// Fewer than two crossings of the threshold.
    NoOscillation,

    /// Crossing activity spans less than a quarter of the window, so the
    /// signal is treated as having stopped.
    SignalQuiet,

    /// The crossings span zero time in output units.
    ZeroSpan,
}

/// A frequency estimate with the intermediate values that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencyEstimate {
    /// Estimated frequency in output units, `0.0` unless `status` is
    /// [`EstimateStatus::Measured`].
    pub frequency: f64,

    /// Outcome of the estimate.
    pub status: EstimateStatus,

    /// Number of buffered readings.
    pub samples: usize,

    /// Crossing threshold (mean plus filter), if computed.
    pub threshold: Option<f64>,

    /// Half-cycles counted after discarding the leading crossing.
    pub half_cycles: usize,

    /// Time between the first and final crossing.
    pub span_millis: Option<i64>,
}

impl FrequencyEstimate {
    const fn insufficient(samples: usize) -> Self {
        Self {
            frequency: 0.0,
            status: EstimateStatus::InsufficientData,
            samples,
            threshold: None,
            half_cycles: 0,
            span_millis: None,
        }
    }

    /// Returns true if a nonzero frequency was measured.
    #[must_use]
    pub fn is_measured(&self) -> bool {
        self.status == EstimateStatus::Measured
    }
}

/// Estimates the dominant frequency of a scalar stream over a sliding window.
///
/// Each observed reading is buffered; readings older than the window are
/// evicted. The estimate counts crossings of `mean + filter` and converts the
/// time spanned by those crossings into cycles per output unit. Every
/// degenerate case (too few samples, a flat or noisy signal, a signal that
/// went quiet) reports `0.0`.
///
/// Access is single-owner: mutation needs `&mut self`, so sharing across
/// threads requires external synchronization.
///
/// # Example
///
/// ```
/// use sensor_frequency::FrequencyEstimator;
///
/// // 1 s window, Hz output, 0.1 deadband.
/// let mut estimator = FrequencyEstimator::new(1_000, 1_000.0, 0.1).unwrap();
///
/// // Square wave with a 100 ms period, sampled every 10 ms.
/// let mut frequency = 0.0;
/// for t in (0..1_000).step_by(10) {
///     let value = if (t / 50) % 2 == 0 { 1.0 } else { -1.0 };
///     frequency = estimator.observe(t, value).unwrap();
/// }
///
/// assert!((frequency - 10.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct FrequencyEstimator {
    readings: ReadingWindow,
    denominator_millis: f64,
    filter: f64,
}

impl Default for FrequencyEstimator {
    fn default() -> Self {
        let config = FrequencyConfig::default();
        Self {
            readings: ReadingWindow::new(config.window_millis),
            denominator_millis: config.denominator_millis,
            filter: config.filter,
        }
    }
}

impl FrequencyEstimator {
    /// Creates an estimator.
    ///
    /// # Arguments
    ///
    /// - `window_millis`: How many milliseconds of data to keep
    /// - `denominator_millis`: Milliseconds per output unit (1000 for Hz, 60000 for RPM)
    /// - `filter`: Deadband added to the mean; smaller oscillations are ignored
    ///
    /// # Errors
    ///
    /// Returns [`FrequencyError::InvalidConfig`](crate::FrequencyError::InvalidConfig)
    /// if the denominator is not positive and finite, or the filter is not finite.
    pub fn new(window_millis: u64, denominator_millis: f64, filter: f64) -> Result<Self> {
        Self::with_config(FrequencyConfig {
            window_millis,
            denominator_millis,
            filter,
        })
    }

    /// Creates an estimator from a config.
    ///
    /// # Errors
    ///
    /// Returns an error if [`FrequencyConfig::validate`] fails.
    pub fn with_config(config: FrequencyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            readings: ReadingWindow::new(config.window_millis),
            denominator_millis: config.denominator_millis,
            filter: config.filter,
        })
    }

    /// Returns the current parameters.
    #[must_use]
    pub const fn config(&self) -> FrequencyConfig {
        FrequencyConfig {
            window_millis: self.readings.window_millis(),
            denominator_millis: self.denominator_millis,
            filter: self.filter,
        }
    }

    /// Returns the retention window in milliseconds.
    #[must_use]
    pub const fn window_millis(&self) -> u64 {
        self.readings.window_millis()
    }

    /// Returns the milliseconds per output unit.
    #[must_use]
    pub const fn denominator_millis(&self) -> f64 {
        self.denominator_millis
    }

    /// Returns the crossing deadband.
    #[must_use]
    pub const fn filter(&self) -> f64 {
        self.filter
    }

    /// Returns the buffered readings.
    #[must_use]
    pub const fn readings(&self) -> &ReadingWindow {
        &self.readings
    }

    /// Returns the number of buffered readings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Returns true if no readings are buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Returns statistics about the buffered readings.
    #[must_use]
    pub fn stats(&self) -> WindowStats {
        self.readings.stats()
    }

    /// Buffers a reading and returns the updated frequency.
    ///
    /// Readings older than `timestamp - window` are evicted first.
    ///
    /// # Errors
    ///
    /// Returns [`FrequencyError::OutOfOrder`](crate::FrequencyError::OutOfOrder)
    /// if `timestamp` is before the newest buffered reading. The estimator is
    /// left unchanged.
    pub fn observe(&mut self, timestamp_millis: i64, value: f64) -> Result<f64> {
        self.observe_reading(ScalarReading::new(timestamp_millis, value))
    }

    /// Buffers a [`ScalarReading`] and returns the updated frequency.
    ///
    /// # Errors
    ///
    /// See [`observe`](Self::observe).
    pub fn observe_reading(&mut self, reading: ScalarReading) -> Result<f64> {
        self.readings.push(reading)?;
        Ok(self.compute_frequency())
    }

    /// Changes the window and prunes against the newest buffered timestamp.
    pub fn change_window(&mut self, window_millis: u64) {
        let removed = self.readings.set_window(window_millis);
        debug!(window_millis, removed, "frequency window changed");
    }

    /// Changes the deadband. Applies from the next computation.
    ///
    /// # Errors
    ///
    /// Returns [`FrequencyError::InvalidConfig`](crate::FrequencyError::InvalidConfig)
    /// if `filter` is not finite. The previous filter is kept.
    pub fn change_filter(&mut self, filter: f64) -> Result<()> {
        validate_filter(filter)?;
        self.filter = filter;
        debug!(filter, "frequency filter changed");
        Ok(())
    }

    /// Recomputes the frequency from the buffered readings.
    #[must_use]
    pub fn compute_frequency(&self) -> f64 {
        self.estimate().frequency
    }

    /// Returns the frequency for the current buffer.
    ///
    /// Same as [`compute_frequency`](Self::compute_frequency): the value is
    /// always derived from the buffer, so repeated calls agree.
    #[must_use]
    pub fn current_frequency(&self) -> f64 {
        self.compute_frequency()
    }

    /// Recomputes the frequency and reports how it was derived.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn estimate(&self) -> FrequencyEstimate {
        let samples = self.readings.len();
        if samples < 2 {
            return FrequencyEstimate::insufficient(samples);
        }
        let Some(mean) = self.readings.mean() else {
            return FrequencyEstimate::insufficient(samples);
        };

        // Shifting the threshold by the filter keeps small wobble from counting.
        let threshold = mean + self.filter;
        let scan = CrossingScan::scan(self.readings.iter(), threshold);

        let mut estimate = FrequencyEstimate {
            frequency: 0.0,
            status: EstimateStatus::NoOscillation,
            samples,
            threshold: Some(threshold),
            half_cycles: scan.half_cycles(),
            span_millis: scan.span_millis(),
        };

        let Some(span) = scan.span_millis() else {
            return estimate;
        };

        let quarter_window = self.readings.window_millis() / 4;
        if !u64::try_from(span).is_ok_and(|span| span >= quarter_window) {
            estimate.status = EstimateStatus::SignalQuiet;
            return estimate;
        }

        let span_units = span as f64 / self.denominator_millis;
        if span_units <= 0.0 {
            estimate.status = EstimateStatus::ZeroSpan;
            return estimate;
        }

        let cycles = scan.half_cycles() as f64 / 2.0;
        estimate.frequency = cycles / span_units;
        estimate.status = EstimateStatus::Measured;
        estimate
    }
}

impl ValueFilter for FrequencyEstimator {
    /// Observes a sample and returns the frequency.
    ///
    /// Out-of-order samples are dropped and the current frequency is returned.
    fn filter_value(&mut self, timestamp_millis: i64, value: f64) -> f64 {
        match self.observe(timestamp_millis, value) {
            Ok(frequency) => frequency,
            Err(err) => {
                warn!(%err, "dropping reading");
                self.compute_frequency()
            }
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::cast_precision_loss
)]
mod tests {
    use super::*;
    use crate::error::FrequencyError;
    use approx::assert_relative_eq;

    /// Square wave of amplitude `amplitude` with `period` ms, sampled every `step` ms.
    fn square(
        estimator: &mut FrequencyEstimator,
        range: std::ops::Range<i64>,
        step: usize,
        period: i64,
        amplitude: f64,
    ) -> f64 {
        let mut frequency = 0.0;
        for t in range.step_by(step) {
            let value = if (t / (period / 2)) % 2 == 0 {
                amplitude
            } else {
                -amplitude
            };
            frequency = estimator.observe(t, value).unwrap();
        }
        frequency
    }

    fn hz(window_millis: u64, filter: f64) -> FrequencyEstimator {
        FrequencyEstimator::new(window_millis, 1_000.0, filter).unwrap()
    }

    #[test]
    fn estimator_default() {
        let estimator = FrequencyEstimator::default();
        assert_eq!(estimator.config(), FrequencyConfig::default());
        assert!(estimator.is_empty());
    }

    #[test]
    fn estimator_rejects_invalid_denominator() {
        let err = FrequencyEstimator::new(1_000, 0.0, 0.0).unwrap_err();
        assert!(matches!(err, FrequencyError::InvalidConfig(_)));
    }

    #[test]
    fn no_readings() {
        let estimator = hz(1_000, 0.0);
        assert_eq!(estimator.current_frequency(), 0.0);
        assert_eq!(estimator.estimate().status, EstimateStatus::InsufficientData);
    }

    #[test]
    fn single_reading() {
        let mut estimator = hz(1_000, 0.0);
        assert_eq!(estimator.observe(0, 5.0).unwrap(), 0.0);
        assert_eq!(estimator.estimate().status, EstimateStatus::InsufficientData);
    }

    #[test]
    fn constant_signal() {
        let mut estimator = hz(1_000, 0.0);
        for t in (0..1_000).step_by(10) {
            assert_eq!(estimator.observe(t, 3.0).unwrap(), 0.0);
        }
        let estimate = estimator.estimate();
        assert_eq!(estimate.status, EstimateStatus::NoOscillation);
        assert_relative_eq!(estimate.threshold.unwrap(), 3.0);
    }

    #[test]
    fn square_wave_hz() {
        let mut estimator = hz(1_000, 0.1);
        let frequency = square(&mut estimator, 0..1_000, 10, 100, 1.0);

        // Flips at 50, 100, ..., 950: 18 half-cycles over 900 ms.
        assert_relative_eq!(frequency, 10.0, epsilon = 1e-9);

        let estimate = estimator.estimate();
        assert!(estimate.is_measured());
        assert_eq!(estimate.half_cycles, 18);
        assert_eq!(estimate.span_millis, Some(900));
    }

    #[test]
    fn square_wave_rpm() {
        let mut estimator = FrequencyEstimator::new(1_000, 60_000.0, 0.1).unwrap();
        let frequency = square(&mut estimator, 0..1_000, 10, 100, 1.0);
        assert_relative_eq!(frequency, 600.0, epsilon = 1e-6);
    }

    #[test]
    fn noise_below_filter() {
        let mut estimator = hz(1_000, 0.1);
        let frequency = square(&mut estimator, 0..1_000, 10, 100, 0.05);

        assert_eq!(frequency, 0.0);
        assert_eq!(estimator.estimate().status, EstimateStatus::NoOscillation);
    }

    #[test]
    fn quiet_signal() {
        let mut estimator = hz(1_000, 0.1);
        square(&mut estimator, 0..200, 10, 40, 1.0);

        let mut frequency = 1.0;
        for t in (200..1_000).step_by(10) {
            frequency = estimator.observe(t, 0.0).unwrap();
        }

        assert_eq!(frequency, 0.0);
        let estimate = estimator.estimate();
        assert_eq!(estimate.status, EstimateStatus::SignalQuiet);
        assert!(estimate.half_cycles > 0);
    }

    #[test]
    fn zero_span_crossings() {
        // Window under 4 ms makes the quiet check pass for a zero span.
        let mut estimator = hz(3, 0.0);
        estimator.observe(5, -1.0).unwrap();
        estimator.observe(5, 1.0).unwrap();
        let frequency = estimator.observe(5, -1.0).unwrap();

        assert_eq!(frequency, 0.0);
        let estimate = estimator.estimate();
        assert_eq!(estimate.status, EstimateStatus::ZeroSpan);
        assert!(estimate.frequency.is_finite());
    }

    #[test]
    fn change_window_prunes_immediately() {
        let mut estimator = hz(1_000, 0.0);
        for t in (0..=1_000).step_by(100) {
            estimator.observe(t, 0.0).unwrap();
        }
        assert_eq!(estimator.len(), 11);

        estimator.change_window(250);

        assert_eq!(estimator.window_millis(), 250);
        assert_eq!(estimator.len(), 3);
        assert_eq!(estimator.readings().oldest().unwrap().timestamp_millis, 800);
    }

    #[test]
    fn change_filter_applies_on_next_computation() {
        let mut estimator = hz(1_000, 0.0);
        square(&mut estimator, 0..1_000, 10, 100, 1.0);
        assert!(estimator.current_frequency() > 0.0);

        estimator.change_filter(2.0).unwrap();

        assert_eq!(estimator.filter(), 2.0);
        assert_eq!(estimator.current_frequency(), 0.0);
    }

    #[test]
    fn change_filter_rejects_non_finite() {
        let mut estimator = hz(1_000, 0.1);
        square(&mut estimator, 0..1_000, 10, 100, 1.0);
        let before = estimator.current_frequency();

        for filter in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = estimator.change_filter(filter).unwrap_err();
            assert!(matches!(err, FrequencyError::InvalidConfig(_)));
        }

        assert_eq!(estimator.filter(), 0.1);
        assert_eq!(estimator.current_frequency(), before);
    }

    /// Feeds a flat signal at 0.0, sampled every 1 ms, with single-sample
    /// spikes to 1.0 at `spikes`.
    fn spiked(estimator: &mut FrequencyEstimator, end: i64, spikes: &[i64]) {
        for t in 0..end {
            let value = if spikes.contains(&t) { 1.0 } else { 0.0 };
            estimator.observe(t, value).unwrap();
        }
    }

    #[test]
    fn quiet_check_uses_integer_quarter_window() {
        // 1003 / 4 truncates to 250; a fractional quarter would be 250.75.
        let mut estimator = hz(1_003, 0.0);
        spiked(&mut estimator, 1_000, &[100, 349]);

        // Crossings at 100, 101, 349, 350: span is exactly the quarter.
        let estimate = estimator.estimate();
        assert_eq!(estimate.span_millis, Some(250));
        assert_eq!(estimate.status, EstimateStatus::Measured);
        assert!(estimate.frequency > 0.0);
    }

    #[test]
    fn quiet_check_rejects_span_below_quarter() {
        let mut estimator = hz(1_000, 0.0);
        spiked(&mut estimator, 1_000, &[100, 348]);

        // Crossings at 100, 101, 348, 349: span is 1 ms under the quarter.
        let estimate = estimator.estimate();
        assert_eq!(estimate.span_millis, Some(249));
        assert_eq!(estimate.status, EstimateStatus::SignalQuiet);
        assert_eq!(estimate.frequency, 0.0);
    }

    #[test]
    fn recompute_is_idempotent() {
        let mut estimator = hz(1_000, 0.1);
        square(&mut estimator, 0..1_000, 10, 100, 1.0);

        let first = estimator.current_frequency();
        let second = estimator.current_frequency();
        assert_eq!(first.to_bits(), second.to_bits());
        assert_eq!(estimator.estimate(), estimator.estimate());
    }

    #[test]
    fn out_of_order_observe_is_rejected() {
        let mut estimator = hz(1_000, 0.0);
        estimator.observe(100, 1.0).unwrap();
        estimator.observe(200, -1.0).unwrap();

        let err = estimator.observe(150, 1.0).unwrap_err();

        assert_eq!(err, FrequencyError::out_of_order(150, 200));
        assert_eq!(estimator.len(), 2);
    }

    #[test]
    fn value_filter_drops_out_of_order() {
        let mut estimator = hz(1_000, 0.1);
        let expected = square(&mut estimator, 0..1_000, 10, 100, 1.0);
        let len = estimator.len();

        let frequency = estimator.filter_value(0, 100.0);

        assert_eq!(frequency, expected);
        assert_eq!(estimator.len(), len);
    }

    #[test]
    fn value_filter_observes_in_order() {
        let mut estimator = hz(1_000, 0.0);
        estimator.filter_reading(&ScalarReading::new(0, 1.0));
        estimator.filter_value(10, -1.0);
        assert_eq!(estimator.len(), 2);
    }

    #[test]
    fn estimate_serialization() {
        let mut estimator = hz(1_000, 0.1);
        square(&mut estimator, 0..1_000, 10, 100, 1.0);

        let json = serde_json::to_string(&estimator.estimate()).unwrap();
        assert!(json.contains("Measured"));

        let parsed: FrequencyEstimate = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.status, EstimateStatus::Measured);
    }
}
