//! Time-windowed buffer of scalar readings.

use std::collections::VecDeque;

use sensor_types::ScalarReading;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{FrequencyError, Result};

/// A buffer that retains only readings within a trailing time window.
///
/// Readings are appended at the tail and evicted from the head, so the
/// buffer is always in timestamp order. After every push, each retained
/// reading satisfies `timestamp >= newest - window`. The newest accepted
/// timestamp is remembered even after its reading is evicted, so ordering is
/// enforced against everything the buffer has seen.
///
/// # Example
///
/// ```
/// use sensor_frequency::ReadingWindow;
/// use sensor_types::ScalarReading;
///
/// let mut window = ReadingWindow::new(100);
/// window.push(ScalarReading::new(0, 1.0)).unwrap();
/// window.push(ScalarReading::new(50, 2.0)).unwrap();
/// window.push(ScalarReading::new(150, 3.0)).unwrap();
///
/// // The reading at t=0 fell out of the 100 ms window.
/// assert_eq!(window.len(), 2);
/// assert_eq!(window.oldest().unwrap().timestamp_millis, 50);
/// ```
#[derive(Debug, Clone)]
pub struct ReadingWindow {
    /// Retention horizon in milliseconds.
    window_millis: u64,

    /// Time-ordered readings, oldest first.
    readings: VecDeque<ScalarReading>,

    /// Newest timestamp ever accepted.
    newest_millis: Option<i64>,
}

impl ReadingWindow {
    /// Creates an empty buffer with the given retention horizon.
    #[must_use]
    pub const fn new(window_millis: u64) -> Self {
        Self {
            window_millis,
            readings: VecDeque::new(),
            newest_millis: None,
        }
    }

    /// Returns the retention horizon in milliseconds.
    #[must_use]
    pub const fn window_millis(&self) -> u64 {
        self.window_millis
    }

    /// Returns the newest timestamp ever accepted, buffered or not.
    #[must_use]
    pub const fn newest_millis(&self) -> Option<i64> {
        self.newest_millis
    }

    /// Returns the number of readings in the buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Returns true if the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Returns the oldest reading.
    #[must_use]
    pub fn oldest(&self) -> Option<&ScalarReading> {
        self.readings.front()
    }

    /// Returns the newest reading.
    #[must_use]
    pub fn latest(&self) -> Option<&ScalarReading> {
        self.readings.back()
    }

    /// Returns an iterator over readings, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &ScalarReading> {
        self.readings.iter()
    }

    /// Returns an iterator over the buffered values, oldest first.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.readings.iter().map(|r| r.value)
    }

    /// Appends a reading and evicts everything older than the new horizon.
    ///
    /// Readings with equal timestamps are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`FrequencyError::OutOfOrder`] if the reading is older than the
    /// newest one accepted so far. The buffer is left unchanged in that case.
    pub fn push(&mut self, reading: ScalarReading) -> Result<()> {
        if let Some(newest) = self.newest_millis {
            if reading.timestamp_millis < newest {
                return Err(FrequencyError::out_of_order(
                    reading.timestamp_millis,
                    newest,
                ));
            }
        }
        if !reading.is_finite() {
            debug!(
                timestamp = reading.timestamp_millis,
                value = reading.value,
                "buffering non-finite reading"
            );
        }

        self.newest_millis = Some(reading.timestamp_millis);
        self.readings.push_back(reading);
        self.prune(reading.timestamp_millis);
        Ok(())
    }

    /// Removes readings older than `now - window`.
    ///
    /// Pruning never lowers the ordering bound used by [`push`](Self::push).
    /// Returns the number of readings removed.
    pub fn prune(&mut self, now_millis: i64) -> usize {
        let horizon = now_millis.saturating_sub_unsigned(self.window_millis);
        let before = self.readings.len();

        while let Some(front) = self.readings.front() {
            if front.timestamp_millis < horizon {
                self.readings.pop_front();
            } else {
                break;
            }
        }

        let removed = before - self.readings.len();
        if removed > 0 {
            trace!(removed, horizon, "pruned readings");
        }
        removed
    }

    /// Changes the retention horizon.
    ///
    /// If the buffer is non-empty it is pruned immediately against the newest
    /// buffered timestamp. Returns the number of readings removed.
    pub fn set_window(&mut self, window_millis: u64) -> usize {
        self.window_millis = window_millis;
        let Some(newest) = self.readings.back().map(|r| r.timestamp_millis) else {
            return 0;
        };
        self.prune(newest)
    }

    /// Returns the time span between the oldest and newest reading.
    ///
    /// Returns `None` if the buffer has fewer than 2 readings.
    #[must_use]
    pub fn time_span(&self) -> Option<i64> {
        if self.readings.len() < 2 {
            return None;
        }
        let oldest = self.readings.front()?;
        let newest = self.readings.back()?;
        Some(newest.millis_since(oldest))
    }

    /// Returns the mean of the buffered values, or `None` if empty.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean(&self) -> Option<f64> {
        if self.readings.is_empty() {
            return None;
        }
        let total: f64 = self.values().sum();
        Some(total / self.readings.len() as f64)
    }
}

/// Statistics about a reading window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowStats {
    /// Number of readings.
    pub count: usize,

    /// Retention horizon in milliseconds.
    pub window_millis: u64,

    /// Oldest timestamp.
    pub min_timestamp: Option<i64>,

    /// Newest timestamp.
    pub max_timestamp: Option<i64>,

    /// Time span in milliseconds.
    pub time_span: Option<i64>,
}

impl ReadingWindow {
    /// Computes statistics about the buffer.
    #[must_use]
    pub fn stats(&self) -> WindowStats {
        WindowStats {
            count: self.len(),
            window_millis: self.window_millis,
            min_timestamp: self.oldest().map(|r| r.timestamp_millis),
            max_timestamp: self.latest().map(|r| r.timestamp_millis),
            time_span: self.time_span(),
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
    use approx::assert_relative_eq;

    fn filled(window_millis: u64, timestamps: &[i64]) -> ReadingWindow {
        let mut window = ReadingWindow::new(window_millis);
        for (i, &t) in timestamps.iter().enumerate() {
            window.push(ScalarReading::new(t, i as f64)).unwrap();
        }
        window
    }

    #[test]
    fn window_new() {
        let window = ReadingWindow::new(500);
        assert_eq!(window.window_millis(), 500);
        assert!(window.is_empty());
        assert!(window.oldest().is_none());
        assert!(window.latest().is_none());
    }

    #[test]
    fn window_push_within_horizon() {
        let window = filled(1_000, &[0, 100, 200]);
        assert_eq!(window.len(), 3);
        assert_eq!(window.latest().unwrap().timestamp_millis, 200);
    }

    #[test]
    fn window_push_prunes_head() {
        let window = filled(100, &[0, 50, 100, 150, 201]);

        // Horizon is 101: 0, 50 and 100 are gone.
        assert_eq!(window.len(), 2);
        assert_eq!(window.oldest().unwrap().timestamp_millis, 150);
    }

    #[test]
    fn window_keeps_reading_exactly_at_horizon() {
        let window = filled(100, &[0, 100]);
        assert_eq!(window.len(), 2);
    }

    #[test]
    fn window_accepts_equal_timestamps() {
        let window = filled(100, &[10, 10, 10]);
        assert_eq!(window.len(), 3);
    }

    #[test]
    fn window_rejects_out_of_order() {
        let mut window = filled(1_000, &[0, 100]);
        let err = window.push(ScalarReading::new(50, 9.0)).unwrap_err();

        assert_eq!(err, FrequencyError::out_of_order(50, 100));
        assert_eq!(window.len(), 2);
        assert_eq!(window.latest().unwrap().timestamp_millis, 100);
    }

    #[test]
    fn window_ordering_survives_eviction() {
        let mut window = filled(1_000, &[100]);
        assert_eq!(window.prune(i64::MAX), 1);
        assert!(window.is_empty());

        let err = window.push(ScalarReading::new(50, 0.0)).unwrap_err();

        assert_eq!(err, FrequencyError::out_of_order(50, 100));
        assert!(window.is_empty());
        assert_eq!(window.newest_millis(), Some(100));
    }

    #[test]
    fn window_accepts_non_finite_values() {
        let mut window = ReadingWindow::new(1_000);
        window.push(ScalarReading::new(0, f64::NAN)).unwrap();
        window.push(ScalarReading::new(10, f64::INFINITY)).unwrap();

        assert_eq!(window.len(), 2);
        assert_eq!(window.newest_millis(), Some(10));
    }

    #[test]
    fn window_zero_width() {
        let window = filled(0, &[0, 10, 10]);
        assert_eq!(window.len(), 2);
        assert!(window.iter().all(|r| r.timestamp_millis == 10));
    }

    #[test]
    fn window_prune_saturates() {
        let mut window = ReadingWindow::new(u64::MAX);
        window.push(ScalarReading::new(i64::MIN, 1.0)).unwrap();
        window.push(ScalarReading::new(i64::MAX, 2.0)).unwrap();
        assert_eq!(window.len(), 2);
    }

    #[test]
    fn window_set_window_prunes_against_newest() {
        let mut window = filled(1_000, &[0, 200, 400, 600, 800]);

        let removed = window.set_window(300);

        // Horizon is 500: 0, 200 and 400 are gone.
        assert_eq!(removed, 3);
        assert_eq!(window.window_millis(), 300);
        assert_eq!(window.oldest().unwrap().timestamp_millis, 600);
    }

    #[test]
    fn window_set_window_on_empty() {
        let mut window = ReadingWindow::new(1_000);
        assert_eq!(window.set_window(10), 0);
        assert_eq!(window.window_millis(), 10);
    }

    #[test]
    fn window_widening_keeps_readings() {
        let mut window = filled(100, &[0, 50, 100]);
        assert_eq!(window.set_window(10_000), 0);
        assert_eq!(window.len(), 3);
    }

    #[test]
    fn window_time_span() {
        let mut window = ReadingWindow::new(1_000);
        assert!(window.time_span().is_none());

        window.push(ScalarReading::new(100, 0.0)).unwrap();
        assert!(window.time_span().is_none());

        window.push(ScalarReading::new(350, 0.0)).unwrap();
        assert_eq!(window.time_span(), Some(250));
    }

    #[test]
    fn window_mean() {
        let mut window = ReadingWindow::new(1_000);
        assert!(window.mean().is_none());

        window.push(ScalarReading::new(0, 1.0)).unwrap();
        window.push(ScalarReading::new(1, 2.0)).unwrap();
        window.push(ScalarReading::new(2, 6.0)).unwrap();

        assert_relative_eq!(window.mean().unwrap(), 3.0);
    }

    #[test]
    fn window_values_in_order() {
        let window = filled(1_000, &[0, 1, 2]);
        let values: Vec<f64> = window.values().collect();
        assert_eq!(values, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn window_stats() {
        let window = filled(1_000, &[10, 20, 70]);
        let stats = window.stats();

        assert_eq!(stats.count, 3);
        assert_eq!(stats.window_millis, 1_000);
        assert_eq!(stats.min_timestamp, Some(10));
        assert_eq!(stats.max_timestamp, Some(70));
        assert_eq!(stats.time_span, Some(60));
    }

    #[test]
    fn window_stats_empty() {
        let stats = ReadingWindow::new(1_000).stats();

        assert_eq!(stats.count, 0);
        assert!(stats.min_timestamp.is_none());
        assert!(stats.max_timestamp.is_none());
        assert!(stats.time_span.is_none());
    }
}
