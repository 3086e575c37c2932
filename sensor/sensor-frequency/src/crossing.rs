//! Threshold crossing scan.
//!
//! A crossing is a change of a reading's classification between "above the
//! threshold" and "at or below the threshold" relative to its predecessor.

use sensor_types::ScalarReading;

/// Result of scanning a reading sequence for threshold crossings.
///
/// # Example
///
/// ```
/// use sensor_frequency::CrossingScan;
/// use sensor_types::ScalarReading;
///
/// let readings = [
///     ScalarReading::new(0, 1.0),
///     ScalarReading::new(10, -1.0),
///     ScalarReading::new(20, 1.0),
///     ScalarReading::new(30, -1.0),
/// ];
/// let scan = CrossingScan::scan(readings.iter(), 0.0);
///
/// assert_eq!(scan.crossings(), 3);
/// assert_eq!(scan.half_cycles(), 2);
/// assert_eq!(scan.span_millis(), Some(20));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CrossingScan {
    crossings: usize,
    first_millis: Option<i64>,
    last_millis: Option<i64>,
}

impl CrossingScan {
    /// Scans readings in order for crossings of `threshold`.
    ///
    /// The first reading only establishes the initial classification. The
    /// timestamp of the first crossing is kept separately; every later
    /// crossing overwrites the last-crossing timestamp.
    #[must_use]
    pub fn scan<'a, I>(readings: I, threshold: f64) -> Self
    where
        I: IntoIterator<Item = &'a ScalarReading>,
    {
        let mut readings = readings.into_iter();
        let mut scan = Self::default();

        let Some(first) = readings.next() else {
            return scan;
        };
        let mut above = first.value > threshold;

        for reading in readings {
            let this_above = reading.value > threshold;
            if this_above == above {
                continue;
            }
            above = this_above;
            scan.crossings += 1;

            if scan.first_millis.is_none() {
                scan.first_millis = Some(reading.timestamp_millis);
            } else {
                scan.last_millis = Some(reading.timestamp_millis);
            }
        }

        scan
    }

    /// Total number of crossings found, including the leading one.
    #[must_use]
    pub const fn crossings(&self) -> usize {
        self.crossings
    }

    /// Crossings that mark completed half-cycles.
    ///
    /// The leading crossing only marks where timing starts and is not counted.
    #[must_use]
    pub const fn half_cycles(&self) -> usize {
        self.crossings.saturating_sub(1)
    }

    /// Timestamp of the first crossing.
    #[must_use]
    pub const fn first_millis(&self) -> Option<i64> {
        self.first_millis
    }

    /// Timestamp of the final crossing, if there were at least two.
    #[must_use]
    pub const fn last_millis(&self) -> Option<i64> {
        self.last_millis
    }

    /// Time between the first and final crossing.
    ///
    /// `None` when fewer than two crossings were found.
    #[must_use]
    pub fn span_millis(&self) -> Option<i64> {
        let first = self.first_millis?;
        let last = self.last_millis?;
        Some(last.saturating_sub(first))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn readings(samples: &[(i64, f64)]) -> Vec<ScalarReading> {
        samples.iter().copied().map(ScalarReading::from).collect()
    }

    #[test]
    fn scan_empty() {
        let empty: Vec<ScalarReading> = Vec::new();
        let scan = CrossingScan::scan(&empty, 0.0);
        assert_eq!(scan, CrossingScan::default());
        assert_eq!(scan.half_cycles(), 0);
        assert!(scan.span_millis().is_none());
    }

    #[test]
    fn scan_single_reading() {
        let r = readings(&[(0, 5.0)]);
        let scan = CrossingScan::scan(&r, 0.0);
        assert_eq!(scan.crossings(), 0);
    }

    #[test]
    fn scan_constant_signal() {
        let r = readings(&[(0, 1.0), (10, 1.0), (20, 1.0)]);
        let scan = CrossingScan::scan(&r, 1.0);
        assert_eq!(scan.crossings(), 0);
        assert!(scan.first_millis().is_none());
    }

    #[test]
    fn scan_single_crossing() {
        let r = readings(&[(0, -1.0), (10, -1.0), (20, 1.0), (30, 1.0)]);
        let scan = CrossingScan::scan(&r, 0.0);

        assert_eq!(scan.crossings(), 1);
        assert_eq!(scan.half_cycles(), 0);
        assert_eq!(scan.first_millis(), Some(20));
        assert!(scan.last_millis().is_none());
        assert!(scan.span_millis().is_none());
    }

    #[test]
    fn scan_records_first_and_final_crossing() {
        let r = readings(&[
            (0, 1.0),
            (10, -1.0),
            (20, -1.0),
            (30, 1.0),
            (40, -1.0),
            (50, -1.0),
        ]);
        let scan = CrossingScan::scan(&r, 0.0);

        assert_eq!(scan.crossings(), 3);
        assert_eq!(scan.first_millis(), Some(10));
        assert_eq!(scan.last_millis(), Some(40));
        assert_eq!(scan.span_millis(), Some(30));
    }

    #[test]
    fn scan_value_at_threshold_is_not_above() {
        let r = readings(&[(0, 1.0), (10, 0.5), (20, 1.0)]);
        let scan = CrossingScan::scan(&r, 0.5);
        assert_eq!(scan.crossings(), 2);
    }

    #[test]
    fn scan_nan_is_not_above() {
        let r = readings(&[(0, -1.0), (10, f64::NAN), (20, -1.0)]);
        let scan = CrossingScan::scan(&r, 0.0);
        assert_eq!(scan.crossings(), 0);
    }
}
