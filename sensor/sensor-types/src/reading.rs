//! Timestamped scalar readings.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single scalar sample with a millisecond timestamp.
///
/// Readings are plain values: the producer owns the clock and the consumer
/// only reads them.
///
/// # Example
///
/// ```
/// use sensor_types::ScalarReading;
///
/// let reading = ScalarReading::new(250, -1.5);
/// assert_eq!(reading.timestamp_millis, 250);
/// assert!(reading.is_before(&ScalarReading::new(300, 0.0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScalarReading {
    /// Collection time in milliseconds (epoch or stream start).
    pub timestamp_millis: i64,

    /// Measured value.
    pub value: f64,
}

impl ScalarReading {
    /// Creates a reading.
    #[must_use]
    pub const fn new(timestamp_millis: i64, value: f64) -> Self {
        Self {
            timestamp_millis,
            value,
        }
    }

    /// Returns true if this reading was collected strictly before `other`.
    #[must_use]
    pub const fn is_before(&self, other: &Self) -> bool {
        self.timestamp_millis < other.timestamp_millis
    }

    /// Milliseconds elapsed from `earlier` to this reading.
    ///
    /// Negative when `earlier` is actually later. Saturates on overflow.
    #[must_use]
    pub const fn millis_since(&self, earlier: &Self) -> i64 {
        self.timestamp_millis.saturating_sub(earlier.timestamp_millis)
    }

    /// Returns true if the value is neither `NaN` nor infinite.
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        self.value.is_finite()
    }
}

impl From<(i64, f64)> for ScalarReading {
    fn from((timestamp_millis, value): (i64, f64)) -> Self {
        Self::new(timestamp_millis, value)
    }
}
