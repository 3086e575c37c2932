//! Per-sample transforms of a scalar stream.

use crate::reading::ScalarReading;

/// A stateful transform applied to each sample of a scalar stream.
///
/// Implementations receive samples in stream order and return the value to
/// display or forward in place of the raw one (a smoothed value, a derived
/// rate, ...). Filters are infallible: a sample the filter cannot use must
/// still produce an output.
pub trait ValueFilter {
    /// Consumes one sample and returns the filtered value.
    fn filter_value(&mut self, timestamp_millis: i64, value: f64) -> f64;

    /// Consumes a [`ScalarReading`].
    fn filter_reading(&mut self, reading: &ScalarReading) -> f64 {
        self.filter_value(reading.timestamp_millis, reading.value)
    }
}

impl<F: ValueFilter + ?Sized> ValueFilter for Box<F> {
    fn filter_value(&mut self, timestamp_millis: i64, value: f64) -> f64 {
        (**self).filter_value(timestamp_millis, value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    /// Passes values through and remembers the last timestamp.
    struct Passthrough {
        last: Option<i64>,
    }

    impl ValueFilter for Passthrough {
        fn filter_value(&mut self, timestamp_millis: i64, value: f64) -> f64 {
            self.last = Some(timestamp_millis);
            value
        }
    }

    #[test]
    fn filter_reading_forwards_fields() {
        let mut filter = Passthrough { last: None };
        let out = filter.filter_reading(&ScalarReading::new(42, 7.0));

        assert_eq!(out, 7.0);
        assert_eq!(filter.last, Some(42));
    }

    #[test]
    fn boxed_filter() {
        let mut filter: Box<dyn ValueFilter> = Box::new(Passthrough { last: None });
        assert_eq!(filter.filter_value(1, 3.0), 3.0);
    }
}
