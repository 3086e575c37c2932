//! Parameters for frequency estimation.

use serde::{Deserialize, Serialize};

use crate::error::{FrequencyError, Result};

/// Milliseconds per second, the denominator for Hz readouts.
pub const MILLIS_PER_SECOND: f64 = 1_000.0;

/// Milliseconds per minute, the denominator for RPM readouts.
pub const MILLIS_PER_MINUTE: f64 = 60_000.0;

/// Output unit of a frequency estimate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum FrequencyUnit {
    /// Cycles per second.
    #[default]
    Hertz,

    /// Cycles per minute.
    Rpm,

    /// Cycles per custom period, given in milliseconds.
    Custom(f64),
}

impl FrequencyUnit {
    /// Milliseconds in one unit period.
    #[must_use]
    pub const fn denominator_millis(self) -> f64 {
        match self {
            Self::Hertz => MILLIS_PER_SECOND,
            Self::Rpm => MILLIS_PER_MINUTE,
            Self::Custom(millis) => millis,
        }
    }
}

/// Parameters for a [`FrequencyEstimator`](crate::FrequencyEstimator).
///
/// # Example
///
/// ```
/// use sensor_frequency::FrequencyConfig;
///
/// // One second window, Hz output, no deadband.
/// let config = FrequencyConfig::default();
/// assert_eq!(config.window_millis, 1_000);
///
/// // Five second window, RPM output, ignore wobble below 0.2.
/// let rpm = FrequencyConfig::rpm(5_000).filter(0.2);
/// assert!((rpm.denominator_millis - 60_000.0).abs() < 1e-10);
/// assert!(rpm.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencyConfig {
    /// How many milliseconds of history to keep.
    pub window_millis: u64,

    /// Milliseconds per output unit (1000 for Hz, 60000 for RPM).
    pub denominator_millis: f64,

    /// Deadband added to the mean before counting crossings.
    ///
    /// Oscillations whose peak rises less than this above the mean are
    /// not counted.
    pub filter: f64,
}

impl Default for FrequencyConfig {
    fn default() -> Self {
        Self::hertz(1_000)
    }
}

impl FrequencyConfig {
    /// Creates a config reporting cycles per second.
    #[must_use]
    pub const fn hertz(window_millis: u64) -> Self {
        Self::with_unit(window_millis, FrequencyUnit::Hertz)
    }

    /// Creates a config reporting cycles per minute.
    #[must_use]
    pub const fn rpm(window_millis: u64) -> Self {
        Self::with_unit(window_millis, FrequencyUnit::Rpm)
    }

    /// Creates a config for the given unit with no filter.
    #[must_use]
    pub const fn with_unit(window_millis: u64, unit: FrequencyUnit) -> Self {
        Self {
            window_millis,
            denominator_millis: unit.denominator_millis(),
            filter: 0.0,
        }
    }

    /// Set the window.
    #[must_use]
    pub const fn window_millis(mut self, window_millis: u64) -> Self {
        self.window_millis = window_millis;
        self
    }

    /// Set the denominator.
    #[must_use]
    pub const fn denominator_millis(mut self, denominator_millis: f64) -> Self {
        self.denominator_millis = denominator_millis;
        self
    }

    /// Set the filter.
    #[must_use]
    pub const fn filter(mut self, filter: f64) -> Self {
        self.filter = filter;
        self
    }

    /// Checks that the parameters can produce meaningful estimates.
    ///
    /// # Errors
    ///
    /// Returns [`FrequencyError::InvalidConfig`] if the denominator is not a
    /// positive finite number, or the filter is not finite.
    pub fn validate(&self) -> Result<()> {
        if !self.denominator_millis.is_finite() || self.denominator_millis <= 0.0 {
            return Err(FrequencyError::invalid_config(format!(
                "denominator must be positive and finite, got {}",
                self.denominator_millis
            )));
        }
        validate_filter(self.filter)
    }
}

/// Checks a filter value.
pub(crate) fn validate_filter(filter: f64) -> Result<()> {
    if filter.is_finite() {
        Ok(())
    } else {
        Err(FrequencyError::invalid_config(format!(
            "filter must be finite, got {filter}"
        )))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FrequencyConfig::default();
        assert_eq!(config.window_millis, 1_000);
        assert!((config.denominator_millis - MILLIS_PER_SECOND).abs() < f64::EPSILON);
        assert!(config.filter.abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rpm_config() {
        let config = FrequencyConfig::rpm(2_000);
        assert_eq!(config.window_millis, 2_000);
        assert!((config.denominator_millis - MILLIS_PER_MINUTE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_custom_unit() {
        let config = FrequencyConfig::with_unit(500, FrequencyUnit::Custom(3_600_000.0));
        assert!((config.denominator_millis - 3_600_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_builder() {
        let config = FrequencyConfig::default()
            .window_millis(250)
            .denominator_millis(10.0)
            .filter(0.5);

        assert_eq!(config.window_millis, 250);
        assert!((config.denominator_millis - 10.0).abs() < f64::EPSILON);
        assert!((config.filter - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_window_is_valid() {
        assert!(FrequencyConfig::hertz(0).validate().is_ok());
    }

    #[test]
    fn test_invalid_denominator() {
        for denominator in [0.0, -1_000.0, f64::NAN, f64::INFINITY] {
            let config = FrequencyConfig::default().denominator_millis(denominator);
            assert!(matches!(
                config.validate(),
                Err(FrequencyError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn test_invalid_filter() {
        let config = FrequencyConfig::default().filter(f64::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = FrequencyConfig::rpm(3_000).filter(0.25);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("window_millis"));

        let parsed: FrequencyConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
