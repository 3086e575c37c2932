//! Error types for sensor-frequency crate.

use thiserror::Error;

/// Errors that can occur when feeding or configuring a frequency estimator.
///
/// Numeric degeneracies (too few samples, no oscillation, zero-length
/// crossing span) are not errors: they resolve to a frequency of `0.0`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrequencyError {
    /// A reading arrived with a timestamp older than the newest buffered one.
    #[error("out-of-order reading: timestamp {timestamp} ms is before newest {newest} ms")]
    OutOfOrder {
        /// Timestamp of the rejected reading.
        timestamp: i64,
        /// Timestamp of the newest buffered reading.
        newest: i64,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl FrequencyError {
    /// Creates an out-of-order error.
    #[must_use]
    pub const fn out_of_order(timestamp: i64, newest: i64) -> Self {
        Self::OutOfOrder { timestamp, newest }
    }

    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }
}

/// Result type for frequency estimation operations.
pub type Result<T> = std::result::Result<T, FrequencyError>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn error_out_of_order() {
        let err = FrequencyError::out_of_order(90, 100);
        let msg = err.to_string();
        assert!(msg.contains("out-of-order"));
        assert!(msg.contains("90"));
        assert!(msg.contains("100"));
    }

    #[test]
    fn error_invalid_config() {
        let err = FrequencyError::invalid_config("denominator must be positive");
        assert!(err.to_string().contains("invalid configuration"));
        assert!(err.to_string().contains("denominator"));
    }
}
