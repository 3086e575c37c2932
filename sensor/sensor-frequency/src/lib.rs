//! Frequency estimation for scalar sensor streams.
//!
//! This crate turns a live stream of scalar readings into a continuously
//! updated frequency (or rate) readout:
//!
//! # Estimation
//!
//! - [`FrequencyEstimator`] - Sliding-window zero-crossing estimator
//! - [`FrequencyEstimate`] - An estimate together with how it was derived
//! - [`EstimateStatus`] - Why an estimate is zero or measured
//!
//! # Building Blocks
//!
//! - [`ReadingWindow`] - Time-windowed buffer of readings
//! - [`CrossingScan`] - Threshold crossing counter
//!
//! # Configuration
//!
//! - [`FrequencyConfig`] - Window, unit denominator and deadband
//! - [`FrequencyUnit`] - Hz, RPM or a custom unit period
//!
//! # Method
//!
//! The estimator keeps the readings from the trailing window, computes their
//! mean, adds the filter deadband, and counts how often the signal crosses
//! that threshold. The leading crossing only marks where timing starts; the
//! remaining crossings are half-cycles over the span from the first to the
//! final crossing. Flat, noisy, sparse or recently stopped signals report
//! `0.0`. This is an O(window) heuristic for live displays, not a spectral
//! analyzer.
//!
//! # Uses
//!
//! The crate does no I/O and spawns no threads. It can be used in:
//! - Live sensor dashboards
//! - Embedded-class signal processing
//! - Offline data analysis
//!
//! # Example
//!
//! ```
//! use sensor_frequency::{FrequencyConfig, FrequencyEstimator};
//!
//! let config = FrequencyConfig::rpm(2_000).filter(0.05);
//! let mut estimator = FrequencyEstimator::with_config(config).unwrap();
//!
//! // A shaft sensor pulsing high for 25 ms of every 50 ms.
//! for t in (0..2_000).step_by(5) {
//!     let value = if t % 50 < 25 { 1.0 } else { 0.0 };
//!     estimator.observe(t, value).unwrap();
//! }
//!
//! // 20 Hz is 1200 RPM.
//! assert!((estimator.current_frequency() - 1_200.0).abs() < 1e-6);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod config;
mod crossing;
mod error;
mod estimator;
mod window;

// Re-export estimation types
pub use estimator::{EstimateStatus, FrequencyEstimate, FrequencyEstimator};

// Re-export building blocks
pub use crossing::CrossingScan;
pub use window::{ReadingWindow, WindowStats};

// Re-export configuration types
pub use config::{FrequencyConfig, FrequencyUnit, MILLIS_PER_MINUTE, MILLIS_PER_SECOND};

// Re-export error types
pub use error::{FrequencyError, Result};

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{
        CrossingScan, EstimateStatus, FrequencyConfig, FrequencyError, FrequencyEstimate,
        FrequencyEstimator, FrequencyUnit, ReadingWindow, WindowStats,
    };
}
