//! Timestamped scalar readings and the per-sample filter interface.
//!
//! This crate provides the minimal vocabulary shared between scalar sensor
//! drivers, signal processors, and display layers:
//!
//! - [`ScalarReading`] - A single timestamped scalar sample
//! - [`ValueFilter`] - A stateful per-sample transform of a scalar stream
//!
//! # Features
//!
//! The crate has no required third-party dependencies. Enable the `serde`
//! feature to serialize readings.
//!
//! # Time
//!
//! Scalar readings carry millisecond timestamps. Streams are expected to be
//! non-decreasing in time; consumers decide how to treat violations.
//!
//! # Example
//!
//! ```
//! use sensor_types::{ScalarReading, ValueFilter};
//!
//! struct Offset(f64);
//!
//! impl ValueFilter for Offset {
//!     fn filter_value(&mut self, _timestamp_millis: i64, value: f64) -> f64 {
//!         value + self.0
//!     }
//! }
//!
//! let reading = ScalarReading::new(1_000, 2.5);
//! let mut offset = Offset(0.5);
//! assert!((offset.filter_reading(&reading) - 3.0).abs() < 1e-12);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod filter;
mod reading;

pub use filter::ValueFilter;
pub use reading::ScalarReading;
