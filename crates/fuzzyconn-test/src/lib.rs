//! fuzzyconn-test - Regression test framework for fuzzyconn
//!
//! Every regression test creates a [`RegParams`], records numbered
//! comparisons against it, and finishes with `assert!(rp.cleanup())`.
//! Failures are collected rather than panicking, so a single run reports
//! every mismatch.
//!
//! Two modes are supported:
//!
//! - **Compare**: check results and report failures (default)
//! - **Display**: additionally print small 2-D results to stderr for
//!   visual inspection
//!
//! # Usage
//!
//! ```ignore
//! use fuzzyconn_test::RegParams;
//!
//! let mut rp = RegParams::new("propagate");
//! rp.compare_values(65535.0, strength as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "compare" or "display"

mod params;

pub use params::{RegParams, RegTestMode};
