//! Regression test parameters and operations

use fuzzyconn_core::Image;
use std::fmt::{Debug, Display};

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Compare results and record failures (default)
    #[default]
    Compare,
    /// Compare, and print intermediate images
    Display,
}

impl RegTestMode {
    /// Parse mode from the `REGTEST_MODE` environment variable
    pub fn from_env() -> Self {
        match std::env::var("REGTEST_MODE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// Regression test parameters
///
/// This structure tracks the state of a regression test, including
/// the test name, current index, mode, and success status.
pub struct RegParams {
    /// Name of the test (e.g., "propagate")
    pub test_name: String,
    /// Current test index (incremented before each comparison)
    index: usize,
    /// Test mode
    pub mode: RegTestMode,
    /// Overall success status
    success: bool,
    /// Recorded failures
    failures: Vec<String>,
}

impl RegParams {
    /// Create new regression test parameters
    ///
    /// The mode is taken from the `REGTEST_MODE` environment variable.
    pub fn new(test_name: &str) -> Self {
        let mode = RegTestMode::from_env();

        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");
        eprintln!("Mode: {:?}", mode);

        Self {
            test_name: test_name.to_string(),
            index: 0,
            mode,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current test index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Check if in display mode
    pub fn display(&self) -> bool {
        self.mode == RegTestMode::Display
    }

    fn fail(&mut self, msg: String) {
        eprintln!("{}", msg);
        self.failures.push(msg);
        self.success = false;
    }

    /// Compare two floating-point values
    ///
    /// # Arguments
    ///
    /// * `expected` - Expected value
    /// * `actual` - Actual computed value
    /// * `delta` - Maximum allowed difference
    ///
    /// # Returns
    ///
    /// `true` if values match within delta, `false` otherwise.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        if diff > delta {
            let msg = format!(
                "Failure in {}_reg: value comparison for index {}\n\
                 difference = {} but allowed delta = {}\n\
                 expected = {}, actual = {}",
                self.test_name, self.index, diff, delta, expected, actual
            );
            self.fail(msg);
            false
        } else {
            true
        }
    }

    /// Record a boolean check
    ///
    /// Shorthand for comparing `1.0` against `if cond { 1.0 } else { 0.0 }`.
    pub fn check(&mut self, cond: bool) -> bool {
        self.compare_values(1.0, if cond { 1.0 } else { 0.0 }, 0.0)
    }

    /// Compare two images for exact equality
    ///
    /// Reports the first differing coordinate on failure.
    pub fn compare_images<T>(&mut self, expected: &Image<T>, actual: &Image<T>) -> bool
    where
        T: PartialEq + Debug,
    {
        self.index += 1;

        if !expected.same_shape(actual) {
            let msg = format!(
                "Failure in {}_reg: image comparison for index {} - shape mismatch {:?} vs {:?}",
                self.test_name,
                self.index,
                expected.dims(),
                actual.dims()
            );
            self.fail(msg);
            return false;
        }

        let first_diff = expected
            .as_slice()
            .iter()
            .zip(actual.as_slice())
            .position(|(a, b)| a != b);

        if let Some(i) = first_diff {
            let index = expected.shape().unravel(i).unwrap_or_default();
            let msg = format!(
                "Failure in {}_reg: image comparison for index {} - mismatch at {:?}: \
                 expected {:?}, actual {:?}",
                self.test_name,
                self.index,
                index,
                expected.as_slice()[i],
                actual.as_slice()[i]
            );
            self.fail(msg);
            return false;
        }

        true
    }

    /// Print a 2-D image in display mode
    ///
    /// Images with any other number of dimensions are skipped.
    pub fn display_image<T: Display>(&self, label: &str, image: &Image<T>) {
        if !self.display() || image.ndim() != 2 {
            return;
        }
        let width = image.dims()[0];
        eprintln!("  {} ({}x{}):", label, width, image.dims()[1]);
        for row in image.as_slice().chunks(width) {
            let line: Vec<String> = row.iter().map(|v| format!("{:>6}", v)).collect();
            eprintln!("   {}", line.join(""));
        }
    }

    /// Clean up and report results
    ///
    /// # Returns
    ///
    /// `true` if all tests passed, `false` if any failed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.success
    }

    /// Check if all tests have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}
