//! Error types for fuzzyconn-core
//!
//! Provides a unified error type for all operations in the core crate.
//! Shapes and indices are reported as full coordinate lists so that
//! diagnostics stay readable for any number of dimensions.

use thiserror::Error;

/// Fuzzyconn core error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Extent with no dimensions, a zero-length dimension, or a pixel
    /// count that overflows `usize`
    #[error("invalid shape: {dims:?}")]
    InvalidShape { dims: Vec<usize> },

    /// Coordinate outside the grid, or with the wrong number of components
    #[error("index {index:?} out of bounds for shape {dims:?}")]
    IndexOutOfBounds { index: Vec<usize>, dims: Vec<usize> },

    /// Backing buffer length does not match the shape
    #[error("data length mismatch: expected {expected}, got {actual}")]
    DataLength { expected: usize, actual: usize },

    /// Two images that must share a grid do not
    #[error("shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;
