//! Error types for fuzzyconn-segment

use thiserror::Error;

/// Errors that can occur during fuzzy connectedness segmentation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SegmentError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] fuzzyconn_core::Error),

    /// Statistical model or threshold parameter outside its valid range
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Seed coordinate outside the image grid
    #[error("seed {index:?} out of bounds for shape {dims:?}")]
    OutOfBounds { index: Vec<usize>, dims: Vec<usize> },

    /// Propagation requested without any seed
    #[error("no seeds: propagation needs at least one seed")]
    NoSeeds,

    /// Extraction requested before a successful propagation, or after a
    /// change that invalidated the fuzzy scene
    #[error("fuzzy scene not ready: run propagation first")]
    SceneNotReady,

    /// Propagation aborted after the configured number of frontier pops
    #[error("propagation exceeded the limit of {limit} frontier pops")]
    PopLimitExceeded { limit: usize },

    /// Image, seed set or scene built for different grids
    #[error("shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },
}

/// Result type for segmentation operations
pub type SegmentResult<T> = Result<T, SegmentError>;
