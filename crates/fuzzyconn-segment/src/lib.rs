//! fuzzyconn-segment - Fuzzy connectedness segmentation
//!
//! This crate segments an object in an n-dimensional image from one or
//! more seed points:
//!
//! - **Affinity** - Similarity of two neighbouring pixels under a Gaussian
//!   object model (scalar or multi-component)
//! - **Propagation** - Best-first max-min path search computing the fuzzy
//!   scene: the connectedness strength of every pixel to the seeds
//! - **Extraction** - Thresholding the fuzzy scene into a binary object
//! - **Parameters** - Model, seeds and threshold, tracking when the scene
//!   has to be recomputed
//!
//! # Examples
//!
//! ## Segmenting a bright square
//!
//! ```
//! use fuzzyconn_core::Image;
//! use fuzzyconn_segment::{FuzzyConnectedness, GaussianParams};
//!
//! // 10x10 background at 20 with a 4x4 object at 200
//! let image = Image::from_fn(&[10, 10], |idx| {
//!     if (3..7).contains(&idx[0]) && (3..7).contains(&idx[1]) { 200u8 } else { 20 }
//! })
//! .unwrap();
//!
//! let params = GaussianParams::new(200.0, 100.0, 0.0, 25.0).unwrap();
//! let mut fc = FuzzyConnectedness::gaussian(&image, params);
//! fc.params_mut().set_seeds([[4usize, 4]]).unwrap();
//!
//! let object = fc.update().unwrap();
//! assert_eq!(object.count(), 16);
//! ```
//!
//! ## Driving the propagator directly
//!
//! ```
//! use fuzzyconn_core::{Connectivity, Image};
//! use fuzzyconn_segment::{PropagationOptions, SeedSet, extract, propagate};
//!
//! let image = Image::from_data(&[5], vec![9u16, 7, 1, 8, 9]).unwrap();
//! let seeds = SeedSet::from_indices(image.shape(), [[0usize]]).unwrap();
//! let min_value = |a: u16, b: u16| a.min(b);
//!
//! let options = PropagationOptions::new().with_connectivity(Connectivity::Face);
//! let (scene, _) = propagate(&image, &seeds, &min_value, &options).unwrap();
//! assert_eq!(extract(&scene, 7).count(), 2);
//! ```

pub mod affinity;
pub mod error;
pub mod extract;
pub mod filter;
pub mod params;
pub mod propagate;

// Re-export core types
pub use fuzzyconn_core;

// Re-export error types
pub use error::{SegmentError, SegmentResult};

// Re-export affinity types
pub use affinity::{Affinity, GaussianAffinity, VectorGaussianAffinity};

// Re-export parameter types
pub use params::{DEFAULT_RELATIVE_THRESHOLD, GaussianParams, ParameterState, SeedSet};

// Re-export propagation types and functions
pub use propagate::{PropagationOptions, PropagationStats, Propagator, propagate};

// Re-export extraction functions
pub use extract::{count_at_or_above, extract, extract_into};

// Re-export the filter
pub use filter::FuzzyConnectedness;
