//! Fuzzyconn - Fuzzy connectedness segmentation for Rust
//!
//! Segments an object in a 2-D, 3-D or higher-dimensional image from one
//! or more seed points. Every pixel is given a connectedness strength: the
//! best, over all paths from a seed, of the weakest link along the path,
//! where links are scored by a Gaussian model of the object. Thresholding
//! these strengths yields the object.
//!
//! # Overview
//!
//! - Core containers ([`Image`], [`Shape`], [`Connectivity`]) are
//!   re-exported at the top level
//! - The segmentation itself lives in [`segment`]
//!
//! # Example
//!
//! ```
//! use fuzzyconn::Image;
//! use fuzzyconn::segment::{FuzzyConnectedness, GaussianParams};
//!
//! // 3x3 image at 100 with an outlier in one corner
//! let image = Image::from_fn(&[3, 3], |idx| if idx[0] == 2 && idx[1] == 2 { 500u16 } else { 100 })
//!     .unwrap();
//!
//! let params = GaussianParams::new(100.0, 10.0, 0.0, 10.0).unwrap();
//! let mut fc = FuzzyConnectedness::gaussian(&image, params);
//! fc.params_mut().set_seeds([[1usize, 1]]).unwrap();
//!
//! let object = fc.update().unwrap();
//! assert_eq!(object.count(), 8);
//! assert_eq!(object.get(&[2, 2]), Some(&false));
//! ```

// Re-export core types (primary data structures used everywhere)
pub use fuzzyconn_core::*;

// Re-export the segmentation crate as a module
pub use fuzzyconn_segment as segment;
