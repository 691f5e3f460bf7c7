//! Fuzzyconn Core - Basic data structures for fuzzy connectedness
//!
//! This crate provides the fundamental data structures used throughout
//! the fuzzyconn segmentation library:
//!
//! - [`Shape`] - Extent of an n-dimensional grid and its index arithmetic
//! - [`Image`] - Owned n-dimensional sample buffer (input images, fuzzy
//!   scenes, binary masks)
//! - [`Connectivity`] / [`NeighborOffsets`] - Grid adjacency
//! - [`Strength`] - Fixed-point connectedness strength
//!
//! # Examples
//!
//! ```
//! use fuzzyconn_core::{Connectivity, Image, NeighborOffsets};
//!
//! let img = Image::new(&[4, 4, 4], 0u8).unwrap();
//! let offsets = NeighborOffsets::new(img.shape(), Connectivity::Face);
//! let centre = img.shape().linear_index(&[1, 1, 1]).unwrap();
//! assert_eq!(offsets.neighbors(img.dims(), &[1, 1, 1], centre).count(), 6);
//! ```

pub mod connectivity;
pub mod error;
pub mod image;
pub mod shape;
pub mod strength;

pub use connectivity::{Connectivity, NeighborOffsets};
pub use error::{Error, Result};
pub use image::Image;
pub use shape::Shape;
pub use strength::{
    MAX_STRENGTH, Strength, scale_unit, strength_from_fraction, strength_to_fraction,
};

/// Fuzzy scene: one connectedness strength per pixel
pub type FuzzyScene = Image<Strength>;

/// Binary object mask
pub type Mask = Image<bool>;
