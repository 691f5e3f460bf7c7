//! Grid extent and index arithmetic
//!
//! A [`Shape`] describes the extent of an n-dimensional grid and maps
//! coordinate tuples to positions in a contiguous buffer.
//!
//! # Memory layout
//!
//! Dimension 0 varies fastest. For a 2-D shape `[width, height]` the pixel
//! at `[x, y]` lives at `y * width + x`, the same row-major order used for
//! ordinary raster images. Higher dimensions extend the pattern: the stride
//! of dimension `d` is the product of the sizes of all lower dimensions.

use crate::error::{Error, Result};

/// Extent of an n-dimensional grid, with precomputed strides
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    /// Size along each dimension (all > 0)
    dims: Vec<usize>,
    /// Buffer stride of each dimension
    strides: Vec<usize>,
    /// Total number of grid points
    len: usize,
}

impl Shape {
    /// Create a shape from its per-dimension sizes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidShape`] if `dims` is empty, any size is zero,
    /// or the total pixel count overflows `usize`.
    ///
    /// # Examples
    ///
    /// ```
    /// use fuzzyconn_core::Shape;
    ///
    /// let shape = Shape::new(&[4, 3, 2]).unwrap();
    /// assert_eq!(shape.len(), 24);
    /// assert_eq!(shape.strides(), &[1, 4, 12]);
    /// ```
    pub fn new(dims: &[usize]) -> Result<Self> {
        if dims.is_empty() || dims.contains(&0) {
            return Err(Error::InvalidShape {
                dims: dims.to_vec(),
            });
        }

        let mut strides = Vec::with_capacity(dims.len());
        let mut len = 1usize;
        for &d in dims {
            strides.push(len);
            len = len.checked_mul(d).ok_or_else(|| Error::InvalidShape {
                dims: dims.to_vec(),
            })?;
        }

        Ok(Shape {
            dims: dims.to_vec(),
            strides,
            len,
        })
    }

    /// Size along each dimension
    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Buffer stride of each dimension
    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Number of dimensions
    #[inline]
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// Total number of grid points
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false`: a valid shape has at least one grid point.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check whether `index` addresses a point of this grid.
    ///
    /// An index with the wrong number of components is never contained.
    pub fn contains(&self, index: &[usize]) -> bool {
        index.len() == self.dims.len() && index.iter().zip(&self.dims).all(|(&i, &d)| i < d)
    }

    /// Map a coordinate tuple to its buffer position.
    ///
    /// Returns `None` if the index is outside the grid.
    pub fn linear_index(&self, index: &[usize]) -> Option<usize> {
        if !self.contains(index) {
            return None;
        }
        Some(index.iter().zip(&self.strides).map(|(&i, &s)| i * s).sum())
    }

    /// Like [`Shape::linear_index`], but reports the offending index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if the index is outside the grid.
    pub fn checked_linear_index(&self, index: &[usize]) -> Result<usize> {
        self.linear_index(index)
            .ok_or_else(|| Error::IndexOutOfBounds {
                index: index.to_vec(),
                dims: self.dims.clone(),
            })
    }

    /// Write the coordinates of buffer position `linear` into `out`.
    ///
    /// `out` must have exactly [`Shape::ndim`] components and `linear` must
    /// be smaller than [`Shape::len`].
    pub fn unravel_into(&self, linear: usize, out: &mut [usize]) {
        debug_assert_eq!(out.len(), self.dims.len());
        debug_assert!(linear < self.len);
        let mut rest = linear;
        for (o, &d) in out.iter_mut().zip(&self.dims) {
            *o = rest % d;
            rest /= d;
        }
    }

    /// Coordinates of buffer position `linear`.
    ///
    /// Returns `None` if `linear` is past the end of the grid.
    pub fn unravel(&self, linear: usize) -> Option<Vec<usize>> {
        if linear >= self.len {
            return None;
        }
        let mut out = vec![0; self.dims.len()];
        self.unravel_into(linear, &mut out);
        Some(out)
    }
}
