//! Image - n-dimensional sample grid
//!
//! `Image<T>` is an owned, contiguous buffer of samples with explicit
//! shape metadata. It is used for input intensity images (scalar or
//! multi-component `[T; N]` samples), fuzzy scenes (`Image<Strength>`),
//! and binary object masks (`Image<bool>`).
//!
//! # Examples
//!
//! ```
//! use fuzzyconn_core::Image;
//!
//! let mut img = Image::new(&[5, 4], 0u8).unwrap();
//! img.set(&[2, 3], 200).unwrap();
//! assert_eq!(img.get(&[2, 3]), Some(&200));
//! assert_eq!(img.get(&[5, 0]), None);
//! ```

use crate::error::{Error, Result};
use crate::shape::Shape;

/// Owned n-dimensional image
///
/// Samples are stored in the order defined by [`Shape`]: dimension 0
/// varies fastest, with no padding.
#[derive(Debug, Clone, PartialEq)]
pub struct Image<T> {
    shape: Shape,
    data: Vec<T>,
}

impl<T: Clone> Image<T> {
    /// Create an image with every sample set to `value`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidShape`] if `dims` does not describe a
    /// non-empty grid.
    pub fn new(dims: &[usize], value: T) -> Result<Self> {
        let shape = Shape::new(dims)?;
        let data = vec![value; shape.len()];
        Ok(Image { shape, data })
    }
}

impl<T> Image<T> {
    /// Create an image from samples in buffer order.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape is invalid or `data.len()` does not
    /// match the number of grid points.
    pub fn from_data(dims: &[usize], data: Vec<T>) -> Result<Self> {
        let shape = Shape::new(dims)?;
        if data.len() != shape.len() {
            return Err(Error::DataLength {
                expected: shape.len(),
                actual: data.len(),
            });
        }
        Ok(Image { shape, data })
    }

    /// Create an image by evaluating `f` at every coordinate.
    ///
    /// Coordinates are visited in buffer order.
    ///
    /// # Examples
    ///
    /// ```
    /// use fuzzyconn_core::Image;
    ///
    /// let ramp = Image::from_fn(&[3, 2], |idx| (idx[0] + 10 * idx[1]) as u16).unwrap();
    /// assert_eq!(ramp.as_slice(), &[0, 1, 2, 10, 11, 12]);
    /// ```
    pub fn from_fn<F>(dims: &[usize], mut f: F) -> Result<Self>
    where
        F: FnMut(&[usize]) -> T,
    {
        let shape = Shape::new(dims)?;
        let mut index = vec![0usize; shape.ndim()];
        let mut data = Vec::with_capacity(shape.len());
        for linear in 0..shape.len() {
            shape.unravel_into(linear, &mut index);
            data.push(f(&index));
        }
        Ok(Image { shape, data })
    }

    /// Grid extent
    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Size along each dimension
    #[inline]
    pub fn dims(&self) -> &[usize] {
        self.shape.dims()
    }

    /// Number of dimensions
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.ndim()
    }

    /// Number of samples
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always `false` for a constructed image.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Check whether two images share the same grid.
    pub fn same_shape<U>(&self, other: &Image<U>) -> bool {
        self.shape == other.shape
    }

    /// Ensure `other` shares this image's grid.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] otherwise.
    pub fn check_same_shape<U>(&self, other: &Image<U>) -> Result<()> {
        if self.same_shape(other) {
            Ok(())
        } else {
            Err(Error::ShapeMismatch {
                expected: self.dims().to_vec(),
                actual: other.dims().to_vec(),
            })
        }
    }

    /// Sample at `index`, or `None` if out of bounds.
    pub fn get(&self, index: &[usize]) -> Option<&T> {
        self.shape.linear_index(index).map(|i| &self.data[i])
    }

    /// Mutable sample at `index`, or `None` if out of bounds.
    pub fn get_mut(&mut self, index: &[usize]) -> Option<&mut T> {
        self.shape.linear_index(index).map(|i| &mut self.data[i])
    }

    /// Set the sample at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if `index` is outside the grid.
    pub fn set(&mut self, index: &[usize], value: T) -> Result<()> {
        let i = self.shape.checked_linear_index(index)?;
        self.data[i] = value;
        Ok(())
    }

    /// Samples in buffer order
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable samples in buffer order
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the image, returning its buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Apply `f` to every sample, producing an image of the same shape.
    pub fn map<U, F>(&self, f: F) -> Image<U>
    where
        F: FnMut(&T) -> U,
    {
        Image {
            shape: self.shape.clone(),
            data: self.data.iter().map(f).collect(),
        }
    }
}

impl Image<bool> {
    /// Number of set (object) samples.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&b| b).count()
    }

    /// Check whether every set sample of `self` is also set in `other`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if the masks have different grids.
    pub fn is_subset_of(&self, other: &Image<bool>) -> Result<bool> {
        self.check_same_shape(other)?;
        Ok(self.data.iter().zip(&other.data).all(|(&a, &b)| !a || b))
    }
}
