//! Grid adjacency
//!
//! Defines which grid points are neighbours of each other. Connectivity is
//! fixed for a whole computation: it decides which pixel pairs are ever
//! compared.

use crate::shape::Shape;

/// Connectivity type for neighbour enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Connectivity {
    /// Face-connected neighbours: one step along a single axis
    /// (4-way in 2-D, 6-way in 3-D)
    #[default]
    Face,
    /// All points of the surrounding 3x3x... block except the centre
    /// (8-way in 2-D, 26-way in 3-D)
    Full,
}

impl Connectivity {
    /// Number of neighbours an interior point has in `ndim` dimensions.
    pub fn neighbor_count(self, ndim: usize) -> usize {
        match self {
            Connectivity::Face => 2 * ndim,
            Connectivity::Full => 3usize.pow(ndim as u32) - 1,
        }
    }
}

/// Neighbour offsets precomputed for one shape and connectivity
///
/// Each offset is stored both as a per-axis step in {-1, 0, 1} (used for
/// the bounds check) and as a signed buffer displacement.
#[derive(Debug, Clone)]
pub struct NeighborOffsets {
    ndim: usize,
    /// `count * ndim` per-axis steps
    steps: Vec<isize>,
    /// Buffer displacement of each offset
    displacements: Vec<isize>,
}

impl NeighborOffsets {
    /// Build the offset table for `shape`.
    pub fn new(shape: &Shape, connectivity: Connectivity) -> Self {
        let ndim = shape.ndim();
        let count = connectivity.neighbor_count(ndim);
        let mut steps = Vec::with_capacity(count * ndim);

        match connectivity {
            Connectivity::Face => {
                for axis in 0..ndim {
                    for delta in [-1isize, 1] {
                        steps.extend((0..ndim).map(|d| if d == axis { delta } else { 0 }));
                    }
                }
            }
            Connectivity::Full => {
                // Enumerate {-1, 0, 1}^ndim in base 3, skipping the centre.
                let total = count + 1;
                let mut step = vec![0isize; ndim];
                for code in 0..total {
                    let mut rest = code;
                    for s in step.iter_mut() {
                        *s = (rest % 3) as isize - 1;
                        rest /= 3;
                    }
                    if step.iter().any(|&s| s != 0) {
                        steps.extend_from_slice(&step);
                    }
                }
            }
        }

        let displacements = steps
            .chunks(ndim)
            .map(|step| {
                step.iter()
                    .zip(shape.strides())
                    .map(|(&s, &stride)| s * stride as isize)
                    .sum()
            })
            .collect();

        NeighborOffsets {
            ndim,
            steps,
            displacements,
        }
    }

    /// Number of offsets
    pub fn len(&self) -> usize {
        self.displacements.len()
    }

    /// `true` only for a zero-dimensional table, which a valid shape never
    /// produces.
    pub fn is_empty(&self) -> bool {
        self.displacements.is_empty()
    }

    /// Buffer positions of the in-bounds neighbours of the point at
    /// `index` (whose buffer position is `linear`).
    ///
    /// `dims` must be the extent the table was built for.
    pub fn neighbors<'a>(
        &'a self,
        dims: &'a [usize],
        index: &'a [usize],
        linear: usize,
    ) -> impl Iterator<Item = usize> + 'a {
        debug_assert_eq!(index.len(), self.ndim);
        self.steps
            .chunks(self.ndim)
            .zip(&self.displacements)
            .filter(move |(step, _)| {
                step.iter()
                    .zip(index.iter().zip(dims))
                    .all(|(&s, (&i, &d))| match s {
                        -1 => i > 0,
                        1 => i + 1 < d,
                        _ => true,
                    })
            })
            .map(move |(_, &disp)| (linear as isize + disp) as usize)
    }
}
