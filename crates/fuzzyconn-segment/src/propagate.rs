//! Fuzzy connectedness propagation
//!
//! Computes the fuzzy scene of an image relative to a seed set: for every
//! pixel, the strongest path strength from any seed, where the strength of
//! a path is the weakest affinity between consecutive pixels on it.
//!
//! # Algorithm
//!
//! Best-first search in the style of Dijkstra, with `min` as the path
//! combination rule and the largest strength popped first:
//!
//! 1. Seeds start at [`MAX_STRENGTH`] and are pushed onto the frontier.
//! 2. The strongest frontier entry is popped. Entries whose strength is
//!    below the pixel's recorded strength are stale and dropped, as are
//!    entries for pixels already settled.
//! 3. The popped pixel is settled: no unsettled pixel can reach it through
//!    a stronger path, because every frontier entry is at most as strong.
//! 4. Each unsettled neighbour gets the candidate
//!    `min(strength, affinity(pixel, neighbour))`; if that beats its
//!    recorded strength, the record is raised and the neighbour pushed.
//!
//! Improved candidates are pushed without removing the older entry (lazy
//! deletion); step 2 discards the leftovers. Pixels that no seed reaches
//! through non-zero affinities keep strength 0.
//!
//! The settled strengths do not depend on the pop order of equal-strength
//! entries.

use crate::affinity::Affinity;
use crate::error::{SegmentError, SegmentResult};
use crate::params::SeedSet;
use fuzzyconn_core::{Connectivity, FuzzyScene, Image, MAX_STRENGTH, NeighborOffsets, Strength};
use log::{debug, warn};
use std::collections::BinaryHeap;

/// Options for fuzzy connectedness propagation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropagationOptions {
    /// Which pixel pairs are adjacent
    pub connectivity: Connectivity,
    /// Abort after this many frontier pops (`None` = unbounded)
    pub max_pops: Option<usize>,
}

impl PropagationOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set connectivity type
    pub fn with_connectivity(mut self, connectivity: Connectivity) -> Self {
        self.connectivity = connectivity;
        self
    }

    /// Cap the number of frontier pops
    pub fn with_max_pops(mut self, max_pops: usize) -> Self {
        self.max_pops = Some(max_pops);
        self
    }
}

/// Counters collected during one propagation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropagationStats {
    /// Entries popped from the frontier, stale ones included
    pub pops: usize,
    /// Popped entries that were discarded
    pub stale_pops: usize,
    /// Entries pushed onto the frontier, seeds included
    pub pushes: usize,
    /// Pixels settled (reached with non-zero strength)
    pub settled: usize,
}

/// Frontier entry, ordered by strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct FrontierEntry {
    strength: Strength,
    index: usize,
}

/// Propagation state for one run
///
/// Owns the scene, settled flags and frontier exclusively; they are only
/// handed out as a finished scene by [`Propagator::run`].
pub struct Propagator<'a, P, A> {
    image: &'a Image<P>,
    affinity: &'a A,
    connectivity: Connectivity,
    offsets: NeighborOffsets,
    max_pops: Option<usize>,
    scene: Vec<Strength>,
    settled: Vec<bool>,
    frontier: BinaryHeap<FrontierEntry>,
    stats: PropagationStats,
}

impl<'a, P, A> Propagator<'a, P, A>
where
    P: Copy,
    A: Affinity<P>,
{
    /// Prepare a run over `image`.
    pub fn new(image: &'a Image<P>, affinity: &'a A, options: &PropagationOptions) -> Self {
        let len = image.len();
        Self {
            image,
            affinity,
            connectivity: options.connectivity,
            offsets: NeighborOffsets::new(image.shape(), options.connectivity),
            max_pops: options.max_pops,
            scene: vec![0; len],
            settled: vec![false; len],
            frontier: BinaryHeap::new(),
            stats: PropagationStats::default(),
        }
    }

    fn push(&mut self, index: usize, strength: Strength) {
        self.scene[index] = strength;
        self.frontier.push(FrontierEntry { strength, index });
        self.stats.pushes += 1;
    }

    /// Pop the next live frontier entry, discarding stale ones.
    fn pop_live(&mut self) -> SegmentResult<Option<FrontierEntry>> {
        loop {
            if let Some(limit) = self.max_pops {
                if self.stats.pops >= limit && !self.frontier.is_empty() {
                    warn!(
                        "propagation aborted after {} pops, {} entries left on the frontier",
                        limit,
                        self.frontier.len()
                    );
                    return Err(SegmentError::PopLimitExceeded { limit });
                }
            }

            let Some(entry) = self.frontier.pop() else {
                return Ok(None);
            };
            self.stats.pops += 1;

            if entry.strength < self.scene[entry.index] || self.settled[entry.index] {
                self.stats.stale_pops += 1;
                continue;
            }
            return Ok(Some(entry));
        }
    }

    /// Relax the unsettled neighbours of a freshly settled pixel.
    fn relax(&mut self, entry: FrontierEntry, index_buf: &mut [usize]) {
        let image = self.image;
        let shape = image.shape();
        shape.unravel_into(entry.index, index_buf);
        let data = image.as_slice();
        let value = data[entry.index];

        for n in self.offsets.neighbors(shape.dims(), index_buf, entry.index) {
            if self.settled[n] {
                continue;
            }
            let candidate = entry.strength.min(self.affinity.affinity(value, data[n]));
            if candidate > self.scene[n] {
                self.scene[n] = candidate;
                self.frontier.push(FrontierEntry {
                    strength: candidate,
                    index: n,
                });
                self.stats.pushes += 1;
            }
        }
    }

    /// Run propagation from `seeds` to completion.
    ///
    /// # Errors
    ///
    /// - [`SegmentError::NoSeeds`] if the seed set is empty
    /// - [`SegmentError::ShapeMismatch`] if the seeds were validated
    ///   against a different grid
    /// - [`SegmentError::PopLimitExceeded`] if the pop limit is reached
    ///   before the frontier drains
    pub fn run(mut self, seeds: &SeedSet) -> SegmentResult<(FuzzyScene, PropagationStats)> {
        if seeds.is_empty() {
            return Err(SegmentError::NoSeeds);
        }
        if seeds.shape() != self.image.shape() {
            return Err(SegmentError::ShapeMismatch {
                expected: self.image.dims().to_vec(),
                actual: seeds.shape().dims().to_vec(),
            });
        }

        debug!(
            "propagating over {:?} from {} seed(s), {:?} connectivity ({} neighbours)",
            self.image.dims(),
            seeds.len(),
            self.connectivity,
            self.offsets.len()
        );

        for &s in seeds.linear_indices() {
            self.push(s, MAX_STRENGTH);
        }

        let mut index_buf = vec![0usize; self.image.ndim()];
        while let Some(entry) = self.pop_live()? {
            self.settled[entry.index] = true;
            self.stats.settled += 1;
            self.relax(entry, &mut index_buf);
        }

        let stats = self.stats;
        debug!(
            "propagation done: {} settled, {} pops ({} stale), {} pushes",
            stats.settled, stats.pops, stats.stale_pops, stats.pushes
        );

        let scene = Image::from_data(self.image.dims(), self.scene)?;
        Ok((scene, stats))
    }
}

/// Compute the fuzzy scene of `image` relative to `seeds`.
///
/// # Errors
///
/// See [`Propagator::run`].
///
/// # Examples
///
/// ```
/// use fuzzyconn_core::{Image, MAX_STRENGTH};
/// use fuzzyconn_segment::{
///     GaussianAffinity, GaussianParams, PropagationOptions, SeedSet, propagate,
/// };
///
/// let image = Image::new(&[3, 3], 100u8).unwrap();
/// let affinity = GaussianAffinity::new(GaussianParams::new(100.0, 10.0, 0.0, 10.0).unwrap());
/// let seeds = SeedSet::from_indices(image.shape(), [[1usize, 1]]).unwrap();
///
/// let (scene, _) = propagate(&image, &seeds, &affinity, &PropagationOptions::default()).unwrap();
/// assert!(scene.as_slice().iter().all(|&s| s == MAX_STRENGTH));
/// ```
pub fn propagate<P, A>(
    image: &Image<P>,
    seeds: &SeedSet,
    affinity: &A,
    options: &PropagationOptions,
) -> SegmentResult<(FuzzyScene, PropagationStats)>
where
    P: Copy,
    A: Affinity<P>,
{
    Propagator::new(image, affinity, options).run(seeds)
}
