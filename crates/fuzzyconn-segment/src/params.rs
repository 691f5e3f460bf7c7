//! Segmentation parameters
//!
//! This module holds everything the caller configures before a run:
//!
//! - [`GaussianParams`] - statistical model of the object (intensity mean
//!   and variance, neighbour-difference mean and variance, optional weight)
//! - [`SeedSet`] - validated seed coordinates
//! - [`ParameterState`] - the affinity strategy, seeds and threshold,
//!   together with the flag recording whether the current fuzzy scene is
//!   still valid
//!
//! Changing the affinity model or the seeds invalidates the scene and
//! requires a new propagation. Changing only the threshold does not: the
//! object mask can be extracted again from the existing scene.

use crate::affinity::GaussianAffinity;
use crate::error::{SegmentError, SegmentResult};
use fuzzyconn_core::{Shape, Strength, strength_from_fraction};
use log::trace;

/// Default threshold, as a fraction of the maximum strength
pub const DEFAULT_RELATIVE_THRESHOLD: f64 = 0.5;

fn check_finite(name: &str, value: f64) -> SegmentResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SegmentError::InvalidParameter(format!(
            "{name} must be finite, got {value}"
        )))
    }
}

fn check_positive(name: &str, value: f64) -> SegmentResult<()> {
    // NaN fails the comparison as well
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(SegmentError::InvalidParameter(format!(
            "{name} must be > 0, got {value}"
        )))
    }
}

fn check_weight(weight: Option<f64>) -> SegmentResult<()> {
    match weight {
        Some(w) if !(0.0..=1.0).contains(&w) => Err(SegmentError::InvalidParameter(format!(
            "weight must be in [0, 1], got {w}"
        ))),
        _ => Ok(()),
    }
}

/// Gaussian model of the object
///
/// `mean` / `variance` describe object intensities; `diff_mean` /
/// `diff_var` describe absolute intensity differences between
/// neighbouring object pixels. Both variances are always > 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianParams {
    mean: f64,
    variance: f64,
    diff_mean: f64,
    diff_var: f64,
    weight: Option<f64>,
}

impl GaussianParams {
    /// Create a validated parameter record without a combination weight
    ///
    /// # Errors
    ///
    /// Returns [`SegmentError::InvalidParameter`] if a value is not finite
    /// or a variance is not strictly positive.
    ///
    /// # Examples
    ///
    /// ```
    /// use fuzzyconn_segment::GaussianParams;
    ///
    /// assert!(GaussianParams::new(100.0, 10.0, 0.0, 10.0).is_ok());
    /// assert!(GaussianParams::new(100.0, 0.0, 0.0, 10.0).is_err());
    /// ```
    pub fn new(mean: f64, variance: f64, diff_mean: f64, diff_var: f64) -> SegmentResult<Self> {
        check_finite("mean", mean)?;
        check_positive("variance", variance)?;
        check_finite("diff_mean", diff_mean)?;
        check_positive("diff_var", diff_var)?;
        Ok(Self {
            mean,
            variance,
            diff_mean,
            diff_var,
            weight: None,
        })
    }

    /// Blend the two Gaussian terms with `weight` instead of multiplying
    /// them (`weight = 1` uses the intensity term alone).
    ///
    /// # Errors
    ///
    /// Returns [`SegmentError::InvalidParameter`] if `weight` is outside [0, 1].
    pub fn with_weight(mut self, weight: f64) -> SegmentResult<Self> {
        check_weight(Some(weight))?;
        self.weight = Some(weight);
        Ok(self)
    }

    /// Expected object intensity
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Variance of object intensities
    pub fn variance(&self) -> f64 {
        self.variance
    }

    /// Expected absolute difference between neighbouring object pixels
    pub fn diff_mean(&self) -> f64 {
        self.diff_mean
    }

    /// Variance of the neighbour difference
    pub fn diff_var(&self) -> f64 {
        self.diff_var
    }

    /// Combination weight, `None` for the product form
    pub fn weight(&self) -> Option<f64> {
        self.weight
    }

    /// Set the expected object intensity.
    pub fn set_mean(&mut self, mean: f64) -> SegmentResult<()> {
        check_finite("mean", mean)?;
        self.mean = mean;
        Ok(())
    }

    /// Set the intensity variance. Rejects values <= 0.
    pub fn set_variance(&mut self, variance: f64) -> SegmentResult<()> {
        check_positive("variance", variance)?;
        self.variance = variance;
        Ok(())
    }

    /// Set the expected neighbour difference.
    pub fn set_diff_mean(&mut self, diff_mean: f64) -> SegmentResult<()> {
        check_finite("diff_mean", diff_mean)?;
        self.diff_mean = diff_mean;
        Ok(())
    }

    /// Set the neighbour-difference variance. Rejects values <= 0.
    pub fn set_diff_var(&mut self, diff_var: f64) -> SegmentResult<()> {
        check_positive("diff_var", diff_var)?;
        self.diff_var = diff_var;
        Ok(())
    }

    /// Set or clear the combination weight.
    pub fn set_weight(&mut self, weight: Option<f64>) -> SegmentResult<()> {
        check_weight(weight)?;
        self.weight = weight;
        Ok(())
    }
}

/// Validated set of seed coordinates for one grid
///
/// Duplicate seeds are collapsed; insertion order is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSet {
    shape: Shape,
    linear: Vec<usize>,
}

impl SeedSet {
    /// Create an empty seed set for `shape`.
    pub fn new(shape: &Shape) -> Self {
        Self {
            shape: shape.clone(),
            linear: Vec::new(),
        }
    }

    /// Create a seed set from coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`SegmentError::OutOfBounds`] for the first seed outside
    /// the grid.
    pub fn from_indices<I, S>(shape: &Shape, seeds: I) -> SegmentResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[usize]>,
    {
        let mut set = Self::new(shape);
        for seed in seeds {
            set.insert(seed.as_ref())?;
        }
        Ok(set)
    }

    /// Add a seed. Returns `false` if it was already present.
    ///
    /// # Errors
    ///
    /// Returns [`SegmentError::OutOfBounds`] if `index` is outside the grid
    /// or has the wrong number of components.
    pub fn insert(&mut self, index: &[usize]) -> SegmentResult<bool> {
        let linear = self
            .shape
            .linear_index(index)
            .ok_or_else(|| SegmentError::OutOfBounds {
                index: index.to_vec(),
                dims: self.shape.dims().to_vec(),
            })?;
        if self.linear.contains(&linear) {
            return Ok(false);
        }
        self.linear.push(linear);
        Ok(true)
    }

    /// Grid the seeds belong to
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Buffer positions of the seeds
    pub fn linear_indices(&self) -> &[usize] {
        &self.linear
    }

    /// Seed coordinates
    pub fn indices(&self) -> Vec<Vec<usize>> {
        self.linear
            .iter()
            .filter_map(|&i| self.shape.unravel(i))
            .collect()
    }

    /// Number of distinct seeds
    pub fn len(&self) -> usize {
        self.linear.len()
    }

    /// `true` if no seed has been set
    pub fn is_empty(&self) -> bool {
        self.linear.is_empty()
    }
}

/// Caller-controlled state of a segmentation
///
/// Holds the affinity strategy, the seed set and the threshold, and tracks
/// whether the fuzzy scene computed from them is still valid.
#[derive(Debug, Clone)]
pub struct ParameterState<A> {
    affinity: A,
    seeds: SeedSet,
    threshold: Strength,
    stale: bool,
}

impl<A> ParameterState<A> {
    /// Create a state for images of `shape`, with no seeds and the default
    /// threshold. The state starts stale: no scene exists yet.
    pub fn new(shape: &Shape, affinity: A) -> Self {
        Self {
            affinity,
            seeds: SeedSet::new(shape),
            threshold: fuzzyconn_core::scale_unit(DEFAULT_RELATIVE_THRESHOLD),
            stale: true,
        }
    }

    fn invalidate(&mut self, what: &str) {
        trace!("{what} changed, fuzzy scene invalidated");
        self.stale = true;
    }

    /// Replace all seeds. Invalidates the scene.
    ///
    /// The seed set is left unchanged if any seed is out of bounds.
    ///
    /// # Errors
    ///
    /// Returns [`SegmentError::OutOfBounds`] for the first invalid seed.
    pub fn set_seeds<I, S>(&mut self, seeds: I) -> SegmentResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[usize]>,
    {
        self.seeds = SeedSet::from_indices(self.seeds.shape(), seeds)?;
        self.invalidate("seeds");
        Ok(())
    }

    /// Add one seed. Invalidates the scene if the seed is new.
    ///
    /// # Errors
    ///
    /// Returns [`SegmentError::OutOfBounds`] if the seed is outside the grid.
    pub fn add_seed(&mut self, index: &[usize]) -> SegmentResult<()> {
        if self.seeds.insert(index)? {
            self.invalidate("seeds");
        }
        Ok(())
    }

    /// Current seeds
    pub fn seeds(&self) -> &SeedSet {
        &self.seeds
    }

    /// Set the strength threshold. Does not invalidate the scene.
    pub fn set_threshold(&mut self, threshold: Strength) {
        self.threshold = threshold;
    }

    /// Set the threshold as a fraction of the maximum strength.
    /// Does not invalidate the scene.
    ///
    /// # Errors
    ///
    /// Returns [`SegmentError::InvalidParameter`] if `fraction` is
    /// outside [0, 1].
    pub fn set_relative_threshold(&mut self, fraction: f64) -> SegmentResult<()> {
        self.threshold = strength_from_fraction(fraction).map_err(|_| {
            SegmentError::InvalidParameter(format!(
                "relative threshold must be in [0, 1], got {fraction}"
            ))
        })?;
        Ok(())
    }

    /// Current strength threshold
    pub fn threshold(&self) -> Strength {
        self.threshold
    }

    /// Replace the affinity strategy. Invalidates the scene.
    pub fn set_affinity(&mut self, affinity: A) {
        self.affinity = affinity;
        self.invalidate("affinity");
    }

    /// Current affinity strategy
    pub fn affinity(&self) -> &A {
        &self.affinity
    }

    /// `true` if the scene must be recomputed before extraction
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Force the next extraction to wait for a new propagation.
    pub fn mark_stale(&mut self) {
        self.invalidate("propagation options");
    }

    pub(crate) fn mark_propagated(&mut self) {
        self.stale = false;
    }
}

impl ParameterState<GaussianAffinity> {
    /// Current Gaussian model
    pub fn params(&self) -> &GaussianParams {
        self.affinity.params()
    }

    fn update_params<F>(&mut self, what: &str, f: F) -> SegmentResult<()>
    where
        F: FnOnce(&mut GaussianParams) -> SegmentResult<()>,
    {
        f(self.affinity.params_mut())?;
        self.invalidate(what);
        Ok(())
    }

    /// Set the expected object intensity. Invalidates the scene.
    pub fn set_mean(&mut self, mean: f64) -> SegmentResult<()> {
        self.update_params("mean", |p| p.set_mean(mean))
    }

    /// Set the intensity variance. Invalidates the scene.
    ///
    /// # Errors
    ///
    /// Returns [`SegmentError::InvalidParameter`] for values <= 0; the
    /// previous value and the scene are kept.
    pub fn set_variance(&mut self, variance: f64) -> SegmentResult<()> {
        self.update_params("variance", |p| p.set_variance(variance))
    }

    /// Set the expected neighbour difference. Invalidates the scene.
    pub fn set_diff_mean(&mut self, diff_mean: f64) -> SegmentResult<()> {
        self.update_params("diff_mean", |p| p.set_diff_mean(diff_mean))
    }

    /// Set the neighbour-difference variance. Invalidates the scene.
    ///
    /// # Errors
    ///
    /// Returns [`SegmentError::InvalidParameter`] for values <= 0.
    pub fn set_diff_var(&mut self, diff_var: f64) -> SegmentResult<()> {
        self.update_params("diff_var", |p| p.set_diff_var(diff_var))
    }

    /// Set all model parameters at once. Invalidates the scene.
    ///
    /// Nothing is changed unless every value is valid.
    pub fn set_parameters(
        &mut self,
        mean: f64,
        variance: f64,
        diff_mean: f64,
        diff_var: f64,
        weight: Option<f64>,
    ) -> SegmentResult<()> {
        let mut params = GaussianParams::new(mean, variance, diff_mean, diff_var)?;
        params.set_weight(weight)?;
        self.update_params("parameters", |p| {
            *p = params;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gaussian_state() -> ParameterState<GaussianAffinity> {
        let shape = Shape::new(&[3, 3]).unwrap();
        let params = GaussianParams::new(100.0, 10.0, 0.0, 10.0).unwrap();
        ParameterState::new(&shape, GaussianAffinity::new(params))
    }

    #[test]
    fn test_params_reject_non_positive_variance() {
        assert!(GaussianParams::new(0.0, -1.0, 0.0, 1.0).is_err());
        assert!(GaussianParams::new(0.0, 1.0, 0.0, 0.0).is_err());
        assert!(GaussianParams::new(0.0, f64::NAN, 0.0, 1.0).is_err());
        assert!(GaussianParams::new(f64::INFINITY, 1.0, 0.0, 1.0).is_err());

        let params = GaussianParams::new(0.0, 1.0, 0.0, 1.0).unwrap();
        assert!(params.with_weight(1.5).is_err());
        assert_eq!(params.with_weight(0.25).unwrap().weight(), Some(0.25));
    }

    #[test]
    fn test_seed_set_bounds_and_duplicates() {
        let shape = Shape::new(&[4, 4]).unwrap();
        let mut seeds = SeedSet::new(&shape);
        assert!(seeds.insert(&[1, 2]).unwrap());
        assert!(!seeds.insert(&[1, 2]).unwrap());
        assert_eq!(seeds.len(), 1);
        assert_eq!(seeds.linear_indices(), &[9]);

        let err = seeds.insert(&[4, 0]).unwrap_err();
        assert_eq!(
            err,
            SegmentError::OutOfBounds {
                index: vec![4, 0],
                dims: vec![4, 4],
            }
        );
        assert!(seeds.insert(&[0, 0, 0]).is_err());
        assert_eq!(seeds.indices(), vec![vec![1, 2]]);
    }

    #[test]
    fn test_set_seeds_is_atomic() {
        let mut state = gaussian_state();
        state.set_seeds([[1usize, 1]]).unwrap();
        let before = state.seeds().clone();
        assert!(state.set_seeds([[0usize, 0], [5, 5]]).is_err());
        assert_eq!(state.seeds(), &before);
    }

    #[test]
    fn test_threshold_does_not_invalidate() {
        let mut state = gaussian_state();
        state.mark_propagated();
        state.set_threshold(1000);
        assert!(state.set_relative_threshold(0.9).is_ok());
        assert!(!state.is_stale());
        assert!(state.set_relative_threshold(2.0).is_err());
        assert_eq!(state.threshold(), fuzzyconn_core::scale_unit(0.9));
    }

    #[test]
    fn test_model_changes_invalidate() {
        let mut state = gaussian_state();

        state.mark_propagated();
        state.set_mean(120.0).unwrap();
        assert!(state.is_stale());

        state.mark_propagated();
        state.add_seed(&[0, 1]).unwrap();
        assert!(state.is_stale());

        state.mark_propagated();
        state.add_seed(&[0, 1]).unwrap();
        assert!(!state.is_stale());

        state.set_parameters(90.0, 5.0, 1.0, 2.0, Some(0.5)).unwrap();
        assert_eq!(state.params().weight(), Some(0.5));
        assert_eq!(state.params().mean(), 90.0);
    }

    #[test]
    fn test_rejected_variance_keeps_scene() {
        let mut state = gaussian_state();
        state.mark_propagated();
        assert!(state.set_variance(0.0).is_err());
        assert!(state.set_diff_var(-2.0).is_err());
        assert!(state.set_parameters(1.0, 1.0, 1.0, 0.0, None).is_err());
        assert!(!state.is_stale());
        assert_eq!(state.params().variance(), 10.0);
    }
}
