//! Fuzzy connectedness segmentation filter
//!
//! [`FuzzyConnectedness`] ties the pieces together for one input image:
//!
//! 1. configure the model, seeds and threshold through
//!    [`FuzzyConnectedness::params_mut`]
//! 2. call [`FuzzyConnectedness::update`] to propagate (if needed) and
//!    extract the object
//! 3. change only the threshold and call
//!    [`FuzzyConnectedness::segment_object`] to re-extract without
//!    propagating again
//!
//! A propagation either completes and replaces the stored scene, or fails
//! and leaves the previous scene untouched (but still stale).

use crate::affinity::{Affinity, GaussianAffinity};
use crate::error::{SegmentError, SegmentResult};
use crate::extract::extract;
use crate::params::{GaussianParams, ParameterState};
use crate::propagate::{PropagationOptions, PropagationStats, propagate};
use fuzzyconn_core::{FuzzyScene, Image, Mask};
use log::debug;
use num_traits::AsPrimitive;

/// Fuzzy connectedness segmentation of one image
///
/// # Examples
///
/// ```
/// use fuzzyconn_core::Image;
/// use fuzzyconn_segment::{FuzzyConnectedness, GaussianParams};
///
/// let image = Image::new(&[8, 8], 100u8).unwrap();
/// let params = GaussianParams::new(100.0, 10.0, 0.0, 10.0).unwrap();
///
/// let mut fc = FuzzyConnectedness::gaussian(&image, params);
/// fc.params_mut().set_seeds([[4usize, 4]]).unwrap();
/// let object = fc.update().unwrap();
/// assert_eq!(object.count(), 64);
///
/// // A new threshold only needs extraction
/// fc.params_mut().set_relative_threshold(0.9).unwrap();
/// assert!(!fc.is_stale());
/// let object = fc.segment_object().unwrap();
/// assert_eq!(object.count(), 64);
/// ```
#[derive(Debug)]
pub struct FuzzyConnectedness<'a, P, A> {
    image: &'a Image<P>,
    options: PropagationOptions,
    params: ParameterState<A>,
    scene: Option<FuzzyScene>,
    stats: Option<PropagationStats>,
}

impl<'a, P, A> FuzzyConnectedness<'a, P, A>
where
    P: Copy,
    A: Affinity<P>,
{
    /// Create a filter for `image` with the given affinity strategy.
    pub fn new(image: &'a Image<P>, affinity: A) -> Self {
        Self {
            image,
            options: PropagationOptions::default(),
            params: ParameterState::new(image.shape(), affinity),
            scene: None,
            stats: None,
        }
    }

    /// Use non-default propagation options.
    pub fn with_options(mut self, options: PropagationOptions) -> Self {
        self.set_options(options);
        self
    }

    /// Replace the propagation options. Invalidates the scene if they
    /// differ from the current ones.
    pub fn set_options(&mut self, options: PropagationOptions) {
        if options != self.options {
            self.options = options;
            self.params.mark_stale();
        }
    }

    /// Propagation options
    pub fn options(&self) -> &PropagationOptions {
        &self.options
    }

    /// Input image
    pub fn image(&self) -> &'a Image<P> {
        self.image
    }

    /// Model, seeds and threshold
    pub fn params(&self) -> &ParameterState<A> {
        &self.params
    }

    /// Mutable model, seeds and threshold
    pub fn params_mut(&mut self) -> &mut ParameterState<A> {
        &mut self.params
    }

    /// `true` if a propagation is needed before the next extraction
    pub fn is_stale(&self) -> bool {
        self.params.is_stale()
    }

    /// Recompute the fuzzy scene unconditionally.
    ///
    /// # Errors
    ///
    /// - [`SegmentError::NoSeeds`] if no seed is set
    /// - [`SegmentError::PopLimitExceeded`] if the pop limit is hit
    ///
    /// On error the previously stored scene, if any, is kept.
    pub fn propagate(&mut self) -> SegmentResult<PropagationStats> {
        let (scene, stats) = propagate(
            self.image,
            self.params.seeds(),
            self.params.affinity(),
            &self.options,
        )?;
        self.scene = Some(scene);
        self.stats = Some(stats);
        self.params.mark_propagated();
        Ok(stats)
    }

    /// Propagate if the scene is stale, then extract the object at the
    /// current threshold.
    ///
    /// # Errors
    ///
    /// See [`FuzzyConnectedness::propagate`].
    pub fn update(&mut self) -> SegmentResult<Mask> {
        if self.is_stale() {
            self.propagate()?;
        } else {
            debug!("fuzzy scene up to date, extracting only");
        }
        self.segment_object()
    }

    /// Extract the object from the current scene at the current threshold.
    ///
    /// # Errors
    ///
    /// Returns [`SegmentError::SceneNotReady`] if no propagation has
    /// succeeded since the last change to model, seeds or options.
    pub fn segment_object(&self) -> SegmentResult<Mask> {
        let scene = self.fuzzy_scene()?;
        Ok(extract(scene, self.params.threshold()))
    }

    /// Current fuzzy scene.
    ///
    /// # Errors
    ///
    /// Returns [`SegmentError::SceneNotReady`] if the scene is missing or
    /// stale.
    pub fn fuzzy_scene(&self) -> SegmentResult<&FuzzyScene> {
        match &self.scene {
            Some(scene) if !self.params.is_stale() => Ok(scene),
            _ => Err(SegmentError::SceneNotReady),
        }
    }

    /// Counters of the last successful propagation
    pub fn last_stats(&self) -> Option<&PropagationStats> {
        self.stats.as_ref()
    }
}

impl<'a, T> FuzzyConnectedness<'a, T, GaussianAffinity>
where
    T: AsPrimitive<f64>,
{
    /// Create a filter for a scalar image with the Gaussian affinity.
    pub fn gaussian(image: &'a Image<T>, params: GaussianParams) -> Self {
        Self::new(image, GaussianAffinity::new(params))
    }
}
