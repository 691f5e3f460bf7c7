//! Fuzzy affinity functions
//!
//! An affinity maps a pair of neighbouring pixel values to a strength in
//! `0..=MAX_STRENGTH`, reflecting how likely the two pixels belong to the
//! same object. Affinities must be symmetric and free of side effects.
//!
//! Two Gaussian models are provided:
//!
//! - [`GaussianAffinity`] for scalar pixels
//! - [`VectorGaussianAffinity`] for multi-component pixels `[T; N]`,
//!   with independent (diagonal) channel statistics
//!
//! Any `Fn(P, P) -> Strength` closure is also an affinity.

use crate::error::{SegmentError, SegmentResult};
use crate::params::GaussianParams;
use fuzzyconn_core::{Strength, scale_unit};
use num_traits::AsPrimitive;

/// Pluggable affinity strategy
pub trait Affinity<P> {
    /// Affinity between two neighbouring pixel values.
    ///
    /// Must satisfy `affinity(a, b) == affinity(b, a)`.
    fn affinity(&self, a: P, b: P) -> Strength;
}

impl<P, F> Affinity<P> for F
where
    F: Fn(P, P) -> Strength,
{
    fn affinity(&self, a: P, b: P) -> Strength {
        self(a, b)
    }
}

#[inline]
fn gaussian(deviation_sq: f64, variance: f64) -> f64 {
    (-0.5 * deviation_sq / variance).exp()
}

#[inline]
fn combine(intensity_term: f64, difference_term: f64, weight: Option<f64>) -> f64 {
    match weight {
        None => intensity_term * difference_term,
        Some(w) => w * intensity_term + (1.0 - w) * difference_term,
    }
}

/// Gaussian affinity for scalar images
///
/// With `f1`, `f2` the two intensities:
///
/// ```text
/// g_int  = exp(-0.5 * ((f1 + f2) / 2 - mean)^2 / variance)
/// g_diff = exp(-0.5 * (|f1 - f2| - diff_mean)^2 / diff_var)
/// g      = g_int * g_diff                      (no weight)
///        = w * g_int + (1 - w) * g_diff        (weight w)
/// ```
///
/// and the affinity is `g` scaled to the strength range.
///
/// # Examples
///
/// ```
/// use fuzzyconn_core::MAX_STRENGTH;
/// use fuzzyconn_segment::{Affinity, GaussianAffinity, GaussianParams};
///
/// let affinity = GaussianAffinity::new(GaussianParams::new(100.0, 10.0, 0.0, 10.0).unwrap());
/// assert_eq!(affinity.affinity(100u8, 100u8), MAX_STRENGTH);
/// assert!(affinity.affinity(100u8, 110u8) < MAX_STRENGTH);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianAffinity {
    params: GaussianParams,
}

impl GaussianAffinity {
    /// Create an affinity from a validated parameter record
    pub fn new(params: GaussianParams) -> Self {
        Self { params }
    }

    /// Model parameters
    pub fn params(&self) -> &GaussianParams {
        &self.params
    }

    pub(crate) fn params_mut(&mut self) -> &mut GaussianParams {
        &mut self.params
    }

    /// Unscaled affinity in [0, 1].
    pub fn unit_affinity(&self, f1: f64, f2: f64) -> f64 {
        let p = &self.params;
        let avg = 0.5 * (f1 + f2) - p.mean();
        let diff = (f1 - f2).abs() - p.diff_mean();
        combine(
            gaussian(avg * avg, p.variance()),
            gaussian(diff * diff, p.diff_var()),
            p.weight(),
        )
    }
}

impl<T> Affinity<T> for GaussianAffinity
where
    T: AsPrimitive<f64>,
{
    #[inline]
    fn affinity(&self, a: T, b: T) -> Strength {
        scale_unit(self.unit_affinity(a.as_(), b.as_()))
    }
}

/// Gaussian affinity for multi-component images
///
/// Channels are treated as independent: the intensity term uses the
/// squared Mahalanobis distance of the channel-wise average from `mean`
/// under a diagonal covariance, and the difference term does the same for
/// the channel-wise absolute difference against `diff_mean`.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorGaussianAffinity<const N: usize> {
    mean: [f64; N],
    variance: [f64; N],
    diff_mean: [f64; N],
    diff_var: [f64; N],
    weight: Option<f64>,
}

impl<const N: usize> VectorGaussianAffinity<N> {
    /// Create a validated multi-channel model
    ///
    /// # Errors
    ///
    /// Returns [`SegmentError::InvalidParameter`] if any value is not
    /// finite, any variance is <= 0, or `N` is zero.
    pub fn new(
        mean: [f64; N],
        variance: [f64; N],
        diff_mean: [f64; N],
        diff_var: [f64; N],
    ) -> SegmentResult<Self> {
        if N == 0 {
            return Err(SegmentError::InvalidParameter(
                "vector affinity needs at least one channel".to_string(),
            ));
        }
        for c in 0..N {
            // Reuse the scalar checks channel by channel
            GaussianParams::new(mean[c], variance[c], diff_mean[c], diff_var[c]).map_err(
                |e| SegmentError::InvalidParameter(format!("channel {c}: {e}")),
            )?;
        }
        Ok(Self {
            mean,
            variance,
            diff_mean,
            diff_var,
            weight: None,
        })
    }

    /// Blend the two terms with `weight` instead of multiplying them.
    ///
    /// # Errors
    ///
    /// Returns [`SegmentError::InvalidParameter`] if `weight` is outside [0, 1].
    pub fn with_weight(mut self, weight: f64) -> SegmentResult<Self> {
        if !(0.0..=1.0).contains(&weight) {
            return Err(SegmentError::InvalidParameter(format!(
                "weight must be in [0, 1], got {weight}"
            )));
        }
        self.weight = Some(weight);
        Ok(self)
    }

    /// Unscaled affinity in [0, 1].
    pub fn unit_affinity(&self, f1: &[f64; N], f2: &[f64; N]) -> f64 {
        let mut dist_int = 0.0;
        let mut dist_diff = 0.0;
        for c in 0..N {
            let avg = 0.5 * (f1[c] + f2[c]) - self.mean[c];
            let diff = (f1[c] - f2[c]).abs() - self.diff_mean[c];
            dist_int += avg * avg / self.variance[c];
            dist_diff += diff * diff / self.diff_var[c];
        }
        combine(
            gaussian(dist_int, 1.0),
            gaussian(dist_diff, 1.0),
            self.weight,
        )
    }
}

impl<T, const N: usize> Affinity<[T; N]> for VectorGaussianAffinity<N>
where
    T: AsPrimitive<f64>,
{
    fn affinity(&self, a: [T; N], b: [T; N]) -> Strength {
        let a = a.map(|v| v.as_());
        let b = b.map(|v| v.as_());
        scale_unit(self.unit_affinity(&a, &b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fuzzyconn_core::MAX_STRENGTH;

    fn model(mean: f64, var: f64, diff_mean: f64, diff_var: f64) -> GaussianAffinity {
        GaussianAffinity::new(GaussianParams::new(mean, var, diff_mean, diff_var).unwrap())
    }

    #[test]
    fn test_exact_match_is_maximal() {
        let a = model(100.0, 10.0, 0.0, 10.0);
        assert_eq!(a.affinity(100u16, 100u16), MAX_STRENGTH);

        // Pair averaging to the mean with the expected difference
        let a = model(100.0, 10.0, 4.0, 10.0);
        assert_eq!(a.affinity(98.0f32, 102.0f32), MAX_STRENGTH);
    }

    #[test]
    fn test_symmetric() {
        let a = model(80.0, 25.0, 3.0, 4.0);
        for x in (0u8..=255).step_by(17) {
            for y in (0u8..=255).step_by(13) {
                assert_eq!(a.affinity(x, y), a.affinity(y, x));
            }
        }
        let weighted = GaussianAffinity::new(
            GaussianParams::new(80.0, 25.0, 3.0, 4.0)
                .unwrap()
                .with_weight(0.3)
                .unwrap(),
        );
        assert_eq!(weighted.affinity(70i32, 95i32), weighted.affinity(95i32, 70i32));
    }

    #[test]
    fn test_large_deviation_approaches_zero() {
        let a = model(100.0, 10.0, 0.0, 10.0);
        assert_eq!(a.affinity(500u16, 100u16), 0);
        assert_eq!(a.affinity(500u16, 500u16), 0);
        let near = a.affinity(101u16, 101u16);
        let far = a.affinity(105u16, 105u16);
        assert!(near > far);
    }

    #[test]
    fn test_weight_one_ignores_difference() {
        let params = GaussianParams::new(100.0, 10.0, 0.0, 1.0)
            .unwrap()
            .with_weight(1.0)
            .unwrap();
        let a = GaussianAffinity::new(params);
        // Average is exactly the mean; the difference term would be ~0
        assert_eq!(a.affinity(90u8, 110u8), MAX_STRENGTH);
    }

    #[test]
    fn test_closure_affinity() {
        let min_affinity = |a: u8, b: u8| Strength::from(a.min(b));
        assert_eq!(Affinity::<u8>::affinity(&min_affinity, 3, 9), 3);
    }

    #[test]
    fn test_vector_affinity() {
        let a = VectorGaussianAffinity::new(
            [100.0, 50.0, 20.0],
            [10.0, 10.0, 10.0],
            [0.0; 3],
            [10.0; 3],
        )
        .unwrap();
        assert_eq!(a.affinity([100u8, 50, 20], [100u8, 50, 20]), MAX_STRENGTH);
        assert_eq!(
            a.affinity([100u8, 60, 20], [90u8, 50, 25]),
            a.affinity([90u8, 50, 25], [100u8, 60, 20])
        );
        assert!(a.affinity([100u8, 50, 20], [100u8, 50, 30]) < MAX_STRENGTH);

        // A single channel reduces to the scalar model
        let v = VectorGaussianAffinity::new([80.0], [16.0], [2.0], [9.0]).unwrap();
        let s = model(80.0, 16.0, 2.0, 9.0);
        assert_eq!(v.affinity([75u8], [83u8]), s.affinity(75u8, 83u8));
    }

    #[test]
    fn test_vector_affinity_rejects_bad_channel() {
        let err = VectorGaussianAffinity::new([0.0, 0.0], [1.0, 0.0], [0.0; 2], [1.0; 2]);
        assert!(matches!(err, Err(SegmentError::InvalidParameter(_))));
    }
}
