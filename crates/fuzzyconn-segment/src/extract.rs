//! Object extraction from a fuzzy scene
//!
//! Thresholding is a pixel-wise comparison `scene[p] >= threshold`. It
//! never touches the propagation state, so a new threshold only costs one
//! pass over the scene.

use crate::error::{SegmentError, SegmentResult};
use fuzzyconn_core::{FuzzyScene, Mask, Strength};

/// Extract the binary object at `threshold`.
///
/// # Examples
///
/// ```
/// use fuzzyconn_core::Image;
/// use fuzzyconn_segment::extract;
///
/// let scene = Image::from_data(&[4], vec![0u16, 100, 200, 65535]).unwrap();
/// let mask = extract(&scene, 200);
/// assert_eq!(mask.as_slice(), &[false, false, true, true]);
/// ```
pub fn extract(scene: &FuzzyScene, threshold: Strength) -> Mask {
    scene.map(|&s| s >= threshold)
}

/// Extract the binary object at `threshold` into an existing mask.
///
/// # Errors
///
/// Returns [`SegmentError::ShapeMismatch`] if `mask` and `scene` have
/// different grids; `mask` is left untouched.
pub fn extract_into(scene: &FuzzyScene, threshold: Strength, mask: &mut Mask) -> SegmentResult<()> {
    if !scene.same_shape(mask) {
        return Err(SegmentError::ShapeMismatch {
            expected: scene.dims().to_vec(),
            actual: mask.dims().to_vec(),
        });
    }
    for (m, &s) in mask.as_mut_slice().iter_mut().zip(scene.as_slice()) {
        *m = s >= threshold;
    }
    Ok(())
}

/// Number of pixels at or above `threshold`, without building a mask.
pub fn count_at_or_above(scene: &FuzzyScene, threshold: Strength) -> usize {
    scene.as_slice().iter().filter(|&&s| s >= threshold).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fuzzyconn_core::{Image, MAX_STRENGTH};

    fn scene() -> FuzzyScene {
        Image::from_data(&[3, 2], vec![MAX_STRENGTH, 40_000, 10, 0, 40_000, 39_999]).unwrap()
    }

    #[test]
    fn test_extract_inclusive() {
        let mask = extract(&scene(), 40_000);
        assert_eq!(mask.as_slice(), &[true, true, false, false, true, false]);
        assert_eq!(mask.count(), count_at_or_above(&scene(), 40_000));
    }

    #[test]
    fn test_extract_zero_threshold_selects_all() {
        assert_eq!(extract(&scene(), 0).count(), 6);
        assert_eq!(extract(&scene(), MAX_STRENGTH).count(), 1);
    }

    #[test]
    fn test_extract_into_reuses_buffer() {
        let scene = scene();
        let mut mask = Image::new(&[3, 2], true).unwrap();
        extract_into(&scene, 50_000, &mut mask).unwrap();
        assert_eq!(mask.count(), 1);
        extract_into(&scene, 10, &mut mask).unwrap();
        assert_eq!(mask, extract(&scene, 10));
    }

    #[test]
    fn test_extract_into_shape_mismatch() {
        let mut mask = Image::new(&[2, 3], false).unwrap();
        let err = extract_into(&scene(), 1, &mut mask).unwrap_err();
        assert!(matches!(err, SegmentError::ShapeMismatch { .. }));
        assert_eq!(mask.count(), 0);
    }
}
