//! Connectedness strength values
//!
//! Strengths are fixed-point numbers in `0..=MAX_STRENGTH`, representing a
//! normalized value in [0, 1]. A fuzzy scene is an `Image<Strength>`.
//!
//! # Rounding rule
//!
//! A unit value `g` is scaled as `round(g * MAX_STRENGTH)`, rounding half
//! away from zero, after clamping `g` to [0, 1]. Scaling is monotonic, so
//! any ordering between unit values survives the conversion (ties may be
//! introduced, never inversions).

use crate::error::{Error, Result};

/// Fixed-point connectedness strength
pub type Strength = u16;

/// Strength of a seed, and of a perfect affinity
pub const MAX_STRENGTH: Strength = u16::MAX;

/// Scale a unit value to a strength, clamping out-of-range input.
///
/// NaN maps to zero.
///
/// # Examples
///
/// ```
/// use fuzzyconn_core::{MAX_STRENGTH, scale_unit};
///
/// assert_eq!(scale_unit(1.0), MAX_STRENGTH);
/// assert_eq!(scale_unit(0.0), 0);
/// assert_eq!(scale_unit(-3.0), 0);
/// assert_eq!(scale_unit(0.5), 32768);
/// ```
#[inline]
pub fn scale_unit(g: f64) -> Strength {
    if g.is_nan() {
        return 0;
    }
    (g.clamp(0.0, 1.0) * MAX_STRENGTH as f64).round() as Strength
}

/// Convert a fraction in [0, 1] to a strength.
///
/// # Errors
///
/// Returns [`Error::InvalidParameter`] if `fraction` is outside [0, 1]
/// or not finite.
pub fn strength_from_fraction(fraction: f64) -> Result<Strength> {
    if !(0.0..=1.0).contains(&fraction) {
        return Err(Error::InvalidParameter(format!(
            "fraction must be in [0, 1], got {fraction}"
        )));
    }
    Ok(scale_unit(fraction))
}

/// Normalized value of a strength, in [0, 1].
#[inline]
pub fn strength_to_fraction(strength: Strength) -> f64 {
    strength as f64 / MAX_STRENGTH as f64
}
