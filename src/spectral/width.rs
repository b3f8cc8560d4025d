//! Half-width extraction.
//!
//! The half width at half maximum (HWHM) of the single emission feature,
//! with an uncertainty from the threshold-shift method: relocate the
//! crossings at `half-max − baseline sigma` and take the absolute half-width
//! difference. That is a first-order sensitivity estimate, not a rigorous
//! confidence interval, and is documented as such wherever it is reported.

use crate::domain::{Profile, StatValue};
use crate::error::AppError;
use crate::spectral::side_creep;

/// HWHM and its uncertainty for a normalized profile.
///
/// `baseline_sigma` is the noise floor from [`crate::spectral::baseline_sigma`].
/// A profile with no locatable half-maximum crossing is a degenerate-threshold
/// error, fatal for that source only.
pub fn half_width(profile: &Profile, baseline_sigma: f64) -> Result<StatValue, AppError> {
    let half_max = profile.peak_flux() / 2.0;

    let hwhm = hwhm_at(profile, half_max)?;
    let shifted = hwhm_at(profile, half_max - baseline_sigma)?;

    Ok(StatValue::new(hwhm, (shifted - hwhm).abs()))
}

fn hwhm_at(profile: &Profile, threshold: f64) -> Result<f64, AppError> {
    let bounds = side_creep(&profile.samples, threshold);
    match (bounds.left, bounds.right) {
        // Absolute value guarantees a positive width regardless of the axis
        // sign convention.
        (Some(left), Some(right)) => Ok((right.velocity - left.velocity).abs() / 2.0),
        _ => Err(AppError::data(format!(
            "{}: no crossing at threshold {threshold} (degenerate profile)",
            profile.name
        ))),
    }
}
