//! Baseline noise estimation.
//!
//! The flux scatter of off-feature ("side") samples is the measurement noise
//! floor used to shift the half-maximum threshold when estimating the
//! half-width uncertainty.

use crate::domain::Profile;
use crate::error::AppError;
use crate::math::population_std_dev;
use crate::spectral::side_creep;

/// Feature bounds for baseline separation are located at peak/4, not at
/// half-maximum, so the feature wings are not folded into the baseline.
pub const BASELINE_CUTOFF_DIVISOR: f64 = 4.0;

/// Population standard deviation of the baseline flux.
///
/// Samples strictly outside the peak/4 bound indices count as baseline; a
/// side whose bound is missing contributes nothing. Both sides empty is a
/// per-source error.
pub fn baseline_sigma(profile: &Profile) -> Result<f64, AppError> {
    let cutoff = profile.peak_flux() / BASELINE_CUTOFF_DIVISOR;
    let bounds = side_creep(&profile.samples, cutoff);

    let mut side_flux = Vec::new();
    if let Some(left) = bounds.left {
        side_flux.extend(profile.samples[..left.index].iter().map(|s| s.flux));
    }
    if let Some(right) = bounds.right {
        side_flux.extend(profile.samples[right.index + 1..].iter().map(|s| s.flux));
    }

    population_std_dev(&side_flux).ok_or_else(|| {
        AppError::data(format!(
            "{}: no baseline samples outside the emission feature",
            profile.name
        ))
    })
}
