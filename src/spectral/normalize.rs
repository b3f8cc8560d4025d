//! Profile normalization.
//!
//! Raw profile files are flat streams of numeric tokens consumed pairwise as
//! (x, flux). The x axis may be either frequency in Hz or velocity in m/s;
//! this module resolves the axis, applies the Doppler relation where needed,
//! and produces a canonical `Profile` in km/s.

use std::cmp::Ordering;

use crate::domain::{Profile, Sample};
use crate::error::AppError;

/// Speed of light, m/s.
pub const SPEED_OF_LIGHT: f64 = 3.0e8;

/// HI 21cm rest frequency, Hz.
pub const HI_REST_FREQUENCY: f64 = 1.420_405_80e9;

/// Profiles with fewer samples cannot support crossing interpolation on both
/// sides of a feature.
pub const MIN_PROFILE_SAMPLES: usize = 4;

/// Build a canonical `Profile` from raw numeric tokens.
///
/// Axis rule: no velocity exceeds the speed of light, so a first x-value
/// above `c` marks the axis as frequency in Hz, converted via
/// `v = |c/f0 · (f − f0)|` with f0 the HI rest frequency. Either way the
/// x axis is then scaled m/s → km/s, exactly once per profile.
///
/// An odd leftover token or fewer than [`MIN_PROFILE_SAMPLES`] samples is a
/// malformed-profile error (per-source, non-fatal to the batch).
pub fn normalize_profile(name: &str, tokens: &[f64]) -> Result<Profile, AppError> {
    if tokens.len() % 2 != 0 {
        return Err(AppError::data(format!(
            "{name}: malformed profile (odd token count {})",
            tokens.len()
        )));
    }

    let mut samples: Vec<Sample> = tokens
        .chunks_exact(2)
        .map(|pair| Sample {
            velocity: pair[0],
            flux: pair[1],
        })
        .collect();

    if samples.len() < MIN_PROFILE_SAMPLES {
        return Err(AppError::data(format!(
            "{name}: malformed profile ({} samples, need at least {MIN_PROFILE_SAMPLES})",
            samples.len()
        )));
    }

    if samples[0].velocity > SPEED_OF_LIGHT {
        // Faster than light, must be frequency.
        for s in &mut samples {
            s.velocity =
                (SPEED_OF_LIGHT / HI_REST_FREQUENCY * (s.velocity - HI_REST_FREQUENCY)).abs();
        }
    }

    // All x values now in m/s; convert to km/s.
    for s in &mut samples {
        s.velocity /= 1e3;
    }

    // Frequency axes run high-to-low, so the Doppler map can reverse sample
    // order; restore the ascending-velocity invariant.
    samples.sort_by(|a, b| {
        a.velocity
            .partial_cmp(&b.velocity)
            .unwrap_or(Ordering::Equal)
    });

    Ok(Profile {
        name: name.to_string(),
        samples,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn velocity_axis_passes_through_scaled_only() {
        let tokens = [1000.0, 1.0, 2000.0, 2.0, 3000.0, 3.0, 4000.0, 4.0];
        let profile = normalize_profile("v", &tokens).unwrap();
        let velocities: Vec<f64> = profile.samples.iter().map(|s| s.velocity).collect();
        assert_eq!(velocities, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(profile.samples[0].flux, 1.0);
    }

    #[test]
    fn frequency_axis_triggers_doppler_conversion() {
        // f = f0 exactly maps to v = 0; an offset of 1 MHz maps to
        // |c/f0 * 1e6| m/s = 211.207... km/s.
        let f0 = HI_REST_FREQUENCY;
        let tokens = [
            f0 + 2e6,
            1.0,
            f0 + 1e6,
            2.0,
            f0,
            3.0,
            f0 - 1e6,
            2.0,
        ];
        let profile = normalize_profile("f", &tokens).unwrap();
        let expected_step = SPEED_OF_LIGHT / f0 * 1e6 / 1e3;

        // |f - f0| folds both sides of the rest frequency onto positive
        // velocities, and sorting restores ascending order.
        let velocities: Vec<f64> = profile.samples.iter().map(|s| s.velocity).collect();
        assert!((velocities[0] - 0.0).abs() < 1e-9);
        assert!((velocities[1] - expected_step).abs() < 1e-9);
        assert!((velocities[2] - expected_step).abs() < 1e-9);
        assert!((velocities[3] - 2.0 * expected_step).abs() < 1e-9);
    }

    #[test]
    fn first_x_at_the_speed_of_light_is_still_velocity() {
        // The rule is strictly greater than c.
        let tokens = [
            SPEED_OF_LIGHT,
            1.0,
            SPEED_OF_LIGHT + 1.0,
            2.0,
            SPEED_OF_LIGHT + 2.0,
            3.0,
            SPEED_OF_LIGHT + 3.0,
            4.0,
        ];
        let profile = normalize_profile("edge", &tokens).unwrap();
        assert!((profile.samples[0].velocity - SPEED_OF_LIGHT / 1e3).abs() < 1e-6);
    }

    #[test]
    fn odd_token_count_is_malformed() {
        let tokens = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];
        let err = normalize_profile("odd", &tokens).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn short_profile_is_malformed() {
        let tokens = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let err = normalize_profile("short", &tokens).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
