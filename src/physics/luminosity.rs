//! Luminosity conversions, both directions.
//!
//! Calibration direction: flux density + known distance → luminosity, one
//! point of the relation-fit sample. Prediction direction: fitted relation +
//! measured velocity → luminosity, inverted through the flux relation to a
//! predicted distance.

use std::f64::consts::PI;

use crate::domain::{RelationFit, StatValue};
use crate::error::AppError;

/// `L = S · 4π · d²`.
///
/// The relative error combines the flux term and the distance term in
/// quadrature; the distance enters squared, so its relative error carries
/// weight 2.
pub fn luminosity_from_flux(flux: StatValue, distance: StatValue) -> StatValue {
    let value = flux.value * 4.0 * PI * distance.value * distance.value;
    let rel_err = (flux.relative_error().powi(2)
        + (2.0 * distance.relative_error()).powi(2))
    .sqrt();
    StatValue::new(value, value.abs() * rel_err)
}

/// Predicted luminosity `L = A · V^B` from a fitted relation.
///
/// Uncertainty propagates from A, B, and V via the partial derivatives in
/// quadrature, including the `ln(V)` sensitivity of the exponent:
///
/// ```text
/// σ_L² = (V^B σ_A)² + (L·ln V · σ_B)² + (A·B·V^(B−1) σ_V)²
/// ```
pub fn luminosity_from_relation(
    relation: &RelationFit,
    velocity: StatValue,
) -> Result<StatValue, AppError> {
    if velocity.value <= 0.0 {
        return Err(AppError::data(format!(
            "non-positive rotational velocity {} km/s cannot enter the power law",
            velocity.value
        )));
    }

    let a = relation.amplitude;
    let b = relation.exponent;
    let v = velocity;

    let value = a.value * v.value.powf(b.value);
    let dl_da = v.value.powf(b.value);
    let dl_db = value * v.value.ln();
    let dl_dv = a.value * b.value * v.value.powf(b.value - 1.0);
    let error = ((dl_da * a.error).powi(2)
        + (dl_db * b.error).powi(2)
        + (dl_dv * v.error).powi(2))
    .sqrt();

    Ok(StatValue::new(value, error))
}

/// Invert the flux relation: `d = sqrt(L / (4π·S))`.
///
/// The square root halves the combined relative error of luminosity and flux.
pub fn distance_from_luminosity(
    luminosity: StatValue,
    flux: StatValue,
) -> Result<StatValue, AppError> {
    if luminosity.value <= 0.0 || flux.value <= 0.0 {
        return Err(AppError::data(
            "luminosity and flux density must be positive to invert to a distance",
        ));
    }

    let value = (luminosity.value / (4.0 * PI * flux.value)).sqrt();
    let rel_err = 0.5
        * (luminosity.relative_error().powi(2) + flux.relative_error().powi(2)).sqrt();
    Ok(StatValue::new(value, value * rel_err))
}
