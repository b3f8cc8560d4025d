//! Inclination correction of the observed half-width.

use crate::domain::StatValue;
use crate::error::AppError;

/// Inclination-corrected rotational velocity `V = HWHM / sin(i)`.
///
/// Both inputs are `StatValue`s, inclination in degrees. The relative error
/// combines the half-width term and the inclination term in quadrature:
///
/// ```text
/// relErr = sqrt((σ_W / W)² + (cos(i) · σ_i / sin(i))²)   (σ_i in radians)
/// ```
///
/// Inclination of 0° or 180° leaves the deprojection undefined and is a
/// per-source error, never an infinity.
pub fn rotational_velocity(
    hwhm: StatValue,
    inclination_deg: StatValue,
) -> Result<StatValue, AppError> {
    let incl = inclination_deg.value.to_radians();
    let sin_i = incl.sin();
    if sin_i.abs() < 1e-12 {
        return Err(AppError::data(format!(
            "inclination {}° is face-on/edge-degenerate; cannot deproject",
            inclination_deg.value
        )));
    }
    if hwhm.value == 0.0 {
        return Err(AppError::data(
            "zero half-width; relative error is undefined",
        ));
    }

    let value = hwhm.value / sin_i;
    let incl_err = inclination_deg.error.to_radians();
    let rel_err = ((hwhm.error / hwhm.value).powi(2)
        + (incl.cos() * incl_err / sin_i).powi(2))
    .sqrt();

    Ok(StatValue::new(value, value.abs() * rel_err))
}
