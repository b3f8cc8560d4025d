//! Distance from a known distance modulus (calibration sources only).

use crate::domain::StatValue;

/// Meters per parsec.
pub const METERS_PER_PARSEC: f64 = 3.0857e16;

/// Linear distance in meters from a distance modulus.
///
/// `d = 10^(1 + μ/5)` parsecs with `σ_d = σ_μ · ln(10)/5 · d`, then converted
/// to meters. Never invoked for the target catalog; targets get their
/// distance from the fitted relation instead.
pub fn distance_from_modulus(modulus: StatValue) -> StatValue {
    let d_pc = 10f64.powf(1.0 + modulus.value / 5.0);
    let err_pc = modulus.error * std::f64::consts::LN_10 / 5.0 * d_pc;
    StatValue::new(d_pc, err_pc).scale(METERS_PER_PARSEC)
}
