//! Physical conversions with uncertainty propagation.
//!
//! Responsibilities:
//!
//! - deproject half-widths to rotational velocity (inclination correction)
//! - convert distance moduli to linear distance (calibration sources)
//! - convert flux density + distance to luminosity, and invert the fitted
//!   relation back to a predicted distance

pub mod distance;
pub mod kinematics;
pub mod luminosity;

pub use distance::*;
pub use kinematics::*;
pub use luminosity::*;
