//! Spectral profile analysis.
//!
//! Responsibilities:
//!
//! - normalize raw (x, flux) pairs to canonical velocity/flux samples
//! - locate interpolated threshold crossings ("side creep")
//! - estimate the baseline noise floor from off-feature samples
//! - extract the half width at half maximum and its uncertainty

pub mod crossing;
pub mod noise;
pub mod normalize;
pub mod width;

pub use crossing::*;
pub use noise::*;
pub use normalize::*;
pub use width::*;
