//! Relation fitting.
//!
//! Responsibilities:
//!
//! - nonlinear least-squares fit of the luminosity-velocity power law
//! - parameter standard errors from the solver covariance

pub mod power_law;

pub use power_law::*;
