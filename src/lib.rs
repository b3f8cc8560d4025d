//! `tf-distances` library crate.
//!
//! The binary (`tfd`) is a thin wrapper around this library so that:
//!
//! - the whole pipeline is testable without spawning processes
//! - the analysis modules are reusable outside the batch driver
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod physics;
pub mod report;
pub mod spectral;
