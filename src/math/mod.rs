//! Mathematical utilities: least-squares step solver and small statistics.

pub mod lstsq;
pub mod stats;

pub use lstsq::*;
pub use stats::*;
