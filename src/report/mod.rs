//! Reporting utilities: per-source lines and the run summary.
//!
//! We keep formatting code in one place so:
//! - the analysis/fitting code stays clean and testable
//! - output changes are localized

pub mod format;

pub use format::*;
