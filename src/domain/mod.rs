//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - measured quantities with 1-sigma uncertainty (`StatValue`)
//! - spectral line profiles (`Sample`, `Profile`)
//! - fit outputs (`RelationFit`, `FitQuality`, `RelationFile`)
//! - per-source output rows (`SourceResult`) and run configuration

pub mod types;

pub use types::*;
