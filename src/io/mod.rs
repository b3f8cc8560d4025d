//! Input/output helpers.
//!
//! - name lists, catalogs, and profile files (`ingest`)
//! - result table export (CSV) (`export`)
//! - relation JSON read/write (`relation`)

pub mod export;
pub mod ingest;
pub mod relation;

pub use export::*;
pub use ingest::*;
pub use relation::*;
