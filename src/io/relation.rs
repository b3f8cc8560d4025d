//! Read/write relation JSON files.
//!
//! Relation JSON is the portable representation of a calibrated
//! luminosity-velocity relation:
//!
//! - fitted (A, B) with their standard errors
//! - fit quality over the calibration set
//! - run metadata (tool name, calibration date)
//!
//! The schema is defined by `domain::RelationFile`. A `calibrate` run writes
//! it so a later `predict` run can process targets without re-measuring the
//! calibration set.

use std::fs::File;
use std::path::Path;

use crate::domain::RelationFile;
use crate::error::AppError;
use crate::fit::PowerLawFit;

/// Write a relation JSON file.
pub fn write_relation_json(path: &Path, fit: &PowerLawFit) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::input(format!(
            "Failed to create relation JSON '{}': {e}",
            path.display()
        ))
    })?;

    let artifact = RelationFile {
        tool: "tfd".to_string(),
        fitted_on: chrono::Utc::now().date_naive(),
        relation: fit.relation,
        quality: fit.quality.clone(),
    };

    serde_json::to_writer_pretty(file, &artifact)
        .map_err(|e| AppError::input(format!("Failed to write relation JSON: {e}")))?;

    Ok(())
}

/// Read a relation JSON file.
pub fn read_relation_json(path: &Path) -> Result<RelationFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::input(format!(
            "Failed to open relation JSON '{}': {e}",
            path.display()
        ))
    })?;
    let artifact: RelationFile = serde_json::from_reader(file)
        .map_err(|e| AppError::input(format!("Invalid relation JSON: {e}")))?;
    Ok(artifact)
}
