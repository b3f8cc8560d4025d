//! Export the per-source result table to CSV.
//!
//! One row per processed source with a fixed header; skipped sources never
//! appear. The table is meant to be easy to consume in spreadsheets or
//! downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::SourceResult;
use crate::error::AppError;

pub const RESULTS_HEADER: &str = "name,rot_velocity_kms,rot_velocity_err_kms,\
luminosity_w,luminosity_err_w,distance_m,distance_err_m,\
weighted_mean_velocity_kms,weighted_mean_velocity_err_kms";

/// Write per-source results to a CSV file.
pub fn write_results_csv(path: &Path, results: &[SourceResult]) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::input(format!(
            "Failed to create results CSV '{}': {e}",
            path.display()
        ))
    })?;

    writeln!(file, "{RESULTS_HEADER}")
        .map_err(|e| AppError::input(format!("Failed to write results CSV header: {e}")))?;

    for r in results {
        writeln!(
            file,
            "{},{:.6},{:.6},{:.6e},{:.6e},{:.6e},{:.6e},{:.6},{:.6}",
            r.name,
            r.rot_velocity.value,
            r.rot_velocity.error,
            r.luminosity.value,
            r.luminosity.error,
            r.distance.value,
            r.distance.error,
            r.weighted_velocity.value,
            r.weighted_velocity.error,
        )
        .map_err(|e| AppError::input(format!("Failed to write results CSV row: {e}")))?;
    }

    Ok(())
}
