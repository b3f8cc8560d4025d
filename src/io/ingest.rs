//! Batch input ingest.
//!
//! This module turns the on-disk inputs into clean in-memory structures:
//!
//! - **Name lists**: newline-delimited source names, one file per catalog
//!   half (calibration / target). Unreadable list files are run-fatal.
//! - **Catalogs**: whitespace-delimited `(name, value, error)` triples keyed
//!   by source name. A bad row is a run-fatal input error with a line number.
//! - **Profiles**: flat whitespace-delimited numeric token streams, consumed
//!   pairwise and normalized (`spectral::normalize_profile`). Missing or
//!   malformed profile files are per-source errors, caught by the pipeline.
//!
//! No fitting or analysis logic lives here.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::domain::{Profile, StatValue};
use crate::error::AppError;
use crate::spectral::normalize_profile;

/// A per-source lookup table of one measured quantity (inclination, flux
/// density, or distance modulus).
#[derive(Debug, Clone)]
pub struct Catalog {
    pub label: String,
    pub entries: HashMap<String, StatValue>,
}

impl Catalog {
    /// Entry for a named source; a missing entry is a per-source error.
    pub fn get(&self, name: &str) -> Result<StatValue, AppError> {
        self.entries.get(name).copied().ok_or_else(|| {
            AppError::data(format!("no {} catalog entry for {name}", self.label))
        })
    }
}

/// Read a newline-delimited name list, skipping blank lines.
pub fn read_name_list(path: &Path) -> Result<Vec<String>, AppError> {
    let text = fs::read_to_string(path).map_err(|e| {
        AppError::input(format!("Failed to read name list '{}': {e}", path.display()))
    })?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

/// Read a `(name, value, error)` catalog file.
pub fn read_catalog(path: &Path, label: &str) -> Result<Catalog, AppError> {
    let text = fs::read_to_string(path).map_err(|e| {
        AppError::input(format!(
            "Failed to read {label} catalog '{}': {e}",
            path.display()
        ))
    })?;

    let mut entries = HashMap::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut fields = line.split_whitespace();
        let (Some(name), Some(value), Some(error)) =
            (fields.next(), fields.next(), fields.next())
        else {
            return Err(AppError::input(format!(
                "{label} catalog '{}' line {}: expected 'name value error'",
                path.display(),
                idx + 1
            )));
        };
        let value: f64 = value.parse().map_err(|_| {
            AppError::input(format!(
                "{label} catalog '{}' line {}: unparsable value '{value}'",
                path.display(),
                idx + 1
            ))
        })?;
        let error: f64 = error.parse().map_err(|_| {
            AppError::input(format!(
                "{label} catalog '{}' line {}: unparsable error '{error}'",
                path.display(),
                idx + 1
            ))
        })?;
        entries.insert(name.to_string(), StatValue::new(value, error));
    }

    Ok(Catalog {
        label: label.to_string(),
        entries,
    })
}

/// Read and normalize one source's profile file.
///
/// A missing file maps to a per-source error in the same class as a
/// malformed profile; the pipeline logs it and skips the source.
pub fn read_profile(path: &Path, name: &str) -> Result<Profile, AppError> {
    let text = fs::read_to_string(path)
        .map_err(|e| AppError::data(format!("no data available for {name}: {e}")))?;

    let mut tokens = Vec::with_capacity(text.len() / 8);
    for token in text.split_whitespace() {
        let value: f64 = token.parse().map_err(|_| {
            AppError::data(format!("{name}: unparsable number '{token}' in profile"))
        })?;
        tokens.push(value);
    }

    normalize_profile(name, &tokens)
}
