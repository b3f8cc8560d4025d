//! Shared domain types.
//!
//! These types are intentionally kept lightweight and (where they end up in
//! the relation artifact) serializable so they can be:
//!
//! - used in-memory during the batch run
//! - exported to CSV/JSON
//! - reloaded later by a prediction-only run

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A measurement with 1-sigma uncertainty.
///
/// All combinations of `StatValue`s in this crate use first-order error
/// propagation: partial derivatives combined in quadrature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatValue {
    pub value: f64,
    pub error: f64,
}

impl StatValue {
    pub fn new(value: f64, error: f64) -> Self {
        Self {
            value,
            error: error.abs(),
        }
    }

    /// A value with zero quoted uncertainty.
    pub fn exact(value: f64) -> Self {
        Self::new(value, 0.0)
    }

    /// `|error / value|`, or 0 for a zero value (callers guard the zero case
    /// where it matters physically).
    pub fn relative_error(&self) -> f64 {
        if self.value == 0.0 {
            0.0
        } else {
            (self.error / self.value).abs()
        }
    }

    /// Scale value and error by an exact constant factor.
    pub fn scale(&self, factor: f64) -> Self {
        Self::new(self.value * factor, self.error * factor)
    }
}

/// One profile sample: velocity in km/s (after normalization), flux in the
/// instrument's native brightness unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub velocity: f64,
    pub flux: f64,
}

/// A named spectral line profile, samples in ascending velocity order.
///
/// Invariants (enforced by the normalizer): at least 4 samples, and exactly
/// one contiguous region above the half-maximum threshold.
#[derive(Debug, Clone)]
pub struct Profile {
    pub name: String,
    pub samples: Vec<Sample>,
}

impl Profile {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Global maximum flux over the profile.
    pub fn peak_flux(&self) -> f64 {
        self.samples
            .iter()
            .map(|s| s.flux)
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Which half of the batch a pass belongs to.
///
/// The original workflow was two near-identical scripts toggled at compile
/// time; here a single orchestrator is parameterized by this mode and shares
/// all per-source analysis between the two passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Sources with independently known distances; feeds the relation fit.
    Calibrate,
    /// Sources whose distances are predicted from the fitted relation.
    Predict,
}

impl RunMode {
    pub fn display_name(self) -> &'static str {
        match self {
            RunMode::Calibrate => "calibration",
            RunMode::Predict => "prediction",
        }
    }
}

/// Fitted power-law relation `L(V) = A * V^B` with standard errors from the
/// regression covariance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RelationFit {
    /// A, in luminosity units per (km/s)^B.
    pub amplitude: StatValue,
    /// B, dimensionless.
    pub exponent: StatValue,
}

impl RelationFit {
    /// Central-value prediction of the relation at velocity `v` (km/s).
    pub fn predict(&self, v: f64) -> f64 {
        self.amplitude.value * v.powf(self.exponent.value)
    }
}

/// Fit quality diagnostics in unscaled luminosity units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitQuality {
    pub sse: f64,
    pub rmse: f64,
    pub n: usize,
}

/// The portable representation of a calibrated relation (JSON artifact).
///
/// Written by `tfd calibrate --export-relation`, read by `tfd predict`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationFile {
    pub tool: String,
    pub fitted_on: NaiveDate,
    pub relation: RelationFit,
    pub quality: FitQuality,
}

/// One fully analyzed source: a row of the result table.
#[derive(Debug, Clone)]
pub struct SourceResult {
    pub name: String,
    /// Half width at half maximum, km/s.
    pub hwhm: StatValue,
    /// Inclination-corrected rotational velocity, km/s.
    pub rot_velocity: StatValue,
    /// Luminosity, W (measured in calibration mode, predicted in prediction mode).
    pub luminosity: StatValue,
    /// Distance, m (from the modulus in calibration mode, from the relation in
    /// prediction mode).
    pub distance: StatValue,
    /// Inverse-variance weighted mean over the source's per-feature velocities.
    /// Profiles carry a single feature, so this equals `rot_velocity` today.
    pub weighted_velocity: StatValue,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory holding per-source profile files (`<name>.txt`).
    pub data_dir: PathBuf,
    /// Newline-delimited names of calibration sources.
    pub calibration_list: PathBuf,
    /// Newline-delimited names of target sources.
    pub target_list: PathBuf,
    /// Catalog of inclinations (degrees).
    pub inclination_catalog: PathBuf,
    /// Catalog of flux densities.
    pub flux_catalog: PathBuf,
    /// Catalog of distance moduli (calibration sources only).
    pub modulus_catalog: PathBuf,

    pub export_table: Option<PathBuf>,
    pub export_relation: Option<PathBuf>,

    /// Safety cap on Levenberg-Marquardt iterations.
    pub max_fit_iterations: usize,
    /// Relative convergence tolerance for the relation fit.
    pub fit_tolerance: f64,
}

impl PipelineConfig {
    /// Path of the profile file for a named source.
    pub fn profile_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(format!("{name}.txt"))
    }
}
