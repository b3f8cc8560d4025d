//! Batch pipeline shared by all subcommands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//!
//! profile read -> normalize -> noise -> half-width -> kinematics
//!   -> (calibration) known distance + luminosity -> relation fit
//!   -> (prediction) relation luminosity -> inverted distance
//!
//! The original workflow existed as two near-identical scripts toggled at
//! compile time; here one orchestrator drives both passes and shares every
//! per-source step between them.
//!
//! Per-source analysis touches only that source's profile and catalog rows,
//! so the passes run on the rayon pool and join before the fit barrier. A
//! failed source becomes a `SourceError` record; it never aborts the batch.

use rayon::prelude::*;

use crate::domain::{PipelineConfig, RelationFit, SourceResult, StatValue};
use crate::error::AppError;
use crate::fit::{PowerLawFit, PowerLawOptions, fit_power_law};
use crate::io::ingest::{Catalog, read_catalog, read_name_list, read_profile};
use crate::math::weighted_mean;
use crate::physics::{
    distance_from_luminosity, distance_from_modulus, luminosity_from_flux,
    luminosity_from_relation, rotational_velocity,
};
use crate::spectral::{baseline_sigma, half_width};

/// A source that failed analysis: logged, skipped, never fatal.
#[derive(Debug, Clone)]
pub struct SourceError {
    pub name: String,
    pub message: String,
}

/// Output of the calibration pass.
#[derive(Debug, Clone)]
pub struct CalibrationOutput {
    pub results: Vec<SourceResult>,
    pub fit: PowerLawFit,
    pub skipped: Vec<SourceError>,
}

/// Output of the prediction pass.
#[derive(Debug, Clone)]
pub struct PredictionOutput {
    pub results: Vec<SourceResult>,
    pub skipped: Vec<SourceError>,
}

/// All computed outputs of a full `tfd run`.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub calibration: CalibrationOutput,
    pub prediction: PredictionOutput,
}

/// Profile-level products shared by both passes.
struct Measurement {
    hwhm: StatValue,
    rot_velocity: StatValue,
    weighted_velocity: StatValue,
}

/// Execute the full pipeline: calibrate, then predict with the fresh relation.
pub fn run_full(config: &PipelineConfig) -> Result<RunOutput, AppError> {
    let calibration = run_calibration(config)?;
    let prediction = run_prediction(config, &calibration.fit.relation)?;
    Ok(RunOutput {
        calibration,
        prediction,
    })
}

/// Measure every calibration source and fit the luminosity-velocity relation.
pub fn run_calibration(config: &PipelineConfig) -> Result<CalibrationOutput, AppError> {
    let names = read_name_list(&config.calibration_list)?;
    let inclinations = read_catalog(&config.inclination_catalog, "inclination")?;
    let fluxes = read_catalog(&config.flux_catalog, "flux density")?;
    let moduli = read_catalog(&config.modulus_catalog, "distance modulus")?;

    let outcomes: Vec<(String, Result<SourceResult, AppError>)> = names
        .par_iter()
        .map(|name| {
            let outcome = calibrate_source(config, name, &inclinations, &fluxes, &moduli);
            (name.clone(), outcome)
        })
        .collect();

    let (results, skipped) = partition_outcomes(outcomes);
    if results.is_empty() {
        return Err(AppError::data(
            "no calibration source survived analysis; cannot fit the relation",
        ));
    }

    // Fit barrier: the relation needs the complete calibration set.
    let velocities: Vec<f64> = results.iter().map(|r| r.rot_velocity.value).collect();
    let luminosities: Vec<f64> = results.iter().map(|r| r.luminosity.value).collect();
    let opts = PowerLawOptions {
        max_iterations: config.max_fit_iterations,
        tolerance: config.fit_tolerance,
        ..Default::default()
    };
    let fit = fit_power_law(&velocities, &luminosities, &opts)?;

    Ok(CalibrationOutput {
        results,
        fit,
        skipped,
    })
}

/// Measure every target source and predict its distance from the relation.
pub fn run_prediction(
    config: &PipelineConfig,
    relation: &RelationFit,
) -> Result<PredictionOutput, AppError> {
    let names = read_name_list(&config.target_list)?;
    let inclinations = read_catalog(&config.inclination_catalog, "inclination")?;
    let fluxes = read_catalog(&config.flux_catalog, "flux density")?;

    let outcomes: Vec<(String, Result<SourceResult, AppError>)> = names
        .par_iter()
        .map(|name| {
            let outcome = predict_source(config, name, &inclinations, &fluxes, relation);
            (name.clone(), outcome)
        })
        .collect();

    let (results, skipped) = partition_outcomes(outcomes);
    Ok(PredictionOutput { results, skipped })
}

fn partition_outcomes(
    outcomes: Vec<(String, Result<SourceResult, AppError>)>,
) -> (Vec<SourceResult>, Vec<SourceError>) {
    let mut results = Vec::new();
    let mut skipped = Vec::new();
    for (name, outcome) in outcomes {
        match outcome {
            Ok(result) => results.push(result),
            Err(e) => skipped.push(SourceError {
                name,
                message: e.to_string(),
            }),
        }
    }
    (results, skipped)
}

/// Per-source measurement shared by both passes.
fn measure_source(
    config: &PipelineConfig,
    name: &str,
    inclinations: &Catalog,
) -> Result<Measurement, AppError> {
    let profile = read_profile(&config.profile_path(name), name)?;
    let sigma = baseline_sigma(&profile)?;
    let hwhm = half_width(&profile, sigma)?;
    let inclination = inclinations.get(name)?;
    let rot_velocity = rotational_velocity(hwhm, inclination)?;

    // Profiles carry a single emission feature; the weighted mean over the
    // per-feature velocities therefore reduces to that one measurement.
    let weighted_velocity = weighted_mean(&[rot_velocity]).unwrap_or(rot_velocity);

    Ok(Measurement {
        hwhm,
        rot_velocity,
        weighted_velocity,
    })
}

fn calibrate_source(
    config: &PipelineConfig,
    name: &str,
    inclinations: &Catalog,
    fluxes: &Catalog,
    moduli: &Catalog,
) -> Result<SourceResult, AppError> {
    let measured = measure_source(config, name, inclinations)?;

    let distance = distance_from_modulus(moduli.get(name)?);
    let luminosity = luminosity_from_flux(fluxes.get(name)?, distance);

    Ok(SourceResult {
        name: name.to_string(),
        hwhm: measured.hwhm,
        rot_velocity: measured.rot_velocity,
        luminosity,
        distance,
        weighted_velocity: measured.weighted_velocity,
    })
}

fn predict_source(
    config: &PipelineConfig,
    name: &str,
    inclinations: &Catalog,
    fluxes: &Catalog,
    relation: &RelationFit,
) -> Result<SourceResult, AppError> {
    let measured = measure_source(config, name, inclinations)?;

    let luminosity = luminosity_from_relation(relation, measured.rot_velocity)?;
    let distance = distance_from_luminosity(luminosity, fluxes.get(name)?)?;

    Ok(SourceResult {
        name: name.to_string(),
        hwhm: measured.hwhm,
        rot_velocity: measured.rot_velocity,
        luminosity,
        distance,
        weighted_velocity: measured.weighted_velocity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::METERS_PER_PARSEC;
    use std::f64::consts::PI;
    use std::fs;
    use std::path::{Path, PathBuf};

    /// Write a symmetric top-hat profile whose HWHM is exactly `1.5 * scale`
    /// km/s (velocity axis in m/s, zero baseline noise).
    fn write_profile(dir: &Path, name: &str, scale: f64) {
        let mut text = String::new();
        let fluxes = [0.0, 0.0, 10.0, 10.0, 10.0, 0.0, 0.0];
        for (i, flux) in fluxes.iter().enumerate() {
            let v_ms = (i as f64 - 3.0) * scale * 1000.0;
            text.push_str(&format!("{v_ms} {flux}\n"));
        }
        fs::write(dir.join(format!("{name}.txt")), text).unwrap();
    }

    fn modulus_for_distance_m(d: f64) -> f64 {
        5.0 * ((d / METERS_PER_PARSEC).log10() - 1.0)
    }

    struct Scratch {
        dir: PathBuf,
    }

    impl Scratch {
        fn new(tag: &str) -> Self {
            let dir = std::env::temp_dir().join(format!("tfd-{tag}-{}", std::process::id()));
            let _ = fs::remove_dir_all(&dir);
            fs::create_dir_all(&dir).unwrap();
            Self { dir }
        }

        fn config(&self) -> PipelineConfig {
            PipelineConfig {
                data_dir: self.dir.clone(),
                calibration_list: self.dir.join("DKList"),
                target_list: self.dir.join("DUList"),
                inclination_catalog: self.dir.join("inclinations.txt"),
                flux_catalog: self.dir.join("flux_densities.txt"),
                modulus_catalog: self.dir.join("moduli.txt"),
                export_table: None,
                export_relation: None,
                max_fit_iterations: 200,
                fit_tolerance: 1e-12,
            }
        }
    }

    impl Drop for Scratch {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.dir);
        }
    }

    #[test]
    fn full_batch_calibrates_and_predicts_a_known_relation() {
        let scratch = Scratch::new("e2e");
        let dir = &scratch.dir;

        // Calibration sources sitting exactly on L = 2e25 * V^3, plus one
        // listed name with no profile on disk.
        let amplitude = 2.0e25;
        let calib = [("CAL1", 1.0), ("CAL2", 4.0 / 3.0), ("CAL3", 2.0)];
        let d_calib = 1.0e22; // m

        let mut list = String::new();
        let mut incl = String::new();
        let mut flux = String::new();
        let mut moduli = String::new();
        for (name, scale) in calib {
            write_profile(dir, name, scale);
            let v = 1.5 * scale;
            let lum = amplitude * v.powi(3);
            let s = lum / (4.0 * PI * d_calib * d_calib);
            list.push_str(&format!("{name}\n"));
            incl.push_str(&format!("{name} 90 0\n"));
            flux.push_str(&format!("{name} {s:.12e} 0\n"));
            moduli.push_str(&format!("{name} {:.12} 0\n", modulus_for_distance_m(d_calib)));
        }
        list.push_str("GHOST\n");

        // Target source: V = 2.5 km/s, true distance 2e22 m, flux density
        // consistent with the same relation.
        let d_target = 2.0e22;
        let v_target = 2.5_f64;
        let lum_target = amplitude * v_target.powi(3);
        let s_target = lum_target / (4.0 * PI * d_target * d_target);
        write_profile(dir, "TGT1", 5.0 / 3.0);
        incl.push_str("TGT1 90 0\n");
        flux.push_str(&format!("TGT1 {s_target:.12e} 0\n"));

        fs::write(dir.join("DKList"), list).unwrap();
        fs::write(dir.join("DUList"), "TGT1\n").unwrap();
        fs::write(dir.join("inclinations.txt"), incl).unwrap();
        fs::write(dir.join("flux_densities.txt"), flux).unwrap();
        fs::write(dir.join("moduli.txt"), moduli).unwrap();

        let output = run_full(&scratch.config()).unwrap();

        // The missing source is skipped and logged, not fatal; the rest
        // process normally.
        assert_eq!(output.calibration.results.len(), 3);
        assert_eq!(output.calibration.skipped.len(), 1);
        assert_eq!(output.calibration.skipped[0].name, "GHOST");
        assert!(!output
            .calibration
            .results
            .iter()
            .any(|r| r.name == "GHOST"));

        // Measured velocities are the designed HWHMs (inclination 90°).
        let v: Vec<f64> = output
            .calibration
            .results
            .iter()
            .map(|r| r.rot_velocity.value)
            .collect();
        assert!((v[0] - 1.5).abs() < 1e-9);
        assert!((v[1] - 2.0).abs() < 1e-9);
        assert!((v[2] - 3.0).abs() < 1e-9);

        // The fitted relation recovers A = 2e25, B = 3 with tiny errors.
        let relation = &output.calibration.fit.relation;
        assert!((relation.amplitude.value / amplitude - 1.0).abs() < 1e-6);
        assert!((relation.exponent.value - 3.0).abs() < 1e-6);
        assert!(relation.exponent.error < 1e-4);

        // The predicted distance matches the direct flux-distance formula.
        assert_eq!(output.prediction.results.len(), 1);
        let target = &output.prediction.results[0];
        assert!((target.rot_velocity.value - v_target).abs() < 1e-9);
        assert!((target.luminosity.value / lum_target - 1.0).abs() < 1e-5);
        assert!((target.distance.value / d_target - 1.0).abs() < 1e-5);

        // Single-feature profiles: the weighted mean equals the velocity.
        assert!(
            (target.weighted_velocity.value - target.rot_velocity.value).abs() < 1e-12
        );
    }

    #[test]
    fn all_sources_missing_is_a_run_level_error() {
        let scratch = Scratch::new("empty");
        let dir = &scratch.dir;

        fs::write(dir.join("DKList"), "NOPE1\nNOPE2\n").unwrap();
        fs::write(dir.join("DUList"), "").unwrap();
        fs::write(dir.join("inclinations.txt"), "").unwrap();
        fs::write(dir.join("flux_densities.txt"), "").unwrap();
        fs::write(dir.join("moduli.txt"), "").unwrap();

        let err = run_calibration(&scratch.config()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn unreadable_list_file_is_a_run_level_input_error() {
        let scratch = Scratch::new("nolist");
        let err = run_calibration(&scratch.config()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn degenerate_sources_are_skipped_while_good_ones_survive() {
        let scratch = Scratch::new("degen");
        let dir = &scratch.dir;

        // Two good sources; FACEON has inclination 0 (singular geometry);
        // EMPTY has zero flux everywhere (no locatable crossing).
        write_profile(dir, "GOOD1", 1.0);
        write_profile(dir, "GOOD2", 2.0);
        write_profile(dir, "FACEON", 1.0);
        fs::write(dir.join("EMPTY.txt"), "0 0\n1000 0\n2000 0\n3000 0\n").unwrap();

        fs::write(dir.join("DKList"), "GOOD1\nGOOD2\nFACEON\nEMPTY\n").unwrap();
        fs::write(dir.join("DUList"), "").unwrap();
        fs::write(
            dir.join("inclinations.txt"),
            "GOOD1 90 0\nGOOD2 90 0\nFACEON 0 0\nEMPTY 90 0\n",
        )
        .unwrap();
        fs::write(
            dir.join("flux_densities.txt"),
            "GOOD1 1e-20 0\nGOOD2 8e-20 0\nFACEON 1e-20 0\nEMPTY 1e-20 0\n",
        )
        .unwrap();
        let mu = modulus_for_distance_m(1.0e22);
        fs::write(
            dir.join("moduli.txt"),
            format!(
                "GOOD1 {mu:.12} 0\nGOOD2 {mu:.12} 0\nFACEON {mu:.12} 0\nEMPTY {mu:.12} 0\n"
            ),
        )
        .unwrap();

        let output = run_calibration(&scratch.config()).unwrap();
        let kept: Vec<&str> = output.results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(kept, vec!["GOOD1", "GOOD2"]);
        let skipped: Vec<&str> = output.skipped.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(skipped, vec!["FACEON", "EMPTY"]);
    }
}
