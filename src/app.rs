//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - runs the calibration and/or prediction passes
//! - prints per-source lines and the run summary
//! - writes optional exports

use std::path::PathBuf;

use clap::Parser;

use crate::app::pipeline::{CalibrationOutput, PredictionOutput, SourceError};
use crate::cli::{CalibrateArgs, Command, CommonArgs, PredictArgs, RunArgs};
use crate::domain::{PipelineConfig, RunMode, SourceResult};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `tfd` binary.
pub fn run() -> Result<(), AppError> {
    // We want a bare `tfd` (and `tfd --data-dir ...`) to behave like
    // `tfd run ...`. Clap requires a subcommand name, so we do a small,
    // explicit rewrite of the argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Run(args) => handle_run(args),
        Command::Calibrate(args) => handle_calibrate(args),
        Command::Predict(args) => handle_predict(args),
    }
}

fn handle_run(args: RunArgs) -> Result<(), AppError> {
    let config = pipeline_config(
        &args.common,
        Some(&args.calibration_list),
        Some(&args.target_list),
        args.moduli.as_ref(),
        args.export_relation.clone(),
    );
    let output = pipeline::run_full(&config)?;

    report_calibration(&output.calibration);
    report_prediction(&output.prediction);

    write_exports(
        &config,
        &output.calibration.fit,
        output
            .calibration
            .results
            .iter()
            .chain(output.prediction.results.iter()),
    )
}

fn handle_calibrate(args: CalibrateArgs) -> Result<(), AppError> {
    let config = pipeline_config(
        &args.common,
        Some(&args.calibration_list),
        None,
        args.moduli.as_ref(),
        args.export_relation.clone(),
    );
    let output = pipeline::run_calibration(&config)?;

    report_calibration(&output);

    write_exports(&config, &output.fit, output.results.iter())
}

fn handle_predict(args: PredictArgs) -> Result<(), AppError> {
    let config = pipeline_config(&args.common, None, Some(&args.target_list), None, None);
    let artifact = crate::io::relation::read_relation_json(&args.relation)?;
    let output = pipeline::run_prediction(&config, &artifact.relation)?;

    report_prediction(&output);

    if let Some(path) = &config.export_table {
        crate::io::export::write_results_csv(path, &output.results)?;
    }
    Ok(())
}

fn report_calibration(output: &CalibrationOutput) {
    report_skipped(&output.skipped);
    println!(
        "{}",
        crate::report::format_pass_header(
            RunMode::Calibrate,
            output.results.len(),
            output.skipped.len()
        )
    );
    for r in &output.results {
        println!("{}", crate::report::format_source_line(&r.name, "HWHM", &r.hwhm));
        println!(
            "{}",
            crate::report::format_source_line(&r.name, "RotVel", &r.rot_velocity)
        );
    }
    println!("{}", crate::report::format_relation_summary(&output.fit));
}

fn report_prediction(output: &PredictionOutput) {
    report_skipped(&output.skipped);
    println!(
        "{}",
        crate::report::format_pass_header(
            RunMode::Predict,
            output.results.len(),
            output.skipped.len()
        )
    );
    for r in &output.results {
        println!("{}", crate::report::format_source_line(&r.name, "HWHM", &r.hwhm));
        println!(
            "{}",
            crate::report::format_source_line(&r.name, "RotVel", &r.rot_velocity)
        );
        println!(
            "{}",
            crate::report::format_source_line(&r.name, "Distance", &r.distance)
        );
    }
}

fn report_skipped(skipped: &[SourceError]) {
    for s in skipped {
        eprintln!("skipping {}: {}", s.name, s.message);
    }
}

fn write_exports<'a>(
    config: &PipelineConfig,
    fit: &crate::fit::PowerLawFit,
    results: impl Iterator<Item = &'a SourceResult>,
) -> Result<(), AppError> {
    if let Some(path) = &config.export_table {
        let rows: Vec<SourceResult> = results.cloned().collect();
        crate::io::export::write_results_csv(path, &rows)?;
    }
    if let Some(path) = &config.export_relation {
        crate::io::relation::write_relation_json(path, fit)?;
    }
    Ok(())
}

/// Resolve CLI arguments (plus catalog-path defaults) into a pipeline config.
fn pipeline_config(
    common: &CommonArgs,
    calibration_list: Option<&PathBuf>,
    target_list: Option<&PathBuf>,
    moduli: Option<&PathBuf>,
    export_relation: Option<PathBuf>,
) -> PipelineConfig {
    let data_dir = common.data_dir.clone();
    let inclination_catalog = common
        .inclinations
        .clone()
        .unwrap_or_else(|| data_dir.join("inclinations.txt"));
    let flux_catalog = common
        .flux_densities
        .clone()
        .unwrap_or_else(|| data_dir.join("flux_densities.txt"));
    let modulus_catalog = moduli
        .cloned()
        .unwrap_or_else(|| data_dir.join("moduli.txt"));

    PipelineConfig {
        calibration_list: calibration_list
            .cloned()
            .unwrap_or_else(|| PathBuf::from("DKList")),
        target_list: target_list
            .cloned()
            .unwrap_or_else(|| PathBuf::from("DUList")),
        inclination_catalog,
        flux_catalog,
        modulus_catalog,
        export_table: common.export.clone(),
        export_relation,
        max_fit_iterations: common.max_fit_iterations,
        fit_tolerance: common.fit_tolerance,
        data_dir,
    }
}

/// Rewrite argv so `tfd` defaults to `tfd run`.
///
/// Rules:
/// - `tfd`                     -> `tfd run`
/// - `tfd --data-dir D ...`    -> `tfd run --data-dir D ...`
/// - `tfd --help/--version`    -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("run".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "run" | "calibrate" | "predict");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "run flags".
    if arg1.starts_with('-') {
        argv.insert(1, "run".to_string());
        return argv;
    }

    // Otherwise, leave as-is (clap will report the unknown subcommand).
    argv
}
