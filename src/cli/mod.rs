//! Command-line parsing for the Tully-Fisher distance pipeline.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the analysis/math code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "tfd",
    version,
    about = "Tully-Fisher distances from HI 21cm line profiles"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Calibrate the relation and predict target distances in one batch.
    Run(RunArgs),
    /// Calibrate the luminosity-velocity relation against sources with known
    /// distance moduli; optionally export it as JSON.
    Calibrate(CalibrateArgs),
    /// Predict target distances using a previously exported relation JSON.
    Predict(PredictArgs),
}

/// Options shared by every pass.
#[derive(Debug, Parser, Clone)]
pub struct CommonArgs {
    /// Directory holding per-source profile files (<name>.txt).
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Inclination catalog (name value error), degrees.
    /// Defaults to <data-dir>/inclinations.txt.
    #[arg(long)]
    pub inclinations: Option<PathBuf>,

    /// Flux density catalog (name value error).
    /// Defaults to <data-dir>/flux_densities.txt.
    #[arg(long)]
    pub flux_densities: Option<PathBuf>,

    /// Export the per-source result table to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Safety cap on Levenberg-Marquardt iterations.
    #[arg(long, default_value_t = 200)]
    pub max_fit_iterations: usize,

    /// Relative convergence tolerance for the relation fit.
    #[arg(long, default_value_t = 1e-12)]
    pub fit_tolerance: f64,
}

/// Options for the combined calibrate-then-predict batch.
#[derive(Debug, Parser)]
pub struct RunArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Newline-delimited names of calibration sources (known distances).
    #[arg(long, default_value = "DKList")]
    pub calibration_list: PathBuf,

    /// Newline-delimited names of target sources (unknown distances).
    #[arg(long, default_value = "DUList")]
    pub target_list: PathBuf,

    /// Distance modulus catalog for the calibration set.
    /// Defaults to <data-dir>/moduli.txt.
    #[arg(long)]
    pub moduli: Option<PathBuf>,

    /// Export the fitted relation to JSON.
    #[arg(long = "export-relation")]
    pub export_relation: Option<PathBuf>,
}

/// Options for a calibration-only run.
#[derive(Debug, Parser)]
pub struct CalibrateArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Newline-delimited names of calibration sources (known distances).
    #[arg(long, default_value = "DKList")]
    pub calibration_list: PathBuf,

    /// Distance modulus catalog for the calibration set.
    /// Defaults to <data-dir>/moduli.txt.
    #[arg(long)]
    pub moduli: Option<PathBuf>,

    /// Export the fitted relation to JSON.
    #[arg(long = "export-relation")]
    pub export_relation: Option<PathBuf>,
}

/// Options for a prediction-only run.
#[derive(Debug, Parser)]
pub struct PredictArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Newline-delimited names of target sources (unknown distances).
    #[arg(long, default_value = "DUList")]
    pub target_list: PathBuf,

    /// Relation JSON produced by `tfd calibrate --export-relation`.
    #[arg(long, value_name = "JSON")]
    pub relation: PathBuf,
}
