//! Command-line parsing for the tensile test analyzer.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the analysis/math code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::domain::YieldMethod;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "tensile", version, about = "Tensile Test Stress-Strain Analyzer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze a load-elongation CSV, print the property report, and optionally plot/export.
    Analyze(AnalyzeArgs),
    /// Generate a synthetic test from a material model and run the same analysis on it.
    Simulate(SimulateArgs),
    /// Plot a previously exported analysis JSON.
    Plot(PlotArgs),
    /// List the built-in reference materials.
    Materials,
}

/// Options for analyzing a measured test.
#[derive(Debug, Parser, Clone)]
pub struct AnalyzeArgs {
    /// Load-elongation CSV file (force in N, elongation in mm).
    pub csv: PathBuf,

    /// Initial cross-sectional area A0 (mm^2). Defaults from --material when omitted.
    #[arg(short = 'a', long)]
    pub area: Option<f64>,

    /// Initial gauge length L0 (mm). Defaults from --material when omitted.
    #[arg(short = 'g', long)]
    pub gauge: Option<f64>,

    /// Final (post-fracture) cross-sectional area Af (mm^2).
    #[arg(long)]
    pub final_area: Option<f64>,

    /// Final (post-fracture) gauge length Lf (mm).
    #[arg(long)]
    pub final_gauge: Option<f64>,

    /// Material code or name (see `tensile materials`).
    #[arg(short = 'm', long)]
    pub material: Option<String>,

    /// Test date (YYYY-MM-DD), recorded in reports and exports.
    #[arg(long)]
    pub date: Option<NaiveDate>,

    #[command(flatten)]
    pub opts: AnalysisOpts,
}

/// Options for generating and analyzing a synthetic test.
#[derive(Debug, Parser, Clone)]
pub struct SimulateArgs {
    /// Base material for model parameters (see `tensile materials`).
    #[arg(short = 'm', long, default_value = "a36")]
    pub material: String,

    /// Override: elastic modulus (GPa).
    #[arg(long)]
    pub modulus_gpa: Option<f64>,

    /// Override: yield strength (MPa).
    #[arg(long)]
    pub yield_mpa: Option<f64>,

    /// Override: ultimate tensile strength (MPa).
    #[arg(long)]
    pub uts_mpa: Option<f64>,

    /// Override: Hollomon strength coefficient K (MPa).
    #[arg(long)]
    pub k_mpa: Option<f64>,

    /// Override: Hollomon hardening exponent n.
    #[arg(long)]
    pub n: Option<f64>,

    /// Override: specimen cross-sectional area (mm^2).
    #[arg(short = 'a', long)]
    pub area: Option<f64>,

    /// Override: gauge length (mm).
    #[arg(short = 'g', long)]
    pub gauge: Option<f64>,

    /// Override: maximum engineering strain to simulate.
    #[arg(long)]
    pub strain_max: Option<f64>,

    /// Number of simulated readings.
    #[arg(long, default_value_t = 500)]
    pub points: usize,

    /// Post-UTS load decay factor.
    #[arg(long, default_value_t = 15.0)]
    pub decay: f64,

    /// Gaussian stress noise sigma (MPa). 0 disables noise.
    #[arg(long, default_value_t = 0.0)]
    pub noise_mpa: f64,

    /// Random seed for noise generation.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Write the raw simulated readings to a CSV file (ingestable by `analyze`).
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub opts: AnalysisOpts,
}

/// Analysis options shared by `analyze` and `simulate`.
#[derive(Debug, Parser, Clone)]
pub struct AnalysisOpts {
    /// Yield detection method.
    #[arg(long, value_enum, default_value_t = YieldMethod::Offset)]
    pub yield_method: YieldMethod,

    /// Offset strain for the offset method (0.002 = 0.2%).
    #[arg(long, default_value_t = 0.002)]
    pub offset: f64,

    /// Total strain for the strain-threshold method.
    #[arg(long, default_value_t = 0.005)]
    pub strain_threshold: f64,

    /// Total strain for the extension-under-load method.
    #[arg(long, default_value_t = 0.005)]
    pub eul_strain: f64,

    /// Minimum samples a modulus fit window must contain.
    #[arg(long, default_value_t = 8)]
    pub modulus_min_points: usize,

    /// Modulus window search ceiling as a fraction of UTS stress.
    #[arg(long, default_value_t = 0.5)]
    pub modulus_stress_cap: f64,

    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export the per-sample curve table to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the property summary to a single-row CSV.
    #[arg(long = "export-properties")]
    pub export_properties: Option<PathBuf>,

    /// Export the full analysis (specimen + properties + curve grid) to JSON.
    #[arg(long = "export-analysis")]
    pub export_analysis: Option<PathBuf>,

    /// Render an annotated PNG chart to this path.
    #[arg(long)]
    pub chart: Option<PathBuf>,
}

/// Options for plotting a saved analysis.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Analysis JSON file produced by `tensile analyze --export-analysis`.
    #[arg(long, value_name = "JSON")]
    pub analysis: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}
