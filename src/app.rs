//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - ingests measured data or generates a synthetic test
//! - runs the analysis pipeline
//! - prints reports/plots
//! - writes optional exports

use std::fs::File;
use std::io::Write;
use std::path::Path;

use clap::Parser;

use crate::cli::{AnalysisOpts, AnalyzeArgs, Command, PlotArgs, SimulateArgs};
use crate::data::simulate::{SimulatedTest, generate_test};
use crate::domain::{AnalysisConfig, SimConfig, Specimen};
use crate::error::AppError;
use crate::io::ingest::IngestedRows;
use crate::materials;

pub mod pipeline;

/// Entry point for the `tensile` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Analyze(args) => handle_analyze(args),
        Command::Simulate(args) => handle_simulate(args),
        Command::Plot(args) => handle_plot(args),
        Command::Materials => {
            print!("{}", crate::report::format_materials_table());
            Ok(())
        }
    }
}

fn handle_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let specimen = specimen_from_args(&args)?;
    let config = analysis_config(specimen.clone(), &args.opts);

    let ingest = crate::io::ingest::load_test_rows(&args.csv)?;
    let run = pipeline::run_analysis(ingest, &specimen, &config)?;

    emit_run(&run, &config)
}

fn handle_simulate(args: SimulateArgs) -> Result<(), AppError> {
    let sim_config = sim_config_from_args(&args)?;
    let sim = generate_test(&sim_config)?;

    if let Some(path) = &args.output {
        write_readings_csv(path, &sim)?;
    }

    let mut specimen = sim.specimen.clone();
    specimen.material = Some(args.material.clone());
    let config = analysis_config(specimen.clone(), &args.opts);

    let ingest = IngestedRows::from_rows(sim.rows.clone());
    let run = pipeline::run_analysis(ingest, &specimen, &config)?;

    emit_run(&run, &config)
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let analysis = crate::io::analysis::read_analysis_json(&args.analysis)?;
    let plot = crate::plot::render_ascii_plot_from_analysis(&analysis, args.width, args.height);
    println!("{plot}");
    Ok(())
}

/// Print the report/plot and write the configured exports.
fn emit_run(run: &pipeline::RunOutput, config: &AnalysisConfig) -> Result<(), AppError> {
    println!(
        "{}",
        crate::report::format_run_summary(&run.ingest, &run.curve, &run.properties, &run.validity)
    );

    if config.plot {
        let plot = crate::plot::render_ascii_plot(
            &run.curve,
            &run.properties,
            config.plot_width,
            config.plot_height,
        );
        println!("{plot}");
    }

    if let Some(path) = &config.export_results {
        crate::io::export::write_results_csv(path, &run.curve)?;
    }
    if let Some(path) = &config.export_properties {
        crate::io::export::write_properties_csv(path, &run.properties)?;
    }
    if let Some(path) = &config.export_analysis {
        crate::io::analysis::write_analysis_json(path, &run.curve, &run.properties)?;
    }
    if let Some(path) = &config.chart {
        crate::plot::render_chart(path, &run.curve, &run.properties, 1024, 640)?;
    }

    Ok(())
}

/// Resolve specimen geometry, falling back to the material's default
/// geometry when `--area`/`--gauge` are omitted.
fn specimen_from_args(args: &AnalyzeArgs) -> Result<Specimen, AppError> {
    let material_defaults = match &args.material {
        Some(key) => Some(materials::find_material(key).ok_or_else(|| {
            AppError::usage(format!(
                "Unknown material '{key}'. See `tensile materials` for the built-in list."
            ))
        })?),
        None => None,
    };

    let area_mm2 = args
        .area
        .or(material_defaults.map(|m| m.default_area_mm2))
        .ok_or_else(|| AppError::usage("Missing --area (and no --material to default from)."))?;
    let gauge_mm = args
        .gauge
        .or(material_defaults.map(|m| m.default_gauge_mm))
        .ok_or_else(|| AppError::usage("Missing --gauge (and no --material to default from)."))?;

    Ok(Specimen {
        area_mm2,
        gauge_mm,
        final_area_mm2: args.final_area,
        final_gauge_mm: args.final_gauge,
        material: args.material.clone(),
        test_date: args.date,
    })
}

fn analysis_config(specimen: Specimen, opts: &AnalysisOpts) -> AnalysisConfig {
    AnalysisConfig {
        specimen,
        yield_method: opts.yield_method,
        offset: opts.offset,
        strain_threshold: opts.strain_threshold,
        eul_strain: opts.eul_strain,
        modulus_min_points: opts.modulus_min_points,
        modulus_stress_cap: opts.modulus_stress_cap,
        plot: opts.plot && !opts.no_plot,
        plot_width: opts.width,
        plot_height: opts.height,
        export_results: opts.export.clone(),
        export_properties: opts.export_properties.clone(),
        export_analysis: opts.export_analysis.clone(),
        chart: opts.chart.clone(),
    }
}

fn sim_config_from_args(args: &SimulateArgs) -> Result<SimConfig, AppError> {
    let material = materials::find_material(&args.material).ok_or_else(|| {
        AppError::usage(format!(
            "Unknown material '{}'. See `tensile materials` for the built-in list.",
            args.material
        ))
    })?;

    let mut config = material.sim_config();
    if let Some(e) = args.modulus_gpa {
        config.modulus_mpa = e * 1e3;
    }
    if let Some(v) = args.yield_mpa {
        config.yield_mpa = v;
    }
    if let Some(v) = args.uts_mpa {
        config.uts_mpa = v;
    }
    if let Some(v) = args.k_mpa {
        config.hardening_k_mpa = v;
    }
    if let Some(v) = args.n {
        config.hardening_n = v;
    }
    if let Some(v) = args.area {
        config.area_mm2 = v;
    }
    if let Some(v) = args.gauge {
        config.gauge_mm = v;
    }
    if let Some(v) = args.strain_max {
        config.strain_max = v;
    }
    config.num_points = args.points;
    config.decay = args.decay;
    config.noise_mpa = args.noise_mpa;
    config.seed = args.seed;

    Ok(config)
}

/// Write raw simulated readings in the same form a test machine logs, so the
/// file round-trips through `tensile analyze`.
fn write_readings_csv(path: &Path, sim: &SimulatedTest) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::usage(format!(
            "Failed to create readings CSV '{}': {e}",
            path.display()
        ))
    })?;

    writeln!(file, "force_n,elongation_mm")
        .map_err(|e| AppError::usage(format!("Failed to write readings CSV header: {e}")))?;
    for row in &sim.rows {
        writeln!(file, "{:.4},{:.6}", row.force_n, row.elongation_mm)
            .map_err(|e| AppError::usage(format!("Failed to write readings CSV row: {e}")))?;
    }

    Ok(())
}
