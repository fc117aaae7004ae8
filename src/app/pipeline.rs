//! Shared analysis pipeline used by the `analyze` and `simulate` commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! ingest -> curve computation -> modulus fit -> yield detection ->
//! property extraction -> validity diagnostics
//!
//! The command handlers can then focus on presentation and exports.

use crate::analysis::{self, ValidityReport};
use crate::curves::compute_curve;
use crate::domain::{AnalysisConfig, Properties, Specimen, StressStrainCurve};
use crate::error::AppError;
use crate::io::ingest::IngestedRows;

/// All computed outputs of a single analysis run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedRows,
    pub curve: StressStrainCurve,
    pub properties: Properties,
    pub validity: ValidityReport,
}

/// Execute the full analysis pipeline on pre-ingested rows.
pub fn run_analysis(
    ingest: IngestedRows,
    specimen: &Specimen,
    config: &AnalysisConfig,
) -> Result<RunOutput, AppError> {
    let curve = compute_curve(&ingest.rows, specimen)?;

    let modulus = analysis::fit_modulus(&curve, config)?;
    let yield_point = analysis::detect_yield(&curve, &modulus, config)?;
    let properties = analysis::extract_properties(&curve, modulus, yield_point)?;

    let validity = analysis::diagnose(&ingest, &curve, &properties.modulus, &properties, config);

    Ok(RunOutput {
        ingest,
        curve,
        properties,
        validity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::simulate::generate_test;
    use crate::domain::{SimConfig, YieldMethod};
    use std::path::PathBuf;

    fn sim_config() -> SimConfig {
        SimConfig {
            modulus_mpa: 200_000.0,
            yield_mpa: 250.0,
            uts_mpa: 400.0,
            hardening_k_mpa: 530.0,
            hardening_n: 0.26,
            area_mm2: 100.0,
            gauge_mm: 50.0,
            strain_max: 0.02,
            num_points: 800,
            decay: 15.0,
            noise_mpa: 0.0,
            seed: 1,
        }
    }

    fn analysis_config(specimen: &Specimen) -> AnalysisConfig {
        AnalysisConfig {
            specimen: specimen.clone(),
            yield_method: YieldMethod::Offset,
            offset: 0.002,
            strain_threshold: 0.005,
            eul_strain: 0.005,
            modulus_min_points: 8,
            modulus_stress_cap: 0.5,
            plot: false,
            plot_width: 100,
            plot_height: 25,
            export_results: Option::<PathBuf>::None,
            export_properties: None,
            export_analysis: None,
            chart: None,
        }
    }

    #[test]
    fn simulated_steel_recovers_model_properties() {
        let sim = generate_test(&sim_config()).unwrap();
        let config = analysis_config(&sim.specimen);
        let ingest = IngestedRows::from_rows(sim.rows.clone());

        let run = run_analysis(ingest, &sim.specimen, &config).unwrap();

        let e_gpa = run.properties.modulus.modulus_mpa / 1e3;
        assert!((e_gpa - 200.0).abs() < 2.0, "E = {e_gpa:.2} GPa");
        assert!(
            (run.properties.uts_mpa - 400.0).abs() < 5.0,
            "UTS = {:.1}",
            run.properties.uts_mpa
        );
        let y = run.properties.yield_point.expect("yield expected");
        // With this hardening model the 0.2% offset line crosses the plastic
        // branch well above the proportional limit of 250 MPa.
        assert!(y.stress_mpa > 300.0 && y.stress_mpa < 390.0, "Sy = {:.1}", y.stress_mpa);
        assert!(run.properties.toughness_mpa > 0.0);
    }

    #[test]
    fn pipeline_propagates_ingest_diagnostics() {
        let sim = generate_test(&sim_config()).unwrap();
        let config = analysis_config(&sim.specimen);
        let mut ingest = IngestedRows::from_rows(sim.rows.clone());
        ingest.row_errors.push(crate::io::ingest::RowError {
            line: 3,
            message: "bad value".to_string(),
        });
        ingest.rows_read += 1;

        let run = run_analysis(ingest, &sim.specimen, &config).unwrap();
        assert!(
            run.validity
                .warnings
                .iter()
                .any(|w| w.contains("skipped during ingest"))
        );
    }
}
