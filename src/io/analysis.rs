//! Read/write analysis JSON files.
//!
//! Analysis JSON is the portable record of a completed run:
//! - specimen geometry and metadata
//! - extracted properties (modulus fit included)
//! - a decimated curve grid for quick re-plotting
//!
//! The schema is defined by `domain::AnalysisFile`.

use std::fs::File;
use std::path::Path;

use crate::domain::{AnalysisFile, CurveGrid, Properties, StressStrainCurve};
use crate::error::AppError;

/// Grid points retained in the saved file. Enough for a faithful re-plot
/// without carrying every machine sample.
const GRID_POINTS: usize = 101;

/// Write an analysis JSON file.
pub fn write_analysis_json(
    path: &Path,
    curve: &StressStrainCurve,
    props: &Properties,
) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::usage(format!(
            "Failed to create analysis JSON '{}': {e}",
            path.display()
        ))
    })?;

    let analysis = AnalysisFile {
        tool: "tensile".to_string(),
        specimen: curve.specimen.clone(),
        properties: props.clone(),
        grid: build_grid(curve, GRID_POINTS),
    };

    serde_json::to_writer_pretty(file, &analysis)
        .map_err(|e| AppError::usage(format!("Failed to write analysis JSON: {e}")))?;

    Ok(())
}

/// Read an analysis JSON file.
pub fn read_analysis_json(path: &Path) -> Result<AnalysisFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::usage(format!(
            "Failed to open analysis JSON '{}': {e}",
            path.display()
        ))
    })?;
    let analysis: AnalysisFile = serde_json::from_reader(file)
        .map_err(|e| AppError::data(format!("Invalid analysis JSON: {e}")))?;

    if analysis.grid.eng_strain.len() != analysis.grid.eng_stress_mpa.len()
        || analysis.grid.true_strain.len() != analysis.grid.true_stress_mpa.len()
        || analysis.grid.eng_strain.len() != analysis.grid.true_strain.len()
    {
        return Err(AppError::data("Analysis JSON grid arrays differ in length."));
    }

    Ok(analysis)
}

/// Decimate the curve to at most `n` samples, always keeping the first and
/// last. Index selection is even in sample space, so dense machine logs and
/// sparse hand-entered sheets both come out usable.
fn build_grid(curve: &StressStrainCurve, n: usize) -> CurveGrid {
    let len = curve.points.len();
    let n = n.max(2).min(len);

    let mut eng_strain = Vec::with_capacity(n);
    let mut eng_stress_mpa = Vec::with_capacity(n);
    let mut true_strain = Vec::with_capacity(n);
    let mut true_stress_mpa = Vec::with_capacity(n);

    for i in 0..n {
        let idx = if n == 1 {
            0
        } else {
            (i * (len - 1)) / (n - 1)
        };
        let p = &curve.points[idx];
        eng_strain.push(p.eng_strain);
        eng_stress_mpa.push(p.eng_stress_mpa);
        true_strain.push(p.true_strain);
        true_stress_mpa.push(p.true_stress_mpa);
    }

    CurveGrid {
        eng_strain,
        eng_stress_mpa,
        true_strain,
        true_stress_mpa,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::modulus::tests::{bilinear_curve, test_config};
    use crate::analysis::{detect_yield, extract_properties, fit_modulus};

    fn temp_path(name: &str) -> std::path::PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("tensile-analysis-{}-{}", std::process::id(), name));
        p
    }

    fn sample_run() -> (StressStrainCurve, Properties) {
        let config = test_config();
        let curve = bilinear_curve(200_000.0, 0.002, 200, 0.02);
        let modulus = fit_modulus(&curve, &config).unwrap();
        let yield_point = detect_yield(&curve, &modulus, &config).unwrap();
        let props = extract_properties(&curve, modulus, yield_point).unwrap();
        (curve, props)
    }

    #[test]
    fn round_trip_preserves_properties() {
        let (curve, props) = sample_run();
        let path = temp_path("roundtrip.json");
        write_analysis_json(&path, &curve, &props).unwrap();

        let back = read_analysis_json(&path).unwrap();
        assert_eq!(back.tool, "tensile");
        assert_eq!(back.specimen, curve.specimen);
        assert!((back.properties.uts_mpa - props.uts_mpa).abs() < 1e-9);
        assert_eq!(back.properties.yield_point.is_some(), props.yield_point.is_some());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn grid_is_decimated_with_endpoints() {
        let (curve, props) = sample_run();
        let path = temp_path("grid.json");
        write_analysis_json(&path, &curve, &props).unwrap();

        let back = read_analysis_json(&path).unwrap();
        assert_eq!(back.grid.eng_strain.len(), GRID_POINTS);
        let first = curve.points.first().unwrap();
        let last = curve.points.last().unwrap();
        assert!((back.grid.eng_strain[0] - first.eng_strain).abs() < 1e-12);
        assert!(
            (back.grid.eng_strain.last().unwrap() - last.eng_strain).abs() < 1e-12
        );
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn short_curve_keeps_all_points() {
        let config = test_config();
        let mut curve = bilinear_curve(200_000.0, 0.002, 200, 0.02);
        curve.points.truncate(10);
        let modulus = fit_modulus(&curve, &config).unwrap();
        let props = extract_properties(&curve, modulus, None).unwrap();

        let path = temp_path("short.json");
        write_analysis_json(&path, &curve, &props).unwrap();
        let back = read_analysis_json(&path).unwrap();
        assert_eq!(back.grid.eng_strain.len(), 10);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn rejects_malformed_json() {
        let path = temp_path("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = read_analysis_json(&path).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        std::fs::remove_file(&path).ok();
    }
}
