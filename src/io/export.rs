//! Export derived results to CSV.
//!
//! Two sheets are produced, both meant to open cleanly in a spreadsheet:
//! a per-sample curve table and a single-row property summary.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{Properties, StressStrainCurve};
use crate::error::AppError;

/// Write the per-sample curve table to a CSV file.
///
/// One row per retained reading, raw measurements first, derived
/// quantities after.
pub fn write_results_csv(path: &Path, curve: &StressStrainCurve) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::usage(format!("Failed to create results CSV '{}': {e}", path.display()))
    })?;

    writeln!(
        file,
        "force_n,elongation_mm,eng_strain,eng_stress_mpa,true_strain,true_stress_mpa"
    )
    .map_err(|e| AppError::usage(format!("Failed to write results CSV header: {e}")))?;

    for p in &curve.points {
        writeln!(
            file,
            "{:.4},{:.6},{:.8},{:.4},{:.8},{:.4}",
            p.force_n, p.elongation_mm, p.eng_strain, p.eng_stress_mpa, p.true_strain, p.true_stress_mpa,
        )
        .map_err(|e| AppError::usage(format!("Failed to write results CSV row: {e}")))?;
    }

    Ok(())
}

/// Write the extracted properties as a single-row CSV sheet.
///
/// Optional quantities (yield, resilience) export as empty cells rather
/// than sentinel numbers.
pub fn write_properties_csv(path: &Path, props: &Properties) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::usage(format!(
            "Failed to create properties CSV '{}': {e}",
            path.display()
        ))
    })?;

    writeln!(
        file,
        "modulus_gpa,modulus_r_squared,yield_method,yield_stress_mpa,yield_strain,\
         uts_mpa,strain_at_uts,true_stress_at_uts_mpa,necking_strain,\
         fracture_stress_mpa,fracture_strain,percent_elongation,\
         toughness_mpa,resilience_mpa,reduction_of_area_pct,ra_source"
    )
    .map_err(|e| AppError::usage(format!("Failed to write properties CSV header: {e}")))?;

    let yield_method = props
        .yield_point
        .map(|y| y.method.display_name().to_string())
        .unwrap_or_default();
    let yield_stress = props
        .yield_point
        .map(|y| format!("{:.4}", y.stress_mpa))
        .unwrap_or_default();
    let yield_strain = props
        .yield_point
        .map(|y| format!("{:.8}", y.strain))
        .unwrap_or_default();
    let resilience = props
        .resilience_mpa
        .map(|v| format!("{v:.6}"))
        .unwrap_or_default();

    writeln!(
        file,
        "{:.4},{},{},{},{},{:.4},{:.8},{:.4},{:.8},{:.4},{:.8},{:.3},{:.6},{},{:.3},{}",
        props.modulus.modulus_mpa / 1e3,
        if props.modulus.r_squared.is_finite() {
            format!("{:.6}", props.modulus.r_squared)
        } else {
            String::new()
        },
        yield_method,
        yield_stress,
        yield_strain,
        props.uts_mpa,
        props.strain_at_uts,
        props.true_stress_at_uts_mpa,
        props.necking_strain,
        props.fracture_stress_mpa,
        props.fracture_strain,
        props.percent_elongation,
        props.toughness_mpa,
        resilience,
        props.reduction_of_area_pct,
        format!("{:?}", props.ra_source).to_lowercase(),
    )
    .map_err(|e| AppError::usage(format!("Failed to write properties CSV row: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::modulus::tests::{bilinear_curve, test_config};
    use crate::analysis::{detect_yield, extract_properties, fit_modulus};

    fn temp_path(name: &str) -> std::path::PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("tensile-export-{}-{}", std::process::id(), name));
        p
    }

    #[test]
    fn results_csv_has_header_and_rows() {
        let curve = bilinear_curve(200_000.0, 0.002, 200, 0.02);
        let path = temp_path("results.csv");
        write_results_csv(&path, &curve).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "force_n,elongation_mm,eng_strain,eng_stress_mpa,true_strain,true_stress_mpa"
        );
        assert_eq!(lines.count(), curve.points.len());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn properties_csv_round_numbers() {
        let config = test_config();
        let curve = bilinear_curve(200_000.0, 0.002, 200, 0.02);
        let modulus = fit_modulus(&curve, &config).unwrap();
        let yield_point = detect_yield(&curve, &modulus, &config).unwrap();
        let props = extract_properties(&curve, modulus, yield_point).unwrap();

        let path = temp_path("properties.csv");
        write_properties_csv(&path, &props).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let header_cols = lines[0].split(',').count();
        let value_cols = lines[1].split(',').count();
        assert_eq!(header_cols, value_cols);
        std::fs::remove_file(&path).ok();
    }
}
