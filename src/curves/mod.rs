//! Stress–strain curve computation.
//!
//! Pointwise transforms from validated load–elongation rows to engineering
//! and true stress–strain values:
//!
//! - engineering stress `σ = F / A₀` (N and mm² give MPa directly)
//! - engineering strain `ε = ΔL / L₀`
//! - true strain `ε_t = ln(1 + ε)`
//! - true stress `σ_t = σ (1 + ε)`
//!
//! The true-value transforms assume uniform deformation and constant volume,
//! which holds up to the onset of necking; past UTS the true columns are
//! still emitted but are a lower bound on the actual neck stress.

use crate::domain::{CurvePoint, Specimen, StressStrainCurve, TestRow};
use crate::error::AppError;

/// Derive the full stress–strain curve from validated measurement rows.
///
/// Geometry must already be validated (positive area and gauge length); rows
/// are assumed ordered by elongation.
pub fn compute_curve(rows: &[TestRow], specimen: &Specimen) -> Result<StressStrainCurve, AppError> {
    if specimen.area_mm2 <= 0.0 || !specimen.area_mm2.is_finite() {
        return Err(AppError::usage(format!(
            "Cross-sectional area must be a positive number (got {}).",
            specimen.area_mm2
        )));
    }
    if specimen.gauge_mm <= 0.0 || !specimen.gauge_mm.is_finite() {
        return Err(AppError::usage(format!(
            "Gauge length must be a positive number (got {}).",
            specimen.gauge_mm
        )));
    }
    if rows.is_empty() {
        return Err(AppError::data("No measurement rows to convert."));
    }

    let points = rows
        .iter()
        .map(|row| curve_point(row, specimen))
        .collect::<Vec<_>>();

    if points.iter().any(|p| !p.eng_stress_mpa.is_finite() || !p.true_strain.is_finite()) {
        return Err(AppError::compute(
            "Non-finite stress/strain produced during curve computation.",
        ));
    }

    Ok(StressStrainCurve {
        specimen: specimen.clone(),
        points,
    })
}

fn curve_point(row: &TestRow, specimen: &Specimen) -> CurvePoint {
    let eng_stress_mpa = row.force_n / specimen.area_mm2;
    let eng_strain = row.elongation_mm / specimen.gauge_mm;
    // ln(1+ε) via ln_1p for precision at small strains.
    let true_strain = eng_strain.ln_1p();
    let true_stress_mpa = eng_stress_mpa * (1.0 + eng_strain);

    CurvePoint {
        force_n: row.force_n,
        elongation_mm: row.elongation_mm,
        eng_strain,
        eng_stress_mpa,
        true_strain,
        true_stress_mpa,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specimen() -> Specimen {
        Specimen {
            area_mm2: 78.54, // ~10mm round bar
            gauge_mm: 50.0,
            final_area_mm2: None,
            final_gauge_mm: None,
            material: None,
            test_date: None,
        }
    }

    #[test]
    fn engineering_values_match_hand_calc() {
        let rows = [
            TestRow { line: 2, force_n: 0.0, elongation_mm: 0.0 },
            TestRow { line: 3, force_n: 7854.0, elongation_mm: 0.5 },
        ];
        let curve = compute_curve(&rows, &specimen()).unwrap();

        let p = &curve.points[1];
        assert!((p.eng_stress_mpa - 100.0).abs() < 1e-9);
        assert!((p.eng_strain - 0.01).abs() < 1e-12);
        assert!((p.true_strain - 0.01f64.ln_1p()).abs() < 1e-15);
        assert!((p.true_stress_mpa - 101.0).abs() < 1e-9);
    }

    #[test]
    fn true_values_exceed_engineering_in_tension() {
        let rows: Vec<TestRow> = (0..10)
            .map(|i| TestRow {
                line: i + 2,
                force_n: 1000.0 + 100.0 * i as f64,
                elongation_mm: 0.5 * i as f64,
            })
            .collect();
        let curve = compute_curve(&rows, &specimen()).unwrap();
        for p in &curve.points[1..] {
            assert!(p.true_stress_mpa >= p.eng_stress_mpa);
            assert!(p.true_strain <= p.eng_strain);
        }
    }

    #[test]
    fn zero_area_rejected() {
        let mut s = specimen();
        s.area_mm2 = 0.0;
        let rows = [TestRow { line: 2, force_n: 1.0, elongation_mm: 0.1 }];
        let err = compute_curve(&rows, &s).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
