//! Scalar property extraction.
//!
//! Reduces a derived curve (plus the modulus fit and detected yield) to the
//! standard tensile summary:
//!
//! - UTS and strain at UTS
//! - fracture stress/strain, percent elongation
//! - toughness (trapezoidal area under the engineering curve)
//! - resilience `σ_y² / 2E`
//! - true stress at UTS and necking (true) strain
//! - percent reduction of area (measured when a final area is available,
//!   constant-volume estimate otherwise)

use crate::domain::{ModulusFit, Properties, RaSource, StressStrainCurve, YieldPoint};
use crate::error::AppError;
use crate::math::trapezoid;

/// Compute the property summary for a single test.
pub fn extract_properties(
    curve: &StressStrainCurve,
    modulus: ModulusFit,
    yield_point: Option<YieldPoint>,
) -> Result<Properties, AppError> {
    let uts_idx = curve
        .uts_index()
        .ok_or_else(|| AppError::data("Cannot extract properties from an empty curve."))?;
    let uts = &curve.points[uts_idx];
    let last = curve
        .last()
        .ok_or_else(|| AppError::data("Cannot extract properties from an empty curve."))?;

    let strains: Vec<f64> = curve.points.iter().map(|p| p.eng_strain).collect();
    let stresses: Vec<f64> = curve.points.iter().map(|p| p.eng_stress_mpa).collect();
    let toughness_mpa = trapezoid(&strains, &stresses);

    let resilience_mpa = yield_point.as_ref().and_then(|y| {
        let e = modulus.modulus_mpa;
        if e > 0.0 {
            Some(y.stress_mpa * y.stress_mpa / (2.0 * e))
        } else {
            None
        }
    });

    let percent_elongation = match curve.specimen.final_gauge_mm {
        Some(lf) if lf > 0.0 => {
            (lf - curve.specimen.gauge_mm) / curve.specimen.gauge_mm * 100.0
        }
        _ => last.eng_strain * 100.0,
    };

    let (reduction_of_area_pct, ra_source) = reduction_of_area(curve, last.eng_strain);

    let props = Properties {
        modulus,
        yield_point,
        uts_mpa: uts.eng_stress_mpa,
        strain_at_uts: uts.eng_strain,
        fracture_stress_mpa: last.eng_stress_mpa,
        fracture_strain: last.eng_strain,
        percent_elongation,
        toughness_mpa,
        resilience_mpa,
        true_stress_at_uts_mpa: uts.true_stress_mpa,
        necking_strain: uts.true_strain,
        reduction_of_area_pct,
        ra_source,
    };

    if !props.uts_mpa.is_finite() || !props.toughness_mpa.is_finite() {
        return Err(AppError::compute("Non-finite property values extracted."));
    }

    Ok(props)
}

/// Percent reduction of area at fracture.
///
/// Measured when the specimen has a final area; otherwise estimated under
/// constant volume (`A₀/A = 1 + ε`), giving `1 − 1/(1 + ε_f)`.
fn reduction_of_area(curve: &StressStrainCurve, fracture_strain: f64) -> (f64, RaSource) {
    match curve.specimen.final_area_mm2 {
        Some(af) if af > 0.0 && curve.specimen.area_mm2 > 0.0 => {
            let ra = (curve.specimen.area_mm2 - af) / curve.specimen.area_mm2 * 100.0;
            (ra, RaSource::Measured)
        }
        _ => {
            let ra = (1.0 - 1.0 / (1.0 + fracture_strain.max(0.0))) * 100.0;
            (ra, RaSource::Estimated)
        }
    }
}
