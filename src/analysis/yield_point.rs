//! Yield-strength detection.
//!
//! Three configurable methods (`--yield-method`):
//!
//! - **offset** (default): construct the line `σ = E (ε − offset)` with the
//!   fitted modulus and find its first intersection with the measured curve,
//!   linearly interpolated between the bracketing samples. The classic 0.2%
//!   offset method.
//! - **strain-threshold**: first sample with strain above a fixed threshold.
//!   The quick method used by simple lab scripts.
//! - **extension-under-load**: stress at a specified total strain (EUL),
//!   interpolated.
//!
//! All methods return `None` rather than failing when the curve never
//! reaches the construction (e.g. brittle fracture before the offset line
//! intersects); the caller reports that as a warning.

use crate::domain::{AnalysisConfig, ModulusFit, StressStrainCurve, YieldMethod, YieldPoint};
use crate::error::AppError;
use crate::math::{lerp, sample_piecewise};

/// Detect the yield point with the configured method.
pub fn detect_yield(
    curve: &StressStrainCurve,
    modulus: &ModulusFit,
    config: &AnalysisConfig,
) -> Result<Option<YieldPoint>, AppError> {
    match config.yield_method {
        YieldMethod::Offset => offset_yield(curve, modulus, config.offset),
        YieldMethod::StrainThreshold => Ok(strain_threshold_yield(curve, config.strain_threshold)),
        YieldMethod::ExtensionUnderLoad => Ok(eul_yield(curve, config.eul_strain)),
    }
}

/// Offset construction.
///
/// Let `d(ε) = σ(ε) − E (ε − offset)`. At small strain the offset line sits
/// below the curve (`d > 0`); yield is the first sample where `d` crosses to
/// `<= 0`, refined by interpolating `d` to zero between the bracketing
/// samples.
fn offset_yield(
    curve: &StressStrainCurve,
    modulus: &ModulusFit,
    offset: f64,
) -> Result<Option<YieldPoint>, AppError> {
    if !(offset.is_finite() && offset > 0.0) {
        return Err(AppError::usage(format!(
            "Offset strain must be a positive number (got {offset})."
        )));
    }
    let e = modulus.modulus_mpa;
    if !(e.is_finite() && e > 0.0) {
        return Err(AppError::compute("Offset method needs a positive fitted modulus."));
    }

    let d = |strain: f64, stress: f64| stress - e * (strain - offset);

    let mut prev: Option<(f64, f64, f64)> = None; // (strain, stress, d)
    for p in &curve.points {
        let di = d(p.eng_strain, p.eng_stress_mpa);
        if let Some((s0, _, d0)) = prev {
            if d0 > 0.0 && di <= 0.0 {
                // Interpolate d to zero over [s0, strain].
                let strain = lerp((d0, s0), (di, p.eng_strain), 0.0);
                let stress = e * (strain - offset);
                if !(strain.is_finite() && stress.is_finite()) {
                    return Err(AppError::compute("Offset intersection is not finite."));
                }
                return Ok(Some(YieldPoint {
                    stress_mpa: stress,
                    strain,
                    method: YieldMethod::Offset,
                }));
            }
        }
        prev = Some((p.eng_strain, p.eng_stress_mpa, di));
    }

    // Never intersected: elastic/brittle to fracture.
    Ok(None)
}

fn strain_threshold_yield(curve: &StressStrainCurve, threshold: f64) -> Option<YieldPoint> {
    curve
        .points
        .iter()
        .find(|p| p.eng_strain > threshold)
        .map(|p| YieldPoint {
            stress_mpa: p.eng_stress_mpa,
            strain: p.eng_strain,
            method: YieldMethod::StrainThreshold,
        })
}

fn eul_yield(curve: &StressStrainCurve, at_strain: f64) -> Option<YieldPoint> {
    let last = curve.last()?;
    if at_strain > last.eng_strain {
        return None;
    }
    let strains: Vec<f64> = curve.points.iter().map(|p| p.eng_strain).collect();
    let stresses: Vec<f64> = curve.points.iter().map(|p| p.eng_stress_mpa).collect();
    let stress = sample_piecewise(&strains, &stresses, at_strain)?;
    Some(YieldPoint {
        stress_mpa: stress,
        strain: at_strain,
        method: YieldMethod::ExtensionUnderLoad,
    })
}
