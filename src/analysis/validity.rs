//! Dataset-quality diagnostics.
//!
//! None of these conditions abort an analysis; they are collected as
//! warnings so the report can tell the user how much to trust the numbers.
//! Hard failures (empty dataset, bad geometry) are handled upstream with
//! exit codes.

use crate::domain::{AnalysisConfig, ModulusFit, Properties, StressStrainCurve};
use crate::io::ingest::IngestedRows;

/// Sample count below which property extraction is flagged as coarse.
const FEW_POINTS: usize = 20;

/// Modulus-fit R² below which the elastic fit is flagged.
const LOW_R2: f64 = 0.99;

/// Noise ratio (elastic-window residual RMS over stress range) above which
/// the dataset is flagged as noisy.
const NOISY_RATIO: f64 = 0.02;

/// Collected diagnostics for one analysis run.
#[derive(Debug, Clone, Default)]
pub struct ValidityReport {
    pub warnings: Vec<String>,
    /// RMS residual of the modulus fit over its window, relative to the full
    /// stress range. `None` when it cannot be computed (secant fallback).
    pub noise_ratio: Option<f64>,
}

impl ValidityReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Run all diagnostics over a completed analysis.
pub fn diagnose(
    ingest: &IngestedRows,
    curve: &StressStrainCurve,
    modulus: &ModulusFit,
    props: &Properties,
    config: &AnalysisConfig,
) -> ValidityReport {
    let mut warnings = Vec::new();

    if !ingest.row_errors.is_empty() {
        warnings.push(format!(
            "{} of {} rows were skipped during ingest (first: line {}: {}).",
            ingest.row_errors.len(),
            ingest.rows_read,
            ingest.row_errors[0].line,
            ingest.row_errors[0].message
        ));
    }
    if ingest.out_of_order > 0 {
        warnings.push(format!(
            "Input rows were not ordered by elongation ({} inversions); rows were re-sorted.",
            ingest.out_of_order
        ));
    }
    if ingest.duplicate_elongation > 0 {
        warnings.push(format!(
            "{} rows repeat the previous elongation value (stalled extensometer?).",
            ingest.duplicate_elongation
        ));
    }
    if curve.len() < FEW_POINTS {
        warnings.push(format!(
            "Only {} samples; extracted properties will be coarse.",
            curve.len()
        ));
    }

    if modulus.secant_fallback {
        warnings.push(
            "Modulus fit fell back to a two-point secant (not enough samples in the elastic chord)."
                .to_string(),
        );
    } else if modulus.r_squared < LOW_R2 {
        warnings.push(format!(
            "Elastic fit R² = {:.4}; the modulus estimate may be unreliable.",
            modulus.r_squared
        ));
    }

    let noise_ratio = noise_ratio(curve, modulus);
    if let Some(ratio) = noise_ratio {
        if ratio > NOISY_RATIO {
            warnings.push(format!(
                "Stress noise is {:.1}% of the stress range over the elastic window.",
                ratio * 100.0
            ));
        }
    }

    if props.yield_point.is_none() {
        warnings.push(format!(
            "No yield point detected with the {} method (brittle fracture, or parameters out of range).",
            config.yield_method.display_name()
        ));
    }

    if let Some(idx) = curve.uts_index() {
        if idx + 1 == curve.len() {
            warnings.push(
                "No post-UTS samples: fracture values equal UTS and necking was not observed."
                    .to_string(),
            );
        }
    }

    if let Some(lf) = curve.specimen.final_gauge_mm {
        if !(lf > 0.0) {
            warnings.push(format!(
                "Final gauge length {lf} mm is not positive; measured elongation was ignored."
            ));
        } else if lf < curve.specimen.gauge_mm {
            warnings.push(format!(
                "Final gauge length {lf} mm is shorter than the initial {} mm.",
                curve.specimen.gauge_mm
            ));
        }
    }
    if let Some(af) = curve.specimen.final_area_mm2 {
        if !(af > 0.0) {
            warnings.push(format!(
                "Final area {af} mm² is not positive; reduction of area was estimated instead."
            ));
        } else if af > curve.specimen.area_mm2 {
            warnings.push(format!(
                "Final area {af} mm² exceeds the initial {} mm².",
                curve.specimen.area_mm2
            ));
        }
    }

    ValidityReport {
        warnings,
        noise_ratio,
    }
}

/// RMS residual of the modulus line over its fit window, relative to the
/// full engineering stress range.
fn noise_ratio(curve: &StressStrainCurve, modulus: &ModulusFit) -> Option<f64> {
    if modulus.secant_fallback {
        return None;
    }
    let (start, end) = modulus.window;
    let window = curve.points.get(start..end)?;
    if window.is_empty() {
        return None;
    }

    let mut ss = 0.0;
    for p in window {
        let fit = modulus.intercept_mpa + modulus.modulus_mpa * p.eng_strain;
        ss += (p.eng_stress_mpa - fit) * (p.eng_stress_mpa - fit);
    }
    let rms = (ss / window.len() as f64).sqrt();

    let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
    for p in &curve.points {
        lo = lo.min(p.eng_stress_mpa);
        hi = hi.max(p.eng_stress_mpa);
    }
    let range = hi - lo;
    if !(range.is_finite() && range > 0.0) {
        return None;
    }
    Some(rms / range)
}
