//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can
//! be:
//!
//! - used in-memory during analysis
//! - exported to JSON/CSV
//! - reloaded later for plotting or comparisons
//!
//! Unit conventions (fixed across the crate):
//!
//! - force in N, lengths in mm, areas in mm²
//! - stress in MPa (1 N/mm² = 1 MPa); the report layer converts the elastic
//!   modulus to GPa for display
//! - strain is unitless

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Yield-strength detection method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum YieldMethod {
    /// Offset-strain construction (default 0.2%): intersect the line
    /// `σ = E (ε − offset)` with the measured curve.
    Offset,
    /// First stress sample with strain above a fixed threshold.
    ///
    /// Crude, but useful for simulated or heavily decimated data where the
    /// offset construction has nothing to intersect.
    StrainThreshold,
    /// Stress at a specified total strain (EUL), linearly interpolated.
    ExtensionUnderLoad,
}

impl YieldMethod {
    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            YieldMethod::Offset => "offset",
            YieldMethod::StrainThreshold => "strain-threshold",
            YieldMethod::ExtensionUnderLoad => "extension-under-load",
        }
    }
}

/// How the reduction-of-area figure was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RaSource {
    /// Computed from a measured final cross-sectional area.
    Measured,
    /// Constant-volume estimate from the fracture strain.
    Estimated,
}

/// A raw parsed measurement row.
///
/// `line` is the 1-based CSV line number, kept for row-level diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestRow {
    pub line: usize,
    pub force_n: f64,
    pub elongation_mm: f64,
}

/// Specimen geometry and test metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Specimen {
    /// Initial cross-sectional area A₀ (mm²).
    pub area_mm2: f64,
    /// Initial gauge length L₀ (mm).
    pub gauge_mm: f64,
    /// Measured cross-sectional area at fracture (mm²), if available.
    pub final_area_mm2: Option<f64>,
    /// Measured gauge length after fracture (mm), if available.
    pub final_gauge_mm: Option<f64>,
    /// Material code, when analyzing against a reference material.
    pub material: Option<String>,
    /// Date the test was performed (metadata only).
    pub test_date: Option<NaiveDate>,
}

/// One derived sample on the stress–strain curve.
///
/// The raw force/elongation values are carried along so exports can show the
/// measurement next to the derived quantities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub force_n: f64,
    pub elongation_mm: f64,
    pub eng_strain: f64,
    pub eng_stress_mpa: f64,
    pub true_strain: f64,
    pub true_stress_mpa: f64,
}

/// A full derived curve: ordered samples plus the specimen they came from.
///
/// Computed once; read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressStrainCurve {
    pub specimen: Specimen,
    pub points: Vec<CurvePoint>,
}

impl StressStrainCurve {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Index of the maximum engineering stress (UTS sample).
    ///
    /// Ties resolve to the earliest sample so the result is deterministic.
    pub fn uts_index(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, p) in self.points.iter().enumerate() {
            if !p.eng_stress_mpa.is_finite() {
                continue;
            }
            match best {
                Some((_, s)) if p.eng_stress_mpa <= s => {}
                _ => best = Some((i, p.eng_stress_mpa)),
            }
        }
        best.map(|(i, _)| i)
    }

    pub fn last(&self) -> Option<&CurvePoint> {
        self.points.last()
    }
}

/// Elastic-modulus regression output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModulusFit {
    /// Slope of the elastic line (MPa per unit strain).
    pub modulus_mpa: f64,
    /// Intercept of the fitted line (MPa). Near zero for a clean test.
    pub intercept_mpa: f64,
    /// Coefficient of determination over the chosen window. NaN for a secant
    /// fallback, which JSON carries as null.
    #[serde(with = "nan_as_null")]
    pub r_squared: f64,
    /// Half-open sample index range `[start, end)` of the fit window.
    pub window: (usize, usize),
    /// Number of samples in the window.
    pub n_points: usize,
    /// True when the windowed search was not possible and the modulus fell
    /// back to a secant through the first nonzero sample.
    pub secant_fallback: bool,
}

/// Detected yield point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YieldPoint {
    pub stress_mpa: f64,
    pub strain: f64,
    pub method: YieldMethod,
}

/// Scalar property summary for a single test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    pub modulus: ModulusFit,
    /// `None` when the configured method found no yield (e.g. brittle
    /// fracture before the offset line intersects).
    pub yield_point: Option<YieldPoint>,
    /// Ultimate tensile strength (max engineering stress, MPa).
    pub uts_mpa: f64,
    /// Engineering strain at UTS.
    pub strain_at_uts: f64,
    /// Engineering stress at the last sample (MPa).
    pub fracture_stress_mpa: f64,
    /// Engineering strain at the last sample.
    pub fracture_strain: f64,
    /// Elongation at fracture, percent of gauge length.
    pub percent_elongation: f64,
    /// Area under the engineering curve (MPa ≡ MJ/m³).
    pub toughness_mpa: f64,
    /// Elastic strain energy to yield, σ_y²/2E (MPa). `None` without a yield.
    pub resilience_mpa: Option<f64>,
    /// True stress at the UTS sample (MPa).
    pub true_stress_at_uts_mpa: f64,
    /// True strain at UTS, the onset of necking under the uniform-deformation
    /// assumption.
    pub necking_strain: f64,
    /// Reduction of area at fracture, percent.
    pub reduction_of_area_pct: f64,
    pub ra_source: RaSource,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub specimen: Specimen,

    pub yield_method: YieldMethod,
    /// Offset strain for `YieldMethod::Offset` (0.002 = 0.2%).
    pub offset: f64,
    /// Threshold strain for `YieldMethod::StrainThreshold`.
    pub strain_threshold: f64,
    /// Total strain for `YieldMethod::ExtensionUnderLoad`.
    pub eul_strain: f64,

    /// Minimum samples a modulus fit window must contain.
    pub modulus_min_points: usize,
    /// Window search ceiling as a fraction of UTS stress. The elastic chord
    /// is searched below this stress level (0.5 keeps the search under the
    /// yield stress for common metals).
    pub modulus_stress_cap: f64,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_results: Option<PathBuf>,
    pub export_properties: Option<PathBuf>,
    pub export_analysis: Option<PathBuf>,
    pub chart: Option<PathBuf>,
}

/// Synthetic test generation parameters.
///
/// Stress parameters are engineering values in MPa; `hardening_k_mpa` and
/// `hardening_n` are the Hollomon coefficients of the plastic segment.
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub modulus_mpa: f64,
    pub yield_mpa: f64,
    pub uts_mpa: f64,
    pub hardening_k_mpa: f64,
    pub hardening_n: f64,

    pub area_mm2: f64,
    pub gauge_mm: f64,

    /// Maximum engineering strain to simulate.
    pub strain_max: f64,
    pub num_points: usize,
    /// Post-UTS exponential decay factor.
    pub decay: f64,
    /// Gaussian stress noise σ (MPa); 0 disables noise.
    pub noise_mpa: f64,
    pub seed: u64,
}

/// A saved analysis file (JSON).
///
/// This is the "portable" representation of a completed run:
/// - specimen + extracted properties
/// - a decimated curve grid for quick re-plotting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisFile {
    pub tool: String,
    pub specimen: Specimen,
    pub properties: Properties,
    pub grid: CurveGrid,
}

/// JSON cannot represent NaN; round-trip it through null.
mod nan_as_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &f64, s: S) -> Result<S::Ok, S::Error> {
        if v.is_finite() {
            s.serialize_some(v)
        } else {
            s.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(d)?.unwrap_or(f64::NAN))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveGrid {
    pub eng_strain: Vec<f64>,
    pub eng_stress_mpa: Vec<f64>,
    pub true_strain: Vec<f64>,
    pub true_stress_mpa: Vec<f64>,
}
