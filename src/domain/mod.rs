//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - input configuration (`AnalysisConfig`, `SimConfig`, `YieldMethod`)
//! - specimen geometry and raw measurement rows (`Specimen`, `TestRow`)
//! - derived curves (`CurvePoint`, `StressStrainCurve`)
//! - extracted property summaries (`Properties`, `ModulusFit`, `YieldPoint`)

pub mod types;

pub use types::*;
