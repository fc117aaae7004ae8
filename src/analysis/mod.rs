//! Property extraction: modulus regression, yield detection, scalar
//! summaries, and validity diagnostics.
//!
//! Responsibilities:
//!
//! - search candidate strain windows for the elastic-modulus fit (parallel)
//! - detect the yield point with the configured method
//! - reduce the curve to the standard scalar properties
//! - collect dataset-quality warnings for the report

pub mod modulus;
pub mod properties;
pub mod validity;
pub mod yield_point;

pub use modulus::*;
pub use properties::*;
pub use validity::*;
pub use yield_point::*;
