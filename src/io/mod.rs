//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - result exports (per-sample CSV, property sheet CSV) (`export`)
//! - analysis JSON read/write (`analysis`)

pub mod analysis;
pub mod export;
pub mod ingest;

pub use analysis::*;
pub use export::*;
pub use ingest::*;
