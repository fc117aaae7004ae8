//! Mathematical utilities: least squares, interpolation, integration.

pub mod interp;
pub mod ols;

pub use interp::*;
pub use ols::*;
