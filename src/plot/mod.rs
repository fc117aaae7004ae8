//! Stress-strain plotting (terminal ASCII and PNG charts).

pub mod ascii;
pub mod chart;

pub use ascii::*;
pub use chart::*;
