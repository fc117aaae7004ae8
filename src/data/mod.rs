//! Synthetic test data generation.

pub mod simulate;
