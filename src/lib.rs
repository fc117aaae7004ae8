//! `tensile-curves` library crate.
//!
//! The binary (`tensile`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - modules are reusable (e.g., future GUI/daemon, notebooks, etc.)
//! - code stays easy to navigate as the project grows

pub mod analysis;
pub mod app;
pub mod cli;
pub mod curves;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod materials;
pub mod math;
pub mod plot;
pub mod report;
