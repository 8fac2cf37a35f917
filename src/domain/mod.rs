//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - validated fit inputs (`FitData`)
//! - fit configuration (`FitOptions`, `SolverConfig`, `FitLabels`)
//! - fit outputs (`CurveFit`, `FitResult`, `FitMetrics`)

pub mod types;

pub use types::*;
