//! `lab-stats` library crate.
//!
//! Helpers for analysing teaching-lab measurements:
//!
//! - chi-squared goodness of fit and two-tailed p-values (`stats`)
//! - weighted nonlinear curve fitting with parameter uncertainties (`fit`)
//! - diagnostic charts drawn onto any Plotters backend (`plot`)
//! - seeded synthetic measurements for demonstrations (`data`)
//!
//! Everything is a plain function call: no global state, no file I/O.

pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod models;
pub mod plot;
pub mod report;
pub mod stats;

pub use domain::{CurveFit, FitData, FitLabels, FitMetrics, FitOptions, FitResult, SolverConfig};
pub use error::{LabError, Result};
pub use fit::{curve_fit, curve_fit_and_plot, fit_batch};
pub use plot::compare_distribution_to_prediction;
pub use stats::{chi_square, gaussian_density, p_value};
