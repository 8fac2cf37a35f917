//! Curve fitting orchestration.
//!
//! Responsibilities:
//!
//! - run the weighted Levenberg–Marquardt solver and derive the covariance
//! - turn solver output into parameters, uncertainties and fit metrics
//! - fit independent datasets in parallel

pub mod batch;
pub mod fitter;
pub(crate) mod solver;

pub use batch::*;
pub use fitter::*;
