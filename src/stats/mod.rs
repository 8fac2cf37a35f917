//! Statistical helpers: chi-squared, normal-distribution tail probabilities and
//! densities, and small sample summaries.

pub mod chi2;
pub mod normal;
pub mod summary;

pub use chi2::*;
pub use normal::*;
pub use summary::*;
