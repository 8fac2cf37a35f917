//! Human-readable fit reports.
//!
//! Formatting lives here so the fitting code stays free of presentation
//! details and output changes stay localized.

pub mod format;

pub use format::*;
