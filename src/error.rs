//! Crate-wide error type.
//!
//! Every public entry point validates its inputs up front and fails with one of
//! these variants instead of handing back NaN/infinite results.

/// Errors surfaced by the statistics, fitting and plotting routines.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LabError {
    /// Malformed input: mismatched lengths, non-finite values, non-positive
    /// uncertainties or widths.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Not enough data for the requested statistic.
    #[error("insufficient data for {what}: need at least {needed}, got {got}")]
    InsufficientData {
        what: &'static str,
        needed: usize,
        got: usize,
    },

    /// The least-squares solver stopped without reaching a usable solution.
    #[error("fit did not converge after {evaluations} evaluations: {reason}")]
    FitDidNotConverge { reason: String, evaluations: usize },

    /// The drawing backend failed while rendering a chart.
    #[error("render failed: {0}")]
    Render(String),
}

impl LabError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

pub type Result<T> = std::result::Result<T, LabError>;
