//! Sample summaries used by the distribution comparison.
//!
//! The spread is the population standard deviation (divide by `n`), which is
//! what the lab worksheets quote for a set of repeated measurements.

use statrs::statistics::Statistics;

use crate::error::{LabError, Result};

/// Arithmetic mean of a sample.
pub fn mean(values: &[f64]) -> Result<f64> {
    check_sample(values, 1, "mean")?;
    Ok(Statistics::mean(values))
}

/// Population standard deviation (`ddof = 0`).
pub fn population_std_dev(values: &[f64]) -> Result<f64> {
    check_sample(values, 2, "standard deviation")?;
    Ok(Statistics::population_std_dev(values))
}

/// Standard error of the mean: `std / sqrt(n)`.
pub fn standard_error_of_mean(values: &[f64]) -> Result<f64> {
    let std = population_std_dev(values)?;
    Ok(std / (values.len() as f64).sqrt())
}

fn check_sample(values: &[f64], needed: usize, what: &'static str) -> Result<()> {
    if values.len() < needed {
        return Err(LabError::InsufficientData {
            what,
            needed,
            got: values.len(),
        });
    }
    if let Some(v) = values.iter().find(|v| !v.is_finite()) {
        return Err(LabError::invalid(format!("sample contains non-finite value {v}")));
    }
    Ok(())
}
