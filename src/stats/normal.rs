//! Standard-normal tail probabilities and Gaussian densities.

use statrs::distribution::{Continuous, ContinuousCDF, Normal};

use crate::error::{LabError, Result};

/// Two-tailed p-value for a standardized statistic.
///
/// `2 * P(Z >= |s|)` for `Z ~ N(0, 1)`. Infinite input gives `0.0`, NaN stays NaN.
pub fn p_value(standardized: f64) -> f64 {
    if standardized.is_nan() {
        return f64::NAN;
    }
    2.0 * Normal::standard().sf(standardized.abs())
}

/// Separation between two measured values in units of their combined
/// uncertainty: `|a - b| / sqrt(σa² + σb²)`.
///
/// One of the uncertainties may be zero (an exact reference value), not both.
pub fn standardized_separation(a: f64, sigma_a: f64, b: f64, sigma_b: f64) -> Result<f64> {
    if !(a.is_finite() && b.is_finite()) {
        return Err(LabError::invalid(format!("values must be finite, got {a} and {b}")));
    }
    for s in [sigma_a, sigma_b] {
        if !(s.is_finite() && s >= 0.0) {
            return Err(LabError::invalid(format!("uncertainty must be finite and >= 0, got {s}")));
        }
    }
    let combined = sigma_a.hypot(sigma_b);
    if combined == 0.0 {
        return Err(LabError::invalid("combined uncertainty is zero"));
    }
    Ok((a - b).abs() / combined)
}

/// Normal probability density at `x`.
pub fn gaussian_density(x: f64, mean: f64, std: f64) -> Result<f64> {
    Ok(normal(mean, std)?.pdf(x))
}

/// Normal probability density evaluated at each of `xs`.
pub fn gaussian_density_many(xs: &[f64], mean: f64, std: f64) -> Result<Vec<f64>> {
    let dist = normal(mean, std)?;
    Ok(xs.iter().map(|&x| dist.pdf(x)).collect())
}

fn normal(mean: f64, std: f64) -> Result<Normal> {
    if !mean.is_finite() {
        return Err(LabError::invalid(format!("mean must be finite, got {mean}")));
    }
    if !(std.is_finite() && std > 0.0) {
        return Err(LabError::invalid(format!("std must be finite and > 0, got {std}")));
    }
    Normal::new(mean, std).map_err(|e| LabError::invalid(format!("normal distribution: {e}")))
}
