//! Chi-squared goodness of fit.
//!
//! ```text
//! χ² = Σ ((data_i - model_i) / σ_i)^2
//! ```

use statrs::distribution::{ChiSquared, ContinuousCDF};

use crate::error::{LabError, Result};

/// Sum of squared, uncertainty-normalized residuals.
///
/// All three slices must have the same length and every uncertainty must be
/// finite and strictly positive. Empty input yields `0.0`.
pub fn chi_square(data: &[f64], model: &[f64], uncertainty: &[f64]) -> Result<f64> {
    if data.len() != model.len() || data.len() != uncertainty.len() {
        return Err(LabError::invalid(format!(
            "length mismatch: data={}, model={}, uncertainty={}",
            data.len(),
            model.len(),
            uncertainty.len()
        )));
    }
    check_uncertainties(uncertainty)?;

    Ok(data
        .iter()
        .zip(model)
        .zip(uncertainty)
        .map(|((&d, &m), &s)| {
            let r = (d - m) / s;
            r * r
        })
        .sum())
}

/// Probability of a chi-squared at least this large given `dof` degrees of
/// freedom (upper tail).
pub fn chi_square_probability(chi2: f64, dof: usize) -> Result<f64> {
    if dof == 0 {
        return Err(LabError::InsufficientData {
            what: "chi-squared probability",
            needed: 1,
            got: 0,
        });
    }
    if !(chi2.is_finite() && chi2 >= 0.0) {
        return Err(LabError::invalid(format!("chi-squared must be finite and >= 0, got {chi2}")));
    }
    let dist = ChiSquared::new(dof as f64).map_err(|e| LabError::invalid(format!("chi-squared distribution: {e}")))?;
    Ok(dist.sf(chi2))
}

/// Reject zero, negative or non-finite uncertainties.
pub(crate) fn check_uncertainties(uncertainty: &[f64]) -> Result<()> {
    if let Some((i, s)) = uncertainty
        .iter()
        .enumerate()
        .find(|(_, s)| !(s.is_finite() && **s > 0.0))
    {
        return Err(LabError::invalid(format!(
            "uncertainty[{i}] must be finite and > 0, got {s}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const DATA: [f64; 5] = [1.0, 2.5, 2.9, 4.2, 5.1];
    const MODEL: [f64; 5] = [1.1, 2.0, 3.0, 4.0, 5.0];
    const SIGMA: [f64; 5] = [0.1, 0.2, 0.1, 0.4, 0.5];

    #[test]
    fn zero_when_model_matches_data() {
        let sigma = [0.3, 1.0, 7.5, 0.01, 2.0];
        assert_eq!(chi_square(&DATA, &DATA, &sigma).unwrap(), 0.0);
    }

    #[test]
    fn hand_computed_value() {
        // 1 + 6.25 + 1 + 0.25 + 0.04
        assert_relative_eq!(chi_square(&DATA, &MODEL, &SIGMA).unwrap(), 8.54, epsilon = 1e-12);
    }

    #[test]
    fn symmetric_in_data_and_model() {
        let a = chi_square(&DATA, &MODEL, &SIGMA).unwrap();
        let b = chi_square(&MODEL, &DATA, &SIGMA).unwrap();
        assert_relative_eq!(a, b, epsilon = 1e-12);
    }

    #[test]
    fn scales_with_inverse_square_of_uncertainty() {
        let base = chi_square(&DATA, &MODEL, &SIGMA).unwrap();
        for k in [0.5, 2.0, 10.0] {
            let scaled: Vec<f64> = SIGMA.iter().map(|s| s * k).collect();
            let v = chi_square(&DATA, &MODEL, &scaled).unwrap();
            assert_relative_eq!(v, base / (k * k), max_relative = 1e-12);
        }
    }

    #[test]
    fn rejects_length_mismatch() {
        let err = chi_square(&DATA, &MODEL[..4], &SIGMA).unwrap_err();
        assert!(matches!(err, LabError::InvalidArgument(_)));
    }

    #[test]
    fn rejects_non_positive_uncertainty() {
        let mut sigma = SIGMA;
        sigma[2] = 0.0;
        assert!(matches!(
            chi_square(&DATA, &MODEL, &sigma),
            Err(LabError::InvalidArgument(_))
        ));
        sigma[2] = -0.1;
        assert!(chi_square(&DATA, &MODEL, &sigma).is_err());
        sigma[2] = f64::NAN;
        assert!(chi_square(&DATA, &MODEL, &sigma).is_err());
    }

    #[test]
    fn empty_input_is_zero() {
        assert_eq!(chi_square(&[], &[], &[]).unwrap(), 0.0);
    }

    #[test]
    fn probability_of_chi_square() {
        // For dof = 2 the survival function is exp(-x/2).
        let p = chi_square_probability(2.0, 2).unwrap();
        assert_relative_eq!(p, (-1.0f64).exp(), max_relative = 1e-9);
        assert_relative_eq!(chi_square_probability(0.0, 3).unwrap(), 1.0, epsilon = 1e-12);
        assert!(chi_square_probability(1.0, 0).is_err());
    }
}
