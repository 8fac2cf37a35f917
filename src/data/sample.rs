//! Seeded synthetic measurements.
//!
//! Noise is zero-mean Gaussian with the given per-point sigma, drawn from a
//! `StdRng` seeded by the caller so a given seed always reproduces the same
//! dataset.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::error::{LabError, Result};
use crate::models::ModelFunction;
use crate::models::model::check_param_count;
use crate::stats::chi2::check_uncertainties;

/// Model predictions at `x` plus Gaussian noise of width `sigma[i]`.
pub fn simulate_measurements<M>(model: &M, params: &[f64], x: &[f64], sigma: &[f64], seed: u64) -> Result<Vec<f64>>
where
    M: ModelFunction + ?Sized,
{
    check_param_count(model, params)?;
    if x.len() != sigma.len() {
        return Err(LabError::invalid(format!(
            "length mismatch: x={}, sigma={}",
            x.len(),
            sigma.len()
        )));
    }
    check_uncertainties(sigma)?;

    let mut rng = StdRng::seed_from_u64(seed);
    let normal = unit_normal()?;

    let mut out = Vec::with_capacity(x.len());
    for (&xi, &si) in x.iter().zip(sigma) {
        let y = model.eval(xi, params);
        if !y.is_finite() {
            return Err(LabError::invalid(format!("model is not finite at x={xi}")));
        }
        out.push(y + si * normal.sample(&mut rng));
    }
    Ok(out)
}

/// `n` draws from `N(mean, std²)`, e.g. repeated timings of the same event.
pub fn normal_sample(mean: f64, std: f64, n: usize, seed: u64) -> Result<Vec<f64>> {
    if !mean.is_finite() {
        return Err(LabError::invalid(format!("mean must be finite, got {mean}")));
    }
    if !(std.is_finite() && std > 0.0) {
        return Err(LabError::invalid(format!("std must be finite and > 0, got {std}")));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let normal = unit_normal()?;
    Ok((0..n).map(|_| mean + std * normal.sample(&mut rng)).collect())
}

fn unit_normal() -> Result<Normal<f64>> {
    Normal::new(0.0, 1.0).map_err(|e| LabError::invalid(format!("noise distribution error: {e}")))
}
