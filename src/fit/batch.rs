//! Fit many independent datasets with the same model.
//!
//! Each dataset is fitted on the rayon pool; results come back in input order.
//! Nothing is drawn here, so the model only has to be `Sync`.

use log::debug;
use rayon::prelude::*;

use crate::domain::{CurveFit, FitData, FitOptions};
use crate::error::Result;
use crate::fit::fitter::curve_fit;
use crate::models::ModelFunction;

/// Fit every dataset independently. A failure in one dataset does not affect
/// the others.
pub fn fit_batch<M>(model: &M, datasets: &[FitData<'_>], options: &FitOptions) -> Vec<Result<CurveFit>>
where
    M: ModelFunction + Sync + ?Sized,
{
    debug!("fitting {} datasets in parallel", datasets.len());
    datasets
        .par_iter()
        .map(|data| curve_fit(model, *data, options))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LabError;
    use crate::models::Linear;
    use approx::assert_relative_eq;

    #[test]
    fn batch_preserves_order_and_isolates_failures() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let s = [0.1; 4];
        let slopes = [0.5, 1.0, 2.0, 4.0];
        let ys: Vec<Vec<f64>> = slopes
            .iter()
            .map(|m| x.iter().map(|v| m * v + 1.0).collect())
            .collect();

        let mut datasets: Vec<FitData<'_>> = ys
            .iter()
            .map(|y| FitData::new(&x, y, &s).unwrap())
            .collect();
        // Two points for a two-parameter model.
        datasets.insert(2, FitData::new(&x[..2], &ys[0][..2], &s[..2]).unwrap());

        let results = fit_batch(&Linear, &datasets, &FitOptions::default());
        assert_eq!(results.len(), 5);
        assert!(matches!(results[2], Err(LabError::InsufficientData { .. })));

        let fitted: Vec<f64> = results
            .iter()
            .filter_map(|r| r.as_ref().ok())
            .map(|fit| fit.params()[0])
            .collect();
        assert_eq!(fitted.len(), 4);
        for (got, want) in fitted.iter().zip(slopes) {
            assert_relative_eq!(*got, want, epsilon = 1e-6);
        }
    }
}
