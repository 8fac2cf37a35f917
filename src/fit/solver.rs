//! Weighted nonlinear least squares on top of the `levenberg-marquardt` crate.
//!
//! For a model `f(x; p)` and measurements `(x_i, y_i, σ_i)` we minimize
//!
//! ```text
//! Σ r_i(p)^2,   r_i(p) = (f(x_i; p) - y_i) / σ_i
//! ```
//!
//! with absolute σ scaling, so the parameter covariance is `(JᵀJ)⁻¹` where `J`
//! is the Jacobian of the weighted residuals at the optimum. The Jacobian is
//! approximated with central differences.

use levenberg_marquardt::{LeastSquaresProblem, LevenbergMarquardt};
use log::debug;
use nalgebra::storage::Owned;
use nalgebra::{DMatrix, DVector, Dyn};

use crate::domain::{FitData, SolverConfig};
use crate::error::{LabError, Result};
use crate::models::ModelFunction;

/// Solver output for a single fit.
#[derive(Debug, Clone)]
pub(crate) struct SolverOutcome {
    pub params: Vec<f64>,
    pub covariance: DMatrix<f64>,
    pub evaluations: usize,
    pub termination: String,
}

struct WeightedProblem<'a, M: ?Sized> {
    model: &'a M,
    data: FitData<'a>,
    params: DVector<f64>,
    diff_step: f64,
}

impl<M: ModelFunction + ?Sized> WeightedProblem<'_, M> {
    fn residuals_at(&self, params: &[f64]) -> Option<DVector<f64>> {
        let x = self.data.x();
        let y = self.data.y();
        let sigma = self.data.sigma();

        let r = DVector::from_iterator(
            x.len(),
            (0..x.len()).map(|i| (self.model.eval(x[i], params) - y[i]) / sigma[i]),
        );
        if r.iter().all(|v| v.is_finite()) { Some(r) } else { None }
    }
}

impl<M: ModelFunction + ?Sized> LeastSquaresProblem<f64, Dyn, Dyn> for WeightedProblem<'_, M> {
    type ResidualStorage = Owned<f64, Dyn>;
    type JacobianStorage = Owned<f64, Dyn, Dyn>;
    type ParameterStorage = Owned<f64, Dyn>;

    fn set_params(&mut self, p: &DVector<f64>) {
        self.params.copy_from(p);
    }

    fn params(&self) -> DVector<f64> {
        self.params.clone()
    }

    fn residuals(&self) -> Option<DVector<f64>> {
        self.residuals_at(self.params.as_slice())
    }

    fn jacobian(&self) -> Option<DMatrix<f64>> {
        let n = self.data.len();
        let p = self.params.len();
        let mut jac = DMatrix::<f64>::zeros(n, p);
        let mut work: Vec<f64> = self.params.iter().copied().collect();

        for j in 0..p {
            let base = work[j];
            let h = self.diff_step * base.abs().max(1.0);

            work[j] = base + h;
            let plus = self.residuals_at(&work)?;
            work[j] = base - h;
            let minus = self.residuals_at(&work)?;
            work[j] = base;

            let column = (plus - minus) / (2.0 * h);
            jac.set_column(j, &column);
        }

        Some(jac)
    }
}

/// Run Levenberg–Marquardt from `initial` and derive the parameter covariance.
pub(crate) fn solve<M: ModelFunction + ?Sized>(
    model: &M,
    data: FitData<'_>,
    initial: Vec<f64>,
    config: &SolverConfig,
) -> Result<SolverOutcome> {
    validate_config(config)?;

    let problem = WeightedProblem {
        model,
        data,
        params: DVector::from_vec(initial),
        diff_step: config.diff_step,
    };

    debug!(
        "levenberg-marquardt: n={} p={} ftol={:e} xtol={:e} gtol={:e} patience={}",
        data.len(),
        problem.params.len(),
        config.ftol,
        config.xtol,
        config.gtol,
        config.patience
    );

    let (problem, report) = LevenbergMarquardt::<f64>::new()
        .with_ftol(config.ftol)
        .with_xtol(config.xtol)
        .with_gtol(config.gtol)
        .with_patience(config.patience)
        .minimize(problem);

    let termination = format!("{:?}", report.termination);
    debug!(
        "levenberg-marquardt stopped: {termination} after {} evaluations (objective {:e})",
        report.number_of_evaluations, report.objective_function
    );

    if !report.termination.was_successful() {
        return Err(LabError::FitDidNotConverge {
            reason: termination,
            evaluations: report.number_of_evaluations,
        });
    }
    if problem.params.iter().any(|v| !v.is_finite()) {
        return Err(LabError::FitDidNotConverge {
            reason: "non-finite parameters".into(),
            evaluations: report.number_of_evaluations,
        });
    }

    let jac = problem.jacobian().ok_or_else(|| LabError::FitDidNotConverge {
        reason: "model is not finite around the best-fit parameters".into(),
        evaluations: report.number_of_evaluations,
    })?;
    let covariance = covariance_from_jacobian(&jac).ok_or_else(|| LabError::FitDidNotConverge {
        reason: "parameters are not identifiable (rank-deficient Jacobian)".into(),
        evaluations: report.number_of_evaluations,
    })?;

    Ok(SolverOutcome {
        params: problem.params.iter().copied().collect(),
        covariance,
        evaluations: report.number_of_evaluations,
        termination,
    })
}

/// `(JᵀJ)⁻¹` via the SVD of `J`, i.e. `V diag(1/s²) Vᵀ`.
///
/// Returns `None` when a singular value falls below `eps * max(n, p) * s_max`.
pub(crate) fn covariance_from_jacobian(jac: &DMatrix<f64>) -> Option<DMatrix<f64>> {
    let (n, p) = jac.shape();
    if n < p || p == 0 {
        return None;
    }

    let svd = jac.clone().svd(false, true);
    let v_t = svd.v_t?;
    let s_max = svd.singular_values.iter().copied().fold(0.0, f64::max);
    let threshold = f64::EPSILON * n.max(p) as f64 * s_max;
    if !(s_max > 0.0) || svd.singular_values.iter().any(|&s| s <= threshold) {
        return None;
    }

    let mut cov = DMatrix::<f64>::zeros(p, p);
    for (k, &s) in svd.singular_values.iter().enumerate() {
        let v = v_t.row(k).transpose();
        cov += (&v * v.transpose()) / (s * s);
    }

    if cov.iter().all(|v| v.is_finite()) { Some(cov) } else { None }
}

fn validate_config(config: &SolverConfig) -> Result<()> {
    for (name, tol) in [("ftol", config.ftol), ("xtol", config.xtol), ("gtol", config.gtol)] {
        if !(tol.is_finite() && tol >= 0.0) {
            return Err(LabError::invalid(format!("{name} must be finite and >= 0, got {tol}")));
        }
    }
    if config.patience == 0 {
        return Err(LabError::invalid("patience must be > 0"));
    }
    if !(config.diff_step.is_finite() && config.diff_step > 0.0) {
        return Err(LabError::invalid(format!(
            "diff_step must be finite and > 0, got {}",
            config.diff_step
        )));
    }
    Ok(())
}
