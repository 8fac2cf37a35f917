//! Shared domain types.
//!
//! Result types are plain data and serializable so callers can keep them in a
//! lab notebook, export them, or compare runs.

use serde::{Deserialize, Serialize};

use crate::error::{LabError, Result};
use crate::stats::chi2::check_uncertainties;

/// Measurements to fit: independent values, dependent values and the absolute
/// one-sigma uncertainty of each dependent value.
///
/// Construction validates the invariants the fitter depends on: equal lengths,
/// at least one point, finite values and strictly positive uncertainties.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitData<'a> {
    x: &'a [f64],
    y: &'a [f64],
    sigma: &'a [f64],
}

impl<'a> FitData<'a> {
    pub fn new(x: &'a [f64], y: &'a [f64], sigma: &'a [f64]) -> Result<Self> {
        if x.len() != y.len() || x.len() != sigma.len() {
            return Err(LabError::invalid(format!(
                "length mismatch: x={}, y={}, sigma={}",
                x.len(),
                y.len(),
                sigma.len()
            )));
        }
        if x.is_empty() {
            return Err(LabError::InsufficientData {
                what: "curve fit",
                needed: 1,
                got: 0,
            });
        }
        if x.iter().chain(y).any(|v| !v.is_finite()) {
            return Err(LabError::invalid("x and y must be finite"));
        }
        check_uncertainties(sigma)?;
        Ok(Self { x, y, sigma })
    }

    pub fn x(&self) -> &'a [f64] {
        self.x
    }

    pub fn y(&self) -> &'a [f64] {
        self.y
    }

    pub fn sigma(&self) -> &'a [f64] {
        self.sigma
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// `(min, max)` of the independent variable.
    pub fn x_range(&self) -> (f64, f64) {
        self.x
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    }
}

/// Best-fit parameters and their one-sigma uncertainties, in model parameter
/// order.
///
/// Uncertainties are the square roots of the covariance diagonal; correlations
/// between parameters are not reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub params: Vec<f64>,
    pub errors: Vec<f64>,
}

impl FitResult {
    /// `(fit_params, fit_param_errors)`.
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.params, self.errors)
    }
}

/// Goodness-of-fit numbers for a completed fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitMetrics {
    /// `n_points - n_params`, always at least 1.
    pub dof: usize,
    pub chi_square: f64,
    /// `chi_square / dof`; close to 1 when the model and uncertainties are right.
    pub reduced_chi_square: f64,
    /// Upper-tail probability of `chi_square` for `dof` degrees of freedom.
    pub probability: f64,
}

/// Optional annotations for reports and charts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitLabels {
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub title: Option<String>,
}

impl FitLabels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn x(mut self, label: impl Into<String>) -> Self {
        self.x_label = Some(label.into());
        self
    }

    pub fn y(mut self, label: impl Into<String>) -> Self {
        self.y_label = Some(label.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Levenberg–Marquardt stopping rules.
///
/// Defaults follow MINPACK's `lmdif` conventions: relative tolerances of
/// `sqrt(f64::EPSILON)` and up to `patience * (n_params + 1)` evaluations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Relative reduction of the sum of squares considered converged.
    pub ftol: f64,
    /// Relative change of the parameters considered converged.
    pub xtol: f64,
    /// Orthogonality between residuals and Jacobian columns considered converged.
    pub gtol: f64,
    pub patience: usize,
    /// Relative step for the central-difference Jacobian.
    pub diff_step: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            ftol: 1.49012e-8,
            xtol: 1.49012e-8,
            gtol: 1.49012e-8,
            patience: 200,
            diff_step: f64::EPSILON.cbrt(),
        }
    }
}

/// Options for a single curve fit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FitOptions {
    /// Starting parameters. When absent every parameter starts at `1.0`.
    pub initial_guess: Option<Vec<f64>>,
    pub labels: FitLabels,
    pub solver: SolverConfig,
}

impl FitOptions {
    pub fn with_initial_guess(mut self, guess: impl Into<Vec<f64>>) -> Self {
        self.initial_guess = Some(guess.into());
        self
    }

    pub fn with_labels(mut self, labels: FitLabels) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }
}

/// Everything a curve fit produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveFit {
    pub result: FitResult,
    pub metrics: FitMetrics,
    pub labels: FitLabels,
    /// Declared parameter names, if the model has them.
    pub param_names: Option<Vec<String>>,
    /// Model name, used as the report title when no explicit title is set.
    pub model_name: Option<String>,
    /// Residual/model evaluations used by the solver.
    pub evaluations: usize,
    /// Why the solver stopped.
    pub termination: String,
}

impl CurveFit {
    pub fn params(&self) -> &[f64] {
        &self.result.params
    }

    pub fn errors(&self) -> &[f64] {
        &self.result.errors
    }

    /// Human-readable parameter and metrics report.
    pub fn report(&self) -> String {
        crate::report::format_fit_report(self)
    }
}
