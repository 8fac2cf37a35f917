//! The `ModelFunction` trait and a closure-backed implementation.
//!
//! The fitter relies on two primitive operations:
//! - the parameter count (to size the solver and the degrees of freedom)
//! - `y = f(x; params)` for a single independent value

use std::fmt;

use crate::error::{LabError, Result};

/// A parametric model `y = f(x; p1, p2, ...)`.
pub trait ModelFunction {
    /// Number of free parameters.
    fn param_count(&self) -> usize;

    /// Evaluate the model at `x`. `params` always has `param_count()` entries.
    fn eval(&self, x: f64, params: &[f64]) -> f64;

    /// Optional parameter names, in parameter order.
    fn param_names(&self) -> Option<Vec<String>> {
        None
    }

    /// Optional human-readable model name.
    fn name(&self) -> Option<String> {
        None
    }

    /// Evaluate the model at each of `xs`.
    fn eval_many(&self, xs: &[f64], params: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.eval(x, params)).collect()
    }
}

impl<M: ModelFunction + ?Sized> ModelFunction for &M {
    fn param_count(&self) -> usize {
        (**self).param_count()
    }

    fn eval(&self, x: f64, params: &[f64]) -> f64 {
        (**self).eval(x, params)
    }

    fn param_names(&self) -> Option<Vec<String>> {
        (**self).param_names()
    }

    fn name(&self) -> Option<String> {
        (**self).name()
    }
}

/// Reject a parameter slice whose length differs from `model.param_count()`.
pub(crate) fn check_param_count<M>(model: &M, params: &[f64]) -> Result<()>
where
    M: ModelFunction + ?Sized,
{
    if params.len() != model.param_count() {
        return Err(LabError::invalid(format!(
            "expected {} parameters, got {}",
            model.param_count(),
            params.len()
        )));
    }
    Ok(())
}

/// A model backed by a closure with an explicitly declared parameter count.
///
/// ```
/// use lab_stats::models::{FnModel, ModelFunction};
///
/// let pendulum = FnModel::new(2, |l, p| p[0] * l.sqrt() + p[1]).with_names(["k", "t0"]);
/// assert_eq!(pendulum.param_count(), 2);
/// ```
pub struct FnModel<F> {
    param_count: usize,
    names: Option<Vec<String>>,
    name: Option<String>,
    func: F,
}

impl<F> FnModel<F>
where
    F: Fn(f64, &[f64]) -> f64,
{
    pub fn new(param_count: usize, func: F) -> Self {
        Self {
            param_count,
            names: None,
            name: None,
            func,
        }
    }

    /// Attach parameter names. Extra names are ignored and missing ones fall
    /// back to the positional label in reports.
    pub fn with_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names = Some(names.into_iter().take(self.param_count).map(Into::into).collect());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl<F> ModelFunction for FnModel<F>
where
    F: Fn(f64, &[f64]) -> f64,
{
    fn param_count(&self) -> usize {
        self.param_count
    }

    fn eval(&self, x: f64, params: &[f64]) -> f64 {
        (self.func)(x, params)
    }

    fn param_names(&self) -> Option<Vec<String>> {
        self.names.clone()
    }

    fn name(&self) -> Option<String> {
        self.name.clone()
    }
}

impl<F> fmt::Debug for FnModel<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnModel")
            .field("param_count", &self.param_count)
            .field("names", &self.names)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_model_evaluates() {
        let m = FnModel::new(2, |x, p| p[0] * x * x + p[1]).with_name("parabola");
        assert_eq!(m.eval(3.0, &[2.0, 1.0]), 19.0);
        assert_eq!(m.eval_many(&[0.0, 1.0], &[2.0, 1.0]), vec![1.0, 3.0]);
        assert_eq!(m.name().as_deref(), Some("parabola"));
        assert!(m.param_names().is_none());
    }

    #[test]
    fn names_truncate_to_param_count() {
        let m = FnModel::new(1, |_, p| p[0]).with_names(["c", "unused"]);
        assert_eq!(m.param_names(), Some(vec!["c".to_string()]));
    }

    #[test]
    fn references_are_models() {
        fn count(m: impl ModelFunction) -> usize {
            m.param_count()
        }
        let m = FnModel::new(3, |_, p| p[0] + p[1] + p[2]);
        assert_eq!(count(&m), 3);
    }

    #[test]
    fn param_count_mismatch_is_invalid() {
        let m = FnModel::new(2, |x, p| p[0] * x + p[1]);
        assert!(check_param_count(&m, &[1.0, 2.0]).is_ok());
        assert!(matches!(check_param_count(&m, &[1.0]), Err(LabError::InvalidArgument(_))));
        assert!(matches!(check_param_count(&m, &[1.0, 2.0, 3.0]), Err(LabError::InvalidArgument(_))));
    }
}
