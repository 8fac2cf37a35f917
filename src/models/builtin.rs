//! Models that come up in most introductory lab write-ups.

use serde::{Deserialize, Serialize};

use crate::models::ModelFunction;

/// `y = a*x + b`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Linear;

impl ModelFunction for Linear {
    fn param_count(&self) -> usize {
        2
    }

    fn eval(&self, x: f64, p: &[f64]) -> f64 {
        p[0] * x + p[1]
    }

    fn param_names(&self) -> Option<Vec<String>> {
        Some(vec!["slope".into(), "intercept".into()])
    }

    fn name(&self) -> Option<String> {
        Some("a*x + b".into())
    }
}

/// `y = p0 + p1*x + ... + pn*x^n`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Polynomial {
    pub degree: usize,
}

impl Polynomial {
    pub fn new(degree: usize) -> Self {
        Self { degree }
    }
}

impl ModelFunction for Polynomial {
    fn param_count(&self) -> usize {
        self.degree + 1
    }

    fn eval(&self, x: f64, p: &[f64]) -> f64 {
        // Horner, highest power first.
        p.iter().rev().fold(0.0, |acc, &c| acc * x + c)
    }

    fn param_names(&self) -> Option<Vec<String>> {
        Some((0..=self.degree).map(|k| format!("c{k}")).collect())
    }

    fn name(&self) -> Option<String> {
        Some(format!("polynomial (degree {})", self.degree))
    }
}

/// `y = a * exp(b*x)`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exponential;

impl ModelFunction for Exponential {
    fn param_count(&self) -> usize {
        2
    }

    fn eval(&self, x: f64, p: &[f64]) -> f64 {
        p[0] * (p[1] * x).exp()
    }

    fn param_names(&self) -> Option<Vec<String>> {
        Some(vec!["amplitude".into(), "rate".into()])
    }

    fn name(&self) -> Option<String> {
        Some("a*exp(b*x)".into())
    }
}

/// `y = a * x^b`, defined for `x > 0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerLaw;

impl ModelFunction for PowerLaw {
    fn param_count(&self) -> usize {
        2
    }

    fn eval(&self, x: f64, p: &[f64]) -> f64 {
        p[0] * x.powf(p[1])
    }

    fn param_names(&self) -> Option<Vec<String>> {
        Some(vec!["amplitude".into(), "exponent".into()])
    }

    fn name(&self) -> Option<String> {
        Some("a*x^b".into())
    }
}
