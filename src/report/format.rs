//! Fit report formatting.
//!
//! Layout:
//!
//! ```text
//! Best Fit Parameters:
//!
//!      Independent Variable: <x label>
//!      Dependent Variable: <y label>
//!      Model: <title>
//!      P1 = <value> +/- <error>
//!      ...
//!
//!  Fit Metrics:
//!
//!      Degrees of freedom (N-d): <dof>
//!      Reduced Chi Squared = <value>
//!      Fit Probability = <value>
//! ```
//!
//! Parameters are printed with 5 decimals, metrics with 3.

use crate::domain::CurveFit;

/// Format the parameter and metrics report for a completed fit.
pub fn format_fit_report(fit: &CurveFit) -> String {
    let mut out = String::new();

    out.push_str("Best Fit Parameters:\n\n");
    if let Some(x) = &fit.labels.x_label {
        out.push_str(&format!("\t Independent Variable: {x}\n"));
    }
    if let Some(y) = &fit.labels.y_label {
        out.push_str(&format!("\t Dependent Variable: {y}\n"));
    }
    if let Some(title) = fit.labels.title.as_ref().or(fit.model_name.as_ref()) {
        out.push_str(&format!("\t Model: {title}\n"));
    }

    let names = fit.param_names.as_deref().unwrap_or(&[]);
    for (i, (value, err)) in fit.result.params.iter().zip(&fit.result.errors).enumerate() {
        let label = match names.get(i) {
            Some(name) => format!("P{} ({name})", i + 1),
            None => format!("P{}", i + 1),
        };
        out.push_str(&format!("\t {label} = {} +/- {}\n", fmt_fixed(*value, 5), fmt_fixed(*err, 5)));
    }

    out.push_str("\n Fit Metrics:\n\n");
    out.push_str(&format!("\t Degrees of freedom (N-d): {}\n", fit.metrics.dof));
    out.push_str(&format!(
        "\t Reduced Chi Squared = {}\n",
        fmt_fixed(fit.metrics.reduced_chi_square, 3)
    ));
    out.push_str(&format!("\t Fit Probability = {}\n", fmt_fixed(fit.metrics.probability, 3)));

    out
}

/// Fixed-point formatting that never prints a negative zero.
fn fmt_fixed(v: f64, places: usize) -> String {
    let s = format!("{v:.places$}");
    if s.starts_with('-') && s[1..].chars().all(|c| c == '0' || c == '.') {
        s[1..].to_string()
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FitLabels, FitMetrics, FitResult};

    fn sample_fit(labels: FitLabels, names: Option<Vec<String>>) -> CurveFit {
        CurveFit {
            result: FitResult {
                params: vec![1.955, 0.1000004],
                errors: vec![0.0447213595, 0.1224744871],
            },
            metrics: FitMetrics {
                dof: 2,
                chi_square: 2.175,
                reduced_chi_square: 1.08751,
                probability: 0.33703,
            },
            labels,
            param_names: names,
            model_name: None,
            evaluations: 7,
            termination: "Converged".into(),
        }
    }

    #[test]
    fn report_with_labels_and_names() {
        let labels = FitLabels::new().x("t (s)").y("v (m/s)").title("constant acceleration");
        let fit = sample_fit(labels, Some(vec!["slope".into(), "intercept".into()]));

        let expected = concat!(
            "Best Fit Parameters:\n\n",
            "\t Independent Variable: t (s)\n",
            "\t Dependent Variable: v (m/s)\n",
            "\t Model: constant acceleration\n",
            "\t P1 (slope) = 1.95500 +/- 0.04472\n",
            "\t P2 (intercept) = 0.10000 +/- 0.12247\n",
            "\n Fit Metrics:\n\n",
            "\t Degrees of freedom (N-d): 2\n",
            "\t Reduced Chi Squared = 1.088\n",
            "\t Fit Probability = 0.337\n",
        );
        assert_eq!(format_fit_report(&fit), expected);
    }

    #[test]
    fn report_without_labels_uses_positional_names() {
        let fit = sample_fit(FitLabels::default(), None);
        let report = format_fit_report(&fit);
        assert!(!report.contains("Independent Variable"));
        assert!(!report.contains("Model:"));
        assert!(report.contains("\t P1 = 1.95500 +/- 0.04472\n"));
        assert!(report.contains("\t P2 = 0.10000 +/- 0.12247\n"));
    }

    #[test]
    fn model_name_is_the_fallback_title() {
        let mut fit = sample_fit(FitLabels::default(), None);
        fit.model_name = Some("a*x + b".into());
        assert!(format_fit_report(&fit).contains("\t Model: a*x + b\n"));
    }

    #[test]
    fn fixed_formatting_drops_negative_zero() {
        assert_eq!(fmt_fixed(-0.000001, 5), "0.00000");
        assert_eq!(fmt_fixed(-1.5, 3), "-1.500");
    }
}
