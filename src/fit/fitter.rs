//! Curve-fit wrapper.
//!
//! Given:
//! - a model `f(x; p)` with a declared parameter count
//! - measurements `(x_i, y_i, σ_i)`
//! - optional starting parameters and labels
//!
//! we run the weighted least-squares solver, take parameter uncertainties from
//! the covariance diagonal, and compute degrees of freedom, χ² and reduced χ².

use log::{info, warn};
use plotters::coord::Shift;
use plotters::prelude::{DrawingArea, DrawingBackend};

use crate::domain::{CurveFit, FitData, FitMetrics, FitOptions, FitResult};
use crate::error::{LabError, Result};
use crate::fit::solver::solve;
use crate::models::ModelFunction;
use crate::plot::{PlotStyle, draw_fit};
use crate::stats::{chi_square, chi_square_probability};

/// Reduced χ² outside this band is logged as suspicious.
const REDUCED_CHI2_BAND: (f64, f64) = (0.1, 10.0);

/// Fit `model` to `data`.
///
/// Fails with `InsufficientData` unless there are more points than parameters,
/// with `InvalidArgument` for a malformed initial guess, and with
/// `FitDidNotConverge` when the solver gives up.
pub fn curve_fit<M>(model: &M, data: FitData<'_>, options: &FitOptions) -> Result<CurveFit>
where
    M: ModelFunction + ?Sized,
{
    let p = model.param_count();
    if p == 0 {
        return Err(LabError::invalid("model has no parameters to fit"));
    }
    let n = data.len();
    if n <= p {
        return Err(LabError::InsufficientData {
            what: "degrees of freedom",
            needed: p + 1,
            got: n,
        });
    }

    let initial = initial_guess(options, p)?;
    let outcome = solve(model, data, initial, &options.solver)?;

    let errors: Vec<f64> = outcome.covariance.diagonal().iter().map(|v| v.max(0.0).sqrt()).collect();
    let result = FitResult {
        params: outcome.params,
        errors,
    };

    let prediction = model.eval_many(data.x(), &result.params);
    if prediction.iter().any(|v| !v.is_finite()) {
        return Err(LabError::FitDidNotConverge {
            reason: "model is not finite at the best-fit parameters".into(),
            evaluations: outcome.evaluations,
        });
    }

    let dof = n - p;
    let chi2 = chi_square(data.y(), &prediction, data.sigma())?;
    let metrics = FitMetrics {
        dof,
        chi_square: chi2,
        reduced_chi_square: chi2 / dof as f64,
        probability: chi_square_probability(chi2, dof)?,
    };

    let fit = CurveFit {
        result,
        metrics,
        labels: options.labels.clone(),
        param_names: model.param_names(),
        model_name: model.name(),
        evaluations: outcome.evaluations,
        termination: outcome.termination,
    };

    info!("\n{}", fit.report());
    let (lo, hi) = REDUCED_CHI2_BAND;
    if !(lo..=hi).contains(&metrics.reduced_chi_square) {
        warn!(
            "reduced chi squared {:.3} is far from 1; check the model or the uncertainties",
            metrics.reduced_chi_square
        );
    }

    Ok(fit)
}

/// Fit `model` to `data` and draw the diagnostic chart onto `area` using
/// `style`.
///
/// The returned fit is identical to [`curve_fit`]; drawing only adds the
/// possibility of a `Render` error.
pub fn curve_fit_and_plot<M, DB>(
    model: &M,
    data: FitData<'_>,
    options: &FitOptions,
    area: &DrawingArea<DB, Shift>,
    style: &PlotStyle,
) -> Result<CurveFit>
where
    M: ModelFunction + ?Sized,
    DB: DrawingBackend,
{
    let fit = curve_fit(model, data, options)?;
    draw_fit(area, model, data, &fit, style)?;
    Ok(fit)
}

fn initial_guess(options: &FitOptions, p: usize) -> Result<Vec<f64>> {
    let Some(guess) = &options.initial_guess else {
        return Ok(vec![1.0; p]);
    };
    if guess.len() != p {
        return Err(LabError::invalid(format!(
            "initial guess has {} values, model has {p} parameters",
            guess.len()
        )));
    }
    if guess.iter().any(|v| !v.is_finite()) {
        return Err(LabError::invalid("initial guess must be finite"));
    }
    Ok(guess.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::simulate_measurements;
    use crate::domain::FitLabels;
    use crate::models::{Exponential, FnModel, Linear, Polynomial};
    use crate::plot::render_svg;
    use approx::assert_relative_eq;

    const X: [f64; 4] = [1.0, 2.0, 3.0, 4.0];
    const Y: [f64; 4] = [2.1, 3.9, 6.05, 7.9];
    const S: [f64; 4] = [0.1, 0.1, 0.1, 0.1];

    #[test]
    fn linear_worked_example() {
        let data = FitData::new(&X, &Y, &S).unwrap();
        let fit = curve_fit(&Linear, data, &FitOptions::default()).unwrap();

        let (a, b) = (fit.params()[0], fit.params()[1]);
        let (sa, sb) = (fit.errors()[0], fit.errors()[1]);

        // Closed-form weighted least squares for this data.
        assert_relative_eq!(a, 1.955, epsilon = 1e-5);
        assert_relative_eq!(b, 0.1, epsilon = 1e-5);
        assert_relative_eq!(sa, 0.1 / 5f64.sqrt(), epsilon = 1e-6);
        assert_relative_eq!(sb, 0.1 * 1.5f64.sqrt(), epsilon = 1e-6);

        assert!((a - 2.0).abs() < 3.0 * sa);
        assert!(b.abs() < 3.0 * sb);

        assert_eq!(fit.metrics.dof, 2);
        assert_relative_eq!(fit.metrics.chi_square, 2.175, epsilon = 1e-6);
        assert_relative_eq!(fit.metrics.reduced_chi_square, 1.0875, epsilon = 1e-6);
        assert!(fit.metrics.reduced_chi_square < 5.0);
        assert_relative_eq!(fit.metrics.probability, (-1.0875f64).exp(), epsilon = 1e-6);
    }

    #[test]
    fn closure_model_with_initial_guess() {
        let model = FnModel::new(2, |x, p| p[0] * x + p[1]);
        let data = FitData::new(&X, &Y, &S).unwrap();
        let opts = FitOptions::default().with_initial_guess(vec![10.0, -5.0]);
        let fit = curve_fit(&model, data, &opts).unwrap();
        assert_relative_eq!(fit.params()[0], 1.955, epsilon = 1e-5);
        assert!(fit.param_names.is_none());
    }

    #[test]
    fn zero_degrees_of_freedom_is_insufficient() {
        let data = FitData::new(&X[..2], &Y[..2], &S[..2]).unwrap();
        let err = curve_fit(&Linear, data, &FitOptions::default()).unwrap_err();
        assert_eq!(
            err,
            LabError::InsufficientData {
                what: "degrees of freedom",
                needed: 3,
                got: 2
            }
        );

        let data = FitData::new(&X[..3], &Y[..3], &S[..3]).unwrap();
        assert!(matches!(
            curve_fit(&Polynomial::new(3), data, &FitOptions::default()),
            Err(LabError::InsufficientData { .. })
        ));
    }

    #[test]
    fn bad_initial_guess_is_rejected() {
        let data = FitData::new(&X, &Y, &S).unwrap();
        let opts = FitOptions::default().with_initial_guess(vec![1.0]);
        assert!(matches!(curve_fit(&Linear, data, &opts), Err(LabError::InvalidArgument(_))));

        let opts = FitOptions::default().with_initial_guess(vec![1.0, f64::INFINITY]);
        assert!(matches!(curve_fit(&Linear, data, &opts), Err(LabError::InvalidArgument(_))));
    }

    #[test]
    fn solver_failure_is_surfaced() {
        let model = FnModel::new(1, |x, p| if p[0] > 0.0 { f64::NAN } else { x });
        let data = FitData::new(&X, &Y, &S).unwrap();
        assert!(matches!(
            curve_fit(&model, data, &FitOptions::default()),
            Err(LabError::FitDidNotConverge { .. })
        ));
    }

    #[test]
    fn recovers_linear_parameters_from_noisy_data() {
        let x: Vec<f64> = (0..40).map(|i| i as f64 * 0.25).collect();
        let sigma = vec![0.3; x.len()];
        let truth = [1.7, -0.4];

        for seed in [1u64, 7, 42] {
            let y = simulate_measurements(&Linear, &truth, &x, &sigma, seed).unwrap();
            let data = FitData::new(&x, &y, &sigma).unwrap();
            let fit = curve_fit(&Linear, data, &FitOptions::default()).unwrap();
            for ((p, e), t) in fit.params().iter().zip(fit.errors()).zip(truth) {
                assert!((p - t).abs() < 5.0 * e, "seed {seed}: {p} vs {t} (+/- {e})");
            }
            assert_eq!(fit.metrics.dof, 38);
        }
    }

    #[test]
    fn recovers_exponential_decay() {
        let x: Vec<f64> = (0..30).map(|i| i as f64 * 0.2).collect();
        let sigma = vec![0.02; x.len()];
        let truth = [3.0, -0.5];
        let y = simulate_measurements(&Exponential, &truth, &x, &sigma, 2024).unwrap();

        let data = FitData::new(&x, &y, &sigma).unwrap();
        let opts = FitOptions::default().with_initial_guess(vec![2.0, -0.3]);
        let fit = curve_fit(&Exponential, data, &opts).unwrap();

        for ((p, e), t) in fit.params().iter().zip(fit.errors()).zip(truth) {
            assert!((p - t).abs() < 5.0 * e, "{p} vs {t} (+/- {e})");
        }
        assert!(fit.metrics.reduced_chi_square < 3.0);
    }

    #[test]
    fn plotting_does_not_change_the_fit() {
        let data = FitData::new(&X, &Y, &S).unwrap();
        let opts = FitOptions::default().with_labels(FitLabels::new().x("x").y("y").title("line"));

        let plain = curve_fit(&Linear, data, &opts).unwrap();
        let mut plotted = None;
        let svg = render_svg((640, 480), |area| {
            plotted = Some(curve_fit_and_plot(&Linear, data, &opts, area, &PlotStyle::default())?);
            Ok(())
        })
        .unwrap();

        assert_eq!(plotted.unwrap(), plain);
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn plot_style_reaches_the_chart() {
        let data = FitData::new(&X, &Y, &S).unwrap();
        let style = PlotStyle {
            data_color: plotters::style::RGBColor(0x11, 0x22, 0x33),
            fit_color: plotters::style::RGBColor(0xaa, 0xbb, 0xcc),
            curve_points: 20,
        };
        let svg = render_svg((640, 480), |area| {
            curve_fit_and_plot(&Linear, data, &FitOptions::default(), area, &style).map(|_| ())
        })
        .unwrap()
        .to_ascii_uppercase();

        assert!(svg.contains("#112233"));
        assert!(svg.contains("#AABBCC"));
        assert!(!svg.contains("#3498DB"));
    }
}
