//! Chart rendering.
//!
//! Every chart is drawn onto a caller-supplied Plotters drawing area, so any
//! backend works and there is no process-wide "current figure". The numeric
//! layout of each chart is computed separately from the drawing code.
//!
//! - `fit_chart`: data with error bars and the fitted curve
//! - `compare`: measurement histogram against a predicted value
//! - `ascii`: deterministic terminal rendering of a fit
//! - `svg`: in-memory SVG convenience wrapper

pub mod ascii;
pub mod compare;
pub mod fit_chart;
pub mod svg;

pub use ascii::*;
pub use compare::*;
pub use fit_chart::*;
pub use svg::*;

use crate::error::LabError;

/// `n` evenly spaced values from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n as f64 - 1.0);
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Widen `[min, max]` by `frac` of its span on each side. A degenerate range is
/// widened by half a unit so it can still be drawn.
pub(crate) fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    if span == 0.0 {
        return (min - 0.5, max + 0.5);
    }
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

pub(crate) fn render_err<E: std::fmt::Display>(err: E) -> LabError {
    LabError::Render(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linspace_hits_both_ends() {
        let v = linspace(1.0, 2.0, 5);
        assert_eq!(v, vec![1.0, 1.25, 1.5, 1.75, 2.0]);
        assert_eq!(linspace(0.0, 1.0, 100).len(), 100);
        assert_eq!(linspace(3.0, 4.0, 1), vec![3.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn pad_range_handles_degenerate_span() {
        assert_eq!(pad_range(0.0, 10.0, 0.05), (-0.5, 10.5));
        assert_eq!(pad_range(2.0, 2.0, 0.05), (1.5, 2.5));
    }
}
