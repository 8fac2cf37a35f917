//! Compare a set of repeated measurements with a predicted value.
//!
//! The chart shows:
//! - a density-normalized histogram of the measurements
//! - the normal density with the sample's mean and spread
//! - the prediction as a point with a horizontal error bar, placed at the
//!   height of the sample density at the sample mean
//! - the sample mean at the curve's peak with a standard-error bar
//!
//! The theory marker's height is deliberately the density at the *sample* mean,
//! so both markers sit near the top of the curve and read as two intervals on
//! the same x axis.

use plotters::coord::Shift;
use plotters::prelude::*;
use serde::Serialize;

use crate::error::{LabError, Result};
use crate::plot::{linspace, pad_range, render_err};
use crate::stats::{gaussian_density, gaussian_density_many, mean, population_std_dev};

/// Histogram bin count, matching the lab's plotting defaults.
pub const HISTOGRAM_BINS: usize = 10;

/// Points used for the overlaid normal density.
pub const DENSITY_CURVE_POINTS: usize = 100;

/// One histogram bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub left: f64,
    pub right: f64,
    pub count: usize,
    /// `count / (n * width)`, so the bars integrate to one.
    pub density: f64,
}

/// A point with a symmetric horizontal error bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ErrorMarker {
    pub x: f64,
    pub y: f64,
    pub x_err: f64,
}

/// Everything needed to draw the comparison, in data coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonLayout {
    pub mean: f64,
    pub std: f64,
    /// Standard error of the mean.
    pub sem: f64,
    pub bins: Vec<HistogramBin>,
    pub curve: Vec<(f64, f64)>,
    pub theory: ErrorMarker,
    pub sample_mean: ErrorMarker,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
}

/// Equal-width density histogram over `[min, max]`; the last bin is closed.
pub fn density_histogram(values: &[f64], bins: usize) -> Result<Vec<HistogramBin>> {
    if bins == 0 {
        return Err(LabError::invalid("histogram needs at least one bin"));
    }
    if values.is_empty() {
        return Err(LabError::InsufficientData {
            what: "histogram",
            needed: 1,
            got: 0,
        });
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(LabError::invalid("histogram values must be finite"));
    }

    let (lo, hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let (lo, hi) = if hi > lo { (lo, hi) } else { (lo - 0.5, hi + 0.5) };
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    let n = values.len() as f64;
    Ok(counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            left: lo + width * i as f64,
            right: if i == bins - 1 { hi } else { lo + width * (i + 1) as f64 },
            count,
            density: count as f64 / (n * width),
        })
        .collect())
}

/// Compute the comparison chart geometry.
pub fn comparison_layout(
    measurements: &[f64],
    theory_value: f64,
    theory_uncertainty: f64,
) -> Result<ComparisonLayout> {
    let std = population_std_dev(measurements)?;
    let mean = mean(measurements)?;
    if std == 0.0 {
        return Err(LabError::invalid("measurements have zero spread"));
    }
    if !theory_value.is_finite() {
        return Err(LabError::invalid(format!("theory value must be finite, got {theory_value}")));
    }
    if !(theory_uncertainty.is_finite() && theory_uncertainty >= 0.0) {
        return Err(LabError::invalid(format!(
            "theory uncertainty must be finite and >= 0, got {theory_uncertainty}"
        )));
    }

    let sem = std / (measurements.len() as f64).sqrt();
    let bins = density_histogram(measurements, HISTOGRAM_BINS)?;

    let theory = ErrorMarker {
        x: theory_value,
        y: gaussian_density(mean, mean, std)?,
        x_err: theory_uncertainty,
    };

    let lo = bins[0].left.min(theory_value - theory_uncertainty).min(mean - sem);
    let hi = bins[bins.len() - 1].right.max(theory_value + theory_uncertainty).max(mean + sem);
    let (x_lo, x_hi) = pad_range(lo, hi, 0.05);

    let xs = linspace(x_lo, x_hi, DENSITY_CURVE_POINTS);
    let ys = gaussian_density_many(&xs, mean, std)?;
    let peak = ys.iter().copied().fold(0.0, f64::max);
    let curve: Vec<(f64, f64)> = xs.into_iter().zip(ys).collect();

    let sample_mean = ErrorMarker {
        x: mean,
        y: peak,
        x_err: sem,
    };

    let tallest_bar = bins.iter().map(|b| b.density).fold(0.0, f64::max);
    let y_hi = tallest_bar.max(peak).max(theory.y) * 1.05;

    Ok(ComparisonLayout {
        mean,
        std,
        sem,
        bins,
        curve,
        theory,
        sample_mean,
        x_range: (x_lo, x_hi),
        y_range: (0.0, y_hi),
    })
}

/// Draw the measurement histogram against the predicted value onto `area`.
///
/// Needs at least two measurements with nonzero spread.
pub fn compare_distribution_to_prediction<DB>(
    area: &DrawingArea<DB, Shift>,
    measurements: &[f64],
    theory_value: f64,
    theory_uncertainty: f64,
) -> Result<()>
where
    DB: DrawingBackend,
{
    let layout = comparison_layout(measurements, theory_value, theory_uncertainty)?;
    draw_comparison(area, &layout)
}

/// Draw a precomputed comparison layout.
pub fn draw_comparison<DB>(area: &DrawingArea<DB, Shift>, layout: &ComparisonLayout) -> Result<()>
where
    DB: DrawingBackend,
{
    let (x0, x1) = layout.x_range;
    let (y0, y1) = layout.y_range;

    area.fill(&WHITE).map_err(render_err)?;

    let mut chart = ChartBuilder::on(area)
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(render_err)?;

    chart.configure_mesh().draw().map_err(render_err)?;

    let bar_color = BLUE.mix(0.5);
    chart
        .draw_series(
            layout
                .bins
                .iter()
                .map(|b| Rectangle::new([(b.left, 0.0), (b.right, b.density)], bar_color.filled())),
        )
        .map_err(render_err)?
        .label("data")
        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], bar_color.filled()));

    // Prediction.
    let t = layout.theory;
    chart
        .draw_series(std::iter::once(ErrorBar::new_horizontal(
            t.y,
            t.x - t.x_err,
            t.x,
            t.x + t.x_err,
            RED.stroke_width(2),
            16,
        )))
        .map_err(render_err)?;
    chart
        .draw_series(std::iter::once(Circle::new((t.x, t.y), 6, RED.filled())))
        .map_err(render_err)?
        .label("prediction")
        .legend(|(x, y)| Circle::new((x + 8, y), 4, RED.filled()));

    // Normal approximation to the measurements.
    let curve_color = BLACK.mix(0.75);
    chart
        .draw_series(LineSeries::new(layout.curve.iter().copied(), curve_color.stroke_width(2)))
        .map_err(render_err)?
        .label("distribution of data")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], curve_color.stroke_width(2)));

    // Sample mean with its standard error.
    let m = layout.sample_mean;
    chart
        .draw_series(std::iter::once(ErrorBar::new_horizontal(
            m.y,
            m.x - m.x_err,
            m.x,
            m.x + m.x_err,
            BLACK.stroke_width(2),
            16,
        )))
        .map_err(render_err)?;
    chart
        .draw_series(std::iter::once(Circle::new((m.x, m.y), 6, BLACK.filled())))
        .map_err(render_err)?;

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(render_err)?;

    Ok(())
}
