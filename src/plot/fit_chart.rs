//! Diagnostic chart for a curve fit: measurements with vertical error bars and
//! the best-fit curve sampled across the measured x range.

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::domain::{CurveFit, FitData};
use crate::error::Result;
use crate::models::ModelFunction;
use crate::models::model::check_param_count;
use crate::plot::{linspace, pad_range, render_err};

/// Colors and sampling for the fit chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotStyle {
    pub data_color: RGBColor,
    pub fit_color: RGBColor,
    /// Number of points used to draw the fitted curve.
    pub curve_points: usize,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            data_color: RGBColor(0x34, 0x98, 0xdb),
            fit_color: RGBColor(0xf2, 0x63, 0x63),
            curve_points: 100,
        }
    }
}

/// Points of the fitted curve over the measured x range.
pub fn fit_curve_points<M>(model: &M, data: FitData<'_>, params: &[f64], n: usize) -> Result<Vec<(f64, f64)>>
where
    M: ModelFunction + ?Sized,
{
    check_param_count(model, params)?;
    let (x_min, x_max) = data.x_range();
    Ok(linspace(x_min, x_max, n)
        .into_iter()
        .map(|x| (x, model.eval(x, params)))
        .collect())
}

/// Draw measurements, error bars and the fitted curve onto `area`.
///
/// `fit` must come from `model`; a parameter count mismatch is `InvalidArgument`.
pub fn draw_fit<DB, M>(
    area: &DrawingArea<DB, Shift>,
    model: &M,
    data: FitData<'_>,
    fit: &CurveFit,
    style: &PlotStyle,
) -> Result<()>
where
    DB: DrawingBackend,
    M: ModelFunction + ?Sized,
{
    let curve = fit_curve_points(model, data, fit.params(), style.curve_points.max(2))?;

    let (x_min, x_max) = data.x_range();
    let (x0, x1) = pad_range(x_min, x_max, 0.05);

    let (mut y_lo, mut y_hi) = (f64::INFINITY, f64::NEG_INFINITY);
    for (&y, &s) in data.y().iter().zip(data.sigma()) {
        y_lo = y_lo.min(y - s);
        y_hi = y_hi.max(y + s);
    }
    // Curve values may be non-finite outside the model's domain; skip them.
    for &(_, c) in curve.iter().filter(|(_, c)| c.is_finite()) {
        y_lo = y_lo.min(c);
        y_hi = y_hi.max(c);
    }
    let (y0, y1) = pad_range(y_lo, y_hi, 0.05);

    area.fill(&WHITE).map_err(render_err)?;

    let mut builder = ChartBuilder::on(area);
    builder
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(60);
    if let Some(title) = &fit.labels.title {
        builder.caption(title, ("sans-serif", 20));
    }
    let mut chart = builder.build_cartesian_2d(x0..x1, y0..y1).map_err(render_err)?;

    chart
        .configure_mesh()
        .x_desc(fit.labels.x_label.as_deref().unwrap_or(""))
        .y_desc(fit.labels.y_label.as_deref().unwrap_or(""))
        .axis_desc_style(("sans-serif", 12).into_font().style(FontStyle::Bold))
        .light_line_style(RGBColor(128, 128, 128).mix(0.35))
        .draw()
        .map_err(render_err)?;

    let data_color = style.data_color;
    let fit_color = style.fit_color;

    // 1) Measurements with vertical error bars.
    chart
        .draw_series(
            data.x()
                .iter()
                .zip(data.y())
                .zip(data.sigma())
                .map(|((&x, &y), &s)| ErrorBar::new_vertical(x, y - s, y, y + s, data_color.filled(), 6)),
        )
        .map_err(render_err)?
        .label("Data")
        .legend(move |(x, y)| Circle::new((x, y), 3, data_color.filled()));

    // 2) Best-fit curve.
    chart
        .draw_series(LineSeries::new(
            curve.iter().copied().filter(|(_, y)| y.is_finite()),
            fit_color.stroke_width(2),
        ))
        .map_err(render_err)?
        .label("Best Fit")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], fit_color.stroke_width(2)));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(render_err)?;

    Ok(())
}
