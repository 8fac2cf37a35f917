//! Headless text rendering of a fit.
//!
//! The curve is evaluated once per character column and joined vertically,
//! then measurements (`o`) are stamped over it. Output depends only on the
//! inputs, so it is usable as a golden snapshot.

use crate::domain::FitData;
use crate::error::Result;
use crate::models::ModelFunction;
use crate::models::model::check_param_count;
use crate::plot::{linspace, pad_range};

/// Render measurements and the fitted curve on a `width` x `height` grid.
///
/// `params` must match `model.param_count()`, otherwise `InvalidArgument`.
pub fn render_ascii_fit<M>(data: FitData<'_>, model: &M, params: &[f64], width: usize, height: usize) -> Result<String>
where
    M: ModelFunction + ?Sized,
{
    check_param_count(model, params)?;
    let width = width.max(10);
    let height = height.max(5);

    let (x_min, x_max) = match data.x_range() {
        (lo, hi) if hi > lo => (lo, hi),
        (lo, hi) => pad_range(lo, hi, 0.0),
    };
    // One curve sample per column; `None` where the model is not finite.
    let curve: Vec<Option<f64>> = linspace(x_min, x_max, width)
        .into_iter()
        .map(|x| Some(model.eval(x, params)).filter(|y| y.is_finite()))
        .collect();

    let (y_min, y_max) = span(data.y().iter().copied().chain(curve.iter().flatten().copied())).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut canvas = Canvas::new(width, height, (x_min, x_max), (y_min, y_max));
    let mut prev_row = None;
    for (col, y) in curve.iter().enumerate() {
        prev_row = y.map(|y| {
            let row = canvas.row(y);
            canvas.join(col, prev_row.unwrap_or(row), row, '-');
            row
        });
    }
    for (&x, &y) in data.x().iter().zip(data.y()) {
        let (col, row) = (canvas.col(x), canvas.row(y));
        canvas.cells[row][col] = 'o';
    }

    let mut out = format!("Plot: x=[{x_min:.3}, {x_max:.3}] | y=[{y_min:.2}, {y_max:.2}]\n");
    for line in &canvas.cells {
        out.extend(line.iter());
        out.push('\n');
    }
    Ok(out)
}

fn span(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    (lo.is_finite() && hi.is_finite() && hi > lo).then_some((lo, hi))
}

/// Character grid with data coordinates; row 0 is the top.
struct Canvas {
    cells: Vec<Vec<char>>,
    x: (f64, f64),
    y: (f64, f64),
}

impl Canvas {
    fn new(width: usize, height: usize, x: (f64, f64), y: (f64, f64)) -> Self {
        Self {
            cells: vec![vec![' '; width]; height],
            x,
            y,
        }
    }

    fn col(&self, x: f64) -> usize {
        let last = self.cells[0].len() - 1;
        scale(x, self.x, last)
    }

    fn row(&self, y: f64) -> usize {
        let last = self.cells.len() - 1;
        last - scale(y, self.y, last)
    }

    /// Fill column `col` from just past `from` through `to`, leaving drawn cells alone.
    fn join(&mut self, col: usize, from: usize, to: usize, ch: char) {
        let rows = if from < to { from + 1..=to } else { to..=from.saturating_sub(1).max(to) };
        for row in rows {
            let cell = &mut self.cells[row][col];
            if *cell == ' ' {
                *cell = ch;
            }
        }
    }
}

/// Map `v` in `range` onto `0..=last`, clamping outside values.
fn scale(v: f64, (lo, hi): (f64, f64), last: usize) -> usize {
    let u = ((v - lo) / (hi - lo)).clamp(0.0, 1.0);
    (u * last as f64).round() as usize
}
