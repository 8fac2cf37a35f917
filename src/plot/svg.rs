//! Render a chart into an SVG string without touching the filesystem.

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::Result;
use crate::plot::render_err;

/// Create an in-memory SVG canvas of `size` pixels, let `draw` paint on it, and
/// return the document.
pub fn render_svg<F>(size: (u32, u32), draw: F) -> Result<String>
where
    F: FnOnce(&DrawingArea<SVGBackend<'_>, Shift>) -> Result<()>,
{
    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, size).into_drawing_area();
        draw(&root)?;
        root.present().map_err(render_err)?;
    }
    Ok(buf)
}
