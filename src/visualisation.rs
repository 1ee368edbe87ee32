// src/visualisation.rs

use crate::grid::Grid;
use plotters::prelude::*;

/// Map a solution value to a blue–white–red colour using a *local*
/// min/max, so small variations are still visible.
///
/// min maps to blue, max maps to red, midpoint to white.
fn value_to_color(v: f64, min_u: f64, max_u: f64) -> RGBColor {
    // Protect against min ≈ max (e.g. an all-zero field)
    let mut lo = min_u;
    let mut hi = max_u;
    if !lo.is_finite() || !hi.is_finite() || (hi - lo).abs() < 1e-12 {
        lo = -1.0;
        hi = 1.0;
    }

    let x = ((v - lo) / (hi - lo)).clamp(0.0, 1.0);

    // blue–white–red: x=0 -> blue, x=0.5 -> white, x=1 -> red
    let r = (255.0 * x) as u8;
    let b = (255.0 * (1.0 - x)) as u8;
    let g = (255.0 * (1.0 - (2.0 * (x - 0.5).abs()))).clamp(0.0, 255.0) as u8;

    RGBColor(r, g, b)
}

/// Save the solution field as a PNG heatmap with axes and labels.
/// - x/y axes are node indices
/// - colour encodes u (blue ≈ min, white ≈ mid, red ≈ max)
pub fn save_field_heatmap(grid: &Grid, filename: &str) -> Result<(), Box<dyn std::error::Error>> {
    let n = grid.size() as i32;

    // First pass: find min/max u over the field
    let mut min_u = f64::INFINITY;
    let mut max_u = f64::NEG_INFINITY;
    for i in 0..grid.size() {
        for j in 0..grid.size() {
            let v = grid.at(i, j);
            if v.is_finite() {
                if v < min_u {
                    min_u = v;
                }
                if v > max_u {
                    max_u = v;
                }
            }
        }
    }
    if !min_u.is_finite() || !max_u.is_finite() {
        min_u = -1.0;
        max_u = 1.0;
    }

    // Size of the output image in pixels
    let root = BitMapBackend::new(filename, (800, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(40)
        .caption(
            "u field (blue = min, white = mid, red = max)",
            ("sans-serif", 20),
        )
        .x_label_area_size(40)
        .y_label_area_size(40)
        .build_cartesian_2d(0..n, 0..n)?;

    chart
        .configure_mesh()
        .x_desc("x (node index)")
        .y_desc("y (node index)")
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    // Draw one coloured rectangle per node
    chart.draw_series((0..n).flat_map(|i| {
        (0..n).map(move |j| {
            let v = grid.at(i as usize, j as usize);
            let color = value_to_color(v, min_u, max_u);
            Rectangle::new([(i, j), (i + 1, j + 1)], color.filled())
        })
    }))?;

    Ok(())
}
