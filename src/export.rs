// src/export.rs
//
// CSV writers for run outputs. Everything goes through a BufWriter and
// solution values keep full precision, so converged fields can be diffed
// across runs.

use crate::grid::Grid;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write the whole solution field as `x,y,u` rows, row-major.
pub fn write_field_csv(grid: &Grid, filename: &Path) -> std::io::Result<()> {
    let n = grid.size();
    let h = grid.h();
    let mut f = BufWriter::new(File::create(filename)?);

    writeln!(f, "x,y,u")?;
    for i in 0..n {
        let x = i as f64 * h;
        for j in 0..n {
            let y = j as f64 * h;
            writeln!(f, "{:.6e},{:.6e},{:.16e}", x, y, grid.at(i, j))?;
        }
    }
    Ok(())
}

/// Write the centre row of the solution (fixed y at mid-height).
pub fn write_midrow_csv(grid: &Grid, filename: &Path) -> std::io::Result<()> {
    let n = grid.size();
    let h = grid.h();
    let j = n / 2;
    let mut f = BufWriter::new(File::create(filename)?);

    writeln!(f, "x,u")?;
    for i in 0..n {
        let x = i as f64 * h;
        writeln!(f, "{:.6e},{:.16e}", x, grid.at(i, j))?;
    }
    Ok(())
}

/// Write the per-sweep max |change| series, one row per iteration.
pub fn write_delta_history_csv(history: &[f64], filename: &Path) -> std::io::Result<()> {
    let mut f = BufWriter::new(File::create(filename)?);

    writeln!(f, "iteration,max_delta")?;
    for (it, d) in history.iter().enumerate() {
        writeln!(f, "{},{:.16e}", it + 1, d)?;
    }
    Ok(())
}
