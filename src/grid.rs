// src/grid.rs

use crate::error::SolverError;

/// Uniform node grid over the unit square, with the solution and source
/// fields of the Dirichlet problem.
///
/// Both fields are flat row-major buffers of `size * size` nodes; node
/// (i, j) sits at physical coordinates (i*h, j*h) with spacing
/// `h = 1 / (size - 1)`. Boundary values of `u` are fixed at
/// construction, the interior starts at zero, and only the relaxation
/// kernel mutates `u` afterwards.
#[derive(Debug, Clone)]
pub struct Grid {
    size: usize,
    h: f64,
    pub(crate) u: Vec<f64>,
    pub(crate) f: Vec<f64>,
}

impl Grid {
    /// Build a grid from a boundary/source function pair.
    ///
    /// `boundary` is evaluated on edge nodes only, `source` everywhere;
    /// construction is the only place either closure runs. Fails on
    /// sizes without an interior and on allocation failure, leaving
    /// nothing partially built.
    pub fn new<B, S>(size: usize, boundary: B, source: S) -> Result<Self, SolverError>
    where
        B: Fn(f64, f64) -> f64,
        S: Fn(f64, f64) -> f64,
    {
        if size < 3 {
            return Err(SolverError::InvalidConfig(
                "grid size must be at least 3 (no interior to relax)",
            ));
        }

        let n_nodes = size
            .checked_mul(size)
            .ok_or(SolverError::Allocation { size })?;
        let mut u = try_alloc(n_nodes).ok_or(SolverError::Allocation { size })?;
        let mut f = try_alloc(n_nodes).ok_or(SolverError::Allocation { size })?;

        let h = 1.0 / (size - 1) as f64;
        for i in 0..size {
            let x = i as f64 * h;
            for j in 0..size {
                let y = j as f64 * h;
                let id = i * size + j;
                if i == 0 || j == 0 || i == size - 1 || j == size - 1 {
                    u[id] = boundary(x, y);
                }
                f[id] = source(x, y);
            }
        }

        Ok(Self { size, h, u, f })
    }

    /// Nodes per side.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Node spacing, 1 / (size - 1).
    pub fn h(&self) -> f64 {
        self.h
    }

    /// Convert (i, j) node indices to a flat index; `i` selects the row.
    #[inline]
    pub fn idx(&self, i: usize, j: usize) -> usize {
        debug_assert!(i < self.size && j < self.size);
        i * self.size + j
    }

    /// Current solution value at node (i, j).
    #[inline]
    pub fn at(&self, i: usize, j: usize) -> f64 {
        self.u[self.idx(i, j)]
    }

    /// Read-only view of the solution field (row-major).
    pub fn u(&self) -> &[f64] {
        &self.u
    }

    /// Read-only view of the source field (row-major).
    pub fn f(&self) -> &[f64] {
        &self.f
    }

    /// Split borrow for the relaxation kernel: mutable solution,
    /// shared source.
    pub(crate) fn fields_mut(&mut self) -> (&mut [f64], &[f64]) {
        (&mut self.u, &self.f)
    }
}

fn try_alloc(n_nodes: usize) -> Option<Vec<f64>> {
    let mut v: Vec<f64> = Vec::new();
    v.try_reserve_exact(n_nodes).ok()?;
    v.resize(n_nodes, 0.0);
    Some(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_indexing_is_consistent() {
        let g = Grid::new(4, |_, _| 0.0, |_, _| 0.0).unwrap();
        // Check a few indices by hand
        assert_eq!(g.idx(0, 0), 0);
        assert_eq!(g.idx(0, 1), 1);
        assert_eq!(g.idx(1, 0), 4);
        assert_eq!(g.idx(3, 2), 14); // (i=3)*4 + j=2 = 14
        assert!((g.h() - 1.0 / 3.0).abs() < 1e-15);
    }

    #[test]
    fn construction_sets_boundary_interior_and_source() {
        let n = 5;
        let g = Grid::new(n, |x, y| 2.0 * x + y, |x, y| x * y).unwrap();
        let h = g.h();
        for i in 0..n {
            for j in 0..n {
                let (x, y) = (i as f64 * h, j as f64 * h);
                let edge = i == 0 || j == 0 || i == n - 1 || j == n - 1;
                if edge {
                    assert_eq!(g.at(i, j), 2.0 * x + y, "boundary node ({i}, {j})");
                } else {
                    assert_eq!(g.at(i, j), 0.0, "interior node ({i}, {j}) must start at zero");
                }
                assert_eq!(g.f()[g.idx(i, j)], x * y, "source at ({i}, {j})");
            }
        }
    }

    #[test]
    fn sizes_without_an_interior_are_rejected() {
        for n in [0, 1, 2] {
            assert!(
                Grid::new(n, |_, _| 0.0, |_, _| 0.0).is_err(),
                "size {n} must be rejected"
            );
        }
    }
}
