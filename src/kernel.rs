// src/kernel.rs
//
// Gauss-Seidel relaxation of one rectangular block of interior nodes.
//
// The update is in place: a node reads whatever its four neighbours hold
// right now, which is the fresh value for neighbours already visited this
// sweep and the previous iterate otherwise. That mixed-recency read is
// what makes the visit order matter; the wavefront scheduler guarantees a
// block only runs once the blocks above and to its left are done.

use crate::grid::Grid;

/// Half-open interior node ranges covered by block (a, b).
///
/// Block rows span `[1 + a*bs, min(1 + (a+1)*bs, size-1))`, columns the
/// same in `b`, so edge blocks are clamped and the block set tiles the
/// interior exactly. Boundary nodes are never inside a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSpan {
    pub i0: usize,
    pub i1: usize,
    pub j0: usize,
    pub j1: usize,
}

impl BlockSpan {
    pub fn new(a: usize, b: usize, block_size: usize, size: usize) -> Self {
        let i0 = (1 + a * block_size).min(size - 1);
        let i1 = (i0 + block_size).min(size - 1);
        let j0 = (1 + b * block_size).min(size - 1);
        let j1 = (j0 + block_size).min(size - 1);
        Self { i0, i1, j0, j1 }
    }

    pub fn is_empty(&self) -> bool {
        self.i0 >= self.i1 || self.j0 >= self.j1
    }

    /// Interior nodes in the span.
    pub fn n_nodes(&self) -> usize {
        (self.i1 - self.i0) * (self.j1 - self.j0)
    }
}

/// Relax block (a, b) once, in place, and return the largest absolute
/// change over the block (0.0 for an empty span).
pub fn update_block(grid: &mut Grid, a: usize, b: usize, block_size: usize) -> f64 {
    let size = grid.size();
    let h2 = grid.h() * grid.h();
    let span = BlockSpan::new(a, b, block_size, size);
    let (u, f) = grid.fields_mut();
    let shared = SharedField::new(u);
    // SAFETY: `u` is exclusively borrowed here, nothing else can touch it.
    unsafe { update_span(&shared, f, size, h2, &span) }
}

/// Solution-field handle shared by the blocks of one anti-diagonal.
///
/// Blocks on the same diagonal cover disjoint node ranges and their four
/// neighbour blocks all lie on adjacent diagonals, so concurrent
/// [`update_span`] calls through one handle never read or write a node
/// that another call writes.
pub(crate) struct SharedField {
    u: *mut f64,
}

unsafe impl Send for SharedField {}
unsafe impl Sync for SharedField {}

impl SharedField {
    pub(crate) fn new(u: &mut [f64]) -> Self {
        Self { u: u.as_mut_ptr() }
    }
}

/// Five-point stencil pass over `span`, writing through `shared`.
///
/// Row-major visit order inside the block; returns the block's largest
/// absolute change.
///
/// # Safety
///
/// While this runs, no other thread may write any node of `span` or any
/// node a span node reads (the four direct neighbours of the span), and
/// `shared` must point at a live `size * size` field.
pub(crate) unsafe fn update_span(
    shared: &SharedField,
    f: &[f64],
    size: usize,
    h2: f64,
    span: &BlockSpan,
) -> f64 {
    let u = shared.u;
    let mut max_delta = 0.0f64;

    for i in span.i0..span.i1 {
        let row = i * size;
        for j in span.j0..span.j1 {
            let id = row + j;
            let u_old = *u.add(id);
            let u_new = 0.25
                * (*u.add(id - size) + *u.add(id + size) + *u.add(id - 1) + *u.add(id + 1)
                    - h2 * f[id]);
            *u.add(id) = u_new;
            max_delta = max_delta.max((u_old - u_new).abs());
        }
    }

    max_delta
}
