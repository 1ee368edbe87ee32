// src/wavefront.rs
//
// Anti-diagonal block schedule for the in-place relaxation sweep.
//
// The interior is tiled by nb x nb blocks and block (a, b) is assigned to
// diagonal k = a + b. A block's upper and left neighbour blocks sit on
// diagonal k - 1 and its lower and right neighbours on k + 1, so running
// the diagonals in increasing k reproduces the sequential Gauss-Seidel
// read pattern (fresh values above and to the left, previous iterate
// below and to the right) while every block of one diagonal is free to
// run in parallel.

use crate::grid::Grid;
use crate::kernel::{update_span, BlockSpan, SharedField};

use rayon::prelude::*;

/// Blocks per side needed to cover `size - 2` interior rows.
#[inline]
pub fn block_count(size: usize, block_size: usize) -> usize {
    let interior = size - 2;
    (interior + block_size - 1) / block_size
}

/// Inclusive block-row range `a_min..=a_max` of diagonal `k`; the block
/// column is `b = k - a`. Valid for `k <= 2 * (nb - 1)`.
#[inline]
fn diagonal_rows(k: usize, nb: usize) -> (usize, usize) {
    let a_min = (k + 1).saturating_sub(nb);
    let a_max = k.min(nb - 1);
    (a_min, a_max)
}

/// Run one full sweep: every block exactly once, diagonals in order,
/// blocks of one diagonal in parallel on the current rayon pool.
///
/// Returns the largest pointwise change anywhere in the sweep.
pub fn sweep(grid: &mut Grid, block_size: usize) -> f64 {
    let size = grid.size();
    let h2 = grid.h() * grid.h();
    let nb = block_count(size, block_size);

    let (u, f) = grid.fields_mut();
    let shared = SharedField::new(u);

    let mut max_delta = 0.0f64;
    for k in 0..=2 * (nb - 1) {
        let (a_min, a_max) = diagonal_rows(k, nb);

        // Completion of the parallel iterator is the barrier between
        // diagonals: no block of diagonal k + 1 starts before every
        // block of diagonal k has written its nodes.
        let diag_delta = (a_min..=a_max)
            .into_par_iter()
            .map(|a| {
                let span = BlockSpan::new(a, k - a, block_size, size);
                // SAFETY: blocks of one diagonal cover disjoint node
                // ranges, and the nodes they read outside their own span
                // belong to blocks of other diagonals, so no node is
                // written twice or read while written.
                unsafe { update_span(&shared, f, size, h2, &span) }
            })
            .reduce(|| 0.0f64, f64::max);

        max_delta = max_delta.max(diag_delta);
    }

    max_delta
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagonal_enumeration_matches_the_hand_count_for_three_blocks() {
        // 3x3 block grid: five diagonals, growing then shrinking.
        let nb = 3;
        let expect: [&[(usize, usize)]; 5] = [
            &[(0, 0)],
            &[(0, 1), (1, 0)],
            &[(0, 2), (1, 1), (2, 0)],
            &[(1, 2), (2, 1)],
            &[(2, 2)],
        ];
        for (k, want) in expect.iter().enumerate() {
            let (a_min, a_max) = diagonal_rows(k, nb);
            let got: Vec<(usize, usize)> = (a_min..=a_max).map(|a| (a, k - a)).collect();
            assert_eq!(&got[..], *want, "diagonal k = {k}");
        }
    }

    #[test]
    fn one_sweep_visits_every_interior_node_exactly_once() {
        let size = 12;
        for bs in [1usize, 3, 4, 5, 10, 40] {
            let nb = block_count(size, bs);
            let mut visits = vec![0usize; size * size];
            for k in 0..=2 * (nb - 1) {
                let (a_min, a_max) = diagonal_rows(k, nb);
                for a in a_min..=a_max {
                    let span = BlockSpan::new(a, k - a, bs, size);
                    for i in span.i0..span.i1 {
                        for j in span.j0..span.j1 {
                            visits[i * size + j] += 1;
                        }
                    }
                }
            }
            for i in 0..size {
                for j in 0..size {
                    let interior = i > 0 && j > 0 && i < size - 1 && j < size - 1;
                    assert_eq!(
                        visits[i * size + j],
                        usize::from(interior),
                        "node ({i}, {j}) at block size {bs}"
                    );
                }
            }
        }
    }

    #[test]
    fn block_count_rounds_up() {
        assert_eq!(block_count(100, 40), 3); // 98 interior rows
        assert_eq!(block_count(100, 98), 1);
        assert_eq!(block_count(100, 1000), 1);
        assert_eq!(block_count(3, 1), 1);
        assert_eq!(block_count(12, 5), 2);
    }

    #[test]
    fn single_block_sweep_matches_plain_gauss_seidel() {
        // One block covering the whole interior visits nodes in the same
        // row-major order as an unblocked sweep, so the fields must come
        // out bit-identical.
        let n = 8;
        let boundary = |x: f64, y: f64| x + 2.0 * y;
        let source = |x: f64, y: f64| 3.0 * x * y;
        let mut blocked = Grid::new(n, boundary, source).unwrap();
        let mut plain = Grid::new(n, boundary, source).unwrap();

        let h2 = plain.h() * plain.h();
        let mut want_delta = 0.0f64;
        for i in 1..n - 1 {
            for j in 1..n - 1 {
                let id = i * n + j;
                let u_old = plain.u[id];
                let u_new = 0.25
                    * (plain.u[id - n] + plain.u[id + n] + plain.u[id - 1] + plain.u[id + 1]
                        - h2 * plain.f[id]);
                plain.u[id] = u_new;
                want_delta = want_delta.max((u_old - u_new).abs());
            }
        }

        let got_delta = sweep(&mut blocked, n - 2);
        assert_eq!(blocked.u(), plain.u());
        assert_eq!(got_delta, want_delta);
    }

    #[test]
    fn sweep_of_the_zero_problem_changes_nothing() {
        let mut grid = Grid::new(9, |_, _| 0.0, |_, _| 0.0).unwrap();
        let delta = sweep(&mut grid, 3);
        assert_eq!(delta, 0.0);
        assert!(grid.u().iter().all(|&v| v == 0.0));
    }
}
