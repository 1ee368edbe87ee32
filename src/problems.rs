// src/problems.rs
//
// Named boundary/source pairs for exercising the solver.
//
// Every entry is a manufactured solution: `u` is an analytic function
// whose edge restriction supplies the Dirichlet data and whose Laplacian
// supplies the source term, so the converged field can be checked against
// `u` itself. For solutions with vanishing fourth derivatives the
// five-point stencil is exact and the discrete solution matches `u` to
// the stop tolerance; the quartic and exponential entries carry the usual
// O(h^2) truncation error on top.

/// A boundary/source pair together with its analytic solution; `u`
/// doubles as the expected field over the whole domain.
#[derive(Clone, Copy)]
pub struct Problem {
    pub name: &'static str,
    pub u: fn(f64, f64) -> f64,
    pub f: fn(f64, f64) -> f64,
    /// Whether the five-point stencil reproduces `u` without truncation
    /// error (all fourth derivatives vanish).
    pub stencil_exact: bool,
}

fn u_cubic_xy(x: f64, y: f64) -> f64 {
    3000.0 * x.powi(3) + 2000.0 * y.powi(3)
}
fn f_cubic_xy(x: f64, y: f64) -> f64 {
    18000.0 * x + 12000.0 * y
}

fn u_quartic_x(x: f64, y: f64) -> f64 {
    2.0 * x.powi(4) + x.powi(3) + y * y + 6.0
}
fn f_quartic_x(x: f64, _y: f64) -> f64 {
    24.0 * x * x + 6.0 * x + 2.0
}

fn u_cubic_x(x: f64, y: f64) -> f64 {
    7.0 * x * x - 10.0 * x.powi(3) + x + y - 1.0
}
fn f_cubic_x(x: f64, _y: f64) -> f64 {
    14.0 - 60.0 * x
}

fn u_exp_plus_square(x: f64, y: f64) -> f64 {
    (x + 2.0 * y).exp() + x * x
}
fn f_exp_plus_square(x: f64, y: f64) -> f64 {
    5.0 * (x + 2.0 * y).exp() + 2.0
}

fn u_cubic_y(x: f64, y: f64) -> f64 {
    x * x + y.powi(3) + 1.0
}
fn f_cubic_y(_x: f64, y: f64) -> f64 {
    6.0 * y + 2.0
}

pub static PROBLEMS: [Problem; 5] = [
    Problem {
        name: "cubic_xy",
        u: u_cubic_xy,
        f: f_cubic_xy,
        stencil_exact: true,
    },
    Problem {
        name: "quartic_x",
        u: u_quartic_x,
        f: f_quartic_x,
        stencil_exact: false,
    },
    Problem {
        name: "cubic_x",
        u: u_cubic_x,
        f: f_cubic_x,
        stencil_exact: true,
    },
    Problem {
        name: "exp_plus_square",
        u: u_exp_plus_square,
        f: f_exp_plus_square,
        stencil_exact: false,
    },
    Problem {
        name: "cubic_y",
        u: u_cubic_y,
        f: f_cubic_y,
        stencil_exact: true,
    },
];

/// Look up a registry entry by name.
pub fn by_name(name: &str) -> Option<&'static Problem> {
    PROBLEMS.iter().find(|p| p.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Central-difference Laplacian with a small step.
    fn laplacian(u: fn(f64, f64) -> f64, x: f64, y: f64, h: f64) -> f64 {
        (u(x - h, y) + u(x + h, y) + u(x, y - h) + u(x, y + h) - 4.0 * u(x, y)) / (h * h)
    }

    #[test]
    fn every_source_is_the_laplacian_of_its_solution() {
        let h = 1e-3;
        for p in &PROBLEMS {
            for (x, y) in [(0.3, 0.7), (0.5, 0.5), (0.9, 0.1)] {
                let numeric = laplacian(p.u, x, y, h);
                let want = (p.f)(x, y);
                let tol = 1e-3 * want.abs().max(1.0);
                assert!(
                    (numeric - want).abs() <= tol,
                    "{}: Laplacian mismatch at ({x}, {y}): numeric {numeric}, source {want}",
                    p.name
                );
            }
        }
    }

    #[test]
    fn lookup_finds_every_entry() {
        for p in &PROBLEMS {
            assert!(by_name(p.name).is_some(), "{} missing", p.name);
        }
        assert!(by_name("no_such_problem").is_none());
    }
}
