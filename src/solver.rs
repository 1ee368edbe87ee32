// src/solver.rs
//
// Convergence controller and run entry points.
//
// One outer iteration is one full wavefront sweep. The controller repeats
// sweeps until the largest pointwise change falls to `eps`, with a hard
// iteration cap so a divergent or too-tight configuration terminates with
// a report instead of spinning.

use crate::error::SolverError;
use crate::grid::Grid;
use crate::wavefront::sweep;

use std::time::{Duration, Instant};

/// Why the solve loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The per-sweep max |change| fell to the tolerance.
    Converged,
    /// The iteration cap hit first; the grid holds the last iterate.
    MaxIterations,
}

#[derive(Debug, Clone)]
pub struct SolverSettings {
    /// Interior tile side in nodes; edge blocks are clamped.
    pub block_size: usize,
    /// Stop once a full sweep changes no node by more than this.
    pub eps: f64,
    /// Hard cap on sweeps.
    pub max_iterations: usize,
    /// Print a progress line every N sweeps (0 disables).
    pub print_every: usize,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            block_size: 40,
            eps: 1e-6,
            max_iterations: 100_000,
            print_every: 0,
        }
    }
}

impl SolverSettings {
    /// Reject parameters the solve loop must not run with.
    pub fn validate(&self) -> Result<(), SolverError> {
        if self.block_size == 0 {
            return Err(SolverError::InvalidConfig("block size must be positive"));
        }
        if !self.eps.is_finite() || self.eps <= 0.0 {
            return Err(SolverError::InvalidConfig(
                "eps must be finite and positive",
            ));
        }
        if self.max_iterations == 0 {
            return Err(SolverError::InvalidConfig(
                "max iterations must be positive",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct SolveReport {
    /// Completed sweeps; at least 1, since the stop test needs a delta.
    pub iterations: usize,
    /// Max |change| of the last sweep.
    pub final_delta: f64,
    pub stop_reason: StopReason,
    /// Max |change| of every sweep, in order.
    pub delta_history: Vec<f64>,
}

impl SolveReport {
    pub fn converged(&self) -> bool {
        self.stop_reason == StopReason::Converged
    }
}

/// Relax `grid` to convergence (or the cap) on the current rayon pool.
pub fn solve(grid: &mut Grid, settings: &SolverSettings) -> Result<SolveReport, SolverError> {
    settings.validate()?;

    let mut delta_history = Vec::new();
    loop {
        let max_delta = sweep(grid, settings.block_size);
        delta_history.push(max_delta);
        let it = delta_history.len();

        if settings.print_every > 0 && it % settings.print_every == 0 {
            println!("[solve] it={it:6}  dmax={max_delta:.3e}");
        }

        let stop_reason = if max_delta <= settings.eps {
            StopReason::Converged
        } else if it >= settings.max_iterations {
            StopReason::MaxIterations
        } else {
            continue;
        };

        return Ok(SolveReport {
            iterations: it,
            final_delta: max_delta,
            stop_reason,
            delta_history,
        });
    }
}

/// Outcome of a full run: the converged (or last) field plus the solve
/// report and the wall time of the relaxation loop alone.
#[derive(Debug)]
pub struct RunOutcome {
    pub grid: Grid,
    pub report: SolveReport,
    pub elapsed: Duration,
}

/// Build a grid from the boundary/source pair and relax it on a dedicated
/// pool of `threads` workers, with default cap and no progress output.
pub fn run<B, S>(
    boundary: B,
    source: S,
    grid_size: usize,
    block_size: usize,
    eps: f64,
    threads: usize,
) -> Result<RunOutcome, SolverError>
where
    B: Fn(f64, f64) -> f64,
    S: Fn(f64, f64) -> f64,
{
    let settings = SolverSettings {
        block_size,
        eps,
        ..SolverSettings::default()
    };
    run_with_settings(boundary, source, grid_size, threads, &settings)
}

/// As [`run`], with full control over the cap and progress printing.
///
/// All parameters are checked before the grid is allocated.
pub fn run_with_settings<B, S>(
    boundary: B,
    source: S,
    grid_size: usize,
    threads: usize,
    settings: &SolverSettings,
) -> Result<RunOutcome, SolverError>
where
    B: Fn(f64, f64) -> f64,
    S: Fn(f64, f64) -> f64,
{
    settings.validate()?;
    if grid_size < 3 {
        return Err(SolverError::InvalidConfig(
            "grid size must be at least 3 (no interior to relax)",
        ));
    }
    if threads == 0 {
        return Err(SolverError::InvalidConfig("thread budget must be positive"));
    }

    let mut grid = Grid::new(grid_size, boundary, source)?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()?;

    let start = Instant::now();
    let report = pool.install(|| solve(&mut grid, settings))?;
    let elapsed = start.elapsed();

    Ok(RunOutcome {
        grid,
        report,
        elapsed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_problem_stops_after_one_sweep() {
        let mut grid = Grid::new(7, |_, _| 0.0, |_, _| 0.0).unwrap();
        let report = solve(&mut grid, &SolverSettings::default()).unwrap();
        assert_eq!(report.iterations, 1);
        assert_eq!(report.final_delta, 0.0);
        assert_eq!(report.stop_reason, StopReason::Converged);
        assert_eq!(report.delta_history, vec![0.0]);
    }

    #[test]
    fn bad_settings_are_rejected_before_any_work() {
        let cases: [SolverSettings; 4] = [
            SolverSettings {
                block_size: 0,
                ..SolverSettings::default()
            },
            SolverSettings {
                eps: 0.0,
                ..SolverSettings::default()
            },
            SolverSettings {
                eps: f64::NAN,
                ..SolverSettings::default()
            },
            SolverSettings {
                max_iterations: 0,
                ..SolverSettings::default()
            },
        ];
        for settings in cases {
            let err = run_with_settings(|_, _| 0.0, |_, _| 0.0, 10, 1, &settings);
            assert!(
                matches!(err, Err(SolverError::InvalidConfig(_))),
                "settings {settings:?} must be rejected"
            );
        }

        let defaults = SolverSettings::default();
        assert!(matches!(
            run_with_settings(|_, _| 0.0, |_, _| 0.0, 2, 1, &defaults),
            Err(SolverError::InvalidConfig(_))
        ));
        assert!(matches!(
            run_with_settings(|_, _| 0.0, |_, _| 0.0, 10, 0, &defaults),
            Err(SolverError::InvalidConfig(_))
        ));
    }

    #[test]
    fn iteration_cap_stops_a_loop_that_cannot_converge() {
        let settings = SolverSettings {
            eps: 1e-300,
            max_iterations: 4,
            ..SolverSettings::default()
        };
        let outcome =
            run_with_settings(|x, y| x * x + y * y, |_, _| 4.0, 20, 2, &settings).unwrap();
        assert_eq!(outcome.report.iterations, 4);
        assert_eq!(outcome.report.stop_reason, StopReason::MaxIterations);
        assert!(!outcome.report.converged());
        assert_eq!(outcome.report.delta_history.len(), 4);
    }
}
