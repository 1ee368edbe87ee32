// src/bin/sweep.rs
//
// Reference sweep: every registry problem at every thread budget, with
// one shared set of numerics, so timings and iteration counts can be
// compared across machines.
//
// Outputs: out/sweep/...

use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use poisson_wavefront::config::{NumericsConfig, ProblemConfig, RunConfig, RunInfo};
use poisson_wavefront::problems::PROBLEMS;
use poisson_wavefront::solver::{run, SolverSettings, StopReason};

fn main() -> std::io::Result<()> {
    // --- shared numerics for every combination ---
    let grid_size: usize = 100;
    let block_size: usize = 40;
    let eps: f64 = 1e-6;
    let thread_budgets: [usize; 3] = [1, 4, 8];
    // ---------------------------------------------

    let out_dir = Path::new("out").join("sweep");
    create_dir_all(&out_dir)?;

    let run_config = RunConfig {
        problem: ProblemConfig {
            name: "all".to_string(),
            grid_size,
            h: 1.0 / (grid_size - 1) as f64,
        },
        numerics: NumericsConfig {
            block_size,
            eps,
            max_iterations: SolverSettings::default().max_iterations,
            threads: None, // swept, see sweep.csv
        },
        run: RunInfo {
            binary: "sweep".to_string(),
            run_id: "sweep".to_string(),
            git_commit: None,
            timestamp_utc: None,
        },
    };
    run_config.write_to_dir(&out_dir)?;

    let file = File::create(out_dir.join("sweep.csv"))?;
    let mut w = BufWriter::new(file);
    writeln!(w, "problem,threads,iterations,converged,final_delta,seconds")?;

    println!(
        "n={} block={} eps={:.1e}, threads {:?}",
        grid_size, block_size, eps, thread_budgets
    );

    for p in PROBLEMS.iter() {
        for &threads in thread_budgets.iter() {
            match run(p.u, p.f, grid_size, block_size, eps, threads) {
                Ok(outcome) => {
                    let report = &outcome.report;
                    let seconds = outcome.elapsed.as_secs_f64();
                    let converged = report.stop_reason == StopReason::Converged;
                    println!(
                        "problem {:<16} threads {}  iterations {:6}  time {:.6} s{}",
                        p.name,
                        threads,
                        report.iterations,
                        seconds,
                        if converged { "" } else { "  [hit iteration cap]" }
                    );
                    writeln!(
                        w,
                        "{},{},{},{},{:.16e},{:.6e}",
                        p.name,
                        threads,
                        report.iterations,
                        u8::from(converged),
                        report.final_delta,
                        seconds
                    )?;
                }
                Err(e) => {
                    eprintln!("problem {} threads {}: {e}", p.name, threads);
                }
            }
        }
    }

    println!("Done. Outputs in {}", out_dir.to_string_lossy());
    Ok(())
}
