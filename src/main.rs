// src/main.rs
//
// This binary provides a flexible CLI for single solver runs
// (e.g. quick experiments with grid, block and thread settings).
//
// Outputs from this driver are written to `runs/` (or the directory
// specified via `out=`) and are not committed to version control.
//
// NOTE:
// The reproducible problem x thread-budget sweep is implemented as a
// dedicated executable under `src/bin/sweep.rs`.
//
// Examples:
//
//   cargo run --release -- cubic_xy n=100 block=40 eps=1e-6 threads=8
//       -> one relaxation run of the cubic registry problem, report on
//          stdout, CSV outputs under runs/.
//
//   cargo run --release -- exp_plus_square n=200 print=100 plot
//       -> larger grid with a progress line every 100 sweeps, plus a
//          heatmap PNG of the converged field.
//
// Typical outputs (per run directory):
//   runs/<run_id>/
//     ├── config.json
//     ├── field.csv
//     ├── midrow.csv
//     ├── delta_history.csv
//     └── field.png               (if `plot` is enabled)

use std::env;
use std::fs::create_dir_all;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use poisson_wavefront::config::{NumericsConfig, ProblemConfig, RunConfig, RunInfo};
use poisson_wavefront::export::{write_delta_history_csv, write_field_csv, write_midrow_csv};
use poisson_wavefront::problems::{self, Problem};
use poisson_wavefront::solver::{run_with_settings, SolverSettings, StopReason};
use poisson_wavefront::visualisation::save_field_heatmap;

fn print_usage() {
    eprintln!(
        r#"Usage:
  cargo run --release -- [PROBLEM | problem=NAME] [n=N] [block=N] [eps=VAL]
             [threads=N] [maxiters=N] [print=N] [out=DIR] [run=RUN_ID] [plot]

Problems:
  cubic_xy | quartic_x | cubic_x | exp_plus_square | cubic_y

Notes:
  - Boundary values come from the problem's analytic solution; the
    interior starts at zero.
  - `print=N` logs a progress line every N sweeps (default: silent).
  - `plot` writes a heatmap PNG of the converged field.
"#
    );
}

fn sanitize_run_id(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn default_run_id(problem: &Problem, grid_size: usize, threads: usize) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| std::time::Duration::from_secs(0));
    let ts = format!("{}{:03}", now.as_secs(), now.subsec_millis());
    format!("{}_{}_n{}_t{}", ts, problem.name, grid_size, threads)
}

fn unique_run_dir(out_root: &str, run_id: &str) -> PathBuf {
    let base = PathBuf::from(out_root);
    let mut dir = base.join(run_id);
    if !dir.exists() {
        return dir;
    }
    for k in 1..1000 {
        let cand = base.join(format!("{}_{}", run_id, k));
        if !cand.exists() {
            dir = cand;
            break;
        }
    }
    dir
}

fn main() -> std::io::Result<()> {
    let argv: Vec<String> = env::args().collect();

    let mut problem: &'static Problem = &problems::PROBLEMS[0];
    let mut grid_size: usize = 100;
    let mut plot = false;

    let mut settings = SolverSettings::default();
    let mut threads: usize = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);

    // Output controls
    let mut out_root_override: Option<String> = None;
    let mut run_id_override: Option<String> = None;

    for arg in argv.iter().skip(1) {
        if arg == "-h" || arg == "--help" || arg == "help" {
            print_usage();
            return Ok(());
        }

        if let Some(p) = problems::by_name(arg) {
            problem = p;
            continue;
        }
        if arg == "plot" {
            plot = true;
            continue;
        }

        if let Some(v) = arg.strip_prefix("problem=") {
            match problems::by_name(v) {
                Some(p) => problem = p,
                None => eprintln!(
                    "Warning: unknown problem '{v}', keeping '{}'",
                    problem.name
                ),
            }
            continue;
        }

        if let Some(v) = arg.strip_prefix("n=") {
            match v.parse::<usize>() {
                Ok(n) => grid_size = n,
                Err(_) => eprintln!("Warning: could not parse grid size '{v}', ignoring"),
            }
            continue;
        }
        if let Some(v) = arg.strip_prefix("block=") {
            match v.parse::<usize>() {
                Ok(b) => settings.block_size = b,
                Err(_) => eprintln!("Warning: could not parse block size '{v}', ignoring"),
            }
            continue;
        }
        if let Some(v) = arg.strip_prefix("eps=") {
            match v.parse::<f64>() {
                Ok(e) => settings.eps = e,
                Err(_) => eprintln!("Warning: could not parse eps '{v}', ignoring"),
            }
            continue;
        }
        if let Some(v) = arg.strip_prefix("threads=") {
            match v.parse::<usize>() {
                Ok(t) => threads = t,
                Err(_) => eprintln!("Warning: could not parse thread count '{v}', ignoring"),
            }
            continue;
        }
        if let Some(v) = arg.strip_prefix("maxiters=") {
            match v.parse::<usize>() {
                Ok(m) => settings.max_iterations = m,
                Err(_) => eprintln!("Warning: could not parse maxiters '{v}', ignoring"),
            }
            continue;
        }
        if let Some(v) = arg.strip_prefix("print=") {
            match v.parse::<usize>() {
                Ok(p) => settings.print_every = p,
                Err(_) => eprintln!("Warning: could not parse print stride '{v}', ignoring"),
            }
            continue;
        }

        if let Some(v) = arg.strip_prefix("out=") {
            out_root_override = Some(v.to_string());
            continue;
        }
        if let Some(v) = arg.strip_prefix("run=") {
            run_id_override = Some(v.to_string());
            continue;
        }

        eprintln!("Warning: ignoring unknown argument '{arg}'");
    }

    // -------- output directory setup --------
    let out_root = out_root_override.unwrap_or_else(|| "runs".to_string());
    create_dir_all(&out_root)?;

    let mut run_id =
        run_id_override.unwrap_or_else(|| default_run_id(problem, grid_size, threads));
    run_id = sanitize_run_id(&run_id);

    let run_dir = unique_run_dir(&out_root, &run_id);
    create_dir_all(&run_dir)?;

    // -------------------------------------------------
    // Write config.json
    // -------------------------------------------------
    let h = 1.0 / (grid_size.max(2) - 1) as f64;
    let run_config = RunConfig {
        problem: ProblemConfig {
            name: problem.name.to_string(),
            grid_size,
            h,
        },
        numerics: NumericsConfig {
            block_size: settings.block_size,
            eps: settings.eps,
            max_iterations: settings.max_iterations,
            threads: Some(threads),
        },
        run: RunInfo {
            binary: "poisson-wavefront".to_string(),
            run_id: run_id.clone(),
            git_commit: None,
            timestamp_utc: None,
        },
    };
    run_config.write_to_dir(&run_dir)?;

    println!("--- poisson-wavefront run config ---");
    println!("run_dir: {}", run_dir.to_string_lossy());
    println!("problem: {}", problem.name);
    println!(
        "grid:    n={} h={:.6e} (interior {}x{})",
        grid_size,
        h,
        grid_size.saturating_sub(2),
        grid_size.saturating_sub(2)
    );
    println!(
        "blocks:  size={} eps={:.3e} max_iterations={}",
        settings.block_size, settings.eps, settings.max_iterations
    );
    println!("threads: {}", threads);
    println!("-------------------------------------");

    let outcome = match run_with_settings(problem.u, problem.f, grid_size, threads, &settings) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let report = &outcome.report;
    match report.stop_reason {
        StopReason::Converged => println!(
            "converged after {} iterations (final dmax = {:.3e}) in {:.6} s",
            report.iterations,
            report.final_delta,
            outcome.elapsed.as_secs_f64()
        ),
        StopReason::MaxIterations => eprintln!(
            "WARNING: hit the iteration cap ({}) with dmax = {:.3e} > eps = {:.3e}; writing the last iterate",
            report.iterations, report.final_delta, settings.eps
        ),
    }

    // Compare against the analytic solution the boundary came from.
    let grid = &outcome.grid;
    let mut max_err = 0.0f64;
    for i in 0..grid.size() {
        let x = i as f64 * grid.h();
        for j in 0..grid.size() {
            let y = j as f64 * grid.h();
            max_err = max_err.max((grid.at(i, j) - (problem.u)(x, y)).abs());
        }
    }
    if problem.stencil_exact {
        println!("max |u - u_ref| = {:.3e} (stencil-exact problem)", max_err);
    } else {
        println!(
            "max |u - u_ref| = {:.3e} (includes O(h^2) truncation error)",
            max_err
        );
    }

    // CSV outputs
    write_field_csv(grid, &run_dir.join("field.csv"))?;
    write_midrow_csv(grid, &run_dir.join("midrow.csv"))?;
    write_delta_history_csv(&report.delta_history, &run_dir.join("delta_history.csv"))?;

    if plot {
        let fname = run_dir.join("field.png");
        match fname.to_str() {
            Some(path) => {
                if let Err(e) = save_field_heatmap(grid, path) {
                    eprintln!("Could not save heatmap: {e}");
                } else {
                    println!("Saved heatmap to {}", fname.to_string_lossy());
                }
            }
            None => eprintln!("Could not save heatmap: non-UTF-8 path"),
        }
    }

    println!("Done. Outputs in {}", run_dir.to_string_lossy());
    Ok(())
}
