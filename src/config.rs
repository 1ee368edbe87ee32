use serde::Serialize;
use serde_json;
use std::fs::File;
use std::path::Path;

#[derive(Serialize)]
pub struct RunConfig {
    pub problem: ProblemConfig,
    pub numerics: NumericsConfig,
    pub run: RunInfo,
}

#[derive(Serialize)]
pub struct ProblemConfig {
    pub name: String,
    pub grid_size: usize,
    /// Node spacing, 1 / (grid_size - 1).
    pub h: f64,
}

#[derive(Serialize)]
pub struct NumericsConfig {
    pub block_size: usize,
    pub eps: f64,
    pub max_iterations: usize,
    /// None when the thread budget is swept per row (see sweep.csv).
    pub threads: Option<usize>,
}

#[derive(Serialize)]
pub struct RunInfo {
    pub binary: String,
    pub run_id: String,

    // Optional provenance (can be filled later)
    pub git_commit: Option<String>,
    pub timestamp_utc: Option<String>,
}

impl RunConfig {
    pub fn write_to_dir(&self, out_dir: &Path) -> std::io::Result<()> {
        let path = out_dir.join("config.json");
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}
