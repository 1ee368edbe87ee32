// src/error.rs

use thiserror::Error;

/// Failures surfaced before or during a relaxation run.
///
/// Running out of iterations is not an error: the solve loop reports it
/// through the stop reason in its report and leaves the last iterate on
/// the grid.
#[derive(Debug, Error)]
pub enum SolverError {
    /// The two `size` x `size` node fields could not be allocated.
    #[error("failed to allocate two {size}x{size} node fields")]
    Allocation { size: usize },

    /// A run parameter failed its precondition; nothing was computed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    /// The dedicated worker pool could not be built.
    #[error("failed to build the worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
