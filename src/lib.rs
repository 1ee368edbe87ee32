// src/lib.rs

pub mod config;
pub mod error;
pub mod export;
pub mod grid;
pub mod kernel;
pub mod problems;
pub mod solver;
pub mod visualisation;
pub mod wavefront;
