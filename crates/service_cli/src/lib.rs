//! # risk-bench
//!
//! Service layer for the portfolio risk benchmark. Generates a synthetic
//! book, optionally tunes the execution environment, then times every risk
//! kernel single-threaded and multi-threaded and reports both.
//!
//! ## Architecture Compliance
//!
//! As part of the **S**ervice layer in the A-I-P-S architecture, this crate
//! only orchestrates:
//! - positions come from the Adapter layer (`adapter_positions`)
//! - environment tuning comes from the Infra layer (`infra_system`)
//! - every analytic comes from the Pricer layer (`pricer_risk`)

pub mod bench;
pub mod cli;
pub mod config;
pub mod error;
pub mod report;
pub mod runner;

pub use error::{CliError, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::bench::{run_benchmark, BenchmarkResult, Comparison, Headline, Timer, Totals};
    pub use crate::cli::{Cli, CpuSet, OutputFormat};
    pub use crate::config::{BenchConfig, ConfigError};
    pub use crate::error::{CliError, Result};
    pub use crate::report::{render_header, render_json, render_table, render_tuning};
    pub use crate::runner::{run, CrossCheck, ExposureRow, RunSummary};
}
