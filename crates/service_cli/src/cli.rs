//! Command-line surface.
//!
//! Every sizing flag is optional so that values from a configuration file
//! or the environment survive when the flag is absent; see
//! [`BenchConfig::resolve`](crate::config::BenchConfig::resolve).

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, ValueEnum};
use infra_system::{format_cpu_list, parse_cpu_list, CpuListError};

/// Portfolio risk benchmark: single- versus multi-threaded Monte Carlo VaR,
/// Greeks and exposure aggregation.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "risk-bench")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Number of synthetic positions [default: 10000]
    #[arg(long, value_name = "N")]
    pub positions: Option<usize>,

    /// Number of Monte Carlo trials [default: 100000]
    #[arg(long, value_name = "N")]
    pub simulations: Option<usize>,

    /// Worker threads for the multi-threaded runs [default: all CPUs]
    #[arg(long, value_name = "N")]
    pub threads: Option<usize>,

    /// CPUs to bind to, e.g. `0,2-4`
    #[arg(long, value_name = "LIST")]
    pub cpus: Option<CpuSet>,

    /// Preferred NUMA node
    #[arg(long, value_name = "NODE")]
    pub numa_node: Option<usize>,

    /// Lock current and future pages in RAM
    #[arg(long)]
    pub lock_memory: bool,

    /// Request SCHED_FIFO realtime scheduling
    #[arg(long)]
    pub realtime: bool,

    /// Prefault the stack before timing
    #[arg(long)]
    pub prefault: bool,

    /// Touch and release this much heap before timing
    #[arg(long, value_name = "MB")]
    pub preallocate: Option<usize>,

    /// Shorthand for --lock-memory --prefault --preallocate 256
    #[arg(long)]
    pub isolate: bool,

    /// Print the system topology and exit
    #[arg(long)]
    pub sysinfo: bool,

    /// Seed for the synthetic book and the simulation [default: 42]
    #[arg(long)]
    pub seed: Option<u64>,

    /// VaR horizon in trading days [default: 1]
    #[arg(long, value_name = "DAYS")]
    pub horizon_days: Option<f64>,

    /// Finite-difference bump for Greeks [default: 0.01]
    #[arg(long)]
    pub bump: Option<f64>,

    /// Number of largest exposures to report [default: 10]
    #[arg(long, value_name = "K")]
    pub top: Option<usize>,

    /// Report format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Configuration file (TOML)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Report format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable console report.
    #[default]
    Table,
    /// One JSON document on stdout.
    Json,
}

/// Sorted, duplicate-free CPU indices parsed from a CPU list.
///
/// # Examples
/// ```
/// use service_cli::cli::CpuSet;
///
/// let set: CpuSet = "4,0,2-3".parse().unwrap();
/// assert_eq!(set.0, vec![0, 2, 3, 4]);
/// assert_eq!(set.to_string(), "0,2-4");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CpuSet(pub Vec<usize>);

impl FromStr for CpuSet {
    type Err = CpuListError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_cpu_list(s).map(CpuSet)
    }
}

impl std::fmt::Display for CpuSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format_cpu_list(&self.0))
    }
}
