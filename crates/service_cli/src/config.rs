//! Benchmark configuration.
//!
//! Values resolve in layers: built-in defaults, an optional TOML file, the
//! `RISK_BENCH_*` environment variables, then command-line flags.

use std::path::Path;

use infra_system::SystemConfig;
use pricer_risk::{SimulationConfig, VarConfigError, WorkPartitioner};
use serde::{Deserialize, Serialize};

use crate::cli::{Cli, OutputFormat};

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Resolved benchmark settings.
///
/// # Examples
/// ```
/// use service_cli::config::BenchConfig;
///
/// let config: BenchConfig = toml::from_str("positions = 500\n[system]\nprefault = true").unwrap();
/// assert_eq!(config.positions, 500);
/// assert_eq!(config.simulations, 100_000);
/// assert!(config.system.prefault);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BenchConfig {
    /// Synthetic positions to generate.
    pub positions: usize,
    /// Monte Carlo trials.
    pub simulations: usize,
    /// Worker threads for the multi-threaded runs.
    pub threads: usize,
    /// Seed for the book and the simulation.
    pub seed: u64,
    /// VaR horizon in trading days.
    pub horizon_days: f64,
    /// Finite-difference bump for Greeks.
    pub bump: f64,
    /// Largest exposures to report.
    pub top: usize,
    /// Report format.
    pub format: OutputFormat,
    /// Default log level when `RUST_LOG` is unset.
    pub log_level: String,
    /// Environment tuning to apply before timing.
    pub system: SystemConfig,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            positions: 10_000,
            simulations: 100_000,
            threads: num_cpus::get(),
            seed: 42,
            horizon_days: 1.0,
            bump: 0.01,
            top: 10,
            format: OutputFormat::Table,
            log_level: "info".to_string(),
            system: SystemConfig::default(),
        }
    }
}

impl BenchConfig {
    /// Load configuration from a TOML file; missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply `RISK_BENCH_*` overrides from the process environment.
    pub fn with_env_override(self) -> Result<Self, ConfigError> {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    /// Apply `RISK_BENCH_*` overrides read through `lookup`.
    ///
    /// Unparseable values are errors rather than being ignored.
    pub fn with_env_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut errors = Vec::new();

        env_number(&lookup, "RISK_BENCH_POSITIONS", &mut self.positions, &mut errors);
        env_number(&lookup, "RISK_BENCH_SIMULATIONS", &mut self.simulations, &mut errors);
        env_number(&lookup, "RISK_BENCH_THREADS", &mut self.threads, &mut errors);
        env_number(&lookup, "RISK_BENCH_SEED", &mut self.seed, &mut errors);

        if let Some(level) = lookup("RISK_BENCH_LOG_LEVEL") {
            self.log_level = level;
        }

        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Apply command-line flags, which take precedence over everything else.
    pub fn with_cli(mut self, cli: &Cli) -> Self {
        if let Some(positions) = cli.positions {
            self.positions = positions;
        }
        if let Some(simulations) = cli.simulations {
            self.simulations = simulations;
        }
        if let Some(threads) = cli.threads {
            self.threads = threads;
        }
        if let Some(seed) = cli.seed {
            self.seed = seed;
        }
        if let Some(days) = cli.horizon_days {
            self.horizon_days = days;
        }
        if let Some(bump) = cli.bump {
            self.bump = bump;
        }
        if let Some(top) = cli.top {
            self.top = top;
        }
        if let Some(format) = cli.format {
            self.format = format;
        }
        if cli.verbose {
            self.log_level = "debug".to_string();
        }

        if let Some(cpus) = &cli.cpus {
            self.system.cpu_affinity = cpus.0.clone();
        }
        if let Some(node) = cli.numa_node {
            self.system.numa_node = Some(node);
        }
        self.system.lock_memory |= cli.lock_memory;
        self.system.realtime |= cli.realtime;
        self.system.prefault |= cli.prefault;
        if let Some(mb) = cli.preallocate {
            self.system.preallocate_mb = mb;
        }
        // After --preallocate so an explicit size wins
        if cli.isolate {
            self.system = std::mem::take(&mut self.system).isolate();
        }
        self
    }

    /// Validate every field, reporting all problems at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.positions == 0 {
            errors.push("positions must be greater than 0".to_string());
        }
        if self.simulations == 0 {
            errors.push("simulations must be greater than 0".to_string());
        }
        if self.threads == 0 {
            errors.push("threads must be greater than 0".to_string());
        }
        if !(self.horizon_days.is_finite() && self.horizon_days > 0.0) {
            errors.push(format!(
                "horizon_days must be a positive number, got {}",
                self.horizon_days
            ));
        }
        if !(self.bump.is_finite() && self.bump > 0.0) {
            errors.push(format!("bump must be a positive number, got {}", self.bump));
        }

        if !VALID_LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            errors.push(format!(
                "Invalid log_level '{}'. Valid values: {:?}",
                self.log_level, VALID_LOG_LEVELS
            ));
        }

        if self.system.realtime && !(1..=99).contains(&self.system.realtime_priority) {
            errors.push(format!(
                "realtime_priority {} is outside the SCHED_FIFO range 1-99",
                self.system.realtime_priority
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Resolve the full configuration for one invocation and validate it.
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let base = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        let config = base.with_env_override()?.with_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// Simulation parameters for the Monte Carlo kernel.
    pub fn simulation_config(&self) -> Result<SimulationConfig, VarConfigError> {
        SimulationConfig::builder()
            .num_trials(self.simulations)
            .horizon_days(self.horizon_days)
            .seed(self.seed)
            .build()
    }

    /// Partitioner for the multi-threaded runs.
    pub fn partitioner(&self) -> Result<WorkPartitioner, pricer_risk::ParallelError> {
        WorkPartitioner::new(self.threads)
    }
}

fn env_number<F, T>(lookup: &F, key: &str, slot: &mut T, errors: &mut Vec<String>)
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    if let Some(raw) = lookup(key) {
        match raw.trim().parse() {
            Ok(value) => *slot = value,
            Err(_) => errors.push(format!("{key}='{raw}' is not a valid number")),
        }
    }
}

/// Configuration error type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("IO error: {0}")]
    Io(String),
    /// Parse error in config file
    #[error("Parse error: {0}")]
    Parse(String),
    /// Validation error
    #[error("Validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}
