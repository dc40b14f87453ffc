//! Error types for the risk-bench service.

use pricer_risk::{ParallelError, VarConfigError};
use thiserror::Error;

use crate::config::ConfigError;

/// Result alias for service operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// Service error.
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration could not be loaded or failed validation.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A parallel kernel could not run.
    #[error("parallel execution failed: {0}")]
    Parallel(#[from] ParallelError),

    /// Simulation parameters were rejected.
    #[error("invalid simulation parameters: {0}")]
    VarConfig(#[from] VarConfigError),

    /// Writing the report failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialising the JSON report failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
