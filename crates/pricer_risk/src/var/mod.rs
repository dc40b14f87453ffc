//! Monte Carlo Value-at-Risk.
//!
//! Portfolio P&L is simulated under geometric Brownian motion, one
//! independent shock per position per trial, and summarised into 95%/99%
//! VaR, expected shortfall, mean and standard deviation.
//!
//! - [`simulate_pnl`]: deterministic sample generation for a seed
//! - [`summarize`]: empirical quantiles and moments
//! - [`MonteCarloEngine`]: single-threaded and fan-out runs

mod config;
mod engine;
mod result;
mod rng;

pub use config::{
    SimulationConfig, SimulationConfigBuilder, VarConfigError, DEFAULT_SEED, DEFAULT_TRIALS,
    TRADING_DAY,
};
pub use engine::{simulate_pnl, worker_seed, MonteCarloEngine, WORKER_SEED_STRIDE};
pub use result::{summarize, VaRResult};
pub use rng::PnlRng;
