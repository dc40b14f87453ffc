//! # Pricer Risk (L4: Application)
//!
//! Parallel portfolio risk kernels over a book of [`Position`]s.
//!
//! This crate provides:
//! - Monte Carlo Value-at-Risk under GBM with expected shortfall
//! - Finite-difference option Greeks (delta, gamma, vega, theta)
//! - Net exposure aggregation by symbol with long/short/net totals
//! - A shared partition-and-reduce executor so that every kernel's
//!   single-threaded and multi-threaded runs are directly comparable
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            pricer_risk (L4)             │
//! ├─────────────────────────────────────────┤
//! │  var/         - MC simulation, VaR/ES   │
//! │  greeks/      - bump-and-reprice Greeks │
//! │  aggregation/ - net exposure by symbol  │
//! │  parallel/    - WorkPartitioner         │
//! └─────────────────────────────────────────┘
//!          ↓
//! ┌─────────────────────────────────────────┐
//! │           pricer_models (L2)            │
//! │  Position, Black-Scholes, normal CDF    │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Reproducibility
//!
//! Greeks and aggregation contain no randomness, so their parallel output
//! matches the single-threaded output for any worker count. Monte Carlo
//! samples are reproducible for a fixed seed and worker count only.
//!
//! ## Example
//!
//! ```
//! use pricer_models::instruments::Position;
//! use pricer_risk::{AggregationEngine, GreeksEngine, WorkPartitioner};
//!
//! let book = vec![
//!     Position::equity("AAPL", 100.0, 150.0, 0.3, 0.05),
//!     Position::call("AAPL", 10.0, 150.0, 0.3, 155.0, 0.5, 0.05),
//! ];
//! let partitioner = WorkPartitioner::new(2).unwrap();
//!
//! let greeks = GreeksEngine::new()
//!     .compute_batch_parallel(&book, &partitioner)
//!     .unwrap();
//! assert_eq!(greeks.len(), 2);
//!
//! let exposure = AggregationEngine::new().aggregate(&book);
//! assert_eq!(exposure.unique_symbols(), 1);
//! ```
//!
//! [`Position`]: pricer_models::instruments::Position

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod aggregation;
pub mod greeks;
pub mod parallel;
pub mod var;

// Re-export commonly used types
pub use aggregation::{AggregationEngine, AggregationResult, NetExposure};
pub use greeks::{portfolio_delta, portfolio_greeks, Greeks, GreeksEngine};
pub use parallel::{ParallelConfig, ParallelError, WorkPartitioner};
pub use var::{MonteCarloEngine, SimulationConfig, VaRResult, VarConfigError};
