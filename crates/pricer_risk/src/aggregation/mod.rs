//! Net position aggregation by symbol.
//!
//! Positions are folded into per-symbol [`NetExposure`] buckets together with
//! portfolio-wide long, short and net totals. The parallel path folds each
//! range into its own [`AggregationResult`], merges the partials on the
//! calling thread, and derives average prices once after the merge.

mod engine;
mod result;

pub use engine::AggregationEngine;
pub use result::{AggregationResult, NetExposure};
