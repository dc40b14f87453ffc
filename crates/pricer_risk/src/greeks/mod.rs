//! Option Greeks by finite-difference repricing.
//!
//! Positions are independent, so a batch is embarrassingly parallel: the
//! parallel path splits the book into contiguous ranges and concatenates the
//! per-range outputs in order.

mod engine;
mod result;

pub use engine::{
    portfolio_delta, portfolio_greeks, GreeksEngine, DEFAULT_BUMP, MIN_EXPIRY, THETA_STEP,
};
pub use result::Greeks;
