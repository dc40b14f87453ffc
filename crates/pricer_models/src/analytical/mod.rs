//! Analytical pricing formulas for European options.
//!
//! This module provides:
//! - Standard normal distribution functions ([`norm_cdf`], [`norm_pdf`])
//! - Black-Scholes closed form for calls and puts
//!
//! ## Degenerate Inputs
//!
//! Black-Scholes divides by σ√T. When either factor is non-positive the
//! formula is not evaluated and the intrinsic value is returned instead.

pub mod black_scholes;
pub mod distributions;

pub use black_scholes::{black_scholes_price, BlackScholes};
pub use distributions::{norm_cdf, norm_pdf};
