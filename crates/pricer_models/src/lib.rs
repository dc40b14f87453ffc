//! # Pricer Models (L2: Business Logic)
//!
//! Trading positions and closed-form option pricing.
//!
//! This crate provides:
//! - [`instruments::Position`], the unit of the synthetic trading book
//! - [`instruments::InstrumentKind`] (equity, call, put)
//! - Standard normal CDF/PDF
//! - Black-Scholes closed-form pricing with an intrinsic-value fallback
//!
//! ## Design Principles
//!
//! - **Enum-based instruments** for static dispatch
//! - **Degenerate inputs never fail**: zero volatility or expiry price at
//!   intrinsic value instead of returning an error
//! - **Generic over `T: Float`** for the analytical formulas

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analytical;
pub mod instruments;

pub use analytical::{black_scholes_price, norm_cdf, norm_pdf, BlackScholes};
pub use instruments::{InstrumentKind, Position};
