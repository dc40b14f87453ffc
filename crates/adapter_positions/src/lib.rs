//! # Position Sources
//!
//! Upstream providers of [`Position`] books for the risk kernels.
//!
//! ## Modules
//!
//! - [`synthetic`]: seeded random book with a mix of equities, calls and puts
//!
//! [`Position`]: pricer_models::instruments::Position

#![deny(missing_docs)]

pub mod synthetic;

use pricer_models::instruments::Position;

pub use synthetic::SyntheticBook;

/// A source of trading positions.
pub trait PositionSource: Send + Sync {
    /// Produces `count` positions.
    fn positions(&self, count: usize) -> Vec<Position>;
}
