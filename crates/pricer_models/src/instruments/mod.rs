//! Trading-book instruments.
//!
//! A book is a flat `Vec<Position>`; symbols repeat freely and carry no
//! identity beyond grouping during aggregation.

mod position;

pub use position::{InstrumentKind, Position};
