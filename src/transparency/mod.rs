//! Object-based stochastic transparency.

/// Per-object visibility tables.
pub mod masks;

pub use masks::TransparencyMasks;
