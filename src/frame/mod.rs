//! Progressive frame counter.
//!
//! The driver keeps two counters: the bounded `frame` that weights accumulation and an unbounded
//! `sample` that indexes kernels, so jitter keeps cycling after accumulation freezes.

/// Frame state and the driver that advances it.
pub mod driver;

pub use driver::{AccumFrame, FrameDriver, FrameState};
