//! Smoothed CPU timings for the paint stages.

/// Named timers with exponential smoothing.
pub mod counter;

pub use counter::PerfCounter;
