use std::collections::HashMap;
use std::fmt::Write as _;
use std::time::{Duration, Instant};

/// Weight of the previous average when folding in a new measurement.
pub const SMOOTHING: f64 = 0.95;

/// Named stage timers.
///
/// The first measurement of a name is taken as-is; later ones are folded in with
/// [`SMOOTHING`]. Names keep the order in which they first finished.
#[derive(Debug, Default)]
pub struct PerfCounter {
    running: HashMap<String, Instant>,
    averages: Vec<(String, f64)>,
}

impl PerfCounter {
    /// Empty counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start timing `name`, restarting it if already running.
    pub fn begin(&mut self, name: &str) {
        self.running.insert(name.to_owned(), Instant::now());
    }

    /// Stop timing `name` and record the elapsed time; `None` if it was not running.
    pub fn end(&mut self, name: &str) -> Option<Duration> {
        let started = self.running.remove(name)?;
        let elapsed = started.elapsed();
        self.add_measurement(name, elapsed);
        Some(elapsed)
    }

    /// Time `f` under `name`.
    pub fn measure<R>(&mut self, name: &str, f: impl FnOnce() -> R) -> R {
        self.begin(name);
        let out = f();
        self.end(name);
        out
    }

    /// Fold an externally measured duration into `name`.
    pub fn add_measurement(&mut self, name: &str, elapsed: Duration) {
        let nanos = elapsed.as_nanos() as f64;
        match self.averages.iter_mut().find(|(n, _)| n == name) {
            Some((_, avg)) if *avg != 0.0 => *avg = nanos * (1.0 - SMOOTHING) + *avg * SMOOTHING,
            Some((_, avg)) => *avg = nanos,
            None => self.averages.push((name.to_owned(), nanos)),
        }
    }

    /// Smoothed time for `name` in milliseconds.
    pub fn millis(&self, name: &str) -> Option<f64> {
        self.averages
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, ns)| ns / 1_000_000.0)
    }

    /// `"name: 1.23 other: 0.45"` in milliseconds, first-seen order.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        for (name, ns) in &self.averages {
            if !out.is_empty() {
                out.push(' ');
            }
            let _ = write!(out, "{name}: {:.2}", ns / 1_000_000.0);
        }
        out
    }

    /// Forget every measurement.
    pub fn clear(&mut self) {
        self.running.clear();
        self.averages.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/perf/counter.rs"]
mod tests;
