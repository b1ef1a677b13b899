//! Per-hook profiler
//!
//! Keeps a rolling window of durations for every named scope, so the host can
//! report which script entry point is eating the frame.

use super::ring_buffer::RingBuffer;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

pub struct HookProfiler {
    window: usize,
    timings: BTreeMap<&'static str, RingBuffer<Duration>>,
}

impl HookProfiler {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            timings: BTreeMap::new(),
        }
    }

    pub fn time<F, R>(&mut self, name: &'static str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let start = Instant::now();
        let result = f();
        self.record(name, start.elapsed());
        result
    }

    pub fn record(&mut self, name: &'static str, elapsed: Duration) {
        let window = self.window;
        self.timings
            .entry(name)
            .or_insert_with(|| RingBuffer::new(window))
            .push(elapsed);
    }

    pub fn average(&self, name: &str) -> Duration {
        self.timings
            .get(name)
            .map(|samples| samples.average())
            .unwrap_or(Duration::ZERO)
    }

    pub fn reset(&mut self) {
        self.timings.clear();
    }

    /// `(name, average)` pairs in name order.
    pub fn report(&self) -> Vec<(&'static str, Duration)> {
        self.timings
            .iter()
            .map(|(name, samples)| (*name, samples.average()))
            .collect()
    }
}

impl Default for HookProfiler {
    fn default() -> Self {
        Self::new(60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_named_scopes() {
        let mut profiler = HookProfiler::new(4);
        profiler.record("draw", Duration::from_millis(2));
        profiler.record("draw", Duration::from_millis(4));
        let value = profiler.time("update", || 7);
        assert_eq!(value, 7);
        assert_eq!(profiler.average("draw"), Duration::from_millis(3));
        let names: Vec<_> = profiler.report().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["draw", "update"]);
    }
}
