//! Sketch Metrics - Common utilities for performance tracking
//!
//! Provides zero-cost abstractions for metrics collection that completely
//! vanish in production builds via feature flags.
//!
//! # Feature Flags
//!
//! - `metrics` - Enable metrics collection (default: disabled)
//!
//! # Usage
//!
//! ```ignore
//! use sketch_metrics::{FrameTimer, HookProfiler};
//!
//! let mut timer = FrameTimer::new(60); // Track last 60 frames
//! let mut profiler = HookProfiler::new(60);
//! timer.begin();
//! profiler.time("draw", || run_draw());
//! timer.end();
//! println!("script time: {:.2}ms", timer.frame_time_ms());
//! ```
//!
//! In production builds (without `metrics` feature), all instrumentation
//! is compiled out to zero overhead.

#[cfg(feature = "metrics")]
mod counter;
#[cfg(feature = "metrics")]
mod frame_timer;
#[cfg(feature = "metrics")]
mod profiler;
#[cfg(feature = "metrics")]
mod ring_buffer;

#[cfg(feature = "metrics")]
pub use counter::Counter;
#[cfg(feature = "metrics")]
pub use frame_timer::FrameTimer;
#[cfg(feature = "metrics")]
pub use profiler::HookProfiler;
#[cfg(feature = "metrics")]
pub use ring_buffer::RingBuffer;

// ============================================================================
// Macros for conditional compilation
// ============================================================================

/// Execute code only when metrics are enabled
#[macro_export]
macro_rules! metrics {
    ($($tt:tt)*) => {
        #[cfg(feature = "metrics")]
        {
            $($tt)*
        }
    };
}

// ============================================================================
// No-op stubs when metrics disabled
// ============================================================================

#[cfg(not(feature = "metrics"))]
pub struct FrameTimer;

#[cfg(not(feature = "metrics"))]
impl FrameTimer {
    pub fn new(_capacity: usize) -> Self { Self }
    pub fn with_budget(self, _budget: std::time::Duration) -> Self { self }
    pub fn begin(&mut self) {}
    pub fn end(&mut self) {}
    pub fn frame_time_ms(&self) -> f64 { 0.0 }
    pub fn worst_frame_ms(&self) -> f64 { 0.0 }
    pub fn over_budget(&self) -> u64 { 0 }
}

#[cfg(not(feature = "metrics"))]
pub struct RingBuffer<T>(std::marker::PhantomData<T>);

#[cfg(not(feature = "metrics"))]
impl<T> RingBuffer<T> {
    pub fn new(_capacity: usize) -> Self { Self(std::marker::PhantomData) }
    pub fn push(&mut self, _value: T) {}
    pub fn len(&self) -> usize { 0 }
    pub fn is_empty(&self) -> bool { true }
}

#[cfg(not(feature = "metrics"))]
#[derive(Default)]
pub struct Counter;

#[cfg(not(feature = "metrics"))]
impl Counter {
    pub fn new() -> Self { Self }
    pub fn increment(&mut self, _name: &'static str, _value: u64) {}
    pub fn get(&self, _name: &str) -> u64 { 0 }
    pub fn reset_all(&mut self) {}
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ { std::iter::empty() }
}

#[cfg(not(feature = "metrics"))]
#[derive(Default)]
pub struct HookProfiler;

#[cfg(not(feature = "metrics"))]
impl HookProfiler {
    pub fn new(_window: usize) -> Self { Self }
    pub fn time<F, R>(&mut self, _name: &'static str, f: F) -> R where F: FnOnce() -> R { f() }
    pub fn record(&mut self, _name: &'static str, _elapsed: std::time::Duration) {}
    pub fn average(&self, _name: &str) -> std::time::Duration { std::time::Duration::ZERO }
    pub fn reset(&mut self) {}
    pub fn report(&self) -> Vec<(&'static str, std::time::Duration)> { Vec::new() }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_compiles_with_either_feature_set() {
        let mut timer = super::FrameTimer::new(60);
        timer.begin();
        timer.end();
        let mut _buffer = super::RingBuffer::<f64>::new(10);
        let mut counter = super::Counter::new();
        counter.increment("reloads", 1);
        let mut profiler = super::HookProfiler::new(8);
        assert_eq!(profiler.time("draw", || 3), 3);
    }
}
