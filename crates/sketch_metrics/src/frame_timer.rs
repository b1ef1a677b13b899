//! Frame timing utilities

use super::ring_buffer::RingBuffer;
use std::time::{Duration, Instant};

/// Measures how long the host spends inside script code per frame.
pub struct FrameTimer {
    frame_start: Option<Instant>,
    frame_times: RingBuffer<Duration>,
    over_budget: u64,
    budget: Duration,
}

impl FrameTimer {
    pub fn new(capacity: usize) -> Self {
        Self {
            frame_start: None,
            frame_times: RingBuffer::new(capacity),
            over_budget: 0,
            budget: Duration::from_micros(16_666),
        }
    }

    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = budget;
        self
    }

    pub fn begin(&mut self) {
        self.frame_start = Some(Instant::now());
    }

    /// Close the frame opened by `begin`; unmatched calls are ignored.
    pub fn end(&mut self) {
        if let Some(start) = self.frame_start.take() {
            let elapsed = start.elapsed();
            if elapsed > self.budget {
                self.over_budget += 1;
            }
            self.frame_times.push(elapsed);
        }
    }

    pub fn frame_time_ms(&self) -> f64 {
        self.frame_times.average().as_secs_f64() * 1000.0
    }

    pub fn worst_frame_ms(&self) -> f64 {
        self.frame_times.max().as_secs_f64() * 1000.0
    }

    /// Frames that exceeded the budget since creation.
    pub fn over_budget(&self) -> u64 {
        self.over_budget
    }
}
