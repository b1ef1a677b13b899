//! Frame clock
//!
//! Tracks frame count, elapsed time and per-frame delta. Runs either on the
//! wall clock or on a fixed step (deterministic replays and tests).

use std::time::{Duration, Instant};

/// Nominal frame rate used for the default fixed step (60 Hz = 16.666ms).
pub const TARGET_FRAME_RATE: u32 = 60;
pub const TARGET_FRAME_DURATION: Duration = Duration::from_micros(16_666);

/// Frame time tracker
pub struct FrameClock {
    frame_count: u64,
    elapsed: Duration,
    delta: Duration,
    last_tick: Option<Instant>,
    fixed_step: Option<Duration>,
    fps: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            frame_count: 0,
            elapsed: Duration::ZERO,
            delta: Duration::ZERO,
            last_tick: None,
            fixed_step: None,
            fps: 0.0,
        }
    }

    /// Clock that advances by exactly `step` every tick.
    pub fn with_fixed_step(step: Duration) -> Self {
        Self {
            fixed_step: Some(step),
            ..Self::new()
        }
    }

    /// Advance one frame. The first wall-clock tick has a zero delta.
    pub fn tick(&mut self) -> Duration {
        let delta = match self.fixed_step {
            Some(step) => step,
            None => {
                let now = Instant::now();
                let delta = self
                    .last_tick
                    .map(|last| now.duration_since(last))
                    .unwrap_or(Duration::ZERO);
                self.last_tick = Some(now);
                delta
            }
        };
        self.advance(delta);
        delta
    }

    /// Advance one frame by an explicit delta.
    pub fn advance(&mut self, delta: Duration) {
        self.frame_count += 1;
        self.elapsed += delta;
        self.delta = delta;

        let secs = delta.as_secs_f64();
        if secs > 0.0 {
            let instant = 1.0 / secs;
            self.fps = if self.fps == 0.0 {
                instant
            } else {
                self.fps * 0.9 + instant * 0.1
            };
        }
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Smoothed frames per second.
    pub fn fps(&self) -> f64 {
        self.fps
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
