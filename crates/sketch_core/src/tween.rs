//! Value tweens

use crate::easing::{ease, EaseMode, EaseType};

/// Interpolates a scalar from `from` to `to` over `duration` seconds.
#[derive(Debug, Clone)]
pub struct Tween {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
    kind: EaseType,
    mode: EaseMode,
    running: bool,
}

impl Tween {
    pub fn new() -> Self {
        Self {
            from: 0.0,
            to: 1.0,
            duration: 1.0,
            elapsed: 0.0,
            kind: EaseType::Linear,
            mode: EaseMode::InOut,
            running: false,
        }
    }

    /// Configure endpoints and curve; resets progress and stops the tween.
    pub fn setup(&mut self, from: f32, to: f32, duration: f32, kind: EaseType, mode: EaseMode) {
        self.from = from;
        self.to = to;
        self.duration = duration.max(0.0);
        self.kind = kind;
        self.mode = mode;
        self.elapsed = 0.0;
        self.running = false;
    }

    pub fn start(&mut self) {
        self.elapsed = 0.0;
        self.running = true;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn resume(&mut self) {
        if !self.is_complete() {
            self.running = true;
        }
    }

    /// Advance by `dt` seconds; a no-op unless running.
    pub fn update(&mut self, dt: f32) {
        if !self.running {
            return;
        }
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
        if self.is_complete() {
            self.running = false;
        }
    }

    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            self.elapsed / self.duration
        }
    }

    pub fn value(&self) -> f32 {
        let t = ease(self.progress(), self.kind, self.mode);
        self.from + (self.to - self.from) * t
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }
}

impl Default for Tween {
    fn default() -> Self {
        Self::new()
    }
}
