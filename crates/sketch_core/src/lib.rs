//! Sketch Core
//!
//! Contains the fundamental building blocks shared by every engine crate:
//! - Value types exposed to scripts (vectors, matrices, colors, rectangles)
//! - Frame clock
//! - Deterministic random numbers and gradient noise
//! - Easing curves and value tweens

pub mod easing;
pub mod math;
pub mod noise;
pub mod time;
pub mod tween;

pub use glam;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
