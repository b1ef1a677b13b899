//! Sketch Audio
//!
//! Software playback: decoded or synthesised sample buffers, per-sound
//! playback state, and a mixer that renders interleaved stereo on demand.

pub mod chip;
pub mod mixer;
pub mod sound;

pub use chip::{ChipBundle, ChipNote, Waveform};
pub use mixer::Mixer;
pub use sound::{Sound, SoundBuffer};

pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;
