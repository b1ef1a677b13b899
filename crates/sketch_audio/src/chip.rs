//! Procedural "chiptune" notes
//!
//! A [`ChipNote`] is one oscillator with an ADSR envelope; a [`ChipBundle`]
//! schedules several notes on a timeline and bakes them into a buffer.

use crate::sound::SoundBuffer;
use sketch_core::math::{DeterministicRng, TAU};

/// Sample count for `seconds` of audio; non-finite lengths are empty.
fn sample_count(seconds: f32, sample_rate: u32) -> usize {
    let count = seconds * sample_rate as f32;
    if count.is_finite() && count > 0.0 {
        count.round() as usize
    } else {
        0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Triangle,
    Sawtooth,
    Noise,
    Silent,
}

impl Waveform {
    pub const ALL: [Waveform; 6] = [
        Waveform::Sine,
        Waveform::Square,
        Waveform::Triangle,
        Waveform::Sawtooth,
        Waveform::Noise,
        Waveform::Silent,
    ];

    pub fn from_index(index: i32) -> Option<Self> {
        usize::try_from(index).ok().and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn name(self) -> &'static str {
        match self {
            Waveform::Sine => "Sine",
            Waveform::Square => "Square",
            Waveform::Triangle => "Triangle",
            Waveform::Sawtooth => "Sawtooth",
            Waveform::Noise => "Noise",
            Waveform::Silent => "Silent",
        }
    }

    /// One sample at `phase` in `[0, 1)`.
    fn sample(self, phase: f32, rng: &mut DeterministicRng) -> f32 {
        match self {
            Waveform::Sine => (phase * TAU as f32).sin(),
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
            Waveform::Sawtooth => 2.0 * phase - 1.0,
            Waveform::Noise => rng.range(-1.0, 1.0),
            Waveform::Silent => 0.0,
        }
    }
}

/// Times are in seconds, `sustain` and `volume` are levels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChipNote {
    pub wave: Waveform,
    pub hz: f32,
    pub volume: f32,
    pub duration: f32,
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
}

impl Default for ChipNote {
    fn default() -> Self {
        Self {
            wave: Waveform::Sine,
            hz: 440.0,
            volume: 0.5,
            duration: 0.2,
            attack: 0.005,
            decay: 0.05,
            sustain: 0.7,
            release: 0.05,
        }
    }
}

impl ChipNote {
    pub fn new(wave: Waveform, hz: f32, volume: f32, duration: f32) -> Self {
        Self {
            wave,
            hz: hz.max(0.0),
            volume: volume.max(0.0),
            duration: duration.max(0.0),
            ..Self::default()
        }
    }

    pub fn set_adsr(&mut self, attack: f32, decay: f32, sustain: f32, release: f32) {
        self.attack = attack.max(0.0);
        self.decay = decay.max(0.0);
        self.sustain = sustain.clamp(0.0, 1.0);
        self.release = release.max(0.0);
    }

    /// Held duration plus release tail.
    pub fn total_duration(&self) -> f32 {
        self.duration + self.release
    }

    pub fn envelope(&self, t: f32) -> f32 {
        if t < 0.0 {
            0.0
        } else if t < self.attack {
            t / self.attack
        } else if t < self.attack + self.decay {
            1.0 - (1.0 - self.sustain) * (t - self.attack) / self.decay
        } else if t < self.duration {
            self.sustain
        } else if t < self.duration + self.release {
            self.sustain * (1.0 - (t - self.duration) / self.release)
        } else {
            0.0
        }
    }

    /// Mono samples for the whole note including release.
    pub fn render(&self, sample_rate: u32) -> Vec<f32> {
        let count = sample_count(self.total_duration(), sample_rate);
        let mut rng = DeterministicRng::new(u64::from(self.hz.to_bits()));
        let mut phase = 0.0f32;
        let step = self.hz / sample_rate as f32;
        (0..count)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                let value = self.wave.sample(phase, &mut rng) * self.envelope(t) * self.volume;
                phase = (phase + step).fract();
                value
            })
            .collect()
    }

    pub fn build(&self, sample_rate: u32) -> Option<SoundBuffer> {
        SoundBuffer::mono(sample_rate, self.render(sample_rate))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChipBundle {
    notes: Vec<(ChipNote, f32)>,
}

impl ChipBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `note` to start `start` seconds into the bundle.
    pub fn add(&mut self, note: ChipNote, start: f32) {
        self.notes.push((note, start.max(0.0)));
    }

    pub fn clear(&mut self) {
        self.notes.clear();
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn duration(&self) -> f32 {
        self.notes
            .iter()
            .map(|(note, start)| start + note.total_duration())
            .fold(0.0, f32::max)
    }

    /// Mix every note into one clipped mono buffer.
    pub fn build(&self, sample_rate: u32) -> Option<SoundBuffer> {
        let len = sample_count(self.duration(), sample_rate);
        let mut mix = vec![0.0f32; len];
        for (note, start) in &self.notes {
            let offset = sample_count(*start, sample_rate);
            for (i, sample) in note.render(sample_rate).into_iter().enumerate() {
                if let Some(slot) = mix.get_mut(offset + i) {
                    *slot += sample;
                }
            }
        }
        for sample in &mut mix {
            *sample = sample.clamp(-1.0, 1.0);
        }
        SoundBuffer::mono(sample_rate, mix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_shape() {
        let mut note = ChipNote::new(Waveform::Square, 100.0, 1.0, 1.0);
        note.set_adsr(0.1, 0.1, 0.5, 0.2);
        assert_eq!(note.envelope(0.05), 0.5);
        assert!((note.envelope(0.15) - 0.75).abs() < 1e-5);
        assert_eq!(note.envelope(0.5), 0.5);
        assert!((note.envelope(1.1) - 0.25).abs() < 1e-5);
        assert_eq!(note.envelope(1.3), 0.0);
        assert!((note.total_duration() - 1.2).abs() < 1e-6);
    }

    #[test]
    fn render_length_and_range() {
        let note = ChipNote::new(Waveform::Sawtooth, 220.0, 0.8, 0.5);
        let samples = note.render(1000);
        assert_eq!(samples.len(), 550);
        assert!(samples.iter().all(|s| s.abs() <= 0.8 + 1e-6));
    }

    #[test]
    fn noise_is_reproducible() {
        let note = ChipNote::new(Waveform::Noise, 1.0, 1.0, 0.1);
        assert_eq!(note.render(800), note.render(800));
    }

    #[test]
    fn bundle_spans_its_notes() {
        let mut bundle = ChipBundle::new();
        bundle.add(ChipNote::new(Waveform::Sine, 440.0, 1.0, 0.25), 0.0);
        bundle.add(ChipNote::new(Waveform::Square, 880.0, 1.0, 0.25), 0.5);
        assert!((bundle.duration() - 0.8).abs() < 1e-5);
        let buffer = bundle.build(1000).unwrap();
        assert_eq!(buffer.frames(), 800);
        assert!(buffer.samples().iter().all(|s| s.abs() <= 1.0));
        assert!(buffer.samples()[300..500].iter().all(|s| *s == 0.0));
    }

    #[test]
    fn infinite_notes_render_nothing() {
        let note = ChipNote::new(Waveform::Sine, 440.0, 1.0, f32::INFINITY);
        assert!(note.render(1000).is_empty());
        assert_eq!(note.build(1000).map(|b| b.frames()), Some(0));
    }

    #[test]
    fn waveform_indices() {
        assert_eq!(Waveform::from_index(4), Some(Waveform::Noise));
        assert_eq!(Waveform::from_index(6), None);
    }
}
