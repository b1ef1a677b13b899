//! Sample buffers and playback state

use std::rc::Rc;

/// Interleaved samples in `-1.0..=1.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundBuffer {
    sample_rate: u32,
    channels: u16,
    samples: Vec<f32>,
}

impl SoundBuffer {
    /// `None` for zero channels, a zero rate, or a ragged sample count.
    pub fn new(sample_rate: u32, channels: u16, samples: Vec<f32>) -> Option<Self> {
        if channels == 0 || sample_rate == 0 || samples.len() % channels as usize != 0 {
            return None;
        }
        Some(Self {
            sample_rate,
            channels,
            samples,
        })
    }

    pub fn mono(sample_rate: u32, samples: Vec<f32>) -> Option<Self> {
        Self::new(sample_rate, 1, samples)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    pub fn duration(&self) -> f32 {
        self.frames() as f32 / self.sample_rate as f32
    }

    /// Stereo pair at `frame`; mono is duplicated, extra channels ignored.
    pub fn frame(&self, frame: usize) -> (f32, f32) {
        let at = frame * self.channels as usize;
        match self.samples.get(at..at + self.channels as usize) {
            Some([mono]) => (*mono, *mono),
            Some([left, right, ..]) => (*left, *right),
            _ => (0.0, 0.0),
        }
    }
}

/// A playable sound: shared buffer plus cursor and mix parameters.
#[derive(Debug, Clone)]
pub struct Sound {
    buffer: Option<Rc<SoundBuffer>>,
    position: f64,
    playing: bool,
    paused: bool,
    looping: bool,
    volume: f32,
    pan: f32,
    speed: f32,
}

impl Default for Sound {
    fn default() -> Self {
        Self {
            buffer: None,
            position: 0.0,
            playing: false,
            paused: false,
            looping: false,
            volume: 1.0,
            pan: 0.0,
            speed: 1.0,
        }
    }
}

impl Sound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_buffer(buffer: SoundBuffer) -> Self {
        let mut sound = Self::new();
        sound.set_buffer(buffer);
        sound
    }

    /// Replace the samples; stops playback.
    pub fn set_buffer(&mut self, buffer: SoundBuffer) {
        self.buffer = Some(Rc::new(buffer));
        self.stop();
    }

    pub fn is_loaded(&self) -> bool {
        self.buffer.is_some()
    }

    pub fn buffer(&self) -> Option<&SoundBuffer> {
        self.buffer.as_deref()
    }

    pub fn play(&mut self) {
        if !self.is_loaded() {
            tracing::warn!("play on a sound without samples");
            return;
        }
        self.position = 0.0;
        self.playing = true;
        self.paused = false;
    }

    pub fn stop(&mut self) {
        self.playing = false;
        self.paused = false;
        self.position = 0.0;
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.playing {
            self.paused = paused;
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing && !self.paused
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_loop(&mut self, looping: bool) {
        self.looping = looping;
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.max(0.0);
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// `-1.0` hard left through `1.0` hard right.
    pub fn set_pan(&mut self, pan: f32) {
        self.pan = pan.clamp(-1.0, 1.0);
    }

    pub fn pan(&self) -> f32 {
        self.pan
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn duration(&self) -> f32 {
        self.buffer.as_ref().map_or(0.0, |b| b.duration())
    }

    /// Playback position in seconds.
    pub fn position(&self) -> f32 {
        self.buffer
            .as_ref()
            .map_or(0.0, |b| (self.position / b.sample_rate() as f64) as f32)
    }

    /// Add this sound into interleaved stereo `out`, advancing the cursor.
    pub fn mix_into(&mut self, out: &mut [f32], output_rate: u32) {
        let Some(buffer) = self.buffer.clone() else {
            return;
        };
        if !self.is_playing() || output_rate == 0 {
            return;
        }
        let step = buffer.sample_rate() as f64 / output_rate as f64 * self.speed as f64;
        let frames = buffer.frames() as f64;
        let left_gain = self.volume * (1.0 - self.pan).min(1.0);
        let right_gain = self.volume * (1.0 + self.pan).min(1.0);
        for pair in out.chunks_exact_mut(2) {
            if self.position >= frames {
                if self.looping && frames > 0.0 {
                    self.position %= frames;
                } else {
                    self.playing = false;
                    self.position = 0.0;
                    break;
                }
            }
            let (l, r) = buffer.frame(self.position as usize);
            pair[0] += l * left_gain;
            pair[1] += r * right_gain;
            self.position += step;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> SoundBuffer {
        SoundBuffer::mono(4, vec![0.1, 0.2, 0.3, 0.4]).unwrap()
    }

    #[test]
    fn buffer_validates_shape() {
        assert!(SoundBuffer::new(44_100, 2, vec![0.0; 3]).is_none());
        assert!(SoundBuffer::new(0, 1, vec![]).is_none());
        assert_eq!(ramp().duration(), 1.0);
    }

    #[test]
    fn playback_stops_at_end_without_loop() {
        let mut sound = Sound::from_buffer(ramp());
        sound.play();
        let mut out = vec![0.0; 12];
        sound.mix_into(&mut out, 4);
        assert_eq!(&out[..8], &[0.1, 0.1, 0.2, 0.2, 0.3, 0.3, 0.4, 0.4]);
        assert_eq!(&out[8..], &[0.0; 4]);
        assert!(!sound.is_playing());
    }

    #[test]
    fn looping_wraps() {
        let mut sound = Sound::from_buffer(ramp());
        sound.set_loop(true);
        sound.play();
        let mut out = vec![0.0; 12];
        sound.mix_into(&mut out, 4);
        assert_eq!(out[8], 0.1);
        assert!(sound.is_playing());
    }

    #[test]
    fn pan_and_pause() {
        let mut sound = Sound::from_buffer(ramp());
        sound.set_pan(1.0);
        sound.play();
        sound.set_paused(true);
        let mut out = vec![0.0; 2];
        sound.mix_into(&mut out, 4);
        assert_eq!(out, vec![0.0, 0.0]);
        sound.set_paused(false);
        sound.mix_into(&mut out, 4);
        assert_eq!(out, vec![0.0, 0.1]);
    }

    #[test]
    fn play_without_samples_is_ignored() {
        let mut sound = Sound::new();
        sound.play();
        assert!(!sound.is_playing());
    }
}
