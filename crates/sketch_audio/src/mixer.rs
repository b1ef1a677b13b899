//! Software mixer

/// Renders playing sounds into interleaved stereo.
#[derive(Debug, Clone)]
pub struct Mixer {
    sample_rate: u32,
    master_volume: f32,
}

impl Mixer {
    pub fn new(sample_rate: u32, master_volume: f32) -> Self {
        Self {
            sample_rate: sample_rate.max(1),
            master_volume: master_volume.max(0.0),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }

    pub fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = volume.max(0.0);
    }

    /// Overwrite `out` with the mix of `sounds`, clipped to `-1.0..=1.0`.
    pub fn mix<'a>(&self, sounds: impl IntoIterator<Item = &'a mut crate::Sound>, out: &mut [f32]) {
        out.fill(0.0);
        for sound in sounds {
            sound.mix_into(out, self.sample_rate);
        }
        for sample in out.iter_mut() {
            *sample = (*sample * self.master_volume).clamp(-1.0, 1.0);
        }
    }
}

impl Default for Mixer {
    fn default() -> Self {
        Self::new(crate::DEFAULT_SAMPLE_RATE, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Sound, SoundBuffer};

    #[test]
    fn mixes_and_clips() {
        let mixer = Mixer::new(2, 0.5);
        let mut a = Sound::from_buffer(SoundBuffer::mono(2, vec![1.0, 1.0]).unwrap());
        let mut b = a.clone();
        let mut idle = a.clone();
        a.play();
        b.play();
        let mut out = vec![9.0; 4];
        mixer.mix([&mut a, &mut b, &mut idle], &mut out);
        assert_eq!(out, vec![1.0; 4]);

        let mut quiet = Sound::from_buffer(SoundBuffer::mono(2, vec![0.5, 0.5]).unwrap());
        quiet.play();
        mixer.mix([&mut quiet], &mut out);
        assert_eq!(out, vec![0.25; 4]);
    }
}
