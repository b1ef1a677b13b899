//! Sounds and procedural chip notes
//!
//! `build()` on a note or bundle bakes it into a new arena-owned `Sound`
//! at the mixer's sample rate.

use crate::error::RegistrationError;
use crate::handle::Handle;
use crate::registry::Registry;
use crate::services::HostServices;
use sketch_audio::{ChipBundle, ChipNote, Sound, SoundBuffer, Waveform};

fn within_limit(s: &HostServices, kind: &str, seconds: f32) -> bool {
    let ok = seconds.is_finite() && seconds <= s.max_sound_seconds;
    if !ok {
        tracing::warn!(
            kind,
            seconds,
            max = s.max_sound_seconds,
            "sound exceeds the length limit"
        );
    }
    ok
}

fn bake(s: &mut HostServices, buffer: Option<SoundBuffer>) -> Handle<Sound> {
    let sound = match buffer {
        Some(buffer) => Sound::from_buffer(buffer),
        None => {
            tracing::debug!("baked an empty chip sound");
            Sound::new()
        }
    };
    s.arena.insert(sound)
}

pub fn register(reg: &mut Registry) -> Result<(), RegistrationError> {
    sound(reg)?;
    chip_note(reg)?;
    chip_bundle(reg)?;
    Ok(())
}

fn sound(reg: &mut Registry) -> Result<(), RegistrationError> {
    bind_fn!(reg, "createSound", |s| -> Handle<Sound> { s.arena.insert(Sound::new()) });

    bind_method!(reg, "Sound", "load", |s, this: Handle<Sound>, path: String| -> bool {
        let buffer = match s.assets.load_wav(&path) {
            Ok(audio) => SoundBuffer::new(audio.sample_rate, audio.channels, audio.samples),
            Err(err) => {
                tracing::warn!(%err, "Sound.load failed");
                None
            }
        };
        match buffer {
            Some(buffer) => {
                s.arena.get_mut(this)?.set_buffer(buffer);
                true
            }
            None => false,
        }
    });
    bind_method!(reg, "Sound", "isLoaded", |s, this: Handle<Sound>| -> bool {
        s.arena.get(this)?.is_loaded()
    });
    bind_method!(reg, "Sound", "play", |s, this: Handle<Sound>| -> () {
        s.arena.get_mut(this)?.play()
    });
    bind_method!(reg, "Sound", "stop", |s, this: Handle<Sound>| -> () {
        s.arena.get_mut(this)?.stop()
    });
    bind_method!(reg, "Sound", "setPaused", |s, this: Handle<Sound>, paused: bool| -> () {
        s.arena.get_mut(this)?.set_paused(paused)
    });
    bind_method!(reg, "Sound", "isPlaying", |s, this: Handle<Sound>| -> bool {
        s.arena.get(this)?.is_playing()
    });
    bind_method!(reg, "Sound", "isPaused", |s, this: Handle<Sound>| -> bool {
        s.arena.get(this)?.is_paused()
    });
    bind_method!(reg, "Sound", "setLoop", |s, this: Handle<Sound>, looping: bool| -> () {
        s.arena.get_mut(this)?.set_loop(looping)
    });
    bind_method!(reg, "Sound", "isLooping", |s, this: Handle<Sound>| -> bool {
        s.arena.get(this)?.is_looping()
    });
    bind_method!(reg, "Sound", "setVolume", |s, this: Handle<Sound>, volume: f32| -> () {
        s.arena.get_mut(this)?.set_volume(volume)
    });
    bind_method!(reg, "Sound", "getVolume", |s, this: Handle<Sound>| -> f32 {
        s.arena.get(this)?.volume()
    });
    bind_method!(reg, "Sound", "setPan", |s, this: Handle<Sound>, pan: f32| -> () {
        s.arena.get_mut(this)?.set_pan(pan)
    });
    bind_method!(reg, "Sound", "getPan", |s, this: Handle<Sound>| -> f32 {
        s.arena.get(this)?.pan()
    });
    bind_method!(reg, "Sound", "setSpeed", |s, this: Handle<Sound>, speed: f32| -> () {
        s.arena.get_mut(this)?.set_speed(speed)
    });
    bind_method!(reg, "Sound", "getSpeed", |s, this: Handle<Sound>| -> f32 {
        s.arena.get(this)?.speed()
    });
    bind_method!(reg, "Sound", "getDuration", |s, this: Handle<Sound>| -> f32 {
        s.arena.get(this)?.duration()
    });
    bind_method!(reg, "Sound", "getPosition", |s, this: Handle<Sound>| -> f32 {
        s.arena.get(this)?.position()
    });
    Ok(())
}

fn chip_note(reg: &mut Registry) -> Result<(), RegistrationError> {
    bind_fn!(reg, "createChipNote", |s| -> Handle<ChipNote> { s.arena.insert(ChipNote::default()) });
    bind_fn!(reg, "createChipNote", |s, wave: Waveform, hz: f32, volume: f32, duration: f32| -> Handle<ChipNote> {
        s.arena.insert(ChipNote::new(wave, hz, volume, duration))
    });

    bind_method!(reg, "ChipNote", "setWave", |s, this: Handle<ChipNote>, wave: Waveform| -> () {
        s.arena.get_mut(this)?.wave = wave
    });
    bind_method!(reg, "ChipNote", "setHz", |s, this: Handle<ChipNote>, hz: f32| -> () {
        s.arena.get_mut(this)?.hz = hz.max(0.0)
    });
    bind_method!(reg, "ChipNote", "setVolume", |s, this: Handle<ChipNote>, volume: f32| -> () {
        s.arena.get_mut(this)?.volume = volume.max(0.0)
    });
    bind_method!(reg, "ChipNote", "setDuration", |s, this: Handle<ChipNote>, duration: f32| -> () {
        s.arena.get_mut(this)?.duration = duration.max(0.0)
    });
    bind_method!(reg, "ChipNote", "setADSR", |s, this: Handle<ChipNote>, a: f32, d: f32, sustain: f32, r: f32| -> () {
        s.arena.get_mut(this)?.set_adsr(a, d, sustain, r)
    });
    bind_method!(reg, "ChipNote", "getDuration", |s, this: Handle<ChipNote>| -> f32 {
        s.arena.get(this)?.total_duration()
    });
    bind_method!(reg, "ChipNote", "build", |s, this: Handle<ChipNote>| -> Handle<Sound> {
        let note = *s.arena.get(this)?;
        let buffer = if within_limit(s, "ChipNote", note.total_duration()) {
            note.build(s.mixer.sample_rate())
        } else {
            None
        };
        bake(s, buffer)
    });
    Ok(())
}

fn chip_bundle(reg: &mut Registry) -> Result<(), RegistrationError> {
    bind_fn!(reg, "createChipBundle", |s| -> Handle<ChipBundle> { s.arena.insert(ChipBundle::new()) });

    bind_method!(reg, "ChipBundle", "add", |s, this: Handle<ChipBundle>, note: Handle<ChipNote>, start: f32| -> () {
        let note = *s.arena.get(note)?;
        s.arena.get_mut(this)?.add(note, start)
    });
    bind_method!(reg, "ChipBundle", "clear", |s, this: Handle<ChipBundle>| -> () {
        s.arena.get_mut(this)?.clear()
    });
    bind_method!(reg, "ChipBundle", "size", |s, this: Handle<ChipBundle>| -> usize {
        s.arena.get(this)?.len()
    });
    bind_method!(reg, "ChipBundle", "getDuration", |s, this: Handle<ChipBundle>| -> f32 {
        s.arena.get(this)?.duration()
    });
    bind_method!(reg, "ChipBundle", "build", |s, this: Handle<ChipBundle>| -> Handle<Sound> {
        let bundle = s.arena.get(this)?;
        let buffer = if within_limit(s, "ChipBundle", bundle.duration()) {
            bundle.build(s.mixer.sample_rate())
        } else {
            None
        };
        bake(s, buffer)
    });
    Ok(())
}
