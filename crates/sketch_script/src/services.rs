//! Native state capabilities act on
//!
//! One [`HostServices`] lives behind an `Rc<RefCell<..>>` shared by every
//! installed capability. Capabilities borrow it for the duration of a single
//! call; the host borrows it between calls.

use crate::arena::Arena;
use sketch_asset::AssetLoader;
use sketch_audio::Mixer;
use sketch_core::math::DeterministicRng;
use sketch_core::noise::Noise;
use sketch_core::time::FrameClock;
use sketch_render::{DeviceCapabilities, Renderer, WindowConfig};
use sketch_services::{InputState, Settings};
use std::time::Duration;

pub struct HostServices {
    pub renderer: Renderer,
    pub arena: Arena,
    pub input: InputState,
    pub clock: FrameClock,
    pub rng: DeterministicRng,
    pub noise: Noise,
    pub assets: AssetLoader,
    pub mixer: Mixer,
    pub capabilities: DeviceCapabilities,
    pub max_sound_seconds: f32,
    fixed_step: Option<Duration>,
    seed: Option<u64>,
}

impl HostServices {
    pub fn new(settings: &Settings) -> Self {
        let window = WindowConfig {
            title: settings.window.title.clone(),
            width: settings.window.width,
            height: settings.window.height,
        };
        let fixed_step = settings
            .script
            .fixed_timestep
            .filter(|step| step.is_finite() && *step > 0.0)
            .map(Duration::from_secs_f32);
        let seed = settings.script.random_seed;
        let rng = seed.map_or_else(DeterministicRng::from_time, DeterministicRng::new);
        Self {
            renderer: Renderer::new(window.viewport()),
            arena: Arena::new(),
            input: InputState::new(),
            clock: new_clock(fixed_step),
            noise: Noise::new(rng.seed()),
            rng,
            assets: AssetLoader::new(settings.assets.root.clone()),
            mixer: Mixer::new(settings.audio.sample_rate, settings.audio.master_volume),
            capabilities: DeviceCapabilities::default(),
            max_sound_seconds: settings.audio.max_sound_seconds,
            fixed_step,
            seed,
        }
    }

    /// Seed `random()` and `noise()` together.
    pub fn reseed(&mut self, seed: u64) {
        self.rng.reseed(seed);
        self.noise = Noise::new(seed);
    }

    /// Everything a module leaves behind: its resources, drawing state, the
    /// clock and (when configured) the random sequence. Input state is
    /// physical and survives.
    pub fn reset_for_reload(&mut self) -> usize {
        let destroyed = self.arena.reset();
        self.renderer.reset_state();
        self.clock = new_clock(self.fixed_step);
        if let Some(seed) = self.seed {
            self.reseed(seed);
        }
        destroyed
    }
}

fn new_clock(fixed_step: Option<Duration>) -> FrameClock {
    match fixed_step {
        Some(step) => FrameClock::with_fixed_step(step),
        None => FrameClock::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sketch_render::Image;

    fn seeded() -> Settings {
        let mut settings = Settings::default();
        settings.script.random_seed = Some(42);
        settings.script.fixed_timestep = Some(0.5);
        settings
    }

    #[test]
    fn reload_replays_the_random_sequence() {
        let mut services = HostServices::new(&seeded());
        let first = services.rng.next_f32();
        services.reset_for_reload();
        assert_eq!(services.rng.next_f32(), first);
    }

    #[test]
    fn reload_empties_the_arena_and_restarts_the_clock() {
        let mut services = HostServices::new(&seeded());
        services.arena.insert(Image::new());
        services.clock.tick();
        assert_eq!(services.clock.frame_count(), 1);

        assert_eq!(services.reset_for_reload(), 1);
        assert!(services.arena.is_empty());
        assert_eq!(services.clock.frame_count(), 0);
    }

    #[test]
    fn viewport_comes_from_window_settings() {
        let mut settings = Settings::default();
        settings.window.width = 320;
        settings.window.height = 200;
        let services = HostServices::new(&settings);
        assert_eq!(services.renderer.viewport().width, 320);
        assert_eq!(services.renderer.viewport().height, 200);
    }
}
