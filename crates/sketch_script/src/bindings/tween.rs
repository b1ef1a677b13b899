use crate::error::RegistrationError;
use crate::handle::Handle;
use crate::registry::Registry;
use sketch_core::easing::{EaseMode, EaseType};
use sketch_core::tween::Tween;

pub fn register(reg: &mut Registry) -> Result<(), RegistrationError> {
    bind_fn!(reg, "createTween", |s| -> Handle<Tween> { s.arena.insert(Tween::new()) });

    bind_method!(reg, "Tween", "setup", |s, this: Handle<Tween>, from: f32, to: f32, duration: f32| -> () {
        s.arena
            .get_mut(this)?
            .setup(from, to, duration, EaseType::Linear, EaseMode::InOut)
    });
    bind_method!(reg, "Tween", "setup", |s, this: Handle<Tween>, from: f32, to: f32, duration: f32, kind: EaseType, mode: EaseMode| -> () {
        s.arena.get_mut(this)?.setup(from, to, duration, kind, mode)
    });
    bind_method!(reg, "Tween", "start", |s, this: Handle<Tween>| -> () {
        s.arena.get_mut(this)?.start()
    });
    bind_method!(reg, "Tween", "pause", |s, this: Handle<Tween>| -> () {
        s.arena.get_mut(this)?.pause()
    });
    bind_method!(reg, "Tween", "resume", |s, this: Handle<Tween>| -> () {
        s.arena.get_mut(this)?.resume()
    });
    // Without an argument the tween follows the frame clock.
    bind_method!(reg, "Tween", "update", |s, this: Handle<Tween>| -> () {
        let dt = s.clock.delta().as_secs_f32();
        s.arena.get_mut(this)?.update(dt)
    });
    bind_method!(reg, "Tween", "update", |s, this: Handle<Tween>, dt: f32| -> () {
        s.arena.get_mut(this)?.update(dt)
    });
    bind_method!(reg, "Tween", "getValue", |s, this: Handle<Tween>| -> f32 {
        s.arena.get(this)?.value()
    });
    bind_method!(reg, "Tween", "getProgress", |s, this: Handle<Tween>| -> f32 {
        s.arena.get(this)?.progress()
    });
    bind_method!(reg, "Tween", "isRunning", |s, this: Handle<Tween>| -> bool {
        s.arena.get(this)?.is_running()
    });
    bind_method!(reg, "Tween", "isComplete", |s, this: Handle<Tween>| -> bool {
        s.arena.get(this)?.is_complete()
    });
    Ok(())
}
