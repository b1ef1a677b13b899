//! Random, noise, interpolation and general math

use crate::error::RegistrationError;
use crate::registry::Registry;
use sketch_core::easing::{ease, EaseMode, EaseType};
use sketch_core::math::{self, Vec2, Vec3};

pub fn register(reg: &mut Registry) -> Result<(), RegistrationError> {
    bind_fn!(reg, "random", |s| -> f32 { s.rng.next_f32() });
    bind_fn!(reg, "random", |s, max: f32| -> f32 { s.rng.range(0.0, max) });
    bind_fn!(reg, "random", |s, min: f32, max: f32| -> f32 { s.rng.range(min, max) });
    bind_fn!(reg, "randomSeed", |s, seed: f64| -> () { s.reseed(seed.abs() as u64) });

    bind_fn!(reg, "noise", |s, x: f32| -> f32 { s.noise.noise1(x) });
    bind_fn!(reg, "noise", |s, x: f32, y: f32| -> f32 { s.noise.noise2(x, y) });
    bind_fn!(reg, "noise", |s, x: f32, y: f32, z: f32| -> f32 { s.noise.noise3(x, y, z) });

    bind_fn!(reg, "lerp", |s, a: f32, b: f32, t: f32| -> f32 { math::lerp(a, b, t) });
    bind_fn!(reg, "clamp", |s, value: f32, min: f32, max: f32| -> f32 {
        math::clamp(value, min, max)
    });
    bind_fn!(reg, "map", |s, value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32| -> f32 {
        math::map(value, in_min, in_max, out_min, out_max)
    });
    bind_fn!(reg, "radians", |s, degrees: f32| -> f32 { math::deg_to_rad(degrees) });
    bind_fn!(reg, "degrees", |s, radians: f32| -> f32 { math::rad_to_deg(radians) });
    bind_fn!(reg, "dist", |s, x1: f32, y1: f32, x2: f32, y2: f32| -> f32 {
        math::dist(x1, y1, x2, y2)
    });
    bind_fn!(reg, "dist", |s, a: Vec2, b: Vec2| -> f32 { a.distance(b) });
    bind_fn!(reg, "dist", |s, a: Vec3, b: Vec3| -> f32 { a.distance(b) });
    bind_fn!(reg, "ease", |s, t: f32, kind: EaseType, mode: EaseMode| -> f32 { ease(t, kind, mode) });

    bind_fn!(reg, "sin", |s, x: f64| -> f64 { x.sin() });
    bind_fn!(reg, "cos", |s, x: f64| -> f64 { x.cos() });
    bind_fn!(reg, "tan", |s, x: f64| -> f64 { x.tan() });
    bind_fn!(reg, "asin", |s, x: f64| -> f64 { x.asin() });
    bind_fn!(reg, "acos", |s, x: f64| -> f64 { x.acos() });
    bind_fn!(reg, "atan", |s, x: f64| -> f64 { x.atan() });
    bind_fn!(reg, "atan2", |s, y: f64, x: f64| -> f64 { y.atan2(x) });
    bind_fn!(reg, "abs", |s, x: f64| -> f64 { x.abs() });
    bind_fn!(reg, "sqrt", |s, x: f64| -> f64 { x.sqrt() });
    bind_fn!(reg, "pow", |s, base: f64, exponent: f64| -> f64 { base.powf(exponent) });
    bind_fn!(reg, "exp", |s, x: f64| -> f64 { x.exp() });
    bind_fn!(reg, "ln", |s, x: f64| -> f64 { x.ln() });
    bind_fn!(reg, "min", |s, a: f64, b: f64| -> f64 { a.min(b) });
    bind_fn!(reg, "max", |s, a: f64, b: f64| -> f64 { a.max(b) });
    bind_fn!(reg, "floor", |s, x: f64| -> f64 { x.floor() });
    bind_fn!(reg, "ceil", |s, x: f64| -> f64 { x.ceil() });
    bind_fn!(reg, "round", |s, x: f64| -> f64 { x.round() });
    bind_fn!(reg, "fmod", |s, x: f64, y: f64| -> f64 { x % y });
    bind_fn!(reg, "sign", |s, x: f64| -> f64 {
        if x > 0.0 {
            1.0
        } else if x < 0.0 {
            -1.0
        } else {
            0.0
        }
    });
    Ok(())
}
