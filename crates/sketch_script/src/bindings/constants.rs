//! Angle constants and namespaced enumerations

use crate::error::RegistrationError;
use crate::registry::Registry;
use sketch_audio::Waveform;
use sketch_core::easing::{EaseMode, EaseType};
use sketch_core::math::{HALF_TAU, PI, QUARTER_TAU, TAU};
use sketch_render::{Direction, PrimitiveMode, StrokeCap, StrokeJoin};

/// Key codes follow the GLFW numbering the embedding shell forwards.
const KEYS: &[(&str, i32)] = &[
    ("Space", 32),
    ("Apostrophe", 39),
    ("Comma", 44),
    ("Minus", 45),
    ("Period", 46),
    ("Slash", 47),
    ("Num0", 48),
    ("Num1", 49),
    ("Num2", 50),
    ("Num3", 51),
    ("Num4", 52),
    ("Num5", 53),
    ("Num6", 54),
    ("Num7", 55),
    ("Num8", 56),
    ("Num9", 57),
    ("A", 65),
    ("B", 66),
    ("C", 67),
    ("D", 68),
    ("E", 69),
    ("F", 70),
    ("G", 71),
    ("H", 72),
    ("I", 73),
    ("J", 74),
    ("K", 75),
    ("L", 76),
    ("M", 77),
    ("N", 78),
    ("O", 79),
    ("P", 80),
    ("Q", 81),
    ("R", 82),
    ("S", 83),
    ("T", 84),
    ("U", 85),
    ("V", 86),
    ("W", 87),
    ("X", 88),
    ("Y", 89),
    ("Z", 90),
    ("Escape", 256),
    ("Enter", 257),
    ("Tab", 258),
    ("Backspace", 259),
    ("Insert", 260),
    ("Delete", 261),
    ("Right", 262),
    ("Left", 263),
    ("Down", 264),
    ("Up", 265),
    ("PageUp", 266),
    ("PageDown", 267),
    ("Home", 268),
    ("End", 269),
    ("F1", 290),
    ("F2", 291),
    ("F3", 292),
    ("F4", 293),
    ("F5", 294),
    ("F6", 295),
    ("F7", 296),
    ("F8", 297),
    ("F9", 298),
    ("F10", 299),
    ("F11", 300),
    ("F12", 301),
    ("LeftShift", 340),
    ("LeftControl", 341),
    ("LeftAlt", 342),
    ("RightShift", 344),
    ("RightControl", 345),
    ("RightAlt", 346),
];

fn members<T: Copy>(all: &[T], name: impl Fn(T) -> &'static str) -> Vec<(&'static str, i32)> {
    all.iter()
        .enumerate()
        .map(|(i, value)| (name(*value), i as i32))
        .collect()
}

pub fn register(reg: &mut Registry) -> Result<(), RegistrationError> {
    reg.add_constant("PI", PI)?;
    reg.add_constant("TAU", TAU)?;
    reg.add_constant("HALF_TAU", HALF_TAU)?;
    reg.add_constant("QUARTER_TAU", QUARTER_TAU)?;

    reg.add_enum("StrokeCap", &members(&StrokeCap::ALL, StrokeCap::name))?;
    reg.add_enum("StrokeJoin", &members(&StrokeJoin::ALL, StrokeJoin::name))?;
    reg.add_enum("EaseType", &members(&EaseType::ALL, EaseType::name))?;
    reg.add_enum("EaseMode", &members(&EaseMode::ALL, EaseMode::name))?;
    reg.add_enum("Waveform", &members(&Waveform::ALL, Waveform::name))?;
    reg.add_enum("Direction", &members(&Direction::ALL, Direction::name))?;
    reg.add_enum("PrimitiveMode", &members(&PrimitiveMode::ALL, PrimitiveMode::name))?;
    reg.add_enum("MouseButton", &[("Left", 0), ("Right", 1), ("Middle", 2)])?;
    reg.add_enum("Key", KEYS)?;
    Ok(())
}
