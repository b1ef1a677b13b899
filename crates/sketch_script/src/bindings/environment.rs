//! Window, input and time queries

use crate::error::RegistrationError;
use crate::registry::Registry;

pub fn register(reg: &mut Registry) -> Result<(), RegistrationError> {
    bind_fn!(reg, "getWindowWidth", |s| -> u32 { s.renderer.viewport().width });
    bind_fn!(reg, "getWindowHeight", |s| -> u32 { s.renderer.viewport().height });

    bind_fn!(reg, "getMouseX", |s| -> f32 { s.input.mouse_x() });
    bind_fn!(reg, "getMouseY", |s| -> f32 { s.input.mouse_y() });
    bind_fn!(reg, "getPMouseX", |s| -> f32 { s.input.prev_mouse_x() });
    bind_fn!(reg, "getPMouseY", |s| -> f32 { s.input.prev_mouse_y() });
    bind_fn!(reg, "isMousePressed", |s| -> bool { s.input.is_mouse_pressed() });
    bind_fn!(reg, "isMousePressed", |s, button: i32| -> bool { s.input.is_button_pressed(button) });
    bind_fn!(reg, "isKeyPressed", |s, key: i32| -> bool { s.input.is_key_pressed(key) });

    bind_fn!(reg, "getElapsedTime", |s| -> f64 { s.clock.elapsed().as_secs_f64() });
    bind_fn!(reg, "getDeltaTime", |s| -> f64 { s.clock.delta().as_secs_f64() });
    bind_fn!(reg, "getFrameRate", |s| -> f64 { s.clock.fps() });
    bind_fn!(reg, "getFrameCount", |s| -> u64 { s.clock.frame_count() });
    Ok(())
}
