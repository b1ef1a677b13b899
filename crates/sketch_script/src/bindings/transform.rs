//! Matrix stack and projection setup

use crate::error::RegistrationError;
use crate::registry::Registry;
use sketch_core::math::{Mat4, Vec2, Vec3};
use sketch_render::renderer::DEFAULT_FOV_DEG;

pub fn register(reg: &mut Registry) -> Result<(), RegistrationError> {
    bind_fn!(reg, "translate", |s, x: f32, y: f32| -> () {
        s.renderer.translate(Vec3::new(x, y, 0.0))
    });
    bind_fn!(reg, "translate", |s, x: f32, y: f32, z: f32| -> () {
        s.renderer.translate(Vec3::new(x, y, z))
    });
    bind_fn!(reg, "translate", |s, offset: Vec2| -> () { s.renderer.translate(offset.extend(0.0)) });
    bind_fn!(reg, "translate", |s, offset: Vec3| -> () { s.renderer.translate(offset) });

    bind_fn!(reg, "rotate", |s, radians: f32| -> () { s.renderer.rotate_z(radians) });
    bind_fn!(reg, "rotateDeg", |s, degrees: f32| -> () { s.renderer.rotate_deg(degrees) });
    bind_fn!(reg, "rotateX", |s, radians: f32| -> () { s.renderer.rotate_x(radians) });
    bind_fn!(reg, "rotateY", |s, radians: f32| -> () { s.renderer.rotate_y(radians) });
    bind_fn!(reg, "rotateZ", |s, radians: f32| -> () { s.renderer.rotate_z(radians) });

    bind_fn!(reg, "scale", |s, k: f32| -> () { s.renderer.scale(Vec3::new(k, k, 1.0)) });
    bind_fn!(reg, "scale", |s, x: f32, y: f32| -> () { s.renderer.scale(Vec3::new(x, y, 1.0)) });
    bind_fn!(reg, "scale", |s, x: f32, y: f32, z: f32| -> () {
        s.renderer.scale(Vec3::new(x, y, z))
    });

    bind_fn!(reg, "multMatrix", |s, m: Mat4| -> () { s.renderer.multiply_matrix(m) });
    bind_fn!(reg, "pushMatrix", |s| -> () { s.renderer.push_matrix() });
    bind_fn!(reg, "popMatrix", |s| -> () { s.renderer.pop_matrix() });
    bind_fn!(reg, "resetMatrix", |s| -> () { s.renderer.reset_matrix() });

    bind_fn!(reg, "setupScreenOrtho", |s| -> () { s.renderer.setup_screen_ortho() });
    bind_fn!(reg, "setupScreenPerspective", |s| -> () {
        s.renderer.setup_screen_perspective(DEFAULT_FOV_DEG)
    });
    bind_fn!(reg, "setupScreenPerspective", |s, fov_deg: f32| -> () {
        s.renderer.setup_screen_perspective(fov_deg)
    });
    Ok(())
}
