//! Value types: factories, conversions and operator methods

use crate::error::{MarshalError, RegistrationError};
use crate::registry::Registry;
use sketch_core::math::{Color, Mat4, Quat, Rect, Vec2, Vec3};

pub fn register(reg: &mut Registry) -> Result<(), RegistrationError> {
    vec2(reg)?;
    vec3(reg)?;
    color(reg)?;
    rect(reg)?;
    mat4(reg)?;
    quat(reg)?;
    Ok(())
}

fn vec2(reg: &mut Registry) -> Result<(), RegistrationError> {
    bind_fn!(reg, "Vec2", |s| -> Vec2 { Vec2::ZERO });
    bind_fn!(reg, "Vec2", |s, x: f32, y: f32| -> Vec2 { Vec2::new(x, y) });
    bind_fn!(reg, "Vec2", |s, v: Vec2| -> Vec2 { v });
    bind_fn!(reg, "Vec2", |s, v: Vec3| -> Vec2 { v.truncate() });

    bind_method!(reg, "Vec2", "add", |s, a: Vec2, b: Vec2| -> Vec2 { a + b });
    bind_method!(reg, "Vec2", "sub", |s, a: Vec2, b: Vec2| -> Vec2 { a - b });
    bind_method!(reg, "Vec2", "mul", |s, a: Vec2, k: f32| -> Vec2 { a * k });
    bind_method!(reg, "Vec2", "mul", |s, a: Vec2, b: Vec2| -> Vec2 { a * b });
    bind_method!(reg, "Vec2", "div", |s, a: Vec2, k: f32| -> Vec2 { a / k });
    bind_method!(reg, "Vec2", "neg", |s, a: Vec2| -> Vec2 { -a });
    bind_method!(reg, "Vec2", "equals", |s, a: Vec2, b: Vec2| -> bool { a == b });
    bind_method!(reg, "Vec2", "length", |s, a: Vec2| -> f32 { a.length() });
    bind_method!(reg, "Vec2", "normalized", |s, a: Vec2| -> Vec2 { a.normalize_or_zero() });
    bind_method!(reg, "Vec2", "dot", |s, a: Vec2, b: Vec2| -> f32 { a.dot(b) });
    bind_method!(reg, "Vec2", "distance", |s, a: Vec2, b: Vec2| -> f32 { a.distance(b) });
    bind_method!(reg, "Vec2", "lerp", |s, a: Vec2, b: Vec2, t: f32| -> Vec2 { a.lerp(b, t) });
    bind_method!(reg, "Vec2", "toString", |s, a: Vec2| -> String {
        format!("Vec2({}, {})", a.x, a.y)
    });
    Ok(())
}

fn vec3(reg: &mut Registry) -> Result<(), RegistrationError> {
    bind_fn!(reg, "Vec3", |s| -> Vec3 { Vec3::ZERO });
    bind_fn!(reg, "Vec3", |s, x: f32, y: f32, z: f32| -> Vec3 { Vec3::new(x, y, z) });
    bind_fn!(reg, "Vec3", |s, v: Vec3| -> Vec3 { v });
    bind_fn!(reg, "Vec3", |s, v: Vec2| -> Vec3 { v.extend(0.0) });
    bind_fn!(reg, "Vec3", |s, v: Vec2, z: f32| -> Vec3 { v.extend(z) });

    bind_method!(reg, "Vec3", "add", |s, a: Vec3, b: Vec3| -> Vec3 { a + b });
    bind_method!(reg, "Vec3", "sub", |s, a: Vec3, b: Vec3| -> Vec3 { a - b });
    bind_method!(reg, "Vec3", "mul", |s, a: Vec3, k: f32| -> Vec3 { a * k });
    bind_method!(reg, "Vec3", "mul", |s, a: Vec3, b: Vec3| -> Vec3 { a * b });
    bind_method!(reg, "Vec3", "div", |s, a: Vec3, k: f32| -> Vec3 { a / k });
    bind_method!(reg, "Vec3", "neg", |s, a: Vec3| -> Vec3 { -a });
    bind_method!(reg, "Vec3", "equals", |s, a: Vec3, b: Vec3| -> bool { a == b });
    bind_method!(reg, "Vec3", "length", |s, a: Vec3| -> f32 { a.length() });
    bind_method!(reg, "Vec3", "normalized", |s, a: Vec3| -> Vec3 { a.normalize_or_zero() });
    bind_method!(reg, "Vec3", "dot", |s, a: Vec3, b: Vec3| -> f32 { a.dot(b) });
    bind_method!(reg, "Vec3", "cross", |s, a: Vec3, b: Vec3| -> Vec3 { a.cross(b) });
    bind_method!(reg, "Vec3", "distance", |s, a: Vec3, b: Vec3| -> f32 { a.distance(b) });
    bind_method!(reg, "Vec3", "lerp", |s, a: Vec3, b: Vec3, t: f32| -> Vec3 { a.lerp(b, t) });
    bind_method!(reg, "Vec3", "toString", |s, a: Vec3| -> String {
        format!("Vec3({}, {}, {})", a.x, a.y, a.z)
    });
    Ok(())
}

fn color(reg: &mut Registry) -> Result<(), RegistrationError> {
    bind_fn!(reg, "Color", |s| -> Color { Color::default() });
    bind_fn!(reg, "Color", |s, gray: f32| -> Color { Color::gray(gray) });
    bind_fn!(reg, "Color", |s, gray: f32, a: f32| -> Color { Color::gray(gray).with_alpha(a) });
    bind_fn!(reg, "Color", |s, r: f32, g: f32, b: f32| -> Color { Color::rgb(r, g, b) });
    bind_fn!(reg, "Color", |s, r: f32, g: f32, b: f32, a: f32| -> Color {
        Color::new(r, g, b, a)
    });
    bind_fn!(reg, "Color", |s, c: Color| -> Color { c });
    bind_fn!(reg, "colorFromHSB", |s, h: f32, sat: f32, b: f32| -> Color {
        Color::from_hsb(h, sat, b)
    });
    bind_fn!(reg, "colorFromHSB", |s, h: f32, sat: f32, b: f32, a: f32| -> Color {
        Color::from_hsb(h, sat, b).with_alpha(a)
    });
    bind_fn!(reg, "colorFromHex", |s, hex: u32| -> Color { Color::from_hex(hex) });
    bind_fn!(reg, "colorFromHex", |s, hex: u32, a: f32| -> Color {
        Color::from_hex(hex).with_alpha(a)
    });

    bind_method!(reg, "Color", "add", |s, a: Color, b: Color| -> Color { a + b });
    bind_method!(reg, "Color", "sub", |s, a: Color, b: Color| -> Color { a - b });
    bind_method!(reg, "Color", "mul", |s, a: Color, k: f32| -> Color { a * k });
    bind_method!(reg, "Color", "div", |s, a: Color, k: f32| -> Color { a / k });
    bind_method!(reg, "Color", "equals", |s, a: Color, b: Color| -> bool { a == b });
    bind_method!(reg, "Color", "lerp", |s, a: Color, b: Color, t: f32| -> Color { a.lerp(b, t) });
    bind_method!(reg, "Color", "withAlpha", |s, c: Color, a: f32| -> Color { c.with_alpha(a) });
    bind_method!(reg, "Color", "toString", |s, c: Color| -> String {
        format!("Color({}, {}, {}, {})", c.r, c.g, c.b, c.a)
    });
    Ok(())
}

fn rect(reg: &mut Registry) -> Result<(), RegistrationError> {
    bind_fn!(reg, "Rect", |s| -> Rect { Rect::default() });
    bind_fn!(reg, "Rect", |s, x: f32, y: f32, w: f32, h: f32| -> Rect { Rect::new(x, y, w, h) });
    bind_fn!(reg, "Rect", |s, position: Vec2, size: Vec2| -> Rect {
        Rect::new(position.x, position.y, size.x, size.y)
    });
    bind_fn!(reg, "Rect", |s, r: Rect| -> Rect { r });

    bind_method!(reg, "Rect", "contains", |s, r: Rect, point: Vec2| -> bool { r.contains(point) });
    bind_method!(reg, "Rect", "contains", |s, r: Rect, x: f32, y: f32| -> bool {
        r.contains(Vec2::new(x, y))
    });
    bind_method!(reg, "Rect", "center", |s, r: Rect| -> Vec2 { r.center() });
    bind_method!(reg, "Rect", "equals", |s, a: Rect, b: Rect| -> bool { a == b });
    bind_method!(reg, "Rect", "toString", |s, r: Rect| -> String {
        format!("Rect({}, {}, {}, {})", r.x, r.y, r.width, r.height)
    });
    Ok(())
}

fn mat4(reg: &mut Registry) -> Result<(), RegistrationError> {
    bind_fn!(reg, "Mat4", |s| -> Mat4 { Mat4::IDENTITY });
    bind_fn!(reg, "Mat4", |s, m: Mat4| -> Mat4 { m });
    bind_fn!(reg, "Mat4", |s, cols: Vec<f32>| -> Mat4 {
        let cols: [f32; 16] = cols.try_into().map_err(|_| MarshalError::Field {
            type_name: "Mat4",
            field: "m",
        })?;
        Mat4::from_cols_array(&cols)
    });
    bind_fn!(reg, "mat4Translation", |s, x: f32, y: f32, z: f32| -> Mat4 {
        Mat4::from_translation(Vec3::new(x, y, z))
    });
    bind_fn!(reg, "mat4Translation", |s, v: Vec3| -> Mat4 { Mat4::from_translation(v) });
    bind_fn!(reg, "mat4Rotation", |s, radians: f32, axis: Vec3| -> Mat4 {
        Mat4::from_axis_angle(axis.normalize_or_zero(), radians)
    });
    bind_fn!(reg, "mat4Scale", |s, x: f32, y: f32, z: f32| -> Mat4 {
        Mat4::from_scale(Vec3::new(x, y, z))
    });
    bind_fn!(reg, "mat4Scale", |s, k: f32| -> Mat4 { Mat4::from_scale(Vec3::splat(k)) });
    bind_fn!(reg, "getCurrentMatrix", |s| -> Mat4 { s.renderer.current_matrix() });

    bind_method!(reg, "Mat4", "mul", |s, a: Mat4, b: Mat4| -> Mat4 { a * b });
    bind_method!(reg, "Mat4", "mul", |s, m: Mat4, v: Vec3| -> Vec3 { m.transform_point3(v) });
    bind_method!(reg, "Mat4", "inverse", |s, m: Mat4| -> Mat4 { m.inverse() });
    bind_method!(reg, "Mat4", "transposed", |s, m: Mat4| -> Mat4 { m.transpose() });
    bind_method!(reg, "Mat4", "equals", |s, a: Mat4, b: Mat4| -> bool { a == b });
    Ok(())
}

fn quat(reg: &mut Registry) -> Result<(), RegistrationError> {
    bind_fn!(reg, "Quat", |s| -> Quat { Quat::IDENTITY });
    bind_fn!(reg, "Quat", |s, x: f32, y: f32, z: f32, w: f32| -> Quat {
        Quat::from_xyzw(x, y, z, w)
    });
    bind_fn!(reg, "Quat", |s, q: Quat| -> Quat { q });
    bind_fn!(reg, "quatFromAxisAngle", |s, axis: Vec3, radians: f32| -> Quat {
        Quat::from_axis_angle(axis.normalize_or_zero(), radians)
    });
    bind_fn!(reg, "quatFromEuler", |s, x: f32, y: f32, z: f32| -> Quat {
        Quat::from_euler(glam::EulerRot::XYZ, x, y, z)
    });

    bind_method!(reg, "Quat", "mul", |s, a: Quat, b: Quat| -> Quat { a * b });
    bind_method!(reg, "Quat", "rotate", |s, q: Quat, v: Vec3| -> Vec3 { q * v });
    bind_method!(reg, "Quat", "normalized", |s, q: Quat| -> Quat { q.normalize() });
    bind_method!(reg, "Quat", "slerp", |s, a: Quat, b: Quat, t: f32| -> Quat { a.slerp(b, t) });
    bind_method!(reg, "Quat", "equals", |s, a: Quat, b: Quat| -> bool { a == b });
    bind_method!(reg, "Quat", "toString", |s, q: Quat| -> String {
        format!("Quat({}, {}, {}, {})", q.x, q.y, q.z, q.w)
    });
    Ok(())
}
