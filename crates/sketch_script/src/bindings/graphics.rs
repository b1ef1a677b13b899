//! Drawing primitives and style state

use crate::error::RegistrationError;
use crate::registry::Registry;
use sketch_core::math::{Color, Rect, Vec2, Vec3};
use sketch_render::{Direction, StrokeCap, StrokeJoin};

pub fn register(reg: &mut Registry) -> Result<(), RegistrationError> {
    // clear/setColor: gray, gray + alpha, rgb, rgba, Color
    bind_fn!(reg, "clear", |s, gray: f32| -> () { s.renderer.clear(Color::gray(gray)) });
    bind_fn!(reg, "clear", |s, gray: f32, a: f32| -> () {
        s.renderer.clear(Color::gray(gray).with_alpha(a))
    });
    bind_fn!(reg, "clear", |s, r: f32, g: f32, b: f32| -> () {
        s.renderer.clear(Color::rgb(r, g, b))
    });
    bind_fn!(reg, "clear", |s, r: f32, g: f32, b: f32, a: f32| -> () {
        s.renderer.clear(Color::new(r, g, b, a))
    });
    bind_fn!(reg, "clear", |s, color: Color| -> () { s.renderer.clear(color) });

    bind_fn!(reg, "setColor", |s, gray: f32| -> () { s.renderer.set_color(Color::gray(gray)) });
    bind_fn!(reg, "setColor", |s, gray: f32, a: f32| -> () {
        s.renderer.set_color(Color::gray(gray).with_alpha(a))
    });
    bind_fn!(reg, "setColor", |s, r: f32, g: f32, b: f32| -> () {
        s.renderer.set_color(Color::rgb(r, g, b))
    });
    bind_fn!(reg, "setColor", |s, r: f32, g: f32, b: f32, a: f32| -> () {
        s.renderer.set_color(Color::new(r, g, b, a))
    });
    bind_fn!(reg, "setColor", |s, color: Color| -> () { s.renderer.set_color(color) });

    bind_fn!(reg, "drawRect", |s, x: f32, y: f32, w: f32, h: f32| -> () {
        s.renderer.draw_rect(Rect::new(x, y, w, h))
    });
    bind_fn!(reg, "drawRect", |s, rect: Rect| -> () { s.renderer.draw_rect(rect) });
    bind_fn!(reg, "drawCircle", |s, x: f32, y: f32, radius: f32| -> () {
        s.renderer.draw_circle(Vec2::new(x, y), radius)
    });
    bind_fn!(reg, "drawCircle", |s, center: Vec2, radius: f32| -> () {
        s.renderer.draw_circle(center, radius)
    });
    bind_fn!(reg, "drawEllipse", |s, x: f32, y: f32, w: f32, h: f32| -> () {
        s.renderer.draw_ellipse(Vec2::new(x, y), Vec2::new(w, h))
    });
    bind_fn!(reg, "drawEllipse", |s, center: Vec2, size: Vec2| -> () {
        s.renderer.draw_ellipse(center, size)
    });
    bind_fn!(reg, "drawLine", |s, x1: f32, y1: f32, x2: f32, y2: f32| -> () {
        s.renderer.draw_line(Vec3::new(x1, y1, 0.0), Vec3::new(x2, y2, 0.0))
    });
    bind_fn!(reg, "drawLine", |s, from: Vec3, to: Vec3| -> () { s.renderer.draw_line(from, to) });
    bind_fn!(reg, "drawTriangle", |s, x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32| -> () {
        s.renderer
            .draw_triangle(Vec2::new(x1, y1), Vec2::new(x2, y2), Vec2::new(x3, y3))
    });
    bind_fn!(reg, "drawTriangle", |s, a: Vec2, b: Vec2, c: Vec2| -> () {
        s.renderer.draw_triangle(a, b, c)
    });
    bind_fn!(reg, "drawPoint", |s, x: f32, y: f32| -> () {
        s.renderer.draw_point(Vec3::new(x, y, 0.0))
    });
    bind_fn!(reg, "drawPoint", |s, x: f32, y: f32, z: f32| -> () {
        s.renderer.draw_point(Vec3::new(x, y, z))
    });
    bind_fn!(reg, "drawPoint", |s, at: Vec3| -> () { s.renderer.draw_point(at) });
    bind_fn!(reg, "drawText", |s, text: String, x: f32, y: f32| -> () {
        s.renderer.draw_text(&text, Vec2::new(x, y))
    });
    bind_fn!(reg, "drawText", |s, text: String, at: Vec2| -> () { s.renderer.draw_text(&text, at) });
    bind_fn!(reg, "drawText", |s, text: String, x: f32, y: f32, size: f32| -> () {
        s.renderer.draw_text_sized(&text, Vec2::new(x, y), size)
    });

    bind_fn!(reg, "setTextAlign", |s, first: Direction, second: Direction| -> () {
        s.renderer.set_text_align(first, second)
    });
    bind_fn!(reg, "fill", |s| -> () { s.renderer.fill() });
    bind_fn!(reg, "noFill", |s| -> () { s.renderer.no_fill() });
    bind_fn!(reg, "stroke", |s| -> () { s.renderer.stroke() });
    bind_fn!(reg, "noStroke", |s| -> () { s.renderer.no_stroke() });
    bind_fn!(reg, "setStrokeWeight", |s, weight: f32| -> () {
        s.renderer.set_stroke_weight(weight)
    });
    bind_fn!(reg, "setStrokeCap", |s, cap: StrokeCap| -> () { s.renderer.set_stroke_cap(cap) });
    bind_fn!(reg, "setStrokeJoin", |s, join: StrokeJoin| -> () {
        s.renderer.set_stroke_join(join)
    });
    bind_fn!(reg, "pushStyle", |s| -> () { s.renderer.push_style() });
    bind_fn!(reg, "popStyle", |s| -> () { s.renderer.pop_style() });
    Ok(())
}
