//! Drawing state machine
//!
//! Holds the style and matrix stacks, the active projection and the list of
//! commands recorded since the last [`Renderer::take_frame`]. Misuse such as
//! popping an empty stack is logged and counted, never fatal.

use crate::command::{DrawCommand, Frame, Shape};
use crate::image::{Texture, TextureId};
use crate::mesh::Mesh;
use crate::style::{Direction, StrokeCap, StrokeJoin, Style};
use crate::window::Viewport;
use glam::{Mat4, Vec2, Vec3};
use sketch_core::math::{deg_to_rad, Color, Rect};

/// Line height of the built-in bitmap font.
pub const BITMAP_LINE_HEIGHT: f32 = 16.0;
/// Default vertical field of view for `setupScreenPerspective`.
pub const DEFAULT_FOV_DEG: f32 = 60.0;

#[derive(Debug, Clone, Copy)]
struct SavedView {
    projection: Mat4,
    view: Mat4,
}

#[derive(Debug, Clone, Copy)]
struct SavedTarget {
    saved: SavedView,
    viewport: Viewport,
}

pub struct Renderer {
    viewport: Viewport,
    commands: Vec<DrawCommand>,
    style: Style,
    style_stack: Vec<Style>,
    matrix: Mat4,
    matrix_stack: Vec<Mat4>,
    projection: Mat4,
    view: Mat4,
    camera_stack: Vec<SavedView>,
    target_stack: Vec<SavedTarget>,
    faults: u64,
}

impl Renderer {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            commands: Vec::new(),
            style: Style::default(),
            style_stack: Vec::new(),
            matrix: Mat4::IDENTITY,
            matrix_stack: Vec::new(),
            projection: screen_ortho(viewport),
            view: Mat4::IDENTITY,
            camera_stack: Vec::new(),
            target_stack: Vec::new(),
            faults: 0,
        }
    }

    /// Forget all drawing state; recorded commands are kept until drained.
    pub fn reset_state(&mut self) {
        let viewport = self.target_stack.first().map_or(self.viewport, |t| t.viewport);
        let commands = std::mem::take(&mut self.commands);
        let faults = self.faults;
        *self = Self::new(viewport);
        self.commands = commands;
        self.faults = faults;
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width, height);
        if self.camera_stack.is_empty() && self.target_stack.is_empty() {
            self.projection = screen_ortho(self.viewport);
            self.view = Mat4::IDENTITY;
        }
    }

    /// Number of precondition faults (stack underflow, unmatched `end`) so far.
    pub fn fault_count(&self) -> u64 {
        self.faults
    }

    fn fault(&mut self, what: &'static str) {
        self.faults += 1;
        tracing::warn!(fault = what, "render state misuse ignored");
    }

    fn record(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_frame(&mut self) -> Frame {
        Frame {
            commands: std::mem::take(&mut self.commands),
        }
    }

    // Style

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn clear(&mut self, color: Color) {
        self.record(DrawCommand::Clear(color));
    }

    pub fn set_color(&mut self, color: Color) {
        self.style.color = color;
    }

    pub fn fill(&mut self) {
        self.style.fill = true;
    }

    pub fn no_fill(&mut self) {
        self.style.fill = false;
    }

    pub fn stroke(&mut self) {
        self.style.stroke = true;
    }

    pub fn no_stroke(&mut self) {
        self.style.stroke = false;
    }

    pub fn set_stroke_weight(&mut self, weight: f32) {
        self.style.stroke_weight = weight.max(0.0);
    }

    pub fn set_stroke_cap(&mut self, cap: StrokeCap) {
        self.style.cap = cap;
    }

    pub fn set_stroke_join(&mut self, join: StrokeJoin) {
        self.style.join = join;
    }

    /// Either axis may be given in either slot; a mismatched pair is ignored.
    pub fn set_text_align(&mut self, first: Direction, second: Direction) {
        let (h, v) = if first.is_horizontal() { (first, second) } else { (second, first) };
        if !h.is_horizontal() || v.is_horizontal() {
            self.fault("text alignment needs one horizontal and one vertical anchor");
            return;
        }
        self.style.align_h = h;
        self.style.align_v = v;
    }

    pub fn push_style(&mut self) {
        self.style_stack.push(self.style);
    }

    pub fn pop_style(&mut self) {
        match self.style_stack.pop() {
            Some(style) => self.style = style,
            None => self.fault("popStyle without pushStyle"),
        }
    }

    // Transforms

    pub fn current_matrix(&self) -> Mat4 {
        self.matrix
    }

    pub fn multiply_matrix(&mut self, matrix: Mat4) {
        self.matrix *= matrix;
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.matrix *= Mat4::from_translation(offset);
    }

    pub fn rotate_x(&mut self, radians: f32) {
        self.matrix *= Mat4::from_rotation_x(radians);
    }

    pub fn rotate_y(&mut self, radians: f32) {
        self.matrix *= Mat4::from_rotation_y(radians);
    }

    pub fn rotate_z(&mut self, radians: f32) {
        self.matrix *= Mat4::from_rotation_z(radians);
    }

    pub fn rotate_deg(&mut self, degrees: f32) {
        self.rotate_z(deg_to_rad(degrees));
    }

    pub fn scale(&mut self, factor: Vec3) {
        self.matrix *= Mat4::from_scale(factor);
    }

    pub fn push_matrix(&mut self) {
        self.matrix_stack.push(self.matrix);
    }

    pub fn pop_matrix(&mut self) {
        match self.matrix_stack.pop() {
            Some(matrix) => self.matrix = matrix,
            None => self.fault("popMatrix without pushMatrix"),
        }
    }

    pub fn reset_matrix(&mut self) {
        self.matrix = Mat4::IDENTITY;
    }

    // Projection

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }

    /// Pixel coordinates, origin top-left, y down.
    pub fn setup_screen_ortho(&mut self) {
        self.set_camera(screen_ortho(self.viewport), Mat4::IDENTITY);
    }

    /// Perspective whose z = 0 plane maps one unit to one pixel.
    pub fn setup_screen_perspective(&mut self, fov_deg: f32) {
        let (projection, view) = screen_perspective(self.viewport, fov_deg);
        self.set_camera(projection, view);
    }

    fn set_camera(&mut self, projection: Mat4, view: Mat4) {
        self.projection = projection;
        self.view = view;
        self.record(DrawCommand::SetProjection(projection));
        self.record(DrawCommand::SetView(view));
    }

    pub fn begin_camera(&mut self, view: Mat4, projection: Mat4) {
        self.camera_stack.push(SavedView {
            projection: self.projection,
            view: self.view,
        });
        self.set_camera(projection, view);
    }

    pub fn end_camera(&mut self) {
        match self.camera_stack.pop() {
            Some(saved) => self.set_camera(saved.projection, saved.view),
            None => self.fault("camera end without begin"),
        }
    }

    pub fn begin_target(&mut self, texture: TextureId, width: u32, height: u32) {
        self.target_stack.push(SavedTarget {
            saved: SavedView {
                projection: self.projection,
                view: self.view,
            },
            viewport: self.viewport,
        });
        self.viewport = Viewport::new(width, height);
        self.record(DrawCommand::BeginTarget {
            texture,
            width,
            height,
        });
        self.set_camera(screen_ortho(self.viewport), Mat4::IDENTITY);
    }

    /// Returns `false` when no target is active.
    pub fn end_target(&mut self) -> bool {
        let Some(target) = self.target_stack.pop() else {
            self.fault("render target end without begin");
            return false;
        };
        self.viewport = target.viewport;
        self.record(DrawCommand::EndTarget);
        self.set_camera(target.saved.projection, target.saved.view);
        true
    }

    pub fn target_depth(&self) -> usize {
        self.target_stack.len()
    }

    // Primitives

    fn shape(&mut self, shape: Shape) {
        let command = DrawCommand::Shape {
            shape,
            transform: self.matrix,
            style: self.style,
        };
        self.record(command);
    }

    pub fn draw_rect(&mut self, rect: Rect) {
        self.shape(Shape::Rect(rect));
    }

    pub fn draw_circle(&mut self, center: Vec2, radius: f32) {
        self.shape(Shape::Circle { center, radius });
    }

    pub fn draw_ellipse(&mut self, center: Vec2, size: Vec2) {
        self.shape(Shape::Ellipse { center, size });
    }

    pub fn draw_line(&mut self, from: Vec3, to: Vec3) {
        self.shape(Shape::Line { from, to });
    }

    pub fn draw_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2) {
        self.shape(Shape::Triangle([a, b, c]));
    }

    pub fn draw_point(&mut self, at: Vec3) {
        self.shape(Shape::Point(at));
    }

    /// Draw with the built-in bitmap font.
    pub fn draw_text(&mut self, text: &str, position: Vec2) {
        self.draw_text_sized(text, position, BITMAP_LINE_HEIGHT);
    }

    pub fn draw_text_sized(&mut self, text: &str, position: Vec2, size: f32) {
        let command = DrawCommand::Text {
            text: text.to_string(),
            position,
            size,
            align: (self.style.align_h, self.style.align_v),
            transform: self.matrix,
            color: self.style.color,
        };
        self.record(command);
    }

    pub fn draw_mesh(&mut self, mesh: &Mesh, wireframe: bool) {
        let command = DrawCommand::Mesh {
            mode: mesh.mode(),
            vertices: mesh.vertices().to_vec(),
            colors: mesh.colors().to_vec(),
            indices: mesh.indices().to_vec(),
            transform: self.matrix,
            color: self.style.color,
            wireframe,
        };
        self.record(command);
    }

    pub fn draw_texture(&mut self, texture: &Texture, rect: Rect) {
        if !texture.is_allocated() {
            self.fault("drawing an unallocated texture");
            return;
        }
        let command = DrawCommand::Texture {
            texture: texture.id(),
            rect,
            transform: self.matrix,
            tint: self.style.color,
        };
        self.record(command);
    }

    pub fn draw_polyline(&mut self, points: &[Vec3], closed: bool) {
        let command = DrawCommand::Polyline {
            points: points.to_vec(),
            closed,
            transform: self.matrix,
            style: self.style,
        };
        self.record(command);
    }

    pub fn draw_triangles(&mut self, vertices: &[Vec3], color: Color) {
        let command = DrawCommand::Triangles {
            vertices: vertices.to_vec(),
            transform: self.matrix,
            color,
        };
        self.record(command);
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

fn screen_ortho(viewport: Viewport) -> Mat4 {
    Mat4::orthographic_rh_gl(
        0.0,
        viewport.width as f32,
        viewport.height as f32,
        0.0,
        -1000.0,
        1000.0,
    )
}

fn screen_perspective(viewport: Viewport, fov_deg: f32) -> (Mat4, Mat4) {
    let fov = deg_to_rad(fov_deg.clamp(1.0, 179.0));
    let (w, h) = (viewport.width as f32, viewport.height as f32);
    let eye_distance = (h * 0.5) / (fov * 0.5).tan();
    let center = Vec3::new(w * 0.5, h * 0.5, 0.0);
    // looking down +z with y down keeps x to the right
    let view = Mat4::look_at_rh(center - Vec3::Z * eye_distance, center, Vec3::NEG_Y);
    let projection = Mat4::perspective_rh_gl(
        fov,
        viewport.aspect(),
        eye_distance / 10.0,
        eye_distance * 10.0,
    );
    (projection, view)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_stack_restores_and_counts_underflow() {
        let mut renderer = Renderer::default();
        renderer.set_color(Color::BLACK);
        renderer.push_style();
        renderer.set_color(Color::WHITE);
        renderer.no_fill();
        renderer.pop_style();
        assert_eq!(renderer.style().color, Color::BLACK);
        assert!(renderer.style().fill);
        renderer.pop_style();
        assert_eq!(renderer.fault_count(), 1);
    }

    #[test]
    fn matrix_stack_and_transforms() {
        let mut renderer = Renderer::default();
        renderer.push_matrix();
        renderer.translate(Vec3::new(10.0, 20.0, 0.0));
        renderer.scale(Vec3::splat(2.0));
        let p = renderer.current_matrix().transform_point3(Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(p, Vec3::new(12.0, 22.0, 0.0));
        renderer.pop_matrix();
        assert_eq!(renderer.current_matrix(), Mat4::IDENTITY);
        renderer.pop_matrix();
        assert_eq!(renderer.fault_count(), 1);
    }

    #[test]
    fn shapes_capture_transform_and_style() {
        let mut renderer = Renderer::default();
        renderer.translate(Vec3::new(5.0, 0.0, 0.0));
        renderer.set_color(Color::rgb(1.0, 0.0, 0.0));
        renderer.draw_circle(Vec2::ZERO, 3.0);
        let frame = renderer.take_frame();
        match &frame.commands[0] {
            DrawCommand::Shape { shape, transform, style } => {
                assert_eq!(*shape, Shape::Circle { center: Vec2::ZERO, radius: 3.0 });
                assert_eq!(transform.w_axis.x, 5.0);
                assert_eq!(style.color, Color::rgb(1.0, 0.0, 0.0));
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(renderer.commands().is_empty());
    }

    #[test]
    fn screen_ortho_maps_pixels_to_clip_space() {
        let renderer = Renderer::new(Viewport::new(200, 100));
        let top_left = renderer.projection().project_point3(Vec3::ZERO);
        let bottom_right = renderer.projection().project_point3(Vec3::new(200.0, 100.0, 0.0));
        assert!((top_left.x + 1.0).abs() < 1e-5 && (top_left.y - 1.0).abs() < 1e-5);
        assert!((bottom_right.x - 1.0).abs() < 1e-5 && (bottom_right.y + 1.0).abs() < 1e-5);
    }

    #[test]
    fn screen_perspective_keeps_the_z0_plane_pixel_aligned() {
        let mut renderer = Renderer::new(Viewport::new(200, 100));
        renderer.setup_screen_perspective(DEFAULT_FOV_DEG);
        let clip = (renderer.projection() * renderer.view()).project_point3(Vec3::new(200.0, 100.0, 0.0));
        assert!((clip.x - 1.0).abs() < 1e-3, "{clip:?}");
        assert!((clip.y + 1.0).abs() < 1e-3, "{clip:?}");
    }

    #[test]
    fn targets_swap_viewport_and_restore() {
        let mut renderer = Renderer::new(Viewport::new(640, 480));
        let texture = Texture::new();
        renderer.begin_target(texture.id(), 32, 16);
        assert_eq!(renderer.viewport(), Viewport::new(32, 16));
        assert!(renderer.end_target());
        assert_eq!(renderer.viewport(), Viewport::new(640, 480));
        assert!(!renderer.end_target());
        assert_eq!(renderer.fault_count(), 1);
    }

    #[test]
    fn text_alignment_accepts_either_order() {
        let mut renderer = Renderer::default();
        renderer.set_text_align(Direction::Top, Direction::Right);
        assert_eq!(renderer.style().align_h, Direction::Right);
        assert_eq!(renderer.style().align_v, Direction::Top);
        renderer.set_text_align(Direction::Left, Direction::Right);
        assert_eq!(renderer.fault_count(), 1);
    }

    #[test]
    fn reset_state_keeps_pending_commands() {
        let mut renderer = Renderer::default();
        renderer.clear(Color::BLACK);
        renderer.push_matrix();
        renderer.translate(Vec3::X);
        renderer.reset_state();
        assert_eq!(renderer.current_matrix(), Mat4::IDENTITY);
        assert_eq!(renderer.take_frame().clear_color(), Some(Color::BLACK));
    }
}
