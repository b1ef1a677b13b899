//! Thick outlines tessellated into triangles
//!
//! Tessellation happens in the XY plane; each vertex keeps its own z.

use crate::path::Path;
use crate::renderer::Renderer;
use crate::style::{StrokeCap, StrokeJoin};
use glam::{Vec2, Vec3};
use sketch_core::math::Color;

const ROUND_SEGMENTS: u32 = 8;
const MITER_LIMIT: f32 = 4.0;

#[derive(Debug, Clone, PartialEq)]
pub struct StrokeMesh {
    points: Vec<Vec3>,
    closed: bool,
    width: f32,
    cap: StrokeCap,
    join: StrokeJoin,
    color: Color,
    triangles: Vec<Vec3>,
    dirty: bool,
}

impl Default for StrokeMesh {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            closed: false,
            width: 1.0,
            cap: StrokeCap::Butt,
            join: StrokeJoin::Miter,
            color: Color::WHITE,
            triangles: Vec::new(),
            dirty: false,
        }
    }
}

impl StrokeMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_width(&mut self, width: f32) {
        self.width = width.max(0.0);
        self.dirty = true;
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn set_cap(&mut self, cap: StrokeCap) {
        self.cap = cap;
        self.dirty = true;
    }

    pub fn set_join(&mut self, join: StrokeJoin) {
        self.join = join;
        self.dirty = true;
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn add_vertex(&mut self, point: Vec3) {
        self.points.push(point);
        self.dirty = true;
    }

    pub fn set_shape(&mut self, path: &Path) {
        self.points = path.vertices().to_vec();
        self.closed = path.is_closed();
        self.dirty = true;
    }

    pub fn set_closed(&mut self, closed: bool) {
        self.closed = closed;
        self.dirty = true;
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.triangles.clear();
        self.closed = false;
        self.dirty = false;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Flat triangle list, three vertices per triangle.
    pub fn triangles(&self) -> &[Vec3] {
        &self.triangles
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Rebuild the triangles after edits.
    pub fn update(&mut self) {
        self.triangles = tessellate(&self.points, self.closed, self.width * 0.5, self.cap, self.join);
        self.dirty = false;
    }

    pub fn draw(&mut self, renderer: &mut Renderer) {
        if self.dirty {
            self.update();
        }
        renderer.draw_triangles(&self.triangles, self.color);
    }
}

struct Builder {
    out: Vec<Vec3>,
}

impl Builder {
    fn tri(&mut self, a: Vec3, b: Vec3, c: Vec3) {
        self.out.extend_from_slice(&[a, b, c]);
    }

    fn quad(&mut self, a: Vec3, b: Vec3, c: Vec3, d: Vec3) {
        self.tri(a, b, c);
        self.tri(b, d, c);
    }

    /// Fan around `center` sweeping from `from` to `to` (offsets), the short way.
    fn fan(&mut self, center: Vec3, from: Vec2, to: Vec2) {
        let start = from.y.atan2(from.x);
        let mut sweep = to.y.atan2(to.x) - start;
        if sweep > std::f32::consts::PI {
            sweep -= std::f32::consts::TAU;
        } else if sweep < -std::f32::consts::PI {
            sweep += std::f32::consts::TAU;
        }
        self.arc(center, from.length(), start, sweep);
    }

    fn arc(&mut self, center: Vec3, radius: f32, start: f32, sweep: f32) {
        let mut prev = offset(center, Vec2::from_angle(start) * radius);
        for step in 1..=ROUND_SEGMENTS {
            let angle = start + sweep * step as f32 / ROUND_SEGMENTS as f32;
            let next = offset(center, Vec2::from_angle(angle) * radius);
            self.tri(center, prev, next);
            prev = next;
        }
    }
}

fn offset(point: Vec3, by: Vec2) -> Vec3 {
    Vec3::new(point.x + by.x, point.y + by.y, point.z)
}

fn direction(from: Vec3, to: Vec3) -> Option<Vec2> {
    (to.truncate() - from.truncate()).try_normalize()
}

fn tessellate(points: &[Vec3], closed: bool, half: f32, cap: StrokeCap, join: StrokeJoin) -> Vec<Vec3> {
    let mut pts: Vec<Vec3> = Vec::with_capacity(points.len());
    for p in points {
        if pts.last().map_or(true, |last: &Vec3| last.truncate().distance(p.truncate()) > f32::EPSILON) {
            pts.push(*p);
        }
    }
    if closed && pts.len() > 2 && pts[0].truncate().distance(pts[pts.len() - 1].truncate()) <= f32::EPSILON {
        pts.pop();
    }
    let mut b = Builder { out: Vec::new() };
    if pts.len() < 2 || half <= 0.0 {
        return b.out;
    }

    let closed = closed && pts.len() > 2;
    let segment_count = if closed { pts.len() } else { pts.len() - 1 };
    let segment = |i: usize| (pts[i], pts[(i + 1) % pts.len()]);

    for i in 0..segment_count {
        let (p0, p1) = segment(i);
        let Some(dir) = direction(p0, p1) else { continue };
        let n = dir.perp() * half;
        b.quad(offset(p0, n), offset(p0, -n), offset(p1, n), offset(p1, -n));
    }

    let join_count = if closed { pts.len() } else { pts.len() - 2 };
    for j in 0..join_count {
        let at = if closed { j } else { j + 1 };
        let prev = pts[(at + pts.len() - 1) % pts.len()];
        let (p, next) = (pts[at], pts[(at + 1) % pts.len()]);
        let (Some(d0), Some(d1)) = (direction(prev, p), direction(p, next)) else {
            continue;
        };
        let turn = d0.perp_dot(d1);
        if turn.abs() <= f32::EPSILON {
            continue;
        }
        // the gap opens on the outside of the turn
        let side = if turn > 0.0 { -1.0 } else { 1.0 };
        let o0 = d0.perp() * half * side;
        let o1 = d1.perp() * half * side;
        match join {
            StrokeJoin::Bevel => b.tri(p, offset(p, o0), offset(p, o1)),
            StrokeJoin::Round => b.fan(p, o0, o1),
            StrokeJoin::Miter => {
                let Some(miter) = (o0 + o1).try_normalize() else { continue };
                let cos_half = miter.dot(o0 / half);
                let length = half / cos_half.max(f32::EPSILON);
                if length / half > MITER_LIMIT {
                    b.tri(p, offset(p, o0), offset(p, o1));
                } else {
                    let tip = offset(p, miter * length);
                    b.tri(p, offset(p, o0), tip);
                    b.tri(p, tip, offset(p, o1));
                }
            }
        }
    }

    if !closed {
        let ends = [
            (pts[0], direction(pts[1], pts[0])),
            (pts[pts.len() - 1], direction(pts[pts.len() - 2], pts[pts.len() - 1])),
        ];
        for (end, outward) in ends {
            let Some(out) = outward else { continue };
            let n = out.perp() * half;
            match cap {
                StrokeCap::Butt => {}
                StrokeCap::Square => {
                    let ext = out * half;
                    b.quad(offset(end, n), offset(end, -n), offset(end, n + ext), offset(end, ext - n));
                }
                StrokeCap::Round => {
                    let start = n.y.atan2(n.x);
                    b.arc(end, half, start, -std::f32::consts::PI);
                }
            }
        }
    }

    b.out
}
