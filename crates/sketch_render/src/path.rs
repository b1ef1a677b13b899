//! Polyline paths with curve helpers

use glam::Vec3;
use sketch_core::math::{deg_to_rad, Rect};

pub const DEFAULT_CURVE_RESOLUTION: u32 = 20;
pub const MAX_CURVE_RESOLUTION: u32 = 1024;

#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    points: Vec<Vec3>,
    closed: bool,
    curve_resolution: u32,
}

impl Default for Path {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            closed: false,
            curve_resolution: DEFAULT_CURVE_RESOLUTION,
        }
    }
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vertex(&mut self, point: Vec3) {
        self.points.push(point);
    }

    pub fn add_vertices(&mut self, points: &[Vec3]) {
        self.points.extend_from_slice(points);
    }

    pub fn line_to(&mut self, point: Vec3) {
        self.add_vertex(point);
    }

    pub fn set_curve_resolution(&mut self, resolution: u32) {
        self.curve_resolution = resolution.clamp(1, MAX_CURVE_RESOLUTION);
    }

    /// Cubic bezier from the last vertex; an empty path starts at `cp1`.
    pub fn bezier_to(&mut self, cp1: Vec3, cp2: Vec3, to: Vec3) {
        let from = self.start_point(cp1);
        let steps = self.curve_resolution;
        for step in 1..=steps {
            let t = step as f32 / steps as f32;
            let u = 1.0 - t;
            let point = from * (u * u * u)
                + cp1 * (3.0 * u * u * t)
                + cp2 * (3.0 * u * t * t)
                + to * (t * t * t);
            self.points.push(point);
        }
    }

    /// Quadratic bezier from the last vertex; an empty path starts at `cp`.
    pub fn quad_bezier_to(&mut self, cp: Vec3, to: Vec3) {
        let from = self.start_point(cp);
        let steps = self.curve_resolution;
        for step in 1..=steps {
            let t = step as f32 / steps as f32;
            let u = 1.0 - t;
            self.points.push(from * (u * u) + cp * (2.0 * u * t) + to * (t * t));
        }
    }

    fn start_point(&mut self, fallback: Vec3) -> Vec3 {
        match self.points.last() {
            Some(last) => *last,
            None => {
                self.points.push(fallback);
                fallback
            }
        }
    }

    /// Elliptical arc around `center`, angles in degrees, inclusive of both ends.
    pub fn arc(&mut self, center: Vec3, radius_x: f32, radius_y: f32, start_deg: f32, end_deg: f32) {
        let steps = self.curve_resolution;
        let (start, end) = (deg_to_rad(start_deg), deg_to_rad(end_deg));
        for step in 0..=steps {
            let angle = start + (end - start) * step as f32 / steps as f32;
            self.points.push(center + Vec3::new(angle.cos() * radius_x, angle.sin() * radius_y, 0.0));
        }
    }

    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.closed = false;
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Total segment length, including the closing segment.
    pub fn perimeter(&self) -> f32 {
        let open: f32 = self.points.windows(2).map(|w| w[0].distance(w[1])).sum();
        match (self.closed, self.points.first(), self.points.last()) {
            (true, Some(first), Some(last)) => open + last.distance(*first),
            _ => open,
        }
    }

    pub fn bounding_box(&self) -> Rect {
        let Some(first) = self.points.first() else {
            return Rect::default();
        };
        let (min, max) = self
            .points
            .iter()
            .fold((*first, *first), |(min, max), p| (min.min(*p), max.max(*p)));
        Rect::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perimeter_includes_closing_segment() {
        let mut path = Path::new();
        path.add_vertex(Vec3::ZERO);
        path.line_to(Vec3::new(3.0, 0.0, 0.0));
        path.line_to(Vec3::new(3.0, 4.0, 0.0));
        assert_eq!(path.perimeter(), 7.0);
        path.close();
        assert_eq!(path.perimeter(), 12.0);
        assert_eq!(path.bounding_box(), Rect::new(0.0, 0.0, 3.0, 4.0));
    }

    #[test]
    fn curves_end_on_their_target() {
        let mut path = Path::new();
        path.set_curve_resolution(8);
        path.add_vertex(Vec3::ZERO);
        path.bezier_to(Vec3::new(0.0, 10.0, 0.0), Vec3::new(10.0, 10.0, 0.0), Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(path.len(), 9);
        assert!(path.vertices()[8].distance(Vec3::new(10.0, 0.0, 0.0)) < 1e-5);

        path.quad_bezier_to(Vec3::new(15.0, 5.0, 0.0), Vec3::new(20.0, 0.0, 0.0));
        assert_eq!(path.len(), 17);
    }

    #[test]
    fn curve_resolution_is_bounded() {
        let mut path = Path::new();
        path.set_curve_resolution(u32::MAX);
        path.add_vertex(Vec3::ZERO);
        path.quad_bezier_to(Vec3::new(1.0, 1.0, 0.0), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(path.len(), 1 + MAX_CURVE_RESOLUTION as usize);

        path.set_curve_resolution(0);
        path.quad_bezier_to(Vec3::new(3.0, 1.0, 0.0), Vec3::new(4.0, 0.0, 0.0));
        assert_eq!(path.len(), 2 + MAX_CURVE_RESOLUTION as usize);
    }

    #[test]
    fn arc_spans_requested_angles() {
        let mut path = Path::new();
        path.set_curve_resolution(4);
        path.arc(Vec3::ZERO, 2.0, 2.0, 0.0, 90.0);
        assert_eq!(path.len(), 5);
        assert!(path.vertices()[0].distance(Vec3::new(2.0, 0.0, 0.0)) < 1e-5);
        assert!(path.vertices()[4].distance(Vec3::new(0.0, 2.0, 0.0)) < 1e-5);
    }
}
