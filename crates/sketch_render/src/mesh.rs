//! Vertex meshes

use glam::Vec3;
use sketch_core::math::{Color, TAU};

/// Upper bound on sphere rings; segments are twice this.
pub const MAX_SPHERE_RESOLUTION: u32 = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrimitiveMode {
    #[default]
    Triangles,
    TriangleStrip,
    TriangleFan,
    Lines,
    LineStrip,
    LineLoop,
    Points,
}

impl PrimitiveMode {
    pub const ALL: [PrimitiveMode; 7] = [
        PrimitiveMode::Triangles,
        PrimitiveMode::TriangleStrip,
        PrimitiveMode::TriangleFan,
        PrimitiveMode::Lines,
        PrimitiveMode::LineStrip,
        PrimitiveMode::LineLoop,
        PrimitiveMode::Points,
    ];

    pub fn from_index(index: i32) -> Option<Self> {
        usize::try_from(index).ok().and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveMode::Triangles => "Triangles",
            PrimitiveMode::TriangleStrip => "TriangleStrip",
            PrimitiveMode::TriangleFan => "TriangleFan",
            PrimitiveMode::Lines => "Lines",
            PrimitiveMode::LineStrip => "LineStrip",
            PrimitiveMode::LineLoop => "LineLoop",
            PrimitiveMode::Points => "Points",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    mode: PrimitiveMode,
    vertices: Vec<Vec3>,
    colors: Vec<Color>,
    indices: Vec<u32>,
    normals: Vec<Vec3>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mode: PrimitiveMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> PrimitiveMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: PrimitiveMode) {
        self.mode = mode;
    }

    pub fn add_vertex(&mut self, vertex: Vec3) {
        self.vertices.push(vertex);
    }

    pub fn add_vertices(&mut self, vertices: &[Vec3]) {
        self.vertices.extend_from_slice(vertices);
    }

    pub fn add_color(&mut self, color: Color) {
        self.colors.push(color);
    }

    pub fn add_colors(&mut self, colors: &[Color]) {
        self.colors.extend_from_slice(colors);
    }

    pub fn add_index(&mut self, index: u32) {
        self.indices.push(index);
    }

    pub fn add_indices(&mut self, indices: &[u32]) {
        self.indices.extend_from_slice(indices);
    }

    pub fn add_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    pub fn add_normal(&mut self, normal: Vec3) {
        self.normals.push(normal);
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.colors.clear();
        self.indices.clear();
        self.normals.clear();
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Every index refers to an existing vertex.
    pub fn has_valid_indices(&self) -> bool {
        let count = self.vertices.len() as u64;
        self.indices.iter().all(|&i| u64::from(i) < count)
    }

    /// Flat `width` x `height` quad in the XY plane, centred on the origin.
    pub fn plane(width: f32, height: f32) -> Self {
        let (hw, hh) = (width * 0.5, height * 0.5);
        let mut mesh = Self::new();
        mesh.add_vertices(&[
            Vec3::new(-hw, -hh, 0.0),
            Vec3::new(hw, -hh, 0.0),
            Vec3::new(hw, hh, 0.0),
            Vec3::new(-hw, hh, 0.0),
        ]);
        mesh.normals = vec![Vec3::Z; 4];
        mesh.add_triangle(0, 1, 2);
        mesh.add_triangle(0, 2, 3);
        mesh
    }

    /// Axis-aligned box centred on the origin, one quad per face.
    pub fn box_mesh(width: f32, height: f32, depth: f32) -> Self {
        let half = Vec3::new(width, height, depth) * 0.5;
        let faces: [(Vec3, Vec3, Vec3); 6] = [
            (Vec3::X, Vec3::Y, Vec3::Z),
            (Vec3::NEG_X, Vec3::Y, Vec3::NEG_Z),
            (Vec3::Y, Vec3::Z, Vec3::X),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::Y, Vec3::X),
        ];
        let mut mesh = Self::new();
        for (normal, u, v) in faces {
            let base = mesh.vertices.len() as u32;
            let center = normal * half;
            let (du, dv) = (u * half, v * half);
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                mesh.add_vertex(center + du * su + dv * sv);
                mesh.add_normal(normal);
            }
            mesh.add_triangle(base, base + 1, base + 2);
            mesh.add_triangle(base, base + 2, base + 3);
        }
        mesh
    }

    /// UV sphere with `resolution` rings and `2 * resolution` segments,
    /// `resolution` clamped to `2..=MAX_SPHERE_RESOLUTION`.
    pub fn sphere(radius: f32, resolution: u32) -> Self {
        let rings = resolution.clamp(2, MAX_SPHERE_RESOLUTION);
        let segments = rings * 2;
        let mut mesh = Self::new();
        for ring in 0..=rings {
            let theta = ring as f32 / rings as f32 * (TAU as f32 * 0.5);
            for segment in 0..=segments {
                let phi = segment as f32 / segments as f32 * TAU as f32;
                let normal = Vec3::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin());
                mesh.add_vertex(normal * radius);
                mesh.add_normal(normal);
            }
        }
        let stride = segments + 1;
        for ring in 0..rings {
            for segment in 0..segments {
                let a = ring * stride + segment;
                let b = a + stride;
                mesh.add_triangle(a, b, a + 1);
                mesh.add_triangle(a + 1, b, b + 1);
            }
        }
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_factories_have_valid_indices() {
        let plane = Mesh::plane(2.0, 2.0);
        assert_eq!(plane.vertex_count(), 4);
        assert_eq!(plane.index_count(), 6);
        assert!(plane.has_valid_indices());

        let cube = Mesh::box_mesh(1.0, 1.0, 1.0);
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.index_count(), 36);
        assert!(cube.has_valid_indices());
        assert!(cube.vertices().iter().all(|v| v.abs().max_element() <= 0.5 + 1e-6));

        let sphere = Mesh::sphere(3.0, 4);
        assert!(sphere.has_valid_indices());
        assert!(sphere.vertices().iter().all(|v| (v.length() - 3.0).abs() < 1e-4));
    }

    #[test]
    fn sphere_resolution_is_bounded() {
        let rings = MAX_SPHERE_RESOLUTION as usize;
        let sphere = Mesh::sphere(1.0, u32::MAX);
        assert_eq!(sphere.vertex_count(), (rings + 1) * (rings * 2 + 1));
        assert_eq!(sphere.index_count(), rings * rings * 2 * 6);

        let coarse = Mesh::sphere(1.0, 0);
        assert_eq!(coarse.vertex_count(), 3 * 5);
    }

    #[test]
    fn out_of_range_index_is_detected() {
        let mut mesh = Mesh::new();
        mesh.add_vertex(Vec3::ZERO);
        mesh.add_index(1);
        assert!(!mesh.has_valid_indices());
    }
}
