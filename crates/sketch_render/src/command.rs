//! Recorded draw commands

use crate::image::TextureId;
use crate::mesh::PrimitiveMode;
use crate::style::{Direction, Style};
use glam::{Mat4, Vec2, Vec3};
use sketch_core::math::{Color, Rect};

/// Primitive shapes in local (pre-transform) coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect(Rect),
    Circle { center: Vec2, radius: f32 },
    Ellipse { center: Vec2, size: Vec2 },
    Line { from: Vec3, to: Vec3 },
    Triangle([Vec2; 3]),
    Point(Vec3),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Shape {
        shape: Shape,
        transform: Mat4,
        style: Style,
    },
    Text {
        text: String,
        position: Vec2,
        size: f32,
        align: (Direction, Direction),
        transform: Mat4,
        color: Color,
    },
    Mesh {
        mode: PrimitiveMode,
        vertices: Vec<Vec3>,
        colors: Vec<Color>,
        indices: Vec<u32>,
        transform: Mat4,
        color: Color,
        wireframe: bool,
    },
    Texture {
        texture: TextureId,
        rect: Rect,
        transform: Mat4,
        tint: Color,
    },
    Polyline {
        points: Vec<Vec3>,
        closed: bool,
        transform: Mat4,
        style: Style,
    },
    Triangles {
        vertices: Vec<Vec3>,
        transform: Mat4,
        color: Color,
    },
    SetProjection(Mat4),
    SetView(Mat4),
    BeginTarget {
        texture: TextureId,
        width: u32,
        height: u32,
    },
    EndTarget,
}

/// Commands recorded since the last drain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub commands: Vec<DrawCommand>,
}

impl Frame {
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Colour of the last `Clear` in the frame.
    pub fn clear_color(&self) -> Option<Color> {
        self.commands.iter().rev().find_map(|command| match command {
            DrawCommand::Clear(color) => Some(*color),
            _ => None,
        })
    }

    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Shape { shape, .. } => Some(shape),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}
