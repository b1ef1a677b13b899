//! Sketch Render Library
//!
//! Immediate-mode drawing API that records [`DrawCommand`]s instead of
//! talking to a GPU. The embedding environment drains a [`Frame`] per tick
//! and rasterises it however it likes.

pub mod camera;
pub mod command;
pub mod fbo;
pub mod font;
pub mod image;
pub mod mesh;
pub mod path;
pub mod renderer;
pub mod stroke;
pub mod style;
pub mod window;

pub use camera::OrbitCamera;
pub use command::{DrawCommand, Frame, Shape};
pub use fbo::Fbo;
pub use font::Font;
pub use image::{Image, Pixels, Texture, TextureId};
pub use mesh::{Mesh, PrimitiveMode};
pub use path::Path;
pub use renderer::Renderer;
pub use stroke::StrokeMesh;
pub use style::{Direction, StrokeCap, StrokeJoin, Style};
pub use window::{Viewport, WindowConfig};

/// Limits the recording backend enforces on allocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceCapabilities {
    pub max_texture_size: u32,
}

impl Default for DeviceCapabilities {
    fn default() -> Self {
        Self {
            max_texture_size: 8192,
        }
    }
}

impl DeviceCapabilities {
    pub fn fits(&self, width: u32, height: u32) -> bool {
        width > 0 && height > 0 && width <= self.max_texture_size && height <= self.max_texture_size
    }
}
