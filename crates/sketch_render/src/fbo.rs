//! Offscreen render targets

use crate::image::Texture;
use crate::renderer::Renderer;
use sketch_core::math::Rect;

/// Render target backed by its own texture.
#[derive(Debug, Clone, Default)]
pub struct Fbo {
    texture: Texture,
    active: bool,
}

impl Fbo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, width: u32, height: u32) {
        self.texture.allocate(width, height);
    }

    pub fn is_allocated(&self) -> bool {
        self.texture.is_allocated()
    }

    pub fn width(&self) -> u32 {
        self.texture.width()
    }

    pub fn height(&self) -> u32 {
        self.texture.height()
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Redirect drawing into this target. Returns `false` if unallocated.
    pub fn begin(&mut self, renderer: &mut Renderer) -> bool {
        if !self.is_allocated() {
            tracing::warn!("render target begin before allocate");
            return false;
        }
        renderer.begin_target(self.texture.id(), self.width(), self.height());
        self.active = true;
        true
    }

    pub fn end(&mut self, renderer: &mut Renderer) {
        if !self.active {
            tracing::warn!("render target end without begin");
            return;
        }
        renderer.end_target();
        self.active = false;
    }

    pub fn draw(&self, renderer: &mut Renderer, x: f32, y: f32) {
        self.draw_sized(renderer, Rect::new(x, y, self.width() as f32, self.height() as f32));
    }

    pub fn draw_sized(&self, renderer: &mut Renderer, rect: Rect) {
        renderer.draw_texture(&self.texture, rect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::DrawCommand;

    #[test]
    fn begin_requires_allocation() {
        let mut renderer = Renderer::default();
        let mut fbo = Fbo::new();
        assert!(!fbo.begin(&mut renderer));
        fbo.allocate(64, 32);
        assert!(fbo.begin(&mut renderer));
        fbo.end(&mut renderer);
        fbo.end(&mut renderer);
        assert_eq!(renderer.target_depth(), 0);
        assert_eq!(renderer.fault_count(), 0);

        let frame = renderer.take_frame();
        assert!(matches!(frame.commands[0], DrawCommand::BeginTarget { width: 64, height: 32, .. }));
        assert!(frame.commands.iter().any(|c| matches!(c, DrawCommand::EndTarget)));
    }
}
