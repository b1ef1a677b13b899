//! Pixel buffers, textures and images

use sketch_core::math::Color;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_TEXTURE_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies texture storage inside recorded commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

impl TextureId {
    fn next() -> Self {
        TextureId(NEXT_TEXTURE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// CPU-side RGBA8 pixel buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pixels {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Pixels {
    pub const CHANNELS: usize = 4;

    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a transparent-black buffer, discarding previous contents.
    pub fn allocate(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.data = vec![0; width as usize * height as usize * Self::CHANNELS];
    }

    /// Adopt existing RGBA8 data; `None` when the length does not match.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        (data.len() == width as usize * height as usize * Self::CHANNELS).then_some(Self {
            width,
            height,
            data,
        })
    }

    pub fn is_allocated(&self) -> bool {
        !self.data.is_empty()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        let (x, y) = (u32::try_from(x).ok()?, u32::try_from(y).ok()?);
        (x < self.width && y < self.height)
            .then(|| (y as usize * self.width as usize + x as usize) * Self::CHANNELS)
    }

    pub fn get_color(&self, x: i32, y: i32) -> Option<Color> {
        let at = self.offset(x, y)?;
        let p = &self.data[at..at + Self::CHANNELS];
        Some(Color::from_rgba8(p[0], p[1], p[2], p[3]))
    }

    /// Returns `false` when the coordinate is outside the buffer.
    pub fn set_color(&mut self, x: i32, y: i32, color: Color) -> bool {
        let Some(at) = self.offset(x, y) else {
            tracing::warn!(x, y, width = self.width, height = self.height, "pixel write out of range");
            return false;
        };
        self.data[at..at + Self::CHANNELS].copy_from_slice(&color.to_rgba8());
        true
    }

    pub fn fill(&mut self, color: Color) {
        let rgba = color.to_rgba8();
        for pixel in self.data.chunks_exact_mut(Self::CHANNELS) {
            pixel.copy_from_slice(&rgba);
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Drawable texture storage.
#[derive(Debug, Clone)]
pub struct Texture {
    id: TextureId,
    width: u32,
    height: u32,
    pixels: Option<Pixels>,
}

impl Texture {
    pub fn new() -> Self {
        Self {
            id: TextureId::next(),
            width: 0,
            height: 0,
            pixels: None,
        }
    }

    pub fn allocate(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        let mut pixels = Pixels::new();
        pixels.allocate(width, height);
        self.pixels = Some(pixels);
    }

    /// Upload a copy of `pixels`, resizing as needed.
    pub fn load_data(&mut self, pixels: &Pixels) {
        self.width = pixels.width();
        self.height = pixels.height();
        self.pixels = Some(pixels.clone());
    }

    pub fn id(&self) -> TextureId {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_allocated(&self) -> bool {
        self.pixels.is_some()
    }

    pub fn pixels(&self) -> Option<&Pixels> {
        self.pixels.as_ref()
    }
}

impl Default for Texture {
    fn default() -> Self {
        Self::new()
    }
}

/// Pixels plus a texture that is re-uploaded on `update`.
#[derive(Debug, Clone, Default)]
pub struct Image {
    pixels: Pixels,
    texture: Texture,
    dirty: bool,
}

impl Image {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pixels(pixels: Pixels) -> Self {
        let mut texture = Texture::new();
        texture.load_data(&pixels);
        Self {
            pixels,
            texture,
            dirty: false,
        }
    }

    pub fn allocate(&mut self, width: u32, height: u32) {
        self.pixels.allocate(width, height);
        self.dirty = true;
    }

    pub fn set_pixels(&mut self, pixels: Pixels) {
        self.pixels = pixels;
        self.dirty = true;
    }

    pub fn pixels(&self) -> &Pixels {
        &self.pixels
    }

    pub fn get_color(&self, x: i32, y: i32) -> Option<Color> {
        self.pixels.get_color(x, y)
    }

    pub fn set_color(&mut self, x: i32, y: i32, color: Color) -> bool {
        let written = self.pixels.set_color(x, y, color);
        self.dirty |= written;
        written
    }

    /// Push pixel edits to the texture.
    pub fn update(&mut self) {
        if self.dirty {
            self.texture.load_data(&self.pixels);
            self.dirty = false;
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn is_allocated(&self) -> bool {
        self.pixels.is_allocated()
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_access_is_bounds_checked() {
        let mut pixels = Pixels::new();
        pixels.allocate(2, 2);
        assert!(pixels.set_color(1, 1, Color::rgb(1.0, 0.0, 0.0)));
        assert!(!pixels.set_color(2, 0, Color::WHITE));
        assert!(!pixels.set_color(-1, 0, Color::WHITE));
        assert_eq!(pixels.get_color(1, 1), Some(Color::rgb(1.0, 0.0, 0.0)));
        assert_eq!(pixels.get_color(0, 5), None);
    }

    #[test]
    fn from_rgba_checks_length() {
        assert!(Pixels::from_rgba(2, 1, vec![0; 8]).is_some());
        assert!(Pixels::from_rgba(2, 1, vec![0; 7]).is_none());
    }

    #[test]
    fn textures_get_distinct_ids() {
        assert_ne!(Texture::new().id(), Texture::new().id());
    }

    #[test]
    fn image_update_uploads_edits() {
        let mut image = Image::new();
        image.allocate(4, 4);
        image.set_color(0, 0, Color::BLACK);
        assert!(!image.texture().is_allocated());
        image.update();
        assert_eq!(image.texture().width(), 4);
        assert_eq!(
            image.texture().pixels().and_then(|p| p.get_color(0, 0)),
            Some(Color::BLACK)
        );
    }
}
