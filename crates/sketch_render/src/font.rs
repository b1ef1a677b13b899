//! Font metrics
//!
//! Glyph rasterisation belongs to whoever consumes the recorded frame; the
//! host only validates the font file and answers layout queries.

use crate::renderer::{Renderer, BITMAP_LINE_HEIGHT};
use glam::Vec2;

/// Advance of one glyph in the built-in bitmap font.
pub const BITMAP_CHAR_WIDTH: f32 = 8.0;

const ADVANCE_RATIO: f32 = 0.6;
const LINE_HEIGHT_RATIO: f32 = 1.2;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Font {
    name: Option<String>,
    size: f32,
}

impl Font {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts TrueType, OpenType and collection files by signature.
    pub fn load_from_bytes(&mut self, name: &str, bytes: &[u8], size: f32) -> bool {
        let known = matches!(
            bytes.get(0..4),
            Some([0x00, 0x01, 0x00, 0x00]) | Some(b"OTTO") | Some(b"true") | Some(b"ttcf")
        );
        if !known || size <= 0.0 {
            return false;
        }
        self.name = Some(name.to_string());
        self.size = size;
        true
    }

    pub fn is_loaded(&self) -> bool {
        self.name.is_some()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn line_height(&self) -> f32 {
        if self.is_loaded() {
            self.size * LINE_HEIGHT_RATIO
        } else {
            BITMAP_LINE_HEIGHT
        }
    }

    fn advance(&self) -> f32 {
        if self.is_loaded() {
            self.size * ADVANCE_RATIO
        } else {
            BITMAP_CHAR_WIDTH
        }
    }

    /// Width of the longest line.
    pub fn string_width(&self, text: &str) -> f32 {
        text.lines()
            .map(|line| line.chars().count() as f32 * self.advance())
            .fold(0.0, f32::max)
    }

    pub fn string_height(&self, text: &str) -> f32 {
        text.lines().count().max(1) as f32 * self.line_height()
    }

    pub fn draw_string(&self, renderer: &mut Renderer, text: &str, x: f32, y: f32) {
        if !self.is_loaded() {
            renderer.draw_text(text, Vec2::new(x, y));
            return;
        }
        renderer.draw_text_sized(text, Vec2::new(x, y), self.line_height());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unknown_signatures() {
        let mut font = Font::new();
        assert!(!font.load_from_bytes("x", b"GIF89a", 12.0));
        assert!(!font.load_from_bytes("x", &[0, 1, 0, 0], 0.0));
        assert!(font.load_from_bytes("x", &[0, 1, 0, 0, 9], 10.0));
        assert_eq!(font.name(), Some("x"));
    }

    #[test]
    fn metrics_fall_back_to_bitmap_font() {
        let font = Font::new();
        assert_eq!(font.string_width("abcd"), 4.0 * BITMAP_CHAR_WIDTH);
        assert_eq!(font.string_height("a\nb"), 2.0 * BITMAP_LINE_HEIGHT);

        let mut loaded = Font::new();
        loaded.load_from_bytes("f", b"OTTO", 10.0);
        assert!((loaded.string_width("ab\nabc") - 18.0).abs() < 1e-5);
    }
}
