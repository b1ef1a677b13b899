//! Window description
//!
//! The host never opens a window itself; it only needs the initial size and
//! the current viewport so scripts can query it.

#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Sketch Playground".to_string(),
            width: 600,
            height: 600,
        }
    }
}

impl WindowConfig {
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }
}

/// Current drawable size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

impl Default for Viewport {
    fn default() -> Self {
        WindowConfig::default().viewport()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_never_collapses() {
        let viewport = Viewport::new(0, 0);
        assert_eq!((viewport.width, viewport.height), (1, 1));
        assert_eq!(Viewport::new(800, 400).aspect(), 2.0);
    }
}
