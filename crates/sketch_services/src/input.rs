//! Input state fed by the embedding environment's events

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    pub fn from_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(MouseButton::Left),
            1 => Some(MouseButton::Right),
            2 => Some(MouseButton::Middle),
            _ => None,
        }
    }

    fn bit(index: i32) -> u32 {
        1u32 << (index.clamp(0, 31) as u32)
    }
}

/// Pointer and keyboard state as seen by script queries.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    mouse_x: f32,
    mouse_y: f32,
    prev_mouse_x: f32,
    prev_mouse_y: f32,
    buttons: u32,
    scroll_x: f32,
    scroll_y: f32,
    keys: HashSet<i32>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        self.prev_mouse_x = self.mouse_x;
        self.prev_mouse_y = self.mouse_y;
        self.mouse_x = x;
        self.mouse_y = y;
    }

    pub fn press_button(&mut self, x: f32, y: f32, button: i32) {
        self.move_to(x, y);
        self.buttons |= MouseButton::bit(button);
    }

    pub fn release_button(&mut self, x: f32, y: f32, button: i32) {
        self.move_to(x, y);
        self.buttons &= !MouseButton::bit(button);
    }

    pub fn scroll(&mut self, dx: f32, dy: f32) {
        self.scroll_x += dx;
        self.scroll_y += dy;
    }

    pub fn press_key(&mut self, key: i32) {
        self.keys.insert(key);
    }

    pub fn release_key(&mut self, key: i32) {
        self.keys.remove(&key);
    }

    /// Clears pressed state; used when a new script takes over.
    pub fn release_all(&mut self) {
        self.buttons = 0;
        self.keys.clear();
        self.scroll_x = 0.0;
        self.scroll_y = 0.0;
    }

    pub fn mouse_x(&self) -> f32 {
        self.mouse_x
    }

    pub fn mouse_y(&self) -> f32 {
        self.mouse_y
    }

    pub fn prev_mouse_x(&self) -> f32 {
        self.prev_mouse_x
    }

    pub fn prev_mouse_y(&self) -> f32 {
        self.prev_mouse_y
    }

    pub fn is_mouse_pressed(&self) -> bool {
        self.buttons != 0
    }

    pub fn is_button_pressed(&self, button: i32) -> bool {
        self.buttons & MouseButton::bit(button) != 0
    }

    pub fn is_key_pressed(&self, key: i32) -> bool {
        self.keys.contains(&key)
    }

    /// Accumulated wheel travel.
    pub fn scroll_delta(&self) -> (f32, f32) {
        (self.scroll_x, self.scroll_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_buttons_and_previous_position() {
        let mut input = InputState::new();
        input.move_to(10.0, 20.0);
        input.press_button(12.0, 22.0, 0);
        assert!(input.is_mouse_pressed());
        assert!(input.is_button_pressed(0));
        assert!(!input.is_button_pressed(1));
        assert_eq!((input.prev_mouse_x(), input.prev_mouse_y()), (10.0, 20.0));
        input.release_button(12.0, 22.0, 0);
        assert!(!input.is_mouse_pressed());
    }

    #[test]
    fn keys_are_a_set() {
        let mut input = InputState::new();
        input.press_key(65);
        input.press_key(65);
        assert!(input.is_key_pressed(65));
        input.release_key(65);
        assert!(!input.is_key_pressed(65));
    }

    #[test]
    fn release_all_clears_everything() {
        let mut input = InputState::new();
        input.press_button(0.0, 0.0, 2);
        input.press_key(1);
        input.scroll(0.0, 3.0);
        input.release_all();
        assert!(!input.is_mouse_pressed());
        assert!(!input.is_key_pressed(1));
        assert_eq!(input.scroll_delta(), (0.0, 0.0));
    }
}
