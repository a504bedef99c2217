//! Input state tracking

use std::collections::HashSet;
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Tracks keyboard and mouse input between frames
pub struct InputState {
    /// Currently pressed keys
    keys_pressed: HashSet<KeyCode>,
    /// Cursor movement since last frame while a button was held
    drag_delta: (f64, f64),
    /// Scroll lines since last frame
    scroll_delta: f64,
    /// Last known cursor position
    cursor_position: Option<(f64, f64)>,
    /// Currently pressed mouse buttons
    mouse_buttons: HashSet<MouseButton>,
}

impl InputState {
    /// Create new input state
    pub fn new() -> Self {
        Self {
            keys_pressed: HashSet::new(),
            drag_delta: (0.0, 0.0),
            scroll_delta: 0.0,
            cursor_position: None,
            mouse_buttons: HashSet::new(),
        }
    }

    /// Process a window event
    pub fn process_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput {
                event: KeyEvent {
                    physical_key: PhysicalKey::Code(key_code),
                    state,
                    ..
                },
                ..
            } => self.set_key(*key_code, *state),
            WindowEvent::CursorMoved { position, .. } => {
                self.move_cursor(position.x, position.y);
            }
            WindowEvent::MouseInput { state, button, .. } => match state {
                ElementState::Pressed => {
                    self.mouse_buttons.insert(*button);
                }
                ElementState::Released => {
                    self.mouse_buttons.remove(button);
                }
            },
            WindowEvent::MouseWheel { delta, .. } => {
                self.scroll_delta += match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y as f64,
                    MouseScrollDelta::PixelDelta(p) => p.y / 40.0,
                };
            }
            WindowEvent::Focused(false) => {
                self.keys_pressed.clear();
                self.mouse_buttons.clear();
            }
            _ => {}
        }
    }

    fn set_key(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.keys_pressed.insert(key);
            }
            ElementState::Released => {
                self.keys_pressed.remove(&key);
            }
        }
    }

    fn move_cursor(&mut self, x: f64, y: f64) {
        if let Some((last_x, last_y)) = self.cursor_position {
            if !self.mouse_buttons.is_empty() {
                self.drag_delta.0 += x - last_x;
                self.drag_delta.1 += y - last_y;
            }
        }
        self.cursor_position = Some((x, y));
    }

    /// Call at end of frame to reset per-frame state
    pub fn end_frame(&mut self) {
        self.drag_delta = (0.0, 0.0);
        self.scroll_delta = 0.0;
    }

    /// Check if key is currently pressed
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Either Alt key held
    pub fn alt_held(&self) -> bool {
        self.is_key_pressed(KeyCode::AltLeft) || self.is_key_pressed(KeyCode::AltRight)
    }

    /// Cursor movement accumulated while the left button was held
    pub fn left_drag(&self) -> (f64, f64) {
        if self.mouse_buttons.contains(&MouseButton::Left) {
            self.drag_delta
        } else {
            (0.0, 0.0)
        }
    }

    /// Scroll lines this frame (positive = away from user)
    pub fn scroll_delta(&self) -> f64 {
        self.scroll_delta
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_press() {
        let mut input = InputState::new();
        assert!(!input.is_key_pressed(KeyCode::KeyO));

        input.set_key(KeyCode::KeyO, ElementState::Pressed);
        assert!(input.is_key_pressed(KeyCode::KeyO));

        // Held keys survive the frame boundary
        input.end_frame();
        assert!(input.is_key_pressed(KeyCode::KeyO));

        input.set_key(KeyCode::KeyO, ElementState::Released);
        assert!(!input.is_key_pressed(KeyCode::KeyO));
    }

    #[test]
    fn test_drag_only_with_button() {
        let mut input = InputState::new();
        input.move_cursor(10.0, 10.0);
        input.move_cursor(20.0, 15.0);
        assert_eq!(input.left_drag(), (0.0, 0.0));

        input.mouse_buttons.insert(MouseButton::Left);
        input.move_cursor(25.0, 5.0);
        assert_eq!(input.left_drag(), (5.0, -10.0));

        input.end_frame();
        assert_eq!(input.left_drag(), (0.0, 0.0));
    }

    #[test]
    fn test_alt_held() {
        let mut input = InputState::new();
        assert!(!input.alt_held());
        input.set_key(KeyCode::AltRight, ElementState::Pressed);
        assert!(input.alt_held());
    }
}
