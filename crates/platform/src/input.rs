//! Mouse and keyboard state driving the orbit camera and render mode.

use std::collections::HashSet;

pub use winit::keyboard::KeyCode;

/// Key that switches to the wireframe pipeline while held.
pub const WIREFRAME_KEY: KeyCode = KeyCode::Digit1;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other,
}

impl From<winit::event::MouseButton> for MouseButton {
    fn from(button: winit::event::MouseButton) -> Self {
        match button {
            winit::event::MouseButton::Left => MouseButton::Left,
            winit::event::MouseButton::Right => MouseButton::Right,
            winit::event::MouseButton::Middle => MouseButton::Middle,
            _ => MouseButton::Other,
        }
    }
}

/// Camera motion requested by a mouse drag, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrbitDrag {
    /// Left button held: orbit around the target.
    Rotate { dx: f32, dy: f32 },
    /// Right button held: move closer or further away.
    Zoom { dx: f32, dy: f32 },
}

/// Input accumulated between two frames.
#[derive(Debug, Default)]
pub struct InputState {
    pressed_keys: HashSet<KeyCode>,
    pressed_buttons: HashSet<MouseButton>,
    /// Last cursor position; `None` until the first move event.
    mouse_position: Option<(f32, f32)>,
    /// Cursor travel since the last [`take_drag`](Self::take_drag).
    drag_delta: (f32, f32),
}

impl InputState {
    /// Create a new input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a key press event.
    pub fn on_key_pressed(&mut self, key: KeyCode) {
        self.pressed_keys.insert(key);
    }

    /// Handle a key release event.
    pub fn on_key_released(&mut self, key: KeyCode) {
        self.pressed_keys.remove(&key);
    }

    /// Handle a mouse button press event.
    ///
    /// Starts a fresh drag from the current cursor position.
    pub fn on_mouse_pressed(&mut self, button: MouseButton) {
        self.pressed_buttons.insert(button);
        self.drag_delta = (0.0, 0.0);
    }

    /// Handle a mouse button release event.
    pub fn on_mouse_released(&mut self, button: MouseButton) {
        self.pressed_buttons.remove(&button);
    }

    /// Handle mouse movement.
    pub fn on_mouse_moved(&mut self, x: f32, y: f32) {
        if let Some((old_x, old_y)) = self.mouse_position {
            if self.is_dragging() {
                self.drag_delta.0 += x - old_x;
                self.drag_delta.1 += y - old_y;
            }
        }
        self.mouse_position = Some((x, y));
    }

    fn is_dragging(&self) -> bool {
        self.is_mouse_pressed(MouseButton::Left) || self.is_mouse_pressed(MouseButton::Right)
    }

    /// Check if a key is currently pressed.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.pressed_keys.contains(&key)
    }

    /// Check if a mouse button is currently pressed.
    pub fn is_mouse_pressed(&self, button: MouseButton) -> bool {
        self.pressed_buttons.contains(&button)
    }

    /// Whether the wireframe key is held right now.
    pub fn wireframe(&self) -> bool {
        self.is_key_pressed(WIREFRAME_KEY)
    }

    /// Get the current mouse position.
    pub fn mouse_position(&self) -> Option<(f32, f32)> {
        self.mouse_position
    }

    /// Consumes the accumulated drag and turns it into a camera motion.
    ///
    /// The left button wins when both are held.
    pub fn take_drag(&mut self) -> Option<OrbitDrag> {
        let (dx, dy) = std::mem::take(&mut self.drag_delta);
        if dx == 0.0 && dy == 0.0 {
            return None;
        }
        if self.is_mouse_pressed(MouseButton::Left) {
            Some(OrbitDrag::Rotate { dx, dy })
        } else if self.is_mouse_pressed(MouseButton::Right) {
            Some(OrbitDrag::Zoom { dx, dy })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_without_button_is_not_a_drag() {
        let mut input = InputState::new();
        input.on_mouse_moved(10.0, 10.0);
        input.on_mouse_moved(30.0, 5.0);
        assert_eq!(input.take_drag(), None);
        assert_eq!(input.mouse_position(), Some((30.0, 5.0)));
    }

    #[test]
    fn test_left_drag_accumulates() {
        let mut input = InputState::new();
        input.on_mouse_moved(100.0, 100.0);
        input.on_mouse_pressed(MouseButton::Left);
        input.on_mouse_moved(104.0, 98.0);
        input.on_mouse_moved(110.0, 97.0);

        assert_eq!(input.take_drag(), Some(OrbitDrag::Rotate { dx: 10.0, dy: -3.0 }));
        assert_eq!(input.take_drag(), None);
    }

    #[test]
    fn test_right_drag_zooms() {
        let mut input = InputState::new();
        input.on_mouse_moved(0.0, 0.0);
        input.on_mouse_pressed(MouseButton::Right);
        input.on_mouse_moved(0.0, 20.0);
        assert_eq!(input.take_drag(), Some(OrbitDrag::Zoom { dx: 0.0, dy: 20.0 }));
    }

    #[test]
    fn test_release_ends_drag() {
        let mut input = InputState::new();
        input.on_mouse_moved(0.0, 0.0);
        input.on_mouse_pressed(MouseButton::Left);
        input.on_mouse_released(MouseButton::Left);
        input.on_mouse_moved(50.0, 50.0);
        assert_eq!(input.take_drag(), None);
    }

    #[test]
    fn test_wireframe_follows_key_state() {
        let mut input = InputState::new();
        assert!(!input.wireframe());
        input.on_key_pressed(KeyCode::Digit1);
        assert!(input.wireframe());
        input.on_key_released(KeyCode::Digit1);
        assert!(!input.wireframe());
    }

    #[test]
    fn test_winit_button_mapping() {
        assert_eq!(MouseButton::from(winit::event::MouseButton::Right), MouseButton::Right);
        assert_eq!(MouseButton::from(winit::event::MouseButton::Back), MouseButton::Other);
    }
}
