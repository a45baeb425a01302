use std::collections::HashSet;

use winit::{
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use super::fly_camera::InputSnapshot;

/// Collects window input between frames for the fly camera.
///
/// Physical key codes are used so WASD works the same on every layout.
#[derive(Debug, Default)]
pub struct CameraController {
    held_keys: HashSet<KeyCode>,
    is_look_pressed: bool,
    cursor: Option<(f64, f64)>,
}

impl CameraController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => self.process_keyed_event(event),
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => self.set_look_button(*state),
            WindowEvent::CursorMoved { position, .. } => self.set_cursor(position.x, position.y),
            WindowEvent::Focused(false) => self.clear(),
            _ => (),
        }
    }

    pub fn process_keyed_event(&mut self, event: &KeyEvent) {
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        self.set_key(code, event.state);
    }

    fn set_key(&mut self, code: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.held_keys.insert(code);
            }
            ElementState::Released => {
                self.held_keys.remove(&code);
            }
        }
    }

    pub(super) fn set_look_button(&mut self, state: ElementState) {
        self.is_look_pressed = state == ElementState::Pressed;
    }

    pub(super) fn set_cursor(&mut self, x: f64, y: f64) {
        self.cursor = Some((x, y));
    }

    /// Records a cursor warp done by the camera. Platforms may never report
    /// the warp as a `CursorMoved` event.
    pub fn cursor_warped(&mut self, x: f64, y: f64) {
        self.set_cursor(x, y);
    }

    /// Drops all held keys and buttons (e.g. when the window loses focus).
    pub fn clear(&mut self) {
        self.held_keys.clear();
        self.is_look_pressed = false;
    }

    pub fn is_held(&self, code: KeyCode) -> bool {
        self.held_keys.contains(&code)
    }

    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            forward: self.is_held(KeyCode::KeyW),
            back: self.is_held(KeyCode::KeyS),
            left: self.is_held(KeyCode::KeyA),
            right: self.is_held(KeyCode::KeyD),
            up: self.is_held(KeyCode::Space),
            down: self.is_held(KeyCode::ControlLeft),
            look_held: self.is_look_pressed,
            cursor: self.cursor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_map_to_snapshot() {
        let mut controller = CameraController::new();
        controller.set_key(KeyCode::KeyW, ElementState::Pressed);
        controller.set_key(KeyCode::KeyD, ElementState::Pressed);
        controller.set_key(KeyCode::ControlLeft, ElementState::Pressed);

        let snapshot = controller.snapshot();
        assert!(snapshot.forward && snapshot.right && snapshot.down);
        assert!(!snapshot.back && !snapshot.left && !snapshot.up);

        controller.set_key(KeyCode::KeyW, ElementState::Released);
        assert!(!controller.snapshot().forward);
    }

    #[test]
    fn test_mouse_state() {
        let mut controller = CameraController::new();
        controller.set_look_button(ElementState::Pressed);
        controller.set_cursor(12.0, 34.0);

        let snapshot = controller.snapshot();
        assert!(snapshot.look_held);
        assert_eq!(snapshot.cursor, Some((12.0, 34.0)));

        controller.set_look_button(ElementState::Released);
        assert!(!controller.snapshot().look_held);
    }

    #[test]
    fn test_focus_loss_clears_held_state() {
        let mut controller = CameraController::new();
        controller.set_key(KeyCode::KeyA, ElementState::Pressed);
        controller.set_look_button(ElementState::Pressed);
        controller.set_cursor(5.0, 5.0);

        controller.process_window_event(&WindowEvent::Focused(false));

        let snapshot = controller.snapshot();
        assert!(!snapshot.left);
        assert!(!snapshot.look_held);
        // the last cursor position is still valid
        assert_eq!(snapshot.cursor, Some((5.0, 5.0)));
    }
}
