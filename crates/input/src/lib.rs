//! Keyboard and mouse state, plus the per-frame flight snapshot.

use glam::{Vec2, Vec3};
use std::collections::HashSet;

/// Manages input state for the current frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,
    /// Keys pressed this frame.
    keys_pressed: HashSet<KeyCode>,
    /// Keys released this frame.
    keys_released: HashSet<KeyCode>,

    /// Mouse buttons currently held.
    mouse_held: HashSet<MouseButton>,
    /// Mouse buttons pressed this frame.
    mouse_pressed: HashSet<MouseButton>,

    /// Mouse movement accumulated since the last `begin_frame`.
    mouse_delta: Vec2,

    /// Whether the cursor is captured/locked.
    cursor_locked: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame state. Call once the frame has consumed its input,
    /// before the next batch of window events arrives.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.mouse_pressed.clear();
        self.mouse_delta = Vec2::ZERO;
    }

    /// Process a keyboard event.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.keys_held.contains(&key) {
                    self.keys_pressed.insert(key);
                }
                self.keys_held.insert(key);
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
                self.keys_released.insert(key);
            }
        }
    }

    /// Process a mouse button event.
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.mouse_held.contains(&button) {
                    self.mouse_pressed.insert(button);
                }
                self.mouse_held.insert(button);
            }
            ElementState::Released => {
                self.mouse_held.remove(&button);
            }
        }
    }

    /// Process raw mouse movement. Ignored unless the cursor is locked.
    pub fn process_mouse_motion(&mut self, delta: (f64, f64)) {
        if !self.cursor_locked {
            return;
        }
        self.mouse_delta.x += delta.0 as f32;
        self.mouse_delta.y += delta.1 as f32;
    }

    /// Drop every held key and button (window lost focus).
    pub fn release_all(&mut self) {
        self.keys_released.extend(self.keys_held.drain());
        self.mouse_held.clear();
        self.mouse_delta = Vec2::ZERO;
    }

    // Query methods

    /// Check if a key is currently held.
    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Check if a key was pressed this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if a key was released this frame.
    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    /// Check if a mouse button was pressed this frame.
    pub fn is_mouse_pressed(&self, button: MouseButton) -> bool {
        self.mouse_pressed.contains(&button)
    }

    /// Mouse movement received since the last `begin_frame`.
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    /// Check if the cursor is locked.
    pub fn is_cursor_locked(&self) -> bool {
        self.cursor_locked
    }

    /// Set cursor lock state.
    pub fn set_cursor_locked(&mut self, locked: bool) {
        if self.cursor_locked != locked {
            log::debug!("Cursor {}", if locked { "locked" } else { "released" });
        }
        self.cursor_locked = locked;
        if !locked {
            self.mouse_delta = Vec2::ZERO;
        }
    }

    /// Any key or mouse button went down this frame.
    pub fn any_pressed(&self) -> bool {
        !self.keys_pressed.is_empty() || !self.mouse_pressed.is_empty()
    }

    /// Check if boost is held (Shift).
    pub fn is_boosting(&self) -> bool {
        self.is_key_held(KeyCode::ShiftLeft) || self.is_key_held(KeyCode::ShiftRight)
    }

    /// Primary click this frame (Left mouse button, one-shot per click).
    pub fn is_primary_click(&self) -> bool {
        self.is_mouse_pressed(MouseButton::Left)
    }

    /// Weapon toggle pressed this frame (F).
    pub fn is_weapon_toggle_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::KeyF)
    }

    /// Dialog dismiss pressed this frame (Space).
    pub fn is_dismiss_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::Space)
    }

    /// Pointer release pressed this frame (Escape).
    pub fn is_release_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::Escape)
    }

    /// "Continue exploring" on the victory screen (Enter or C).
    pub fn is_continue_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::Enter)
            || self.is_key_pressed(KeyCode::NumpadEnter)
            || self.is_key_pressed(KeyCode::KeyC)
    }

    /// "Retry" on the victory screen (R).
    pub fn is_retry_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::KeyR)
    }

    /// Snapshot of everything the flight controller reads this frame.
    pub fn flight_input(&self) -> FlightInput {
        FlightInput {
            forward: self.is_key_held(KeyCode::KeyW),
            back: self.is_key_held(KeyCode::KeyS),
            left: self.is_key_held(KeyCode::KeyA),
            right: self.is_key_held(KeyCode::KeyD),
            up: self.is_key_held(KeyCode::KeyQ),
            down: self.is_key_held(KeyCode::KeyE),
            boost: self.is_boosting(),
            look: self.mouse_delta,
        }
    }
}

/// Immutable per-frame flight input: held directions, boost, and mouse-look delta.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlightInput {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub boost: bool,
    /// Raw mouse delta in pixels.
    pub look: Vec2,
}

impl FlightInput {
    /// True if at least one translation direction is held.
    pub fn any_direction(&self) -> bool {
        self.forward || self.back || self.left || self.right || self.up || self.down
    }

    /// Summed camera-local direction: x = right, y = up, z = forward.
    /// Not normalized: diagonal flight is faster, and opposite keys cancel.
    pub fn local_axes(&self) -> Vec3 {
        let axis = |pos: bool, neg: bool| (pos as i32 - neg as i32) as f32;
        Vec3::new(
            axis(self.right, self.left),
            axis(self.up, self.down),
            axis(self.forward, self.back),
        )
    }
}

// Re-export for convenience
pub use winit::event::{ElementState, MouseButton};
pub use winit::keyboard::KeyCode;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pressed_is_edge_triggered() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::Space, ElementState::Pressed);
        assert!(input.is_dismiss_pressed());
        input.begin_frame();
        input.process_keyboard(KeyCode::Space, ElementState::Pressed);
        assert!(!input.is_dismiss_pressed());
        assert!(input.is_key_held(KeyCode::Space));
    }

    #[test]
    fn flight_snapshot_sums_directions() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        input.process_keyboard(KeyCode::KeyD, ElementState::Pressed);
        input.process_keyboard(KeyCode::KeyQ, ElementState::Pressed);
        let snap = input.flight_input();
        assert!(snap.any_direction());
        assert_eq!(snap.local_axes(), Vec3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn opposite_keys_cancel_but_still_count_as_held() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        input.process_keyboard(KeyCode::KeyS, ElementState::Pressed);
        let snap = input.flight_input();
        assert!(snap.any_direction());
        assert_eq!(snap.local_axes(), Vec3::ZERO);
    }

    #[test]
    fn mouse_motion_ignored_while_unlocked() {
        let mut input = InputState::new();
        input.process_mouse_motion((10.0, 5.0));
        assert_eq!(input.mouse_delta(), Vec2::ZERO);

        input.set_cursor_locked(true);
        input.process_mouse_motion((10.0, 5.0));
        input.process_mouse_motion((2.0, -1.0));
        assert_eq!(input.mouse_delta(), Vec2::new(12.0, 4.0));
        input.begin_frame();
        assert_eq!(input.mouse_delta(), Vec2::ZERO);
    }

    #[test]
    fn look_arrives_in_the_same_frame_as_keys() {
        let mut input = InputState::new();
        input.set_cursor_locked(true);
        input.begin_frame();
        input.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        input.process_mouse_motion((40.0, 0.0));
        let snap = input.flight_input();
        assert!(snap.forward);
        assert_eq!(snap.look, Vec2::new(40.0, 0.0));

        input.begin_frame();
        let snap = input.flight_input();
        assert!(snap.forward);
        assert_eq!(snap.look, Vec2::ZERO);
    }

    #[test]
    fn release_all_clears_held_keys() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        input.release_all();
        assert!(!input.flight_input().any_direction());
        assert!(input.is_key_released(KeyCode::KeyW));
    }
}
