//! Window and device event handling for GameState.

use glam::Vec2;
use winit::event::{DeviceEvent, WindowEvent};
use winit::keyboard::PhysicalKey;
use winit::window::CursorGrabMode;

impl crate::GameState {
    /// Handle a window event. Returns true if the app should exit.
    pub(crate) fn handle_window_event(&mut self, event: WindowEvent) -> bool {
        match event {
            WindowEvent::CloseRequested => {
                self.running = false;
                true
            }
            WindowEvent::Resized(size) => {
                self.viewport = Vec2::new(size.width as f32, size.height.max(1) as f32);
                self.session.resize(size.width, size.height);
                false
            }
            WindowEvent::Focused(false) => {
                self.input.release_all();
                false
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    self.input.process_keyboard(key, event.state);
                }
                false
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.input.process_mouse_button(button, state);
                false
            }
            WindowEvent::RedrawRequested => {
                self.update();
                self.window.request_redraw();
                false
            }
            _ => false,
        }
    }

    /// Handle device events (e.g. raw mouse motion).
    pub(crate) fn handle_device_event(&mut self, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.input.process_mouse_motion(delta);
        }
    }

    /// Mirror the session's pointer capture onto the OS cursor.
    pub(crate) fn sync_cursor(&mut self) {
        let captured = self.session.pointer_captured();
        if captured == self.input.is_cursor_locked() {
            return;
        }
        if captured {
            let _ = self
                .window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined));
            self.window.set_cursor_visible(false);
        } else {
            let _ = self.window.set_cursor_grab(CursorGrabMode::None);
            self.window.set_cursor_visible(true);
        }
        self.input.set_cursor_locked(captured);
    }
}
