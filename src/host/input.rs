use std::sync::{Arc, Mutex, PoisonError};

use glam::Vec2;

/// Cursor and modifier snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CursorState {
    /// Last cursor position in viewport pixels, top-left origin.
    pub position: Vec2,
    /// Whether the control modifier is held.
    pub ctrl_pressed: bool,
}

/// Keys the renderer reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// Control modifier; holding it enables focus at cursor.
    Control,
    /// Anything else, ignored.
    Other,
}

/// Cloneable handle to cursor state shared between input callbacks and the render loop.
///
/// Writes are last-write-wins; the render loop takes one snapshot per paint.
#[derive(Clone, Debug, Default)]
pub struct InputHandle {
    state: Arc<Mutex<CursorState>>,
}

impl InputHandle {
    /// Fresh handle with the cursor at the origin.
    pub fn new() -> Self {
        Self::default()
    }

    fn with<R>(&self, f: impl FnOnce(&mut CursorState) -> R) -> R {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Cursor moved.
    pub fn on_mouse_move(&self, position: Vec2) {
        self.with(|s| s.position = position);
    }

    /// Button pressed at `position`.
    pub fn on_mouse_press(&self, position: Vec2) {
        self.with(|s| s.position = position);
    }

    /// Key pressed.
    pub fn on_key_down(&self, key: Key) {
        if key == Key::Control {
            self.with(|s| s.ctrl_pressed = true);
        }
    }

    /// Key released.
    pub fn on_key_up(&self, key: Key) {
        if key == Key::Control {
            self.with(|s| s.ctrl_pressed = false);
        }
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> CursorState {
        self.with(|s| *s)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/input.rs"]
mod tests;
