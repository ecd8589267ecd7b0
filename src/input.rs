//! Keyboard state polling
//!
//! Mirrors the "is key down" / "was key pressed this frame" queries the
//! lessons are written against. Key transitions are fed in from winit
//! events and the per-frame set is cleared once the frame has been updated.

use std::collections::HashSet;

use winit::event::ElementState;
use winit::keyboard::KeyCode;

use crate::sim::FrameInput;

/// Current keyboard state for the window
#[derive(Debug, Default, Clone)]
pub struct KeyboardState {
    /// Keys currently held
    down: HashSet<KeyCode>,
    /// Keys that went down since the last `end_frame`
    pressed: HashSet<KeyCode>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a key transition. OS key repeat does not count as a new press.
    pub fn handle_key(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.down.insert(key) {
                    self.pressed.insert(key);
                }
            }
            ElementState::Released => {
                self.down.remove(&key);
            }
        }
    }

    pub fn key_down(&self, key: KeyCode) -> bool {
        self.down.contains(&key)
    }

    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    /// Forget per-frame transitions
    pub fn end_frame(&mut self) {
        self.pressed.clear();
    }

    /// Drop everything (focus lost), so keys don't stay stuck
    pub fn clear(&mut self) {
        self.down.clear();
        self.pressed.clear();
    }

    /// Map the keyboard onto the blocks game controls
    ///
    /// Arrows move the paddle, Enter confirms, P pauses, Space launches.
    pub fn blocks_input(&self) -> FrameInput {
        FrameInput {
            left: self.key_down(KeyCode::ArrowLeft),
            right: self.key_down(KeyCode::ArrowRight),
            enter: self.key_pressed(KeyCode::Enter) || self.key_pressed(KeyCode::NumpadEnter),
            pause: self.key_pressed(KeyCode::KeyP),
            launch: self.key_pressed(KeyCode::Space),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_then_hold() {
        let mut kb = KeyboardState::new();
        kb.handle_key(KeyCode::Space, ElementState::Pressed);
        assert!(kb.key_down(KeyCode::Space));
        assert!(kb.key_pressed(KeyCode::Space));

        kb.end_frame();
        assert!(kb.key_down(KeyCode::Space));
        assert!(!kb.key_pressed(KeyCode::Space));
    }

    #[test]
    fn test_repeat_is_not_a_new_press() {
        let mut kb = KeyboardState::new();
        kb.handle_key(KeyCode::KeyP, ElementState::Pressed);
        kb.end_frame();
        kb.handle_key(KeyCode::KeyP, ElementState::Pressed);
        assert!(!kb.key_pressed(KeyCode::KeyP));

        kb.handle_key(KeyCode::KeyP, ElementState::Released);
        kb.handle_key(KeyCode::KeyP, ElementState::Pressed);
        assert!(kb.key_pressed(KeyCode::KeyP));
    }

    #[test]
    fn test_clear_releases_everything() {
        let mut kb = KeyboardState::new();
        kb.handle_key(KeyCode::ArrowLeft, ElementState::Pressed);
        kb.clear();
        assert!(!kb.key_down(KeyCode::ArrowLeft));
        assert!(!kb.key_pressed(KeyCode::ArrowLeft));
    }

    #[test]
    fn test_blocks_input_mapping() {
        let mut kb = KeyboardState::new();
        kb.handle_key(KeyCode::ArrowRight, ElementState::Pressed);
        kb.handle_key(KeyCode::Enter, ElementState::Pressed);
        let input = kb.blocks_input();
        assert!(input.right);
        assert!(!input.left);
        assert!(input.enter);
        assert!(!input.launch);

        kb.end_frame();
        let input = kb.blocks_input();
        assert!(input.right);
        assert!(!input.enter);
    }
}
