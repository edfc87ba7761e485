//! Keyboard and mouse state.
//!
//! The windowing layer feeds raw events into [`InputState`]; everything else
//! asks questions in terms of [`KeyBinding`]s through a [`KeyMap`].

#![allow(missing_docs)]

use std::collections::HashMap;

/// Mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Breaks blocks.
    Left,
    /// Places blocks.
    Right,
    /// Picks the block under the reticle.
    Middle,
}

/// Physical key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Space,
    LeftShift,
    Backspace,
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,
}

/// Logical action a key can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyBinding {
    Forward,
    Back,
    Left,
    Right,
    Jump,
    Sneak,
    OpenChat,
    OpenInventory,
    PauseOrExit,
    Screenshot,
    ThirdPersonCamera,
    ViewDistance,
    HideGui,
    ShowFps,
}

/// Binding table.
#[derive(Debug, Clone)]
pub struct KeyMap {
    keys: HashMap<KeyBinding, Key>,
}

impl KeyMap {
    /// Key currently bound to `binding`.
    #[must_use]
    pub fn key(&self, binding: KeyBinding) -> Option<Key> {
        self.keys.get(&binding).copied()
    }

    /// Rebinds `binding` to `key`.
    pub fn bind(&mut self, binding: KeyBinding, key: Key) {
        self.keys.insert(binding, key);
    }

    /// Binding a key press triggers, if any.
    #[must_use]
    pub fn binding_for(&self, key: Key) -> Option<KeyBinding> {
        self.keys
            .iter()
            .find_map(|(binding, bound)| (*bound == key).then_some(*binding))
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        let keys = [
            (KeyBinding::Forward, Key::W),
            (KeyBinding::Back, Key::S),
            (KeyBinding::Left, Key::A),
            (KeyBinding::Right, Key::D),
            (KeyBinding::Jump, Key::Space),
            (KeyBinding::Sneak, Key::LeftShift),
            (KeyBinding::OpenChat, Key::T),
            (KeyBinding::OpenInventory, Key::B),
            (KeyBinding::PauseOrExit, Key::Escape),
            (KeyBinding::Screenshot, Key::F12),
            (KeyBinding::ThirdPersonCamera, Key::F5),
            (KeyBinding::ViewDistance, Key::F),
            (KeyBinding::HideGui, Key::F1),
            (KeyBinding::ShowFps, Key::F3),
        ];
        Self {
            keys: keys.into_iter().collect(),
        }
    }
}

/// Device state accumulated over a frame.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Pointer position.
    pub mouse_x: f32,
    pub mouse_y: f32,
    /// Relative motion since the frame began, for mouse look.
    mouse_dx: f32,
    mouse_dy: f32,
    /// Buttons that went down this frame (bit mask).
    buttons_pressed: u8,
    /// Buttons currently held (bit mask).
    buttons_down: u8,
    /// Keys that went down this frame.
    keys_pressed: Vec<Key>,
    /// Keys currently held.
    keys_down: Vec<Key>,
}

impl InputState {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears per-frame edges. Held state survives.
    pub fn begin_frame(&mut self) {
        self.mouse_dx = 0.0;
        self.mouse_dy = 0.0;
        self.buttons_pressed = 0;
        self.keys_pressed.clear();
    }

    /// Absolute pointer move.
    pub fn set_mouse_pos(&mut self, x: f32, y: f32) {
        self.mouse_dx += x - self.mouse_x;
        self.mouse_dy += y - self.mouse_y;
        self.mouse_x = x;
        self.mouse_y = y;
    }

    /// Relative motion from a grabbed pointer.
    pub fn mouse_motion(&mut self, dx: f32, dy: f32) {
        self.mouse_dx += dx;
        self.mouse_dy += dy;
    }

    pub fn mouse_button_down(&mut self, button: MouseButton) {
        let mask = Self::button_mask(button);
        self.buttons_pressed |= mask;
        self.buttons_down |= mask;
    }

    pub fn mouse_button_up(&mut self, button: MouseButton) {
        self.buttons_down &= !Self::button_mask(button);
    }

    pub fn key_down(&mut self, key: Key) {
        if !self.keys_down.contains(&key) {
            self.keys_pressed.push(key);
            self.keys_down.push(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.keys_down.retain(|&k| k != key);
    }

    /// Drops every held key and button, e.g. when a menu takes over input.
    pub fn release_all(&mut self) {
        self.buttons_down = 0;
        self.keys_down.clear();
    }

    /// True while the button is held.
    #[must_use]
    pub fn is_mouse_pressed(&self, button: MouseButton) -> bool {
        (self.buttons_down & Self::button_mask(button)) != 0
    }

    /// True if the button went down this frame.
    #[must_use]
    pub fn mouse_clicked(&self, button: MouseButton) -> bool {
        (self.buttons_pressed & Self::button_mask(button)) != 0
    }

    /// True while the key is held.
    #[must_use]
    pub fn is_key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    /// True if the key went down this frame.
    #[must_use]
    pub fn key_pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// True while the key bound to `binding` is held.
    #[must_use]
    pub fn is_binding_down(&self, map: &KeyMap, binding: KeyBinding) -> bool {
        map.key(binding).is_some_and(|key| self.is_key_down(key))
    }

    /// True if the key bound to `binding` went down this frame.
    #[must_use]
    pub fn binding_pressed(&self, map: &KeyMap, binding: KeyBinding) -> bool {
        map.key(binding).is_some_and(|key| self.key_pressed(key))
    }

    /// Relative pointer motion this frame.
    #[must_use]
    pub fn mouse_delta(&self) -> (f32, f32) {
        (self.mouse_dx, self.mouse_dy)
    }

    const fn button_mask(button: MouseButton) -> u8 {
        match button {
            MouseButton::Left => 1,
            MouseButton::Right => 2,
            MouseButton::Middle => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_edges_and_hold() {
        let mut input = InputState::new();

        input.mouse_button_down(MouseButton::Left);
        assert!(input.mouse_clicked(MouseButton::Left));
        assert!(input.is_mouse_pressed(MouseButton::Left));

        input.begin_frame();
        assert!(!input.mouse_clicked(MouseButton::Left));
        assert!(input.is_mouse_pressed(MouseButton::Left));

        input.mouse_button_up(MouseButton::Left);
        assert!(!input.is_mouse_pressed(MouseButton::Left));
    }

    #[test]
    fn test_bindings() {
        let mut map = KeyMap::default();
        let mut input = InputState::new();
        input.key_down(Key::W);
        assert!(input.is_binding_down(&map, KeyBinding::Forward));

        map.bind(KeyBinding::Forward, Key::Z);
        assert!(!input.is_binding_down(&map, KeyBinding::Forward));
        assert_eq!(map.binding_for(Key::F12), Some(KeyBinding::Screenshot));
    }

    #[test]
    fn test_mouse_delta_accumulates_within_frame() {
        let mut input = InputState::new();
        input.mouse_motion(3.0, -1.0);
        input.mouse_motion(2.0, -1.0);
        assert_eq!(input.mouse_delta(), (5.0, -2.0));
        input.begin_frame();
        assert_eq!(input.mouse_delta(), (0.0, 0.0));
    }
}
