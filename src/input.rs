//! Input queries consumed by states, guards and key-press events.
//!
//! Polling the keyboard and mouse belongs to the host. The engine only needs
//! boolean "is it down" queries and a way to forget everything that was
//! recorded, which it uses when the game changes state.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A key, identified by its key code.
///
/// Letter and digit keys use the code of their upper-case character, so
/// `Key::from_char('a') == Key::from_char('A')`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(u32);

impl Key {
    pub const BACKSPACE: Key = Key(8);
    pub const TAB: Key = Key(9);
    pub const ENTER: Key = Key(13);
    pub const ESCAPE: Key = Key(27);
    pub const SPACE: Key = Key(32);
    pub const LEFT: Key = Key(37);
    pub const UP: Key = Key(38);
    pub const RIGHT: Key = Key(39);
    pub const DOWN: Key = Key(40);

    pub const fn code(code: u32) -> Self {
        Key(code)
    }

    /// Key code for a character, ignoring letter case.
    pub fn from_char(c: char) -> Self {
        Key(c.to_ascii_uppercase() as u32)
    }

    pub const fn as_code(self) -> u32 {
        self.0
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// Read access to the host's input state.
pub trait Input {
    fn is_key_down(&self, key: Key) -> bool;

    fn any_key_down(&self) -> bool;

    fn is_button_down(&self, _button: MouseButton) -> bool {
        false
    }

    fn any_button_down(&self) -> bool {
        false
    }

    /// Forget every key and button currently recorded as down.
    fn clear(&mut self);
}

/// Input source with nothing pressed, for machines that do not read input.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoInput;

impl Input for NoInput {
    fn is_key_down(&self, _key: Key) -> bool {
        false
    }

    fn any_key_down(&self) -> bool {
        false
    }

    fn clear(&mut self) {}
}

/// Records key and button presses reported by the host's event loop.
#[derive(Clone, Debug, Default)]
pub struct KeyState {
    keys: HashSet<Key>,
    buttons: HashSet<MouseButton>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `key` as held down.
    pub fn press(&mut self, key: Key) {
        self.keys.insert(key);
    }

    /// Record `key` as released.
    pub fn release(&mut self, key: Key) {
        self.keys.remove(&key);
    }

    /// Record `button` as held down.
    pub fn press_button(&mut self, button: MouseButton) {
        self.buttons.insert(button);
    }

    /// Record `button` as released.
    pub fn release_button(&mut self, button: MouseButton) {
        self.buttons.remove(&button);
    }
}

impl Input for KeyState {
    fn is_key_down(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }

    fn any_key_down(&self) -> bool {
        !self.keys.is_empty()
    }

    fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons.contains(&button)
    }

    fn any_button_down(&self) -> bool {
        !self.buttons.is_empty()
    }

    fn clear(&mut self) {
        self.keys.clear();
        self.buttons.clear();
    }
}
