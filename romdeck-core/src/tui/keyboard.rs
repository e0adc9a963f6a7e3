//! src/tui/keyboard.rs
//! ============================================================================
//! # `KeyboardInput`: crossterm keys as handheld buttons
//!
//! Key presses are mapped to [`Button`]s and accumulated until the next tick
//! polls them, which matches "newly pressed this tick" semantics.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::trace;

use crate::{
    config::Keymap,
    controller::input::{Button, Buttons},
    host::InputSource,
};

/// What a key press means to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Button(Button),
    Quit,
    Ignored,
}

#[derive(Debug, Clone)]
pub struct KeyboardInput {
    keymap: Keymap,
    pending: Buttons,
}

impl KeyboardInput {
    pub const fn new(keymap: Keymap) -> Self {
        Self {
            keymap,
            pending: Buttons::NONE,
        }
    }

    pub fn map_key(&self, key: KeyEvent) -> KeyOutcome {
        if key.kind != KeyEventKind::Press {
            return KeyOutcome::Ignored;
        }

        let button = match (key.code, key.modifiers) {
            (KeyCode::Char('q'), KeyModifiers::NONE) => return KeyOutcome::Quit,
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => return KeyOutcome::Quit,

            (KeyCode::Up, _) => Button::Up,
            (KeyCode::Down, _) => Button::Down,
            (KeyCode::Left, _) => Button::Left,
            (KeyCode::Right, _) => Button::Right,
            (KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('x'), _) => Button::A,
            (KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('z'), _) => Button::B,

            (KeyCode::Char(c), KeyModifiers::NONE) if self.keymap == Keymap::Vim => match c {
                'k' => Button::Up,
                'j' => Button::Down,
                'h' => Button::Left,
                'l' => Button::Right,
                _ => return KeyOutcome::Ignored,
            },

            _ => return KeyOutcome::Ignored,
        };

        KeyOutcome::Button(button)
    }

    /// Maps `key` and queues the resulting button for the next poll.
    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        let outcome = self.map_key(key);
        trace!(code = ?key.code, ?outcome, "Key mapped");

        if let KeyOutcome::Button(button) = outcome {
            self.pending.insert(button);
        }
        outcome
    }
}

impl InputSource for KeyboardInput {
    fn poll(&mut self) -> Buttons {
        std::mem::take(&mut self.pending)
    }
}
