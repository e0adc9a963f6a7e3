//! src/controller/input.rs
//! ============================================================================
//! # Buttons: per-tick input set
//!
//! The host's input service reports the buttons newly pressed since the last
//! tick as a [`Buttons`] set. The library list reacts to `Up`, `Down` and `A`;
//! the other buttons are carried for the host's own screens.

use std::ops::{BitOr, BitOrAssign};

/// Handheld buttons, one bit each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Button {
    Left = 1,
    Right = 2,
    Up = 4,
    Down = 8,
    B = 16,
    A = 32,
}

impl Button {
    pub const ALL: [Self; 6] = [
        Self::Left,
        Self::Right,
        Self::Up,
        Self::Down,
        Self::B,
        Self::A,
    ];

    #[inline]
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

/// Set of buttons pressed during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Buttons(u8);

impl Buttons {
    pub const NONE: Self = Self(0);

    #[inline]
    pub const fn contains(self, button: Button) -> bool {
        self.0 & button.bits() != 0
    }

    #[inline]
    pub fn insert(&mut self, button: Button) {
        self.0 |= button.bits();
    }

    #[inline]
    #[must_use]
    pub const fn with(self, button: Button) -> Self {
        Self(self.0 | button.bits())
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Button> {
        Button::ALL.into_iter().filter(move |b| self.contains(*b))
    }
}

impl From<Button> for Buttons {
    fn from(button: Button) -> Self {
        Self(button.bits())
    }
}

impl FromIterator<Button> for Buttons {
    fn from_iter<T: IntoIterator<Item = Button>>(iter: T) -> Self {
        iter.into_iter().fold(Self::NONE, Self::with)
    }
}

impl BitOr<Button> for Buttons {
    type Output = Self;

    fn bitor(self, rhs: Button) -> Self {
        self.with(rhs)
    }
}

impl BitOr for Button {
    type Output = Buttons;

    fn bitor(self, rhs: Self) -> Buttons {
        Buttons::from(self).with(rhs)
    }
}

impl BitOrAssign<Button> for Buttons {
    fn bitor_assign(&mut self, rhs: Button) {
        self.insert(rhs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buttons_set_operations() {
        let mut buttons = Buttons::NONE;
        assert!(buttons.is_empty());

        buttons |= Button::Down;
        buttons.insert(Button::A);

        assert!(buttons.contains(Button::Down));
        assert!(buttons.contains(Button::A));
        assert!(!buttons.contains(Button::Up));
        assert_eq!(buttons.iter().collect::<Vec<_>>(), vec![Button::Down, Button::A]);
    }

    #[test]
    fn test_buttons_from_iter_and_bitor() {
        let collected: Buttons = [Button::Up, Button::B, Button::Up].into_iter().collect();
        assert_eq!(collected, Button::Up | Button::B);
        assert_eq!(Buttons::from(Button::Left) | Button::Right, Button::Left | Button::Right);
    }
}
