#![no_std]

//! # Input Types
//!
//! Key event types consumed by the console line editor.
//!
//! ## Philosophy
//!
//! - **Events, not bytes**: Input arrives as structured key events, never as a raw byte stream
//! - **Logical keys**: Scan codes are translated below this layer
//! - **Testable**: Events are serializable and can be scripted for tests
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - Raw hardware scan codes (PS/2, USB HID)
//! - Key press/release tracking (only presses reach the console)
//! - Multi-codepoint text (one event carries at most one `char`)

extern crate alloc;

use core::fmt;
use serde::{Deserialize, Serialize};

/// The null unit carried by events that have no renderable character.
pub const NULL_UNIT: char = '\0';

/// Logical key identity
///
/// The line editor acts on the first six variants; everything else is
/// delivered to readers but treated as an ordinary (possibly null) unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConsoleKey {
    Enter,
    NumpadEnter,
    Backspace,
    Delete,
    LeftArrow,
    RightArrow,
    UpArrow,
    DownArrow,
    Home,
    End,
    Insert,
    PageUp,
    PageDown,
    Escape,
    Tab,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    /// Any key with no special meaning to the console (letters, digits, space...)
    Other,
}

impl ConsoleKey {
    /// Returns true for both Enter keys
    pub fn is_enter(self) -> bool {
        matches!(self, Self::Enter | Self::NumpadEnter)
    }

    /// Returns true for keys that erase content rather than add it
    pub fn is_erase(self) -> bool {
        matches!(self, Self::Backspace | Self::Delete)
    }
}

impl fmt::Display for ConsoleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

bitflags::bitflags! {
    /// Modifier keys held while the event was produced.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const ALT = 1 << 1;
        const CONTROL = 1 << 2;
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }

        let mut first = true;
        for (name, flag) in [
            ("Control", Self::CONTROL),
            ("Alt", Self::ALT),
            ("Shift", Self::SHIFT),
        ] {
            if self.contains(flag) {
                if !first {
                    write!(f, "+")?;
                }
                write!(f, "{}", name)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Keyboard event
///
/// One key press as seen by the console. Immutable once produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyEvent {
    /// Renderable unit, or [`NULL_UNIT`] when the key has none
    pub ch: char,
    /// Logical key identity
    pub key: ConsoleKey,
    /// Modifier keys that were active
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Creates a new key event
    pub const fn new(ch: char, key: ConsoleKey, modifiers: Modifiers) -> Self {
        Self { ch, key, modifiers }
    }

    /// An ordinary character key with no modifiers
    pub const fn char(ch: char) -> Self {
        Self::new(ch, ConsoleKey::Other, Modifiers::empty())
    }

    /// A non-character key with no modifiers
    pub const fn special(key: ConsoleKey) -> Self {
        let ch = match key {
            ConsoleKey::Enter | ConsoleKey::NumpadEnter => '\n',
            ConsoleKey::Tab => '\t',
            ConsoleKey::Backspace => '\u{8}',
            ConsoleKey::Escape => '\u{1b}',
            _ => NULL_UNIT,
        };
        Self::new(ch, key, Modifiers::empty())
    }

    /// Replaces the modifiers
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Returns true if the event carries no renderable unit
    pub fn is_null(&self) -> bool {
        self.ch == NULL_UNIT
    }
}
