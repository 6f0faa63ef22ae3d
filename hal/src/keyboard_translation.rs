//! Scancode to console key translation
//!
//! Turns PS/2 Set 1 make/break codes into console [`KeyEvent`]s carrying a
//! renderable unit (US layout, ASCII only).
//!
//! - **Deterministic mapping**: Same scan code and modifier state, same event
//! - **Presses only**: Break codes update modifier state and produce nothing
//! - **Lock keys**: Caps Lock and Num Lock toggle on press

use crate::keyboard::{HalKeyEvent, HalScancode};
use input_types::{ConsoleKey, KeyEvent, Modifiers, NULL_UNIT};

/// Modifier and lock tracking state
#[derive(Debug, Clone, Default)]
pub struct ModifierState {
    left_shift: bool,
    right_shift: bool,
    left_ctrl: bool,
    right_ctrl: bool,
    left_alt: bool,
    right_alt: bool,
    caps_lock: bool,
    num_lock: bool,
}

impl ModifierState {
    /// Creates a new modifier state (all released, locks off)
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates state for a modifier or lock key; returns true if the scan
    /// code was one of them
    fn update(&mut self, scancode: HalScancode, pressed: bool) -> bool {
        match scancode {
            HalScancode::Base(0x2A) => self.left_shift = pressed,
            HalScancode::Base(0x36) => self.right_shift = pressed,
            HalScancode::Base(0x1D) => self.left_ctrl = pressed,
            HalScancode::E0(0x1D) => self.right_ctrl = pressed,
            HalScancode::Base(0x38) => self.left_alt = pressed,
            HalScancode::E0(0x38) => self.right_alt = pressed,
            HalScancode::Base(0x3A) => {
                if pressed {
                    self.caps_lock = !self.caps_lock;
                }
            }
            HalScancode::Base(0x45) => {
                if pressed {
                    self.num_lock = !self.num_lock;
                }
            }
            _ => return false,
        }
        true
    }

    /// Returns the current Modifiers flags
    pub fn to_modifiers(&self) -> Modifiers {
        let mut mods = Modifiers::empty();
        mods.set(Modifiers::SHIFT, self.shift());
        mods.set(Modifiers::CONTROL, self.left_ctrl || self.right_ctrl);
        mods.set(Modifiers::ALT, self.left_alt || self.right_alt);
        mods
    }

    fn shift(&self) -> bool {
        self.left_shift || self.right_shift
    }

    pub fn caps_lock(&self) -> bool {
        self.caps_lock
    }

    pub fn num_lock(&self) -> bool {
        self.num_lock
    }
}

/// Translates a base (non-E0) Set 1 scan code to `(key, unit, shifted unit)`
///
/// Returns `None` for modifiers, locks and unmapped codes. Keypad codes are
/// reported with their Num Lock digit; the translator swaps in navigation
/// keys when Num Lock is off.
pub fn scancode_to_key(scancode: u8) -> Option<(ConsoleKey, char, char)> {
    use ConsoleKey::*;

    let entry = match scancode {
        0x01 => (Escape, '\u{1b}', '\u{1b}'),
        0x3B => (F1, NULL_UNIT, NULL_UNIT),
        0x3C => (F2, NULL_UNIT, NULL_UNIT),
        0x3D => (F3, NULL_UNIT, NULL_UNIT),
        0x3E => (F4, NULL_UNIT, NULL_UNIT),
        0x3F => (F5, NULL_UNIT, NULL_UNIT),
        0x40 => (F6, NULL_UNIT, NULL_UNIT),
        0x41 => (F7, NULL_UNIT, NULL_UNIT),
        0x42 => (F8, NULL_UNIT, NULL_UNIT),
        0x43 => (F9, NULL_UNIT, NULL_UNIT),
        0x44 => (F10, NULL_UNIT, NULL_UNIT),
        0x57 => (F11, NULL_UNIT, NULL_UNIT),
        0x58 => (F12, NULL_UNIT, NULL_UNIT),

        // Number row
        0x29 => (Other, '`', '~'),
        0x02 => (Other, '1', '!'),
        0x03 => (Other, '2', '@'),
        0x04 => (Other, '3', '#'),
        0x05 => (Other, '4', '$'),
        0x06 => (Other, '5', '%'),
        0x07 => (Other, '6', '^'),
        0x08 => (Other, '7', '&'),
        0x09 => (Other, '8', '*'),
        0x0A => (Other, '9', '('),
        0x0B => (Other, '0', ')'),
        0x0C => (Other, '-', '_'),
        0x0D => (Other, '=', '+'),
        0x0E => (Backspace, '\u{8}', '\u{8}'),

        // QWERTY row
        0x0F => (Tab, '\t', '\t'),
        0x10 => (Other, 'q', 'Q'),
        0x11 => (Other, 'w', 'W'),
        0x12 => (Other, 'e', 'E'),
        0x13 => (Other, 'r', 'R'),
        0x14 => (Other, 't', 'T'),
        0x15 => (Other, 'y', 'Y'),
        0x16 => (Other, 'u', 'U'),
        0x17 => (Other, 'i', 'I'),
        0x18 => (Other, 'o', 'O'),
        0x19 => (Other, 'p', 'P'),
        0x1A => (Other, '[', '{'),
        0x1B => (Other, ']', '}'),
        0x2B => (Other, '\\', '|'),

        // ASDF row
        0x1E => (Other, 'a', 'A'),
        0x1F => (Other, 's', 'S'),
        0x20 => (Other, 'd', 'D'),
        0x21 => (Other, 'f', 'F'),
        0x22 => (Other, 'g', 'G'),
        0x23 => (Other, 'h', 'H'),
        0x24 => (Other, 'j', 'J'),
        0x25 => (Other, 'k', 'K'),
        0x26 => (Other, 'l', 'L'),
        0x27 => (Other, ';', ':'),
        0x28 => (Other, '\'', '"'),
        0x1C => (Enter, '\n', '\n'),

        // ZXCV row
        0x2C => (Other, 'z', 'Z'),
        0x2D => (Other, 'x', 'X'),
        0x2E => (Other, 'c', 'C'),
        0x2F => (Other, 'v', 'V'),
        0x30 => (Other, 'b', 'B'),
        0x31 => (Other, 'n', 'N'),
        0x32 => (Other, 'm', 'M'),
        0x33 => (Other, ',', '<'),
        0x34 => (Other, '.', '>'),
        0x35 => (Other, '/', '?'),
        0x39 => (Other, ' ', ' '),

        // Keypad
        0x37 => (Other, '*', '*'),
        0x4A => (Other, '-', '-'),
        0x4E => (Other, '+', '+'),
        0x47 => (Other, '7', '7'),
        0x48 => (Other, '8', '8'),
        0x49 => (Other, '9', '9'),
        0x4B => (Other, '4', '4'),
        0x4C => (Other, '5', '5'),
        0x4D => (Other, '6', '6'),
        0x4F => (Other, '1', '1'),
        0x50 => (Other, '2', '2'),
        0x51 => (Other, '3', '3'),
        0x52 => (Other, '0', '0'),
        0x53 => (Other, '.', '.'),

        _ => return None,
    };
    Some(entry)
}

/// Navigation key for an E0-prefixed code, or a keypad code with Num Lock off
fn navigation_key(code: u8) -> Option<ConsoleKey> {
    let key = match code {
        0x47 => ConsoleKey::Home,
        0x48 => ConsoleKey::UpArrow,
        0x49 => ConsoleKey::PageUp,
        0x4B => ConsoleKey::LeftArrow,
        0x4D => ConsoleKey::RightArrow,
        0x4F => ConsoleKey::End,
        0x50 => ConsoleKey::DownArrow,
        0x51 => ConsoleKey::PageDown,
        0x52 => ConsoleKey::Insert,
        0x53 => ConsoleKey::Delete,
        _ => return None,
    };
    Some(key)
}

/// Keyboard translator
///
/// Maintains modifier state and translates HAL events to console key events.
#[derive(Debug, Default)]
pub struct KeyboardTranslator {
    modifiers: ModifierState,
}

impl KeyboardTranslator {
    /// Creates a new keyboard translator
    pub fn new() -> Self {
        Self::default()
    }

    /// Translates a HAL keyboard event to a KeyEvent
    ///
    /// Returns `None` for releases, modifier/lock keys and unmapped codes.
    pub fn translate(&mut self, hal_event: HalKeyEvent) -> Option<KeyEvent> {
        if self.modifiers.update(hal_event.scancode, hal_event.pressed) || !hal_event.pressed {
            return None;
        }

        let mods = self.modifiers.to_modifiers();
        let event = match hal_event.scancode {
            HalScancode::E0(0x1C) => KeyEvent::new('\n', ConsoleKey::NumpadEnter, mods),
            HalScancode::E0(0x35) => KeyEvent::new('/', ConsoleKey::Other, mods),
            HalScancode::E0(code) => KeyEvent::new(NULL_UNIT, navigation_key(code)?, mods),
            HalScancode::Base(code) => {
                let (key, plain, shifted) = scancode_to_key(code)?;
                let keypad = (0x47..=0x53).contains(&code) && code != 0x4A && code != 0x4E;
                if keypad && !self.modifiers.num_lock() {
                    let nav = navigation_key(code).unwrap_or(ConsoleKey::Other);
                    return Some(KeyEvent::new(NULL_UNIT, nav, mods));
                }
                let upper = if plain.is_ascii_alphabetic() {
                    self.modifiers.shift() != self.modifiers.caps_lock()
                } else {
                    self.modifiers.shift()
                };
                KeyEvent::new(if upper { shifted } else { plain }, key, mods)
            }
        };
        Some(event)
    }

    /// Caps Lock state
    pub fn caps_lock(&self) -> bool {
        self.modifiers.caps_lock()
    }

    /// Num Lock state
    pub fn num_lock(&self) -> bool {
        self.modifiers.num_lock()
    }

    /// Resets the translator state (all modifiers released, locks off)
    pub fn reset(&mut self) {
        self.modifiers = ModifierState::new();
    }
}
