//! Keyboard device abstraction
//!
//! Raw keyboard hardware below the console key source.
//!
//! ## Philosophy
//!
//! - **Hardware is just a source**: Keyboards provide raw scan codes, not characters
//! - **Deterministic translation**: Scan codes map to console keys predictably
//!   (see [`crate::keyboard_translation`])
//! - **Testable**: Devices can be faked with a scripted event list
//!
//! ## Design
//!
//! The device interface is poll-based and never blocks. Blocking is layered
//! on top by [`crate::key_source::ScancodeKeySource`].

use thiserror::Error;

/// Hardware scancode representation
///
/// Encodes scancodes from PS/2 keyboards (Set 1).
/// Extended keys (arrows, nav cluster, keypad Enter) are prefixed with 0xE0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalScancode {
    /// Base scancode (no prefix)
    Base(u8),
    /// Extended scancode (0xE0 prefix)
    E0(u8),
}

impl HalScancode {
    /// Returns true if this is an extended (E0) scancode
    pub fn is_extended(&self) -> bool {
        matches!(self, Self::E0(_))
    }

    /// Returns the scancode value (without prefix)
    pub fn code(&self) -> u8 {
        match self {
            Self::Base(code) | Self::E0(code) => *code,
        }
    }
}

/// Hardware keyboard event: one make or break code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HalKeyEvent {
    pub scancode: HalScancode,
    /// Whether the key was pressed (make) or released (break)
    pub pressed: bool,
}

impl HalKeyEvent {
    /// Creates a new keyboard event with a base scancode
    pub fn new(scancode: u8, pressed: bool) -> Self {
        Self::with_scancode(HalScancode::Base(scancode), pressed)
    }

    /// Creates a new keyboard event with explicit scancode type
    pub fn with_scancode(scancode: HalScancode, pressed: bool) -> Self {
        Self { scancode, pressed }
    }

    /// Decodes a Set 1 byte (bit 7 = break) that followed an optional E0 prefix
    pub fn from_set1(byte: u8, extended: bool) -> Self {
        let code = byte & 0x7F;
        let scancode = if extended {
            HalScancode::E0(code)
        } else {
            HalScancode::Base(code)
        };
        Self::with_scancode(scancode, byte & 0x80 == 0)
    }
}

/// Keyboard failures surfaced to the console
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum KeyboardError {
    /// Controller reported an internal buffer overrun (0x00 / 0xFF)
    #[error("keyboard buffer overrun")]
    Overrun,

    /// Device-specific failure
    #[error("keyboard device error: {0}")]
    Device(&'static str),
}

/// Keyboard device trait
///
/// Architecture-specific implementations provide raw keyboard input via this trait.
///
/// - **Poll-based**: Call `poll_event()` to check for new events
/// - **Non-blocking**: Returns `Ok(None)` if no event is available
/// - **Stateless**: Device does not track modifier or lock state
pub trait KeyboardDevice {
    /// Polls for a keyboard event
    fn poll_event(&mut self) -> Result<Option<HalKeyEvent>, KeyboardError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_set1_make_and_break() {
        let press = HalKeyEvent::from_set1(0x1E, false);
        assert_eq!(press.scancode, HalScancode::Base(0x1E));
        assert!(press.pressed);

        let release = HalKeyEvent::from_set1(0x9E, false);
        assert_eq!(release.scancode, HalScancode::Base(0x1E));
        assert!(!release.pressed);
    }

    #[test]
    fn test_from_set1_extended() {
        let event = HalKeyEvent::from_set1(0x4B, true);
        assert_eq!(event.scancode, HalScancode::E0(0x4B));
        assert!(event.scancode.is_extended());
        assert_eq!(event.scancode.code(), 0x4B);
    }

    #[test]
    fn test_keyboard_error_display() {
        use alloc::string::ToString;

        assert_eq!(KeyboardError::Overrun.to_string(), "keyboard buffer overrun");
        assert_eq!(
            KeyboardError::Device("timeout").to_string(),
            "keyboard device error: timeout"
        );
    }
}
