//! Key source boundary
//!
//! The console reads keys through [`KeySource`]. `next_key_blocking` is the
//! single place where a reader can stall waiting for hardware.

use crate::keyboard::{KeyboardDevice, KeyboardError};
use crate::keyboard_translation::KeyboardTranslator;
use input_types::KeyEvent;

/// Source of console key events
pub trait KeySource {
    /// Waits until a key press is available and returns it
    ///
    /// Returns `Ok(None)` only when the source is closed for good (a scripted
    /// source ran dry); hardware sources never return it.
    fn next_key_blocking(&mut self) -> Result<Option<KeyEvent>, KeyboardError>;

    /// Returns a key press if one is already available, without waiting
    fn try_next_key(&mut self) -> Result<Option<KeyEvent>, KeyboardError>;

    /// Returns true if `try_next_key` would return an event or an error
    /// without waiting
    fn has_key_available(&mut self) -> bool;

    /// Caps Lock state, for sources that track it
    fn caps_lock(&self) -> bool {
        false
    }

    /// Num Lock state, for sources that track it
    fn num_lock(&self) -> bool {
        false
    }
}

/// Key source over a raw scan-code device
///
/// Polls the device, translates make codes and keeps one result of
/// lookahead so `has_key_available` can answer without losing input. A
/// device error seen while looking ahead is returned by the next read.
pub struct ScancodeKeySource<D: KeyboardDevice> {
    device: D,
    translator: KeyboardTranslator,
    lookahead: Option<Result<KeyEvent, KeyboardError>>,
}

impl<D: KeyboardDevice> ScancodeKeySource<D> {
    pub fn new(device: D) -> Self {
        Self {
            device,
            translator: KeyboardTranslator::new(),
            lookahead: None,
        }
    }

    /// Drains device events until one translates to a key press
    fn poll_translated(&mut self) -> Result<Option<KeyEvent>, KeyboardError> {
        if let Some(held) = self.lookahead.take() {
            return held.map(Some);
        }
        while let Some(raw) = self.device.poll_event()? {
            if let Some(event) = self.translator.translate(raw) {
                return Ok(Some(event));
            }
        }
        Ok(None)
    }
}

impl<D: KeyboardDevice> KeySource for ScancodeKeySource<D> {
    fn next_key_blocking(&mut self) -> Result<Option<KeyEvent>, KeyboardError> {
        loop {
            if let Some(event) = self.poll_translated()? {
                return Ok(Some(event));
            }
            core::hint::spin_loop();
        }
    }

    fn try_next_key(&mut self) -> Result<Option<KeyEvent>, KeyboardError> {
        self.poll_translated()
    }

    fn has_key_available(&mut self) -> bool {
        if self.lookahead.is_none() {
            self.lookahead = self.poll_translated().transpose();
        }
        self.lookahead.is_some()
    }

    fn caps_lock(&self) -> bool {
        self.translator.caps_lock()
    }

    fn num_lock(&self) -> bool {
        self.translator.num_lock()
    }
}
