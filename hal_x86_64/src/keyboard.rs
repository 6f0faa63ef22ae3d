//! x86_64 PS/2 keyboard
//!
//! Polls the 8042 controller: status port 0x64 bit 0 says a byte is
//! waiting on data port 0x60. Bytes are Set 1 scan codes; 0xE0 prefixes an
//! extended key and is held until the next byte arrives.

use crate::port_io::PortIo;
use hal::keyboard::{HalKeyEvent, KeyboardDevice, KeyboardError};

const DATA_PORT: u16 = 0x60;
const STATUS_PORT: u16 = 0x64;
const STATUS_OUTPUT_FULL: u8 = 0x01;
const EXTENDED_PREFIX: u8 = 0xE0;

/// PS/2 keyboard on the 8042 controller
#[derive(Debug)]
pub struct Ps2Keyboard<P: PortIo> {
    io: P,
    extended: bool,
}

impl<P: PortIo> Ps2Keyboard<P> {
    pub fn new(io: P) -> Self {
        Self {
            io,
            extended: false,
        }
    }

    /// Gives back the port handle
    pub fn into_inner(self) -> P {
        self.io
    }
}

impl<P: PortIo> KeyboardDevice for Ps2Keyboard<P> {
    fn poll_event(&mut self) -> Result<Option<HalKeyEvent>, KeyboardError> {
        loop {
            if self.io.inb(STATUS_PORT) & STATUS_OUTPUT_FULL == 0 {
                return Ok(None);
            }

            let byte = self.io.inb(DATA_PORT);
            match byte {
                EXTENDED_PREFIX => {
                    self.extended = true;
                }
                0x00 | 0xFF => {
                    self.extended = false;
                    return Err(KeyboardError::Overrun);
                }
                _ => {
                    let extended = core::mem::take(&mut self.extended);
                    return Ok(Some(HalKeyEvent::from_set1(byte, extended)));
                }
            }
        }
    }
}
