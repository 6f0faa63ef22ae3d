//! VGA CRT controller registers over port I/O
//!
//! Color text modes expose the CRTC at index port 0x3D4 / data port 0x3D5.

use crate::port_io::PortIo;
use hal::text_grid::CursorRegisters;

pub const CRTC_INDEX_PORT: u16 = 0x3D4;
pub const CRTC_DATA_PORT: u16 = 0x3D5;

/// CRT controller reached through the color index/data port pair
#[derive(Debug)]
pub struct PortCrtc<P: PortIo> {
    io: P,
}

impl<P: PortIo> PortCrtc<P> {
    pub fn new(io: P) -> Self {
        Self { io }
    }

    pub fn io(&self) -> &P {
        &self.io
    }
}

impl<P: PortIo> CursorRegisters for PortCrtc<P> {
    fn read_crtc(&mut self, index: u8) -> u8 {
        self.io.outb(CRTC_INDEX_PORT, index);
        self.io.inb(CRTC_DATA_PORT)
    }

    fn write_crtc(&mut self, index: u8, value: u8) {
        self.io.outb(CRTC_INDEX_PORT, index);
        self.io.outb(CRTC_DATA_PORT, value);
    }
}
