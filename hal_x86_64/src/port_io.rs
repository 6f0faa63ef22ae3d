//! Port I/O abstraction for x86_64
//!
//! The keyboard controller, the VGA CRT controller and the PIT/speaker gate
//! are all reached through I/O ports. Devices take a [`PortIo`] so the same
//! driver code runs against hardware or a scripted fake.
//!
//! ## Safety
//!
//! `RealPortIo` is only sound in ring 0 on x86, touching ports that belong
//! to the device being driven. All unsafe code lives in its two methods.

use alloc::vec::Vec;

/// Port I/O trait
///
/// Implementations must complete each access synchronously before returning.
pub trait PortIo {
    /// Reads a byte from an I/O port
    fn inb(&mut self, port: u16) -> u8;

    /// Writes a byte to an I/O port
    fn outb(&mut self, port: u16, value: u8);
}

impl<P: PortIo + ?Sized> PortIo for &mut P {
    fn inb(&mut self, port: u16) -> u8 {
        (**self).inb(port)
    }

    fn outb(&mut self, port: u16, value: u8) {
        (**self).outb(port, value)
    }
}

/// Real hardware port I/O using `in` / `out`
#[cfg(target_arch = "x86_64")]
#[derive(Debug, Default)]
pub struct RealPortIo;

#[cfg(target_arch = "x86_64")]
impl RealPortIo {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(target_arch = "x86_64")]
impl PortIo for RealPortIo {
    #[inline]
    fn inb(&mut self, port: u16) -> u8 {
        // SAFETY: raw port read; the caller owns the device behind `port`
        // and runs at a privilege level that permits port access.
        unsafe {
            let value: u8;
            core::arch::asm!(
                "in al, dx",
                in("dx") port,
                out("al") value,
                options(nomem, nostack, preserves_flags)
            );
            value
        }
    }

    #[inline]
    fn outb(&mut self, port: u16, value: u8) {
        // SAFETY: raw port write; same contract as `inb`.
        unsafe {
            core::arch::asm!(
                "out dx, al",
                in("dx") port,
                in("al") value,
                options(nomem, nostack, preserves_flags)
            );
        }
    }
}

/// Fake port I/O for tests
///
/// Reads come from a script of `(port, value)` pairs consumed in order;
/// a port with no scripted value left reads as `default_read`. Writes are
/// captured for verification.
///
/// ```rust
/// use hal_x86_64::port_io::{FakePortIo, PortIo};
///
/// let mut io = FakePortIo::new();
/// io.script_read(0x64, 0x01);
/// io.script_read(0x60, 0x1E);
///
/// assert_eq!(io.inb(0x64), 0x01);
/// assert_eq!(io.inb(0x60), 0x1E);
/// assert_eq!(io.inb(0x64), 0x00);
/// ```
#[derive(Debug, Default)]
pub struct FakePortIo {
    read_script: Vec<(u16, u8)>,
    writes: Vec<(u16, u8)>,
    default_read: u8,
}

impl FakePortIo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value returned for reads with nothing scripted
    pub fn set_default_read(&mut self, value: u8) {
        self.default_read = value;
    }

    /// Scripts the next read of `port`
    pub fn script_read(&mut self, port: u16, value: u8) {
        self.read_script.push((port, value));
    }

    /// Scripts multiple reads
    pub fn script_reads(&mut self, reads: &[(u16, u8)]) {
        self.read_script.extend_from_slice(reads);
    }

    /// Scripted reads not yet consumed
    pub fn remaining_reads(&self) -> usize {
        self.read_script.len()
    }

    /// All captured writes, oldest first
    pub fn writes(&self) -> &[(u16, u8)] {
        &self.writes
    }

    /// Captured writes to one port
    pub fn writes_to(&self, port: u16) -> Vec<u8> {
        self.writes
            .iter()
            .filter(|(p, _)| *p == port)
            .map(|(_, v)| *v)
            .collect()
    }

    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }
}

impl PortIo for FakePortIo {
    fn inb(&mut self, port: u16) -> u8 {
        match self.read_script.iter().position(|(p, _)| *p == port) {
            Some(index) => self.read_script.remove(index).1,
            None => self.default_read,
        }
    }

    fn outb(&mut self, port: u16, value: u8) {
        self.writes.push((port, value));
    }
}
