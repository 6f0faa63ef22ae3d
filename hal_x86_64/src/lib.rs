//! # x86_64 Hardware Abstraction Layer
//!
//! Port-I/O backed implementations of the console device traits.
//!
//! ## Scope
//!
//! - [`Ps2Keyboard`]: 8042 controller data/status ports, Set 1 scan codes
//! - [`PortCrtc`]: VGA CRT controller index/data ports (hardware cursor)
//! - [`PcSpeaker`]: PIT channel 2 gated onto the speaker
//!
//! Every device is generic over [`PortIo`] so tests drive it with
//! [`FakePortIo`].

#![no_std]

extern crate alloc;

pub mod keyboard;
pub mod port_io;
pub mod speaker;
pub mod vga_crtc;

pub use keyboard::Ps2Keyboard;
pub use port_io::{FakePortIo, PortIo};
#[cfg(target_arch = "x86_64")]
pub use port_io::RealPortIo;
pub use speaker::PcSpeaker;
pub use vga_crtc::PortCrtc;
