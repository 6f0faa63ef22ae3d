//! PC speaker driven by PIT channel 2
//!
//! The PIT divides its 1.193182 MHz input clock; bits 0-1 of port 0x61 gate
//! channel 2 onto the speaker.

use crate::port_io::PortIo;
use hal::speaker::Speaker;
use hal::timer::{wait_ticks, TimerDevice};

const PIT_FREQUENCY_HZ: u32 = 1_193_182;
const PIT_CHANNEL2_PORT: u16 = 0x42;
const PIT_COMMAND_PORT: u16 = 0x43;
const SPEAKER_GATE_PORT: u16 = 0x61;
/// Channel 2, lobyte/hibyte access, square wave generator
const PIT_CHANNEL2_SQUARE_WAVE: u8 = 0xB6;
const SPEAKER_ENABLE_BITS: u8 = 0x03;

/// PC speaker timed against a tick counter
pub struct PcSpeaker<P: PortIo, T: TimerDevice> {
    io: P,
    timer: T,
    ticks_per_ms: u64,
}

impl<P: PortIo, T: TimerDevice> PcSpeaker<P, T> {
    /// `ticks_per_ms` is the rate of `timer`
    pub fn new(io: P, timer: T, ticks_per_ms: u64) -> Self {
        Self {
            io,
            timer,
            ticks_per_ms,
        }
    }

    /// PIT reload value for `frequency_hz`, clamped to the 16-bit counter
    pub fn divisor_for(frequency_hz: u32) -> u16 {
        let divisor = PIT_FREQUENCY_HZ / frequency_hz.max(1);
        divisor.clamp(1, u16::MAX as u32) as u16
    }

    fn start_tone(&mut self, frequency_hz: u32) {
        let [lo, hi] = Self::divisor_for(frequency_hz).to_le_bytes();
        self.io.outb(PIT_COMMAND_PORT, PIT_CHANNEL2_SQUARE_WAVE);
        self.io.outb(PIT_CHANNEL2_PORT, lo);
        self.io.outb(PIT_CHANNEL2_PORT, hi);

        let gate = self.io.inb(SPEAKER_GATE_PORT);
        self.io.outb(SPEAKER_GATE_PORT, gate | SPEAKER_ENABLE_BITS);
    }

    fn stop_tone(&mut self) {
        let gate = self.io.inb(SPEAKER_GATE_PORT);
        self.io.outb(SPEAKER_GATE_PORT, gate & !SPEAKER_ENABLE_BITS);
    }

    pub fn io(&self) -> &P {
        &self.io
    }
}

impl<P: PortIo, T: TimerDevice> Speaker for PcSpeaker<P, T> {
    fn beep(&mut self, frequency_hz: u32, duration_ms: u32) {
        self.start_tone(frequency_hz);
        wait_ticks(&mut self.timer, u64::from(duration_ms) * self.ticks_per_ms);
        self.stop_tone();
    }
}
