//! Speaker device boundary

/// Default beep pitch in hertz
pub const DEFAULT_FREQUENCY_HZ: u32 = 800;

/// Default beep length in milliseconds
pub const DEFAULT_DURATION_MS: u32 = 200;

/// Tone generator used by the console bell
pub trait Speaker {
    /// Plays a tone and returns once it has finished
    fn beep(&mut self, frequency_hz: u32, duration_ms: u32);
}
