//! # Timer Device
//!
//! Monotonic tick counter used for short hardware delays (speaker tones).
//!
//! - **Monotonic**: Ticks never go backwards
//! - **Non-blocking**: Always returns immediately
//! - **Frequency-agnostic**: Callers are told the tick rate separately

/// Hardware timer device trait
pub trait TimerDevice {
    /// Returns the current tick count since the device started
    fn poll_ticks(&mut self) -> u64;
}

/// Spins until `ticks` have elapsed on `timer`
pub fn wait_ticks<T: TimerDevice + ?Sized>(timer: &mut T, ticks: u64) {
    let start = timer.poll_ticks();
    while timer.poll_ticks().saturating_sub(start) < ticks {
        core::hint::spin_loop();
    }
}
