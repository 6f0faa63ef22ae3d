//! Replay queue for events a speculative scan has already seen
//!
//! `peek` has to scan a whole line to know its first unit, but the keys it
//! reads must still reach the next real read. A speculative scan records the
//! event behind every unit of its scratch line in a [`Speculation`]; when
//! the scan ends (however it ends) the recording is folded into the
//! pending queue, and the next read replays it without touching the screen.
//!
//! Erasures are never recorded. Backspace and Delete drop the recorded
//! event of the unit they erase, so the fold yields exactly the units that
//! survived, in line order, followed by the terminating Enter.

use alloc::collections::VecDeque;
use alloc::vec::Vec;
use input_types::KeyEvent;

/// Events waiting to be handed to the next read
#[derive(Debug, Default)]
pub struct ReplayQueue {
    pending: VecDeque<KeyEvent>,
}

impl ReplayQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Next pending event, without removing it
    pub fn front(&self) -> Option<&KeyEvent> {
        self.pending.front()
    }

    /// Removes the next pending event
    pub fn pop(&mut self) -> Option<KeyEvent> {
        self.pending.pop_front()
    }

    /// Runs `scan` with a fresh recording, then folds the recording back
    ///
    /// The fold happens whatever `scan` returns, including errors.
    pub fn speculate<T>(&mut self, scan: impl FnOnce(&mut Self, &mut Speculation) -> T) -> T {
        let mut speculation = Speculation::new();
        let result = scan(self, &mut speculation);
        self.replay_from_speculation(speculation);
        result
    }

    /// Puts a speculation's events ahead of anything still pending
    pub fn replay_from_speculation(&mut self, speculation: Speculation) {
        let replayed = speculation.into_events();
        log::debug!("replaying {} speculated key events", replayed.len());

        let rest = core::mem::take(&mut self.pending);
        self.pending = replayed.into_iter().chain(rest).collect();
    }
}

/// Recording of one speculative scan
///
/// `units[i]` is the event that produced unit `i` of the scratch line.
#[derive(Debug, Default)]
pub struct Speculation {
    units: Vec<KeyEvent>,
    terminator: Option<KeyEvent>,
}

impl Speculation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the event that inserted a unit at line index `at`
    pub fn record_unit(&mut self, at: usize, event: KeyEvent) {
        let at = at.min(self.units.len());
        self.units.insert(at, event);
    }

    /// Drops the recording of the unit erased at line index `at`
    pub fn erase_unit(&mut self, at: usize) {
        if at < self.units.len() {
            self.units.remove(at);
        }
    }

    /// Records the Enter that ended the line
    pub fn terminate(&mut self, event: KeyEvent) {
        self.terminator = Some(event);
    }

    pub fn is_terminated(&self) -> bool {
        self.terminator.is_some()
    }

    /// Events to replay, in line order
    pub fn into_events(self) -> Vec<KeyEvent> {
        let mut events = self.units;
        events.extend(self.terminator);
        events
    }
}
