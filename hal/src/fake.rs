//! In-memory devices for tests and host simulation
//!
//! - `FakeKeySource`: scripted key events, closes when the script runs dry
//! - `FakeTextGrid`: byte cells in a `Vec`, records cursor traffic
//! - `RecordingSpeaker`: remembers every tone requested

use alloc::collections::VecDeque;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::cell::RefCell;

use crate::key_source::KeySource;
use crate::keyboard::KeyboardError;
use crate::speaker::Speaker;
use crate::text_grid::{Color, TextGrid, TextMode};
use input_types::{ConsoleKey, KeyEvent};

/// Scripted key source
#[derive(Debug, Default)]
pub struct FakeKeySource {
    events: VecDeque<KeyEvent>,
    fail_next: Option<KeyboardError>,
    blocking_reads: usize,
}

impl FakeKeySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Source that yields `events` in order
    pub fn from_events(events: impl IntoIterator<Item = KeyEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Source that types `text`; `'\n'` becomes an Enter key press
    pub fn from_text(text: &str) -> Self {
        let mut source = Self::new();
        source.type_text(text);
        source
    }

    /// Appends one event to the script
    pub fn push(&mut self, event: KeyEvent) {
        self.events.push_back(event);
    }

    /// Appends a key press per char of `text`
    pub fn type_text(&mut self, text: &str) {
        for ch in text.chars() {
            let event = match ch {
                '\n' => KeyEvent::special(ConsoleKey::Enter),
                _ => KeyEvent::char(ch),
            };
            self.events.push_back(event);
        }
    }

    /// Makes the next read fail with `error`
    pub fn fail_next(&mut self, error: KeyboardError) {
        self.fail_next = Some(error);
    }

    /// Events not yet read
    pub fn remaining(&self) -> usize {
        self.events.len()
    }

    /// Number of `next_key_blocking` calls made so far
    pub fn blocking_reads(&self) -> usize {
        self.blocking_reads
    }
}

impl KeySource for FakeKeySource {
    fn next_key_blocking(&mut self) -> Result<Option<KeyEvent>, KeyboardError> {
        self.blocking_reads += 1;
        self.try_next_key()
    }

    fn try_next_key(&mut self) -> Result<Option<KeyEvent>, KeyboardError> {
        if let Some(error) = self.fail_next.take() {
            return Err(error);
        }
        Ok(self.events.pop_front())
    }

    fn has_key_available(&mut self) -> bool {
        !self.events.is_empty()
    }
}

/// In-memory text grid
#[derive(Debug, Clone)]
pub struct FakeTextGrid {
    cols: usize,
    rows: usize,
    cells: Vec<u8>,
    attr: u8,
    cursor: (usize, usize),
    cursor_updates: usize,
    cursor_size: u8,
    cursor_visible: bool,
    scrolls: usize,
    mode: Option<TextMode>,
}

impl FakeTextGrid {
    /// Blank grid of `cols` x `rows`, gray on black
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![b' '; cols * rows],
            attr: Color::make_attr(Color::Gray, Color::Black),
            cursor: (0, 0),
            cursor_updates: 0,
            cursor_size: 25,
            cursor_visible: true,
            scrolls: 0,
            mode: None,
        }
    }

    /// Grid sized for a text mode preset
    pub fn with_mode(mode: TextMode) -> Self {
        let mut grid = Self::new(mode.cols(), mode.rows());
        grid.mode = Some(mode);
        grid
    }

    /// Text of one row with trailing blanks removed
    pub fn row_text(&self, row: usize) -> String {
        if row >= self.rows {
            return String::new();
        }
        let start = row * self.cols;
        let text: String = self.cells[start..start + self.cols]
            .iter()
            .map(|&b| if b == 0 { ' ' } else { b as char })
            .collect();
        String::from(text.trim_end())
    }

    /// Hardware cursor position as last set
    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    /// Number of `set_cursor_pos` calls
    pub fn cursor_updates(&self) -> usize {
        self.cursor_updates
    }

    /// Number of `scroll_up` calls
    pub fn scrolls(&self) -> usize {
        self.scrolls
    }

    /// Last mode set, if any
    pub fn mode(&self) -> Option<TextMode> {
        self.mode
    }

    fn index(&self, col: usize, row: usize) -> Option<usize> {
        (col < self.cols && row < self.rows).then(|| row * self.cols + col)
    }
}

impl TextGrid for FakeTextGrid {
    fn cols(&self) -> usize {
        self.cols
    }

    fn rows(&self) -> usize {
        self.rows
    }

    fn set_cell(&mut self, col: usize, row: usize, byte: u8) {
        if let Some(i) = self.index(col, row) {
            self.cells[i] = byte;
        }
    }

    fn cell(&self, col: usize, row: usize) -> u8 {
        self.index(col, row).map(|i| self.cells[i]).unwrap_or(0)
    }

    fn clear(&mut self) {
        self.cells.fill(b' ');
    }

    fn scroll_up(&mut self) {
        self.scrolls += 1;
        self.cells.copy_within(self.cols.., 0);
        let last = (self.rows - 1) * self.cols;
        self.cells[last..].fill(b' ');
    }

    fn set_cursor_pos(&mut self, col: usize, row: usize) {
        self.cursor_updates += 1;
        self.cursor = (col, row);
    }

    fn color(&self) -> u8 {
        self.attr
    }

    fn set_colors(&mut self, fg: Color, bg: Color) {
        self.attr = Color::make_attr(fg, bg);
    }

    fn cursor_size(&self) -> u8 {
        self.cursor_size
    }

    fn set_cursor_size(&mut self, percent: u8) {
        self.cursor_size = percent;
    }

    fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        self.cursor_visible = visible;
    }

    fn set_mode(&mut self, mode: TextMode) {
        self.cols = mode.cols();
        self.rows = mode.rows();
        self.cells = vec![b' '; self.cols * self.rows];
        self.mode = Some(mode);
    }
}

/// Speaker that records requested tones
///
/// Clones share one log, so a test can keep a handle after moving the
/// speaker into its owner.
#[derive(Debug, Clone, Default)]
pub struct RecordingSpeaker {
    tones: Rc<RefCell<Vec<(u32, u32)>>>,
}

impl RecordingSpeaker {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(frequency_hz, duration_ms)` of every beep, oldest first
    pub fn tones(&self) -> Vec<(u32, u32)> {
        self.tones.borrow().clone()
    }
}

impl Speaker for RecordingSpeaker {
    fn beep(&mut self, frequency_hz: u32, duration_ms: u32) {
        self.tones.borrow_mut().push((frequency_hz, duration_ms));
    }
}
