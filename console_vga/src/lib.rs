//! # VGA Text Grid
//!
//! [`TextGrid`] over the VGA text buffer (physical 0xB8000), with the
//! hardware cursor driven through the CRT controller.
//!
//! ## Philosophy
//!
//! This is NOT a terminal. It stores bytes in cells and moves a cursor;
//! control characters, wrapping and scrolling policy belong to the display
//! writer above it.
//!
//! ## Design Principles
//!
//! 1. **No unsafe except MMIO**: Isolated to cell reads and writes
//! 2. **Registers behind a trait**: Tests record CRTC traffic instead of
//!    touching ports
//! 3. **Mode is data**: `cols`/`rows` come from the current [`TextMode`]

#![cfg_attr(not(test), no_std)]

use core::ptr;

use hal::text_grid::{Color, CursorRegisters, TextGrid, TextMode};

/// Physical address of the color text buffer
pub const VGA_TEXT_BUFFER: usize = 0xB8000;

const CRTC_MAX_SCAN_LINE: u8 = 0x09;
const CRTC_CURSOR_START: u8 = 0x0A;
const CRTC_CURSOR_END: u8 = 0x0B;
const CRTC_CURSOR_LOCATION_HIGH: u8 = 0x0E;
const CRTC_CURSOR_LOCATION_LOW: u8 = 0x0F;
const CRTC_OFFSET: u8 = 0x13;
const CURSOR_DISABLE: u8 = 0x20;
const SCAN_LINE_MASK: u8 = 0x1F;

/// VGA text buffer plus CRT controller
pub struct VgaTextGrid<R: CursorRegisters> {
    buffer: *mut u8,
    regs: R,
    mode: TextMode,
    attr: u8,
    cursor_size: u8,
    cursor_visible: bool,
}

impl<R: CursorRegisters> VgaTextGrid<R> {
    /// Create a grid over the text buffer mapped at `virt_addr`
    ///
    /// Starts in 80x25 with white on black and a 25% cursor. The screen
    /// contents are left untouched.
    ///
    /// # Safety
    ///
    /// The caller must ensure that `virt_addr` points to a valid, mapped VGA
    /// text buffer large enough for every [`TextMode`] preset.
    pub unsafe fn new(virt_addr: usize, regs: R) -> Self {
        let mut grid = Self {
            buffer: virt_addr as *mut u8,
            regs,
            mode: TextMode::default(),
            attr: Color::make_attr(Color::White, Color::Black),
            cursor_size: 25,
            cursor_visible: true,
        };
        grid.program_cursor_shape();
        grid
    }

    /// Current text mode
    pub fn mode(&self) -> TextMode {
        self.mode
    }

    pub fn registers(&self) -> &R {
        &self.regs
    }

    fn offset(&self, col: usize, row: usize) -> Option<usize> {
        (col < self.cols() && row < self.rows()).then(|| (row * self.cols() + col) * 2)
    }

    fn cell_count(&self) -> usize {
        self.cols() * self.rows()
    }

    fn blank_cell(&self) -> u16 {
        u16::from(self.attr) << 8 | u16::from(b' ')
    }

    /// Writes cursor start/end so the block covers `cursor_size` percent of
    /// the cell, counted up from the bottom scan line
    fn program_cursor_shape(&mut self) {
        let height = self.mode.cell_height();
        let lines = ((u16::from(height) * u16::from(self.cursor_size)).div_ceil(100) as u8).max(1);
        let start = height - lines.min(height);
        let end = height - 1;

        let disable = if self.cursor_visible { 0 } else { CURSOR_DISABLE };
        let start_reg = self.regs.read_crtc(CRTC_CURSOR_START) & !(SCAN_LINE_MASK | CURSOR_DISABLE);
        self.regs
            .write_crtc(CRTC_CURSOR_START, start_reg | disable | (start & SCAN_LINE_MASK));
        let end_reg = self.regs.read_crtc(CRTC_CURSOR_END) & !SCAN_LINE_MASK;
        self.regs.write_crtc(CRTC_CURSOR_END, end_reg | (end & SCAN_LINE_MASK));
    }
}

impl<R: CursorRegisters> TextGrid for VgaTextGrid<R> {
    fn cols(&self) -> usize {
        self.mode.cols()
    }

    fn rows(&self) -> usize {
        self.mode.rows()
    }

    fn set_cell(&mut self, col: usize, row: usize, byte: u8) {
        let Some(offset) = self.offset(col, row) else {
            return;
        };
        unsafe {
            ptr::write_volatile(self.buffer.add(offset), byte);
            ptr::write_volatile(self.buffer.add(offset + 1), self.attr);
        }
    }

    fn cell(&self, col: usize, row: usize) -> u8 {
        match self.offset(col, row) {
            Some(offset) => unsafe { ptr::read_volatile(self.buffer.add(offset)) },
            None => 0,
        }
    }

    fn clear(&mut self) {
        let cell = self.blank_cell();
        let ptr = self.buffer as *mut u16;
        for i in 0..self.cell_count() {
            unsafe { ptr::write_volatile(ptr.add(i), cell) };
        }
    }

    fn scroll_up(&mut self) {
        let row_bytes = self.cols() * 2;
        let total_bytes = self.cell_count() * 2;
        unsafe {
            ptr::copy(self.buffer.add(row_bytes), self.buffer, total_bytes - row_bytes);
        }

        let cell = self.blank_cell();
        let ptr = self.buffer as *mut u16;
        for i in (self.cell_count() - self.cols())..self.cell_count() {
            unsafe { ptr::write_volatile(ptr.add(i), cell) };
        }
    }

    fn set_cursor_pos(&mut self, col: usize, row: usize) {
        let location = (row * self.cols() + col).min(self.cell_count() - 1) as u16;
        let [low, high] = location.to_le_bytes();
        self.regs.write_crtc(CRTC_CURSOR_LOCATION_HIGH, high);
        self.regs.write_crtc(CRTC_CURSOR_LOCATION_LOW, low);
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
        self.program_cursor_shape();
    }

    fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        self.cursor_visible = visible;
        self.program_cursor_shape();
    }

    /// Reprograms the row pitch and character height for `mode`
    ///
    /// Sequencer and timing registers are left as the firmware set them.
    fn set_mode(&mut self, mode: TextMode) {
        self.mode = mode;

        // Offset is in words per row, two bytes per cell
        self.regs.write_crtc(CRTC_OFFSET, (mode.cols() / 2) as u8);
        let max_scan = self.regs.read_crtc(CRTC_MAX_SCAN_LINE) & !SCAN_LINE_MASK;
        self.regs
            .write_crtc(CRTC_MAX_SCAN_LINE, max_scan | (mode.cell_height() - 1));

        self.program_cursor_shape();
    }
}

// Cells are only touched through volatile accesses on a buffer the caller
// handed over exclusively in `new`
unsafe impl<R: CursorRegisters + Send> Send for VgaTextGrid<R> {}
