//! Display writer
//!
//! Owns the screen cursor and turns bytes into cells on a [`TextGrid`].
//!
//! ## Output policy
//!
//! - `\n`: column 0 of the next row, scrolling at the bottom
//! - `\r`: column 0
//! - `\t`: four blanks (no tab stops)
//! - anything else: one glyph, wrapping at the right edge
//!
//! The hardware cursor is pushed to the grid once per processed unit.

use core::fmt;

use hal::text_grid::{Color, TextGrid, TextMode};

use crate::config::{CURSOR_SIZE_MAX, CURSOR_SIZE_MIN};
use crate::encoding::TextEncoding;
use crate::error::{ConsoleError, ConsoleResult};

/// Blanks written for a tab
pub const TAB_WIDTH: usize = 4;

/// Writes bytes onto a text grid and tracks the cursor
pub struct DisplayWriter<G: TextGrid> {
    grid: G,
    col: usize,
    row: usize,
    scrolls: u64,
    encoding: TextEncoding,
}

impl<G: TextGrid> DisplayWriter<G> {
    /// Takes over `grid` with the cursor at the top left
    pub fn new(grid: G, encoding: TextEncoding) -> Self {
        let mut writer = Self {
            grid,
            col: 0,
            row: 0,
            scrolls: 0,
            encoding,
        };
        writer.sync_cursor();
        writer
    }

    pub fn grid(&self) -> &G {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut G {
        &mut self.grid
    }

    pub fn into_grid(self) -> G {
        self.grid
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    /// Output encoding used by `write_str`
    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    pub fn set_encoding(&mut self, encoding: TextEncoding) {
        self.encoding = encoding;
    }

    /// Cursor as `(col, row)`
    pub fn cursor(&self) -> (usize, usize) {
        (self.col, self.row)
    }

    /// Moves the cursor, clamping it into the grid
    pub fn set_cursor(&mut self, col: usize, row: usize) {
        self.col = col.min(self.cols().saturating_sub(1));
        self.row = row.min(self.rows().saturating_sub(1));
        self.sync_cursor();
    }

    /// Number of times the grid has scrolled since creation
    pub fn scroll_count(&self) -> u64 {
        self.scrolls
    }

    /// Writes bytes under the output policy
    pub fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            match byte {
                b'\n' => {
                    self.line_feed();
                    self.sync_cursor();
                }
                b'\r' => {
                    self.col = 0;
                    self.sync_cursor();
                }
                b'\t' => {
                    for _ in 0..TAB_WIDTH {
                        self.write_char(b' ');
                    }
                }
                _ => self.write_char(byte),
            }
        }
    }

    /// Writes one glyph, wrapping (and scrolling) at the right edge
    pub fn write_char(&mut self, byte: u8) {
        self.grid.set_cell(self.col, self.row, byte);
        self.col += 1;
        if self.col >= self.cols() {
            self.line_feed();
        }
        self.sync_cursor();
    }

    /// Echoes one typed unit: a newline for `'\n'`, otherwise exactly one cell
    pub fn echo(&mut self, ch: char) {
        if ch == '\n' {
            self.write(b"\n");
        } else {
            self.write_char(self.encoding.glyph(ch));
        }
    }

    /// Re-syncs the hardware cursor
    pub fn flush(&mut self) {
        self.sync_cursor();
    }

    /// Blanks the grid and homes the cursor
    pub fn clear(&mut self) {
        self.grid.clear();
        self.col = 0;
        self.row = 0;
        self.sync_cursor();
    }

    /// One cell left, wrapping to the end of the previous row
    pub fn step_back(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = self.cols() - 1;
        }
        self.sync_cursor();
    }

    /// One cell right, wrapping to the next row; stops at the last cell
    pub fn step_forward(&mut self) {
        if self.col + 1 < self.cols() {
            self.col += 1;
        } else if self.row + 1 < self.rows() {
            self.col = 0;
            self.row += 1;
        }
        self.sync_cursor();
    }

    pub fn foreground(&self) -> Color {
        Color::foreground_of(self.grid.color())
    }

    pub fn set_foreground(&mut self, fg: Color) {
        let bg = self.background();
        self.grid.set_colors(fg, bg);
    }

    pub fn background(&self) -> Color {
        Color::background_of(self.grid.color())
    }

    pub fn set_background(&mut self, bg: Color) {
        let fg = self.foreground();
        self.grid.set_colors(fg, bg);
    }

    pub fn cursor_size(&self) -> u8 {
        self.grid.cursor_size()
    }

    /// Sets the cursor height in percent; nothing changes on error
    pub fn set_cursor_size(&mut self, percent: usize) -> ConsoleResult<()> {
        ConsoleError::check_range(
            "cursor size",
            percent,
            CURSOR_SIZE_MIN as usize,
            CURSOR_SIZE_MAX as usize,
        )?;
        self.grid.set_cursor_size(percent as u8);
        Ok(())
    }

    pub fn cursor_visible(&self) -> bool {
        self.grid.cursor_visible()
    }

    pub fn set_cursor_visible(&mut self, visible: bool) {
        self.grid.set_cursor_visible(visible);
    }

    /// Switches the grid to `mode` and clamps the cursor into it
    pub fn set_mode(&mut self, mode: TextMode) {
        log::debug!("text mode {}", mode);
        self.grid.set_mode(mode);
        self.set_cursor(self.col, self.row);
    }

    fn line_feed(&mut self) {
        self.col = 0;
        self.row += 1;
        if self.row >= self.rows() {
            self.grid.scroll_up();
            self.scrolls += 1;
            self.row = self.rows() - 1;
        }
    }

    fn sync_cursor(&mut self) {
        self.grid.set_cursor_pos(self.col, self.row);
    }
}

impl<G: TextGrid> fmt::Write for DisplayWriter<G> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let bytes = self.encoding.encode_str(s);
        self.write(&bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write;
    use hal::fake::FakeTextGrid;

    fn writer(cols: usize, rows: usize) -> DisplayWriter<FakeTextGrid> {
        DisplayWriter::new(FakeTextGrid::new(cols, rows), TextEncoding::Ascii)
    }

    #[test]
    fn test_plain_text() {
        let mut out = writer(80, 25);
        out.write(b"hello");

        assert_eq!(out.grid().row_text(0), "hello");
        assert_eq!(out.cursor(), (5, 0));
        assert_eq!(out.grid().cursor(), (5, 0));
    }

    #[test]
    fn test_control_characters() {
        let mut out = writer(80, 25);
        out.write(b"abc\rX\nnext\tend");

        assert_eq!(out.grid().row_text(0), "Xbc");
        assert_eq!(out.grid().row_text(1), "next    end");
        assert_eq!(out.cursor(), (11, 1));
    }

    #[test]
    fn test_cursor_synced_once_per_unit() {
        let mut out = writer(80, 25);
        let before = out.grid().cursor_updates();
        out.write(b"ab\n\r\t");

        // two glyphs, two controls, four tab blanks
        assert_eq!(out.grid().cursor_updates() - before, 8);
    }

    #[test]
    fn test_full_row_from_last_row_scrolls_once() {
        let mut out = writer(10, 5);
        out.set_cursor(0, 4);
        out.write(&[b'x'; 10]);

        assert_eq!(out.grid().scrolls(), 1);
        assert_eq!(out.scroll_count(), 1);
        assert_eq!(out.cursor(), (0, 4));
        assert_eq!(out.grid().row_text(3), "xxxxxxxxxx");
    }

    #[test]
    fn test_full_row_from_first_row_wraps() {
        let mut out = writer(10, 5);
        out.write(&[b'x'; 10]);

        assert_eq!(out.grid().scrolls(), 0);
        assert_eq!(out.cursor(), (0, 1));
    }

    #[test]
    fn test_newline_on_last_row_scrolls() {
        let mut out = writer(10, 3);
        out.write(b"a\nb\nc\nd");

        assert_eq!(out.grid().row_text(0), "b");
        assert_eq!(out.grid().row_text(2), "d");
        assert_eq!(out.cursor(), (1, 2));
    }

    #[test]
    fn test_step_back_and_forward_wrap_without_scrolling() {
        let mut out = writer(10, 2);
        out.set_cursor(0, 1);
        out.step_back();
        assert_eq!(out.cursor(), (9, 0));

        out.step_forward();
        assert_eq!(out.cursor(), (0, 1));

        out.set_cursor(9, 1);
        out.step_forward();
        assert_eq!(out.cursor(), (9, 1));
        out.set_cursor(0, 0);
        out.step_back();
        assert_eq!(out.cursor(), (0, 0));
        assert_eq!(out.scroll_count(), 0);
    }

    #[test]
    fn test_echo_is_one_cell() {
        let mut out = writer(80, 25);
        out.echo('é');
        out.echo('\t');
        assert_eq!(out.cursor(), (2, 0));
        assert_eq!(out.grid().cell(0, 0), b'?');

        out.echo('\n');
        assert_eq!(out.cursor(), (0, 1));
    }

    #[test]
    fn test_fmt_write_uses_encoding() {
        let mut out = writer(80, 25);
        out.set_encoding(TextEncoding::Latin1);
        write!(out, "{}é", 42).unwrap();

        assert_eq!(out.grid().cell(2, 0), 0xE9);
        assert_eq!(out.cursor(), (3, 0));
    }

    #[test]
    fn test_clear_homes_cursor() {
        let mut out = writer(80, 25);
        out.write(b"text\nmore");
        out.clear();

        assert_eq!(out.grid().row_text(0), "");
        assert_eq!(out.cursor(), (0, 0));
        assert_eq!(out.grid().cursor(), (0, 0));
    }

    #[test]
    fn test_colors_pass_through() {
        let mut out = writer(80, 25);
        out.set_foreground(Color::Yellow);
        out.set_background(Color::DarkBlue);

        assert_eq!(out.foreground(), Color::Yellow);
        assert_eq!(out.background(), Color::DarkBlue);
        assert_eq!(out.grid().color(), 0x1E);
    }

    #[test]
    fn test_cursor_size_validated() {
        let mut out = writer(80, 25);
        assert!(out.set_cursor_size(100).is_ok());
        assert_eq!(out.cursor_size(), 100);

        assert!(matches!(
            out.set_cursor_size(0),
            Err(ConsoleError::OutOfRange { value: 0, .. })
        ));
        assert!(out.set_cursor_size(101).is_err());
        assert_eq!(out.cursor_size(), 100);
    }

    #[test]
    fn test_set_mode_clamps_cursor() {
        let mut out = writer(80, 25);
        out.set_cursor(70, 20);
        out.set_mode(TextMode::Text40x25);

        assert_eq!((out.cols(), out.rows()), (40, 25));
        assert_eq!(out.cursor(), (39, 20));
    }
}
